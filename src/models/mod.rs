//! Domain models
//!
//! This module contains the domain models used throughout the application.

pub mod login;

pub use login::*;
