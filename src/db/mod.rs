//! Database module
//!
//! Connection pooling for the login procedure's database.

pub mod connection;

pub use connection::*;
