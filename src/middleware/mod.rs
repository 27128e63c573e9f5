//! HTTP middleware

pub mod logging;
pub mod translate;

pub use logging::logging_middleware;
pub use translate::{panic_response, translate_errors};
