//! Application-level model types.

pub mod error;

pub use error::AppError;
