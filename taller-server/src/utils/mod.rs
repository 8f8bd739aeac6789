//! Utilities

pub mod error;
pub mod logger;
pub mod validation;

pub use error::{ok, AppError, AppResponse, AppResult};
