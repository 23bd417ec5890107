//! Runtime Quota common types and errors.
//!
//! This crate provides foundational types shared across rq-core modules:
//! - Common error types
//! - Output format specifications

pub mod error;
pub mod output;

pub use error::{Error, Result};
pub use output::OutputFormat;
