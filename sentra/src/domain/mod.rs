//! Domain model for sentra
//!
//! Core types and structured errors:
//! - Compile-time safety via newtype pattern
//! - Structured error handling with thiserror

pub mod errors;
pub mod types;

pub use errors::{CaptureError, DecodeError};
pub use types::{CpuId, EventClass};
