//! Structured error types for sentra
//!
//! Using thiserror for automatic Display implementation and error chaining.

use thiserror::Error;

/// Errors surfaced once, at startup, by the load/attach path. These are the
/// only user-visible failures: per-event conditions (filtered families,
/// partial reads, transport-full drops) are handled inside the probes and
/// never escalate.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("eBPF program {0} not found in object")]
    ProgramNotFound(&'static str),

    #[error("eBPF map {0} not found in object")]
    MapNotFound(&'static str),

    #[error("Failed to attach {probe} to {hook}: {error}")]
    ProbeAttachFailed { probe: &'static str, hook: &'static str, error: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Aya(#[from] aya::EbpfError),

    #[error(transparent)]
    Program(#[from] aya::programs::ProgramError),

    #[error(transparent)]
    Map(#[from] aya::maps::MapError),
}

/// Errors from decoding a raw transport slot into a record.
///
/// The record schema is versioned by size: a slot shorter than the expected
/// struct is rejected rather than reinterpreted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("record too short: got {actual} bytes, schema needs {expected}")]
    ShortRecord { expected: usize, actual: usize },
}
