//! Capture core modules
//!
//! Everything between the eBPF object and the output loop:
//! - eBPF program loading and attachment
//! - Per-CPU perf buffer readers
//! - Raw slot decoding into records
//! - Transport statistics (received / lost / undecodable)
//! - Display formatting and end-of-run diagnostics

pub mod cpu_utils;
pub mod decode;
pub mod diagnostics;
pub mod ebpf_setup;
pub mod event_display;
pub mod event_reader;

pub use cpu_utils::online_cpus;
pub use decode::{decode_network_event, decode_process_event};
pub use diagnostics::print_publish_diagnostics;
pub use ebpf_setup::{
    attach_connect_probe, attach_exec_probe, init_ebpf_logger, load_ebpf_program,
};
pub use event_display::{display_record, display_statistics};
pub use event_reader::{spawn_event_readers, StatsSnapshot, TransportStats};

use clap::ValueEnum;
use std::fmt;

/// Which kernel entry point observes outbound TCP connects.
///
/// Both strategies produce the same record layout; they differ in which
/// fields they can populate. Exactly one is attached per run, selected on
/// the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConnectStrategy {
    /// Argument-based capture at the `sys_enter_connect` tracepoint. Only
    /// the destination is known; source address/port are always 0.
    Syscall,
    /// Socket-state capture at the `tcp_v4_connect` kprobe. The local
    /// endpoint is read from the socket, best-effort.
    Socket,
}

impl ConnectStrategy {
    /// Name of the eBPF program implementing this strategy.
    #[must_use]
    pub fn program_name(self) -> &'static str {
        match self {
            ConnectStrategy::Syscall => "connect_entry",
            ConnectStrategy::Socket => "tcp_connect",
        }
    }

    /// Human-readable attachment point, for the startup banner.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            ConnectStrategy::Syscall => {
                "syscalls/sys_enter_connect tracepoint (destination only)"
            }
            ConnectStrategy::Socket => "tcp_v4_connect kprobe (local endpoint best-effort)",
        }
    }
}

impl fmt::Display for ConnectStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectStrategy::Syscall => write!(f, "syscall"),
            ConnectStrategy::Socket => write!(f, "socket"),
        }
    }
}
