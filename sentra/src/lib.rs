//! # Sentra - eBPF Process and Network Event Capture
//!
//! Sentra captures two classes of kernel-level security events — process
//! creation (`execve`) and outbound IPv4 TCP connection attempts — directly
//! in the kernel via eBPF, and streams them to userspace with no observable
//! impact on the traced workload.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Traced Workload                          │
//! │             execve(2)          connect(2)                    │
//! └──────────┬──────────────────────────┬────────────────────────┘
//!            ▼                          ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                  eBPF Programs (Kernel)                      │
//! │  • Tracepoint: sys_enter_execve  → ProcessEvent              │
//! │  • Tracepoint: sys_enter_connect → NetworkEvent (strategy a) │
//! │  • Kprobe: tcp_v4_connect        → NetworkEvent (strategy b) │
//! └──────────┬──────────────────────────┬────────────────────────┘
//!            │ per-CPU perf buffer      │ per-CPU perf buffer
//!            ▼                          ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                  Sentra (This Crate)                         │
//! │                                                              │
//! │  ┌─────────────┐   ┌──────────────┐   ┌──────────────┐       │
//! │  │   Capture   │──▶│    Decode    │──▶│   Display    │       │
//! │  │ (per-CPU    │   │ (fixed-size  │   │ (text/JSON   │       │
//! │  │  readers)   │   │   records)   │   │   lines)     │       │
//! │  └─────────────┘   └──────────────┘   └──────────────┘       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`capture`]: eBPF loading/attachment, per-CPU perf readers, record
//!   decoding, transport statistics, and display formatting
//! - [`records`]: decoded, serializable record forms handed to output
//! - [`cli`]: command-line argument parsing
//! - [`domain`]: core types and structured errors
//! - [`preflight`]: system requirement checks run before any eBPF load
//!
//! ## Delivery Model
//!
//! Producers never block: a full per-CPU partition drops the record and the
//! traced syscall proceeds unchanged. Loss is observable, not silent — the
//! kernel side counts publish attempts and the perf readers aggregate the
//! transport's lost-record counts into [`capture::TransportStats`].
//!
//! ## Typical Usage
//!
//! ```bash
//! # Capture with the syscall-argument connect strategy (default)
//! sudo sentra
//!
//! # Capture local endpoints too, via the tcp_v4_connect kprobe
//! sudo sentra --strategy socket
//!
//! # Machine-readable output, stop after 60 seconds
//! sudo sentra --json --duration 60
//! ```

pub mod capture;
pub mod cli;
pub mod domain;
pub mod preflight;
pub mod records;
