//! # Shared Data Structures (eBPF ↔ Userspace)
//!
//! Fixed-layout event records and constants shared between the kernel-side
//! eBPF programs and the userspace consumer. All types use `#[repr(C)]` for
//! a consistent memory layout across the kernel/userspace boundary.
//!
//! ## Wire contract
//!
//! The record structs are the schema of the perf-buffer transport. Producer
//! and consumer agree on field order, width, and byte order out of band:
//! a record is valid for decoding only if the transport slot holds at least
//! `size_of` the struct. Growing a record means a new size, which the
//! consumer detects — never a silent reinterpretation of bytes.
//!
//! ## Key Types
//!
//! - [`ProcessEvent`] - one `execve` attempt
//! - [`NetworkEvent`] - one outbound IPv4 TCP connection attempt
//! - [`ExecveEnterArgs`] / [`ConnectEnterArgs`] - raw syscall tracepoint layouts
//! - [`SockAddrIn`] - userspace `sockaddr_in` as read by the probes

#![no_std]

/// Kernel task command name length (`TASK_COMM_LEN`).
pub const COMM_LEN: usize = 16;

/// Bound on the copied prefix of the executed path. Reads past this bound
/// are truncated by `bpf_probe_read_user_str` and the copy stays
/// NUL-terminated.
pub const ARGV_PREFIX_LEN: usize = 128;

/// IPv4 address family (`AF_INET`).
pub const AF_INET: u16 = 2;

/// `ip_version` value for every record produced in the current scope.
pub const IP_VERSION_4: u8 = 4;

/// One process-creation attempt, captured at `syscalls/sys_enter_execve`.
///
/// Built entirely on the probe stack, fully initialized before publication,
/// then copied once into the per-CPU perf buffer. 168 bytes.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct ProcessEvent {
    /// Monotonic kernel time at capture (`bpf_ktime_get_ns`), boot-relative.
    pub timestamp_ns: u64,

    /// Task id (low half of `bpf_get_current_pid_tgid`). For a
    /// single-threaded process this equals `tgid`.
    pub pid: u32,

    /// Thread group id (high half) — the process id as seen by `ps`.
    pub tgid: u32,

    /// Effective uid of the caller.
    pub uid: u32,

    /// Kernel task name, NUL-terminated within the bound.
    pub comm: [u8; COMM_LEN],

    /// Truncated, NUL-terminated copy of the exec filename argument.
    /// All zeros when the user pointer was unmapped or faulted — the event
    /// is still published with partial data.
    pub argv_prefix: [u8; ARGV_PREFIX_LEN],

    /// Padding to an 8-byte multiple.
    #[allow(clippy::pub_underscore_fields)]
    pub _padding: [u8; 4],
}

/// One outbound IPv4 TCP connection attempt.
///
/// Which fields are guaranteed populated depends on the capture strategy
/// chosen at attachment time:
///
/// - **Syscall-argument capture** (`sys_enter_connect`): only the
///   destination is known; `source_addr`/`source_port` are 0.
/// - **Socket-state capture** (`tcp_v4_connect`): the local endpoint is
///   read best-effort from the socket and may still be 0 before the kernel
///   assigns one.
///
/// 56 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct NetworkEvent {
    /// Monotonic kernel time at capture (`bpf_ktime_get_ns`).
    pub timestamp_ns: u64,

    /// Task id (low half of `bpf_get_current_pid_tgid`).
    pub pid: u32,

    /// Thread group id (high half).
    pub tgid: u32,

    /// Effective uid of the caller.
    pub uid: u32,

    /// Kernel task name, NUL-terminated within the bound.
    pub comm: [u8; COMM_LEN],

    /// Local IPv4 address, network byte order. 0 when unknown at the
    /// capture point.
    pub source_addr: u32,

    /// Destination IPv4 address, network byte order.
    pub dest_addr: u32,

    /// Local port, host byte order. 0 when unknown.
    pub source_port: u16,

    /// Destination port, host byte order (normalized at capture time so the
    /// consumer never byte-swaps).
    pub dest_port: u16,

    /// Always [`IP_VERSION_4`]; reserved for future address families.
    pub ip_version: u8,

    /// Padding to an 8-byte multiple.
    #[allow(clippy::pub_underscore_fields)]
    pub _padding: [u8; 7],
}

/// Tracepoint arguments for `syscalls/sys_enter_execve`.
///
/// Layout defined by the kernel tracepoint ABI:
/// `/sys/kernel/tracing/events/syscalls/sys_enter_execve/format`
///
/// Pointer arguments are carried as `u64` so the layout is identical on the
/// eBPF target and the host.
#[repr(C)]
pub struct ExecveEnterArgs {
    /// Common tracepoint header fields (type, flags, preempt count, pid).
    #[allow(clippy::pub_underscore_fields)]
    pub __unused__: u64,

    /// Syscall number.
    pub syscall_nr: i32,

    /// Alignment hole before the first 8-byte argument.
    #[allow(clippy::pub_underscore_fields)]
    pub _pad: i32,

    /// `const char *filename` — user pointer to the executed path.
    pub filename: u64,

    /// `const char *const *argv` — user pointer to the argument vector.
    pub argv: u64,

    /// `const char *const *envp` — user pointer to the environment.
    pub envp: u64,
}

/// Tracepoint arguments for `syscalls/sys_enter_connect`.
///
/// Layout defined by the kernel tracepoint ABI:
/// `/sys/kernel/tracing/events/syscalls/sys_enter_connect/format`
#[repr(C)]
pub struct ConnectEnterArgs {
    /// Common tracepoint header fields.
    #[allow(clippy::pub_underscore_fields)]
    pub __unused__: u64,

    /// Syscall number.
    pub syscall_nr: i32,

    /// Alignment hole before the first 8-byte argument.
    #[allow(clippy::pub_underscore_fields)]
    pub _pad: i32,

    /// Socket file descriptor.
    pub fd: u64,

    /// `struct sockaddr *uservaddr` — user pointer to the destination.
    pub uservaddr: u64,

    /// `int addrlen`.
    pub addrlen: u64,
}

/// `struct sockaddr_in` as handed to `connect(2)`.
///
/// `sin_port` and `sin_addr` are in network byte order as stored by the
/// caller; normalization to the record's documented byte order happens in
/// the probe.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct SockAddrIn {
    /// Address family; records are produced only for [`AF_INET`].
    pub sin_family: u16,

    /// Destination port, network byte order.
    pub sin_port: u16,

    /// Destination IPv4 address, network byte order.
    pub sin_addr: u32,

    /// Unused tail of the sockaddr.
    pub sin_zero: [u8; 8],
}

#[cfg(feature = "user")]
use aya::Pod;

// These unsafe impls are required for eBPF <-> userspace communication.
// Pod ensures the types can be transmitted as plain bytes.
#[cfg(feature = "user")]
#[allow(unsafe_code)]
unsafe impl Pod for ProcessEvent {}

#[cfg(feature = "user")]
#[allow(unsafe_code)]
unsafe impl Pod for NetworkEvent {}
