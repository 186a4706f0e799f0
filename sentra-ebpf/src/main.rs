//! # eBPF Kernel-Side Capture Programs
//!
//! eBPF programs that run inside the Linux kernel to capture
//! security-relevant events at the point they occur.
//!
//! ## Programs
//!
//! - **Tracepoint**: `exec_entry` on `syscalls/sys_enter_execve` - one
//!   record per exec attempt, no filtering
//! - **Tracepoint**: `connect_entry` on `syscalls/sys_enter_connect` -
//!   argument-based IPv4 connect capture (destination only)
//! - **Kprobe**: `tcp_connect` on `tcp_v4_connect` - socket-state-based
//!   IPv4 connect capture (local endpoint best-effort)
//!
//! The two connect programs are alternative strategies for the same
//! capability; the loader attaches exactly one of them.
//!
//! ## Maps (Shared with Userspace)
//!
//! - `EXEC_EVENTS` / `NET_EVENTS` - per-CPU perf buffers, one per event class
//! - `EXEC_PUBLISHED` / `NET_PUBLISHED` - publish-attempt counters so the
//!   consumer can quantify transport loss
//!
//! ## Build
//!
//! Always compiled in release mode:
//! ```bash
//! cargo xtask build-ebpf
//! ```

#![no_std]
#![no_main]
#![allow(unused_unsafe)]

use aya_ebpf::{
    helpers::{
        bpf_get_current_comm, bpf_get_current_pid_tgid, bpf_get_current_uid_gid, bpf_ktime_get_ns,
        bpf_probe_read_kernel, bpf_probe_read_user, bpf_probe_read_user_str_bytes,
    },
    macros::{kprobe, map, tracepoint},
    maps::{HashMap, PerfEventArray},
    programs::{ProbeContext, TracePointContext},
    EbpfContext,
};
use aya_log_ebpf::debug;
use sentra_common::{
    ConnectEnterArgs, ExecveEnterArgs, NetworkEvent, ProcessEvent, SockAddrIn, AF_INET,
    ARGV_PREFIX_LEN, COMM_LEN, IP_VERSION_4,
};

// ============================================================================
// Constants
// ============================================================================

/// Offsets into `struct sock_common`, which sits at offset 0 of
/// `struct sock`:
///
/// - `skc_rcv_saddr` (bound local address, __be32) at byte 4
/// - `skc_num` (bound local port, host-order u16) at byte 14
const SKC_RCV_SADDR_OFFSET: usize = 4;
const SKC_NUM_OFFSET: usize = 14;

// ============================================================================
// eBPF Maps - Shared data structures between kernel and userspace
// ============================================================================

/// Per-CPU perf buffer carrying [`ProcessEvent`] records to userspace.
///
/// Each CPU writes only to its own partition, so concurrent probe
/// invocations never contend. A full partition drops the record rather than
/// blocking the traced syscall.
#[map]
static EXEC_EVENTS: PerfEventArray<ProcessEvent> = PerfEventArray::new(0);

/// Per-CPU perf buffer carrying [`NetworkEvent`] records to userspace.
#[map]
static NET_EVENTS: PerfEventArray<NetworkEvent> = PerfEventArray::new(0);

/// Number of exec records handed to the transport (publish attempts).
///
/// Userspace compares this against records actually consumed plus the perf
/// reader's lost count to quantify drops.
#[map]
static EXEC_PUBLISHED: HashMap<u32, u64> = HashMap::with_max_entries(1, 0);

/// Number of network records handed to the transport (publish attempts).
#[map]
static NET_PUBLISHED: HashMap<u32, u64> = HashMap::with_max_entries(1, 0);

// ============================================================================
// eBPF Program Hooks
// ============================================================================

/// Hook: `syscalls/sys_enter_execve` tracepoint.
/// Fires on every exec attempt, before the outcome is known.
#[tracepoint]
pub fn exec_entry(ctx: TracePointContext) -> u32 {
    match try_exec_entry(&ctx) {
        Ok(()) => 0,
        Err(_) => 1,
    }
}

fn try_exec_entry(ctx: &TracePointContext) -> Result<(), i64> {
    // Layout from /sys/kernel/tracing/events/syscalls/sys_enter_execve/format
    let args: *const ExecveEnterArgs = ctx.as_ptr() as *const ExecveEnterArgs;

    let pid_tgid = unsafe { bpf_get_current_pid_tgid() };

    let mut event = ProcessEvent {
        timestamp_ns: unsafe { bpf_ktime_get_ns() },
        pid: pid_tgid as u32,
        tgid: (pid_tgid >> 32) as u32,
        uid: unsafe { bpf_get_current_uid_gid() } as u32,
        // A failed comm read leaves the name zeroed; the record is still
        // published and the consumer renders the empty name.
        comm: bpf_get_current_comm().unwrap_or([0u8; COMM_LEN]),
        argv_prefix: [0u8; ARGV_PREFIX_LEN],
        _padding: [0u8; 4],
    };

    let filename = unsafe { (*args).filename } as *const u8;
    if !filename.is_null() {
        // An unmapped or faulted path is a partial read, not a fatal
        // condition: the prefix stays empty and the event still goes out.
        let _ = unsafe { bpf_probe_read_user_str_bytes(filename, &mut event.argv_prefix) };
    }

    EXEC_EVENTS.output(ctx, &event, 0);
    bump_published(&EXEC_PUBLISHED);

    Ok(())
}

/// Hook: `syscalls/sys_enter_connect` tracepoint (argument-based strategy).
/// The local endpoint is unknown at this point and stays zero.
#[tracepoint]
pub fn connect_entry(ctx: TracePointContext) -> u32 {
    match try_connect_entry(&ctx) {
        Ok(()) => 0,
        Err(_) => 1,
    }
}

fn try_connect_entry(ctx: &TracePointContext) -> Result<(), i64> {
    // Layout from /sys/kernel/tracing/events/syscalls/sys_enter_connect/format
    let args: *const ConnectEnterArgs = ctx.as_ptr() as *const ConnectEnterArgs;

    let uservaddr = unsafe { (*args).uservaddr } as *const SockAddrIn;
    if uservaddr.is_null() {
        return Ok(());
    }

    // A faulted sockaddr read aborts this invocation without publishing.
    let sa = unsafe { bpf_probe_read_user(uservaddr) }?;

    if sa.sin_family != AF_INET {
        debug!(ctx, "connect_entry: ignoring address family {}", sa.sin_family);
        return Ok(());
    }

    let event = network_event(0, sa.sin_addr, 0, u16::from_be(sa.sin_port));
    NET_EVENTS.output(ctx, &event, 0);
    bump_published(&NET_PUBLISHED);

    Ok(())
}

/// Hook: `tcp_v4_connect` kprobe (socket-state strategy).
/// `connect(2)` has already copied the sockaddr into kernel memory here, and
/// the socket object carries the local endpoint if one is bound.
#[kprobe]
pub fn tcp_connect(ctx: ProbeContext) -> u32 {
    match try_tcp_connect(&ctx) {
        Ok(()) => 0,
        Err(_) => 1,
    }
}

fn try_tcp_connect(ctx: &ProbeContext) -> Result<(), i64> {
    // int tcp_v4_connect(struct sock *sk, struct sockaddr *uaddr, int addr_len)
    let sk: *const u8 = ctx.arg(0).ok_or(1i64)?;
    let uaddr: *const SockAddrIn = ctx.arg(1).ok_or(1i64)?;

    let sa = unsafe { bpf_probe_read_kernel(uaddr) }?;

    if sa.sin_family != AF_INET {
        return Ok(());
    }

    // Local endpoint is best-effort: an unbound socket legitimately reads 0,
    // and an unreadable field degrades to 0 instead of aborting.
    let source_addr = unsafe { bpf_probe_read_kernel(sk.add(SKC_RCV_SADDR_OFFSET) as *const u32) }
        .unwrap_or(0);
    let source_port =
        unsafe { bpf_probe_read_kernel(sk.add(SKC_NUM_OFFSET) as *const u16) }.unwrap_or(0);

    let event = network_event(source_addr, sa.sin_addr, source_port, u16::from_be(sa.sin_port));
    NET_EVENTS.output(ctx, &event, 0);
    bump_published(&NET_PUBLISHED);

    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// Build a [`NetworkEvent`] with the current task's identity. Addresses are
/// stored in network byte order as read; ports arrive already normalized to
/// host byte order.
fn network_event(source_addr: u32, dest_addr: u32, source_port: u16, dest_port: u16) -> NetworkEvent {
    let pid_tgid = unsafe { bpf_get_current_pid_tgid() };

    NetworkEvent {
        timestamp_ns: unsafe { bpf_ktime_get_ns() },
        pid: pid_tgid as u32,
        tgid: (pid_tgid >> 32) as u32,
        uid: unsafe { bpf_get_current_uid_gid() } as u32,
        // Zeroed on a failed comm read, same as the exec path.
        comm: bpf_get_current_comm().unwrap_or([0u8; COMM_LEN]),
        source_addr,
        dest_addr,
        source_port,
        dest_port,
        ip_version: IP_VERSION_4,
        _padding: [0u8; 7],
    }
}

/// Bump a single-entry publish counter. Counter maintenance must never fail
/// the capture path, so the insert result is ignored.
fn bump_published(counter: &HashMap<u32, u64>) {
    let key = 0u32;
    let next = unsafe { counter.get(&key).copied().unwrap_or(0) } + 1;
    let _ = counter.insert(&key, &next, 0);
}

#[link_section = "license"]
#[no_mangle]
static LICENSE: [u8; 13] = *b"Dual MIT/GPL\0";

#[cfg(all(not(test), target_os = "none"))]
#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    unsafe { core::hint::unreachable_unchecked() }
}
