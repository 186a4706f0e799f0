//! # eBPF Program Loading and Attachment
//!
//! Loads compiled eBPF bytecode and attaches programs to kernel hook points.
//!
//! ## Functions
//!
//! - [`load_ebpf_program()`] - Load eBPF bytecode from embedded binary
//! - [`attach_exec_probe()`] - Tracepoint on `syscalls/sys_enter_execve`
//! - [`attach_connect_probe()`] - One of the two connect strategies
//!
//! Failures here are the only user-visible error surface: once attachment
//! succeeds, per-event conditions are absorbed inside the probes.

use aya::{
    include_bytes_aligned,
    programs::{KProbe, TracePoint},
    Ebpf,
};
use aya_log::EbpfLogger;
use log::{info, warn};

use super::ConnectStrategy;
use crate::domain::CaptureError;

/// Load the eBPF program binary
///
/// Always uses the release build; eBPF programs are small and compile fast
/// in release, and LTO eliminates dead code the verifier would reject.
///
/// # Errors
/// Returns an error if the eBPF program binary cannot be loaded
pub fn load_ebpf_program() -> Result<Ebpf, CaptureError> {
    let bpf =
        Ebpf::load(include_bytes_aligned!("../../../target/bpfel-unknown-none/release/sentra"))?;
    Ok(bpf)
}

/// Initialize eBPF logger
pub fn init_ebpf_logger(bpf: &mut Ebpf) {
    if let Err(e) = EbpfLogger::init(bpf) {
        warn!("Failed to initialize eBPF logger: {e}");
    }
}

/// Attach the process-exec probe to `syscalls/sys_enter_execve`.
///
/// Every exec attempt on the system produces one record; there is no
/// filtering.
///
/// # Errors
/// Returns an error if the program is missing, fails verification, or the
/// tracepoint cannot be attached
pub fn attach_exec_probe(bpf: &mut Ebpf) -> Result<(), CaptureError> {
    let program: &mut TracePoint = bpf
        .program_mut("exec_entry")
        .ok_or(CaptureError::ProgramNotFound("exec_entry"))?
        .try_into()?;
    program.load()?;
    program.attach("syscalls", "sys_enter_execve").map_err(|e| {
        CaptureError::ProbeAttachFailed {
            probe: "exec_entry",
            hook: "syscalls/sys_enter_execve",
            error: e.to_string(),
        }
    })?;
    info!("✓ Attached tracepoint: syscalls/sys_enter_execve");
    Ok(())
}

/// Attach the network-connect probe for the selected strategy.
///
/// The eBPF object carries both strategies as separate programs; only the
/// selected one is loaded and attached.
///
/// # Errors
/// Returns an error if the program is missing, fails verification, or the
/// hook cannot be attached
pub fn attach_connect_probe(bpf: &mut Ebpf, strategy: ConnectStrategy) -> Result<(), CaptureError> {
    match strategy {
        ConnectStrategy::Syscall => {
            let program: &mut TracePoint = bpf
                .program_mut("connect_entry")
                .ok_or(CaptureError::ProgramNotFound("connect_entry"))?
                .try_into()?;
            program.load()?;
            program.attach("syscalls", "sys_enter_connect").map_err(|e| {
                CaptureError::ProbeAttachFailed {
                    probe: "connect_entry",
                    hook: "syscalls/sys_enter_connect",
                    error: e.to_string(),
                }
            })?;
            info!("✓ Attached tracepoint: syscalls/sys_enter_connect");
        }
        ConnectStrategy::Socket => {
            let program: &mut KProbe = bpf
                .program_mut("tcp_connect")
                .ok_or(CaptureError::ProgramNotFound("tcp_connect"))?
                .try_into()?;
            program.load()?;
            program.attach("tcp_v4_connect", 0).map_err(|e| CaptureError::ProbeAttachFailed {
                probe: "tcp_connect",
                hook: "tcp_v4_connect",
                error: e.to_string(),
            })?;
            info!("✓ Attached kprobe: tcp_v4_connect");
        }
    }
    Ok(())
}
