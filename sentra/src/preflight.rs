//! Pre-flight checks for sentra
//!
//! Validates system requirements before attempting to load eBPF programs.
//! Provides clear, actionable error messages when requirements aren't met.
//! This is the single point where fatal-to-load conditions become visible;
//! once capture is running, per-event conditions never surface as errors.

#![allow(unsafe_code)] // geteuid() requires unsafe

use anyhow::{bail, Context, Result};
use std::path::Path;

/// Minimum kernel version for the syscall tracepoints and perf buffer
/// semantics sentra relies on
const MIN_KERNEL_VERSION: (u32, u32) = (4, 14);

/// Candidate tracefs mount points, checked in order
const TRACEFS_ROOTS: [&str; 2] = ["/sys/kernel/tracing", "/sys/kernel/debug/tracing"];

/// Run all pre-flight checks before eBPF loading
pub fn run_preflight_checks() -> Result<()> {
    check_privileges()?;
    check_kernel_version()?;
    check_tracefs()?;
    Ok(())
}

/// Check if running with sufficient privileges for eBPF
fn check_privileges() -> Result<()> {
    // Check if running as root
    if unsafe { libc::geteuid() } == 0 {
        return Ok(());
    }

    // Not root - CAP_BPF/CAP_PERFMON checking would need extra
    // dependencies, so require root outright.
    bail!(
        "Permission denied: sentra requires root privileges to load eBPF programs.\n\n\
         Run with: sudo sentra ..."
    );
}

/// Check if the kernel version is sufficient for the hooks we attach
fn check_kernel_version() -> Result<()> {
    let version_str = std::fs::read_to_string("/proc/version")
        .context("Failed to read kernel version from /proc/version")?;

    // Parse version like "Linux version 5.15.0-generic ..." or "Linux version 6.1.0-arch1-1 ..."
    let release = version_str.split_whitespace().nth(2).unwrap_or("unknown");

    let version_parts: Vec<&str> = release.split('.').collect();
    if version_parts.len() < 2 {
        // Can't parse, assume it's fine
        return Ok(());
    }

    let major: u32 = version_parts[0].parse().unwrap_or(0);
    let minor: u32 = version_parts[1]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .unwrap_or(0);

    if (major, minor) < MIN_KERNEL_VERSION {
        bail!(
            "Kernel version {}.{} is too old.\n\n\
             sentra requires Linux {}.{} or newer for syscall tracepoint and \
             perf buffer support.\n\
             Current kernel: {}",
            major,
            minor,
            MIN_KERNEL_VERSION.0,
            MIN_KERNEL_VERSION.1,
            release
        );
    }

    Ok(())
}

/// Check that tracefs is mounted; the syscall tracepoints live there
fn check_tracefs() -> Result<()> {
    for root in TRACEFS_ROOTS {
        if Path::new(root).join("events/syscalls").exists() {
            return Ok(());
        }
    }

    bail!(
        "tracefs not found: syscall tracepoints are unavailable.\n\n\
         Mount it with: mount -t tracefs tracefs /sys/kernel/tracing"
    );
}
