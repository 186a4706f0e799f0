//! End-of-run transport diagnostics
//!
//! Compares the kernel-side publish counters with what the consumer
//! actually received, so a lossy run is quantified instead of guessed at.

use aya::maps::HashMap;
use aya::Ebpf;

use super::event_reader::StatsSnapshot;
use crate::domain::CaptureError;

/// Print the publish/consume/lost balance for both event classes.
///
/// `published` comes from the single-entry counter maps bumped on every
/// publish attempt in the probes; `consumed` and `lost` from the perf
/// readers. Records published after the readers stopped show up as the
/// remainder.
///
/// # Errors
/// Returns an error if a counter map cannot be accessed
pub fn print_publish_diagnostics(bpf: &Ebpf, snapshot: &StatsSnapshot) -> Result<(), CaptureError> {
    let exec_published = read_counter(bpf, "EXEC_PUBLISHED")?;
    let net_published = read_counter(bpf, "NET_PUBLISHED")?;

    println!("\ntransport diagnostics:");
    println!(
        "  exec: published={exec_published} consumed={} lost={}",
        snapshot.exec_received, snapshot.exec_lost
    );
    println!(
        "  net:  published={net_published} consumed={} lost={}",
        snapshot.net_received, snapshot.net_lost
    );
    if snapshot.decode_failures > 0 {
        println!("  undecodable slots: {}", snapshot.decode_failures);
    }

    Ok(())
}

fn read_counter(bpf: &Ebpf, name: &'static str) -> Result<u64, CaptureError> {
    let map: HashMap<_, u32, u64> =
        HashMap::try_from(bpf.map(name).ok_or(CaptureError::MapNotFound(name))?)?;
    Ok(map.get(&0u32, 0).unwrap_or(0))
}
