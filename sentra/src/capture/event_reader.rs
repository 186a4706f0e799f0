//! # Per-CPU Event Readers
//!
//! Drains the per-CPU perf buffers and forwards decoded records to the
//! output loop over a channel.
//!
//! One async task is spawned per (event class, CPU) pair. Each task owns
//! its perf buffer partition, mirroring the producer side where each probe
//! invocation writes only to its own CPU's partition. Records from one
//! partition arrive in publication order; ordering across partitions is
//! only established by `timestamp_ns`.
//!
//! The transport's built-in lost-record counts are aggregated into
//! [`TransportStats`] so drops are observable rather than silent.

use anyhow::{Context, Result};
use aya::maps::perf::AsyncPerfEventArray;
use aya::maps::MapData;
use aya::Ebpf;
use bytes::BytesMut;
use log::warn;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::Sender;

use super::cpu_utils::online_cpus;
use super::decode::{decode_network_event, decode_process_event};
use crate::domain::{CaptureError, CpuId, DecodeError, EventClass};
use crate::records::{CapturedRecord, NetworkRecord, ProcessRecord};

/// Buffers handed to each `read_events` call.
const READ_BUFFERS_PER_CPU: usize = 16;

/// Capacity of each read buffer; comfortably above both record sizes.
const READ_BUFFER_CAPACITY: usize = 1024;

/// Shared counters for the consumer side of the transport.
///
/// `lost` counts come from the perf reader itself (records the kernel had
/// to drop because a partition was full); `decode_failures` counts slots
/// rejected by the schema size check.
#[derive(Debug, Default)]
pub struct TransportStats {
    exec_received: AtomicU64,
    exec_lost: AtomicU64,
    net_received: AtomicU64,
    net_lost: AtomicU64,
    decode_failures: AtomicU64,
}

impl TransportStats {
    pub fn record_received(&self, class: EventClass) {
        match class {
            EventClass::Process => self.exec_received.fetch_add(1, Ordering::Relaxed),
            EventClass::Network => self.net_received.fetch_add(1, Ordering::Relaxed),
        };
    }

    pub fn record_lost(&self, class: EventClass, count: u64) {
        if count == 0 {
            return;
        }
        match class {
            EventClass::Process => self.exec_lost.fetch_add(count, Ordering::Relaxed),
            EventClass::Network => self.net_lost.fetch_add(count, Ordering::Relaxed),
        };
    }

    pub fn record_decode_failure(&self) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Consistent-enough snapshot for display; counters only ever grow.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            exec_received: self.exec_received.load(Ordering::Relaxed),
            exec_lost: self.exec_lost.load(Ordering::Relaxed),
            net_received: self.net_received.load(Ordering::Relaxed),
            net_lost: self.net_lost.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of [`TransportStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub exec_received: u64,
    pub exec_lost: u64,
    pub net_received: u64,
    pub net_lost: u64,
    pub decode_failures: u64,
}

impl StatsSnapshot {
    #[must_use]
    pub fn total_received(&self) -> u64 {
        self.exec_received + self.net_received
    }

    #[must_use]
    pub fn total_lost(&self) -> u64 {
        self.exec_lost + self.net_lost
    }
}

/// Take both event maps out of the loaded object and spawn one reader task
/// per (class, CPU) pair.
///
/// The returned readers forward decoded records through `tx` and stop when
/// the receiver side is dropped.
///
/// # Errors
/// Returns an error if an event map is missing or a perf buffer partition
/// cannot be opened
pub fn spawn_event_readers(
    bpf: &mut Ebpf,
    tx: &Sender<CapturedRecord>,
    stats: &Arc<TransportStats>,
) -> Result<()> {
    let cpus = online_cpus()?;

    let exec_array = AsyncPerfEventArray::try_from(
        bpf.take_map(EventClass::Process.map_name())
            .ok_or(CaptureError::MapNotFound("EXEC_EVENTS"))?,
    )?;
    spawn_class_readers(exec_array, EventClass::Process, &cpus, tx, stats, |bytes| {
        decode_process_event(bytes).map(|ev| CapturedRecord::Exec(ProcessRecord::from(&ev)))
    })?;

    let net_array = AsyncPerfEventArray::try_from(
        bpf.take_map(EventClass::Network.map_name())
            .ok_or(CaptureError::MapNotFound("NET_EVENTS"))?,
    )?;
    spawn_class_readers(net_array, EventClass::Network, &cpus, tx, stats, |bytes| {
        decode_network_event(bytes).map(|ev| CapturedRecord::Connect(NetworkRecord::from(&ev)))
    })?;

    Ok(())
}

fn spawn_class_readers(
    mut array: AsyncPerfEventArray<MapData>,
    class: EventClass,
    cpus: &[CpuId],
    tx: &Sender<CapturedRecord>,
    stats: &Arc<TransportStats>,
    decode: fn(&[u8]) -> Result<CapturedRecord, DecodeError>,
) -> Result<()> {
    for &cpu in cpus {
        let mut buf = array
            .open(cpu.0, None)
            .with_context(|| format!("Failed to open {class} perf buffer on {cpu}"))?;
        let tx = tx.clone();
        let stats = Arc::clone(stats);

        tokio::spawn(async move {
            let mut buffers = (0..READ_BUFFERS_PER_CPU)
                .map(|_| BytesMut::with_capacity(READ_BUFFER_CAPACITY))
                .collect::<Vec<_>>();

            loop {
                let events = match buf.read_events(&mut buffers).await {
                    Ok(events) => events,
                    Err(e) => {
                        warn!("{class} reader on {cpu} stopped: {e}");
                        return;
                    }
                };

                stats.record_lost(class, events.lost as u64);

                for raw in buffers.iter().take(events.read) {
                    match decode(raw.as_ref()) {
                        Ok(record) => {
                            stats.record_received(class);
                            if tx.send(record).await.is_err() {
                                // Output loop is gone; stop draining.
                                return;
                            }
                        }
                        Err(e) => {
                            stats.record_decode_failure();
                            warn!("Dropping undecodable {class} slot: {e}");
                        }
                    }
                }
            }
        });
    }

    Ok(())
}
