//! Text rendering for decoded records and transport statistics

use crate::records::{CapturedRecord, NetworkRecord, ProcessRecord};

use super::event_reader::StatsSnapshot;

/// Display a decoded record in live text mode
pub fn display_record(record: &CapturedRecord) {
    match record {
        CapturedRecord::Exec(rec) => display_process_record(rec),
        CapturedRecord::Connect(rec) => display_network_record(rec),
    }
}

fn display_process_record(rec: &ProcessRecord) {
    let argv = if rec.argv_prefix.is_empty() { "<unreadable>" } else { rec.argv_prefix.as_str() };
    println!(
        "[EXEC] pid={} tgid={} uid={} comm={} argv={argv}",
        rec.pid, rec.tgid, rec.uid, rec.comm
    );
}

fn display_network_record(rec: &NetworkRecord) {
    println!(
        "[CONN] pid={} tgid={} uid={} comm={} {}:{} -> {}:{}",
        rec.pid,
        rec.tgid,
        rec.uid,
        rec.comm,
        rec.source_ip,
        rec.source_port,
        rec.dest_ip,
        rec.dest_port
    );
}

/// Display transport statistics (periodic and at exit)
pub fn display_statistics(snapshot: &StatsSnapshot) {
    eprintln!(
        "stats: exec={} net={} lost={} undecodable={}",
        snapshot.exec_received,
        snapshot.net_received,
        snapshot.total_lost(),
        snapshot.decode_failures
    );
}
