//! End-to-end decode tests: raw transport slots through record conversion.
//!
//! The slots are built exactly the way the probes build them (fixed-layout
//! structs copied by value), so these exercise the wire contract the
//! consumer depends on.

use sentra::capture::{decode_network_event, decode_process_event};
use sentra::records::{NetworkRecord, ProcessRecord};
use sentra_common::{NetworkEvent, ProcessEvent, ARGV_PREFIX_LEN, COMM_LEN, IP_VERSION_4};
use std::net::Ipv4Addr;

fn comm(name: &str) -> [u8; COMM_LEN] {
    let mut buf = [0u8; COMM_LEN];
    let len = name.len().min(COMM_LEN - 1);
    buf[..len].copy_from_slice(&name.as_bytes()[..len]);
    buf
}

/// Bounded, NUL-terminated copy of a path, as `bpf_probe_read_user_str`
/// leaves it in the record.
fn argv_prefix(path: &str) -> [u8; ARGV_PREFIX_LEN] {
    let mut buf = [0u8; ARGV_PREFIX_LEN];
    let len = path.len().min(ARGV_PREFIX_LEN - 1);
    buf[..len].copy_from_slice(&path.as_bytes()[..len]);
    buf
}

#[allow(unsafe_code)]
fn as_slot<T>(event: &T) -> &[u8] {
    unsafe {
        std::slice::from_raw_parts(
            std::ptr::from_ref(event).cast::<u8>(),
            std::mem::size_of::<T>(),
        )
    }
}

#[test]
fn record_sizes_match_the_documented_schema() {
    // The schema is versioned by size; these are the wire contract.
    assert_eq!(std::mem::size_of::<ProcessEvent>(), 168);
    assert_eq!(std::mem::size_of::<NetworkEvent>(), 56);
}

/// A curl process connecting to 93.184.216.34:443, as the syscall-argument
/// strategy captures it.
fn curl_connect_event() -> NetworkEvent {
    NetworkEvent {
        timestamp_ns: 1_000_000_000,
        pid: 4242,
        tgid: 4242,
        uid: 1000,
        comm: comm("curl"),
        source_addr: 0,
        dest_addr: u32::from_ne_bytes([93, 184, 216, 34]),
        source_port: 0,
        // Normalized to host byte order in the probe.
        dest_port: 443,
        ip_version: IP_VERSION_4,
        _padding: [0u8; 7],
    }
}

#[test]
fn curl_connect_decodes_to_expected_record() {
    let event = curl_connect_event();
    let decoded = decode_network_event(as_slot(&event)).expect("decodes");
    let record = NetworkRecord::from(&decoded);

    assert_eq!(record.pid, 4242);
    assert_eq!(record.uid, 1000);
    assert!(record.comm.starts_with("curl"));
    assert_eq!(record.dest_ip, Ipv4Addr::new(93, 184, 216, 34));
    assert_eq!(record.dest_port, 443);
    assert_eq!(record.ip_version, 4);
    // Syscall-argument strategy: local endpoint unknown.
    assert_eq!(record.source_ip, Ipv4Addr::new(0, 0, 0, 0));
    assert_eq!(record.source_port, 0);
}

#[test]
fn ports_are_host_byte_order_in_decoded_records() {
    // 443 stored host-order must come out as 443, not 0xBB01.
    let event = curl_connect_event();
    let record = NetworkRecord::from(&decode_network_event(as_slot(&event)).unwrap());
    assert_eq!(record.dest_port, 443);
    assert_ne!(record.dest_port, 443u16.swap_bytes());
}

#[test]
fn decoding_the_same_slot_twice_is_identical() {
    let event = curl_connect_event();
    let slot = as_slot(&event).to_vec();

    let first = NetworkRecord::from(&decode_network_event(&slot).unwrap());
    let second = NetworkRecord::from(&decode_network_event(&slot).unwrap());

    assert_eq!(first.timestamp_ns, second.timestamp_ns);
    assert_eq!(first.dest_ip, second.dest_ip);
    assert_eq!(first.dest_port, second.dest_port);
    assert_eq!(first.comm, second.comm);
}

#[test]
fn exec_of_bin_ls_carries_the_path() {
    let event = ProcessEvent {
        timestamp_ns: 2_000_000_000,
        pid: 321,
        tgid: 321,
        uid: 1000,
        comm: comm("ls"),
        argv_prefix: argv_prefix("/bin/ls"),
        _padding: [0u8; 4],
    };

    let decoded = decode_process_event(as_slot(&event)).expect("decodes");
    let record = ProcessRecord::from(&decoded);

    assert_eq!(record.argv_prefix, "/bin/ls");
    assert!(!record.comm.is_empty());
}

#[test]
fn overlong_path_is_truncated_to_the_bound() {
    let long_path = format!("/opt/{}", "a".repeat(300));
    let event = ProcessEvent {
        timestamp_ns: 3,
        pid: 1,
        tgid: 1,
        uid: 0,
        comm: comm("spawner"),
        argv_prefix: argv_prefix(&long_path),
        _padding: [0u8; 4],
    };

    let record = ProcessRecord::from(&decode_process_event(as_slot(&event)).unwrap());
    assert_eq!(record.argv_prefix.len(), ARGV_PREFIX_LEN - 1);
    assert!(long_path.starts_with(&record.argv_prefix));
}

#[test]
fn command_name_is_nul_terminated_within_its_bound() {
    // Even a maximal name leaves the final byte as the terminator.
    let event = ProcessEvent {
        timestamp_ns: 4,
        pid: 1,
        tgid: 1,
        uid: 0,
        comm: comm("exactly-15-chars"),
        argv_prefix: argv_prefix("/bin/true"),
        _padding: [0u8; 4],
    };

    let decoded = decode_process_event(as_slot(&event)).unwrap();
    assert_eq!(decoded.comm[COMM_LEN - 1], 0);
    let record = ProcessRecord::from(&decoded);
    assert!(!record.comm.is_empty());
    assert!(record.comm.len() < COMM_LEN);
}

#[test]
fn short_slot_never_reinterprets() {
    let event = curl_connect_event();
    let slot = as_slot(&event);

    assert!(decode_network_event(&slot[..slot.len() - 1]).is_err());
    assert!(decode_process_event(&[0u8; 8]).is_err());
}
