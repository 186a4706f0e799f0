//! Decoded record forms handed to output
//!
//! The raw `#[repr(C)]` events from the transport are copied out into these
//! owned, serializable forms at decode time. Addresses come out as
//! [`Ipv4Addr`] and byte arrays as strings, so rendering (text or JSON
//! lines) never touches transport memory.

use serde::Serialize;
use sentra_common::{NetworkEvent, ProcessEvent};
use std::net::Ipv4Addr;

/// Decode a NUL-terminated byte array into an owned string, lossily.
///
/// Takes everything up to the first NUL; a full array without a terminator
/// is taken whole rather than rejected.
#[must_use]
pub fn cstr_to_string(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// One decoded process-creation event.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessRecord {
    pub timestamp_ns: u64,
    pub pid: u32,
    pub tgid: u32,
    pub uid: u32,
    pub comm: String,
    /// Truncated prefix of the executed path; empty when the probe's user
    /// read faulted.
    pub argv_prefix: String,
}

impl From<&ProcessEvent> for ProcessRecord {
    fn from(ev: &ProcessEvent) -> Self {
        Self {
            timestamp_ns: ev.timestamp_ns,
            pid: ev.pid,
            tgid: ev.tgid,
            uid: ev.uid,
            comm: cstr_to_string(&ev.comm),
            argv_prefix: cstr_to_string(&ev.argv_prefix),
        }
    }
}

/// One decoded outbound TCP connection attempt.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkRecord {
    pub timestamp_ns: u64,
    pub pid: u32,
    pub tgid: u32,
    pub uid: u32,
    pub comm: String,
    /// 0.0.0.0 when the capture strategy could not know the local endpoint.
    pub source_ip: Ipv4Addr,
    pub dest_ip: Ipv4Addr,
    pub source_port: u16,
    pub dest_port: u16,
    pub ip_version: u8,
}

impl From<&NetworkEvent> for NetworkRecord {
    fn from(ev: &NetworkEvent) -> Self {
        Self {
            timestamp_ns: ev.timestamp_ns,
            pid: ev.pid,
            tgid: ev.tgid,
            uid: ev.uid,
            comm: cstr_to_string(&ev.comm),
            // Addresses are stored in network byte order; the in-memory
            // bytes are already the dotted-quad octets.
            source_ip: Ipv4Addr::from(ev.source_addr.to_ne_bytes()),
            dest_ip: Ipv4Addr::from(ev.dest_addr.to_ne_bytes()),
            source_port: ev.source_port,
            dest_port: ev.dest_port,
            ip_version: ev.ip_version,
        }
    }
}

/// A decoded record of either class, as carried from the per-CPU readers to
/// the output loop. Serializes as a tagged JSON object (`"kind": "exec"` /
/// `"kind": "connect"`).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CapturedRecord {
    Exec(ProcessRecord),
    Connect(NetworkRecord),
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentra_common::{ARGV_PREFIX_LEN, COMM_LEN, IP_VERSION_4};

    fn comm(name: &str) -> [u8; COMM_LEN] {
        let mut buf = [0u8; COMM_LEN];
        buf[..name.len()].copy_from_slice(name.as_bytes());
        buf
    }

    #[test]
    fn test_cstr_to_string_stops_at_nul() {
        assert_eq!(cstr_to_string(b"curl\0\0garbage"), "curl");
        assert_eq!(cstr_to_string(b""), "");
        assert_eq!(cstr_to_string(b"abc"), "abc");
    }

    #[test]
    fn test_network_record_addresses_render_dotted_quad() {
        let ev = NetworkEvent {
            timestamp_ns: 1,
            pid: 4242,
            tgid: 4242,
            uid: 1000,
            comm: comm("curl"),
            source_addr: 0,
            // 93.184.216.34 in network byte order
            dest_addr: u32::from_ne_bytes([93, 184, 216, 34]),
            source_port: 0,
            dest_port: 443,
            ip_version: IP_VERSION_4,
            _padding: [0u8; 7],
        };

        let rec = NetworkRecord::from(&ev);
        assert_eq!(rec.dest_ip, Ipv4Addr::new(93, 184, 216, 34));
        assert_eq!(rec.source_ip, Ipv4Addr::new(0, 0, 0, 0));
        assert_eq!(rec.dest_port, 443);
        assert!(rec.comm.starts_with("curl"));
    }

    #[test]
    fn test_process_record_argv_prefix() {
        let mut argv_prefix = [0u8; ARGV_PREFIX_LEN];
        argv_prefix[..7].copy_from_slice(b"/bin/ls");

        let ev = ProcessEvent {
            timestamp_ns: 1,
            pid: 10,
            tgid: 10,
            uid: 0,
            comm: comm("ls"),
            argv_prefix,
            _padding: [0u8; 4],
        };

        let rec = ProcessRecord::from(&ev);
        assert_eq!(rec.argv_prefix, "/bin/ls");
        assert_eq!(rec.comm, "ls");
    }

    #[test]
    fn test_zeroed_comm_renders_empty() {
        // A probe-side comm read can fail and leave the name all zeros.
        // Such records still decode and serialize, with an empty comm.
        let ev = ProcessEvent {
            timestamp_ns: 1,
            pid: 10,
            tgid: 10,
            uid: 0,
            comm: [0u8; COMM_LEN],
            argv_prefix: [0u8; ARGV_PREFIX_LEN],
            _padding: [0u8; 4],
        };

        let rec = ProcessRecord::from(&ev);
        assert_eq!(rec.comm, "");
        assert!(serde_json::to_string(&CapturedRecord::Exec(rec)).is_ok());
    }

    #[test]
    fn test_captured_record_json_tagging() {
        let mut argv_prefix = [0u8; ARGV_PREFIX_LEN];
        argv_prefix[..7].copy_from_slice(b"/bin/ls");
        let ev = ProcessEvent {
            timestamp_ns: 1,
            pid: 10,
            tgid: 10,
            uid: 0,
            comm: comm("ls"),
            argv_prefix,
            _padding: [0u8; 4],
        };

        let json = serde_json::to_string(&CapturedRecord::Exec(ProcessRecord::from(&ev)))
            .expect("serializable");
        assert!(json.contains("\"kind\":\"exec\""));
        assert!(json.contains("\"argv_prefix\":\"/bin/ls\""));
    }
}
