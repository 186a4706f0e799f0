//! Raw transport slot decoding
//!
//! A slot is a plain copy of a `#[repr(C)]` record written by the kernel
//! side. Decoding is a pure copy-out: it has no side effects, never retains
//! slot memory, and decoding the same slot twice yields identical values.
//!
//! The schema is versioned by record size. A slot shorter than the expected
//! struct fails with [`DecodeError::ShortRecord`] instead of being
//! reinterpreted; trailing bytes (perf sample padding) are ignored.

use aya::Pod;
use sentra_common::{NetworkEvent, ProcessEvent};
use std::mem;

use crate::domain::DecodeError;

/// Decode one Process-Event slot.
pub fn decode_process_event(bytes: &[u8]) -> Result<ProcessEvent, DecodeError> {
    decode(bytes)
}

/// Decode one Network-Event slot.
pub fn decode_network_event(bytes: &[u8]) -> Result<NetworkEvent, DecodeError> {
    decode(bytes)
}

fn decode<T: Pod>(bytes: &[u8]) -> Result<T, DecodeError> {
    let expected = mem::size_of::<T>();
    if bytes.len() < expected {
        return Err(DecodeError::ShortRecord { expected, actual: bytes.len() });
    }

    // SAFETY: the length is checked above and T is Pod, so any bit pattern
    // of size_of::<T>() bytes is a valid T.
    #[allow(unsafe_code)]
    let event = unsafe { std::ptr::read_unaligned(bytes.as_ptr().cast::<T>()) };
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentra_common::{ARGV_PREFIX_LEN, COMM_LEN, IP_VERSION_4};

    #[allow(unsafe_code)]
    fn as_slot<T: Pod>(event: &T) -> &[u8] {
        // Mimics the transport: the slot holds the raw bytes of the record.
        unsafe {
            std::slice::from_raw_parts(std::ptr::from_ref(event).cast::<u8>(), mem::size_of::<T>())
        }
    }

    fn sample_network_event() -> NetworkEvent {
        let mut comm = [0u8; COMM_LEN];
        comm[..4].copy_from_slice(b"curl");
        NetworkEvent {
            timestamp_ns: 123_456_789,
            pid: 4242,
            tgid: 4242,
            uid: 1000,
            comm,
            source_addr: 0,
            dest_addr: u32::from_ne_bytes([93, 184, 216, 34]),
            source_port: 0,
            dest_port: 443,
            ip_version: IP_VERSION_4,
            _padding: [0u8; 7],
        }
    }

    #[test]
    fn test_decode_network_event_round() {
        let event = sample_network_event();
        let decoded = decode_network_event(as_slot(&event)).expect("decodes");

        assert_eq!(decoded.pid, 4242);
        assert_eq!(decoded.uid, 1000);
        assert_eq!(decoded.dest_addr.to_ne_bytes(), [93, 184, 216, 34]);
        assert_eq!(decoded.dest_port, 443);
        assert_eq!(decoded.ip_version, IP_VERSION_4);
        assert_eq!(&decoded.comm[..5], b"curl\0");
    }

    #[test]
    fn test_decode_is_idempotent() {
        let event = sample_network_event();
        let slot = as_slot(&event).to_vec();

        let first = decode_network_event(&slot).expect("decodes");
        let second = decode_network_event(&slot).expect("decodes");

        assert_eq!(first.timestamp_ns, second.timestamp_ns);
        assert_eq!(first.dest_addr, second.dest_addr);
        assert_eq!(first.dest_port, second.dest_port);
        assert_eq!(first.comm, second.comm);
    }

    #[test]
    fn test_short_slot_is_rejected() {
        let event = sample_network_event();
        let slot = as_slot(&event);

        let err = decode_network_event(&slot[..12]).unwrap_err();
        assert_eq!(
            err,
            DecodeError::ShortRecord { expected: mem::size_of::<NetworkEvent>(), actual: 12 }
        );
    }

    #[test]
    fn test_trailing_padding_is_ignored() {
        let event = sample_network_event();
        let mut slot = as_slot(&event).to_vec();
        // Perf samples may be padded past the record.
        slot.extend_from_slice(&[0xAA; 8]);

        let decoded = decode_network_event(&slot).expect("decodes");
        assert_eq!(decoded.dest_port, 443);
    }

    #[test]
    fn test_decode_process_event() {
        let mut comm = [0u8; COMM_LEN];
        comm[..2].copy_from_slice(b"ls");
        let mut argv_prefix = [0u8; ARGV_PREFIX_LEN];
        argv_prefix[..7].copy_from_slice(b"/bin/ls");

        let event = ProcessEvent {
            timestamp_ns: 42,
            pid: 100,
            tgid: 100,
            uid: 0,
            comm,
            argv_prefix,
            _padding: [0u8; 4],
        };

        let decoded = decode_process_event(as_slot(&event)).expect("decodes");
        assert_eq!(decoded.pid, 100);
        assert_eq!(&decoded.argv_prefix[..8], b"/bin/ls\0");
    }
}
