//! Core domain types

use std::fmt;

/// A CPU core id, as used to open one perf buffer partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CpuId(pub u32);

impl fmt::Display for CpuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cpu{}", self.0)
    }
}

/// The two event classes carried by the transport, each over its own
/// per-CPU perf buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventClass {
    /// Process creation (`execve`) records.
    Process,
    /// Outbound IPv4 TCP connection records.
    Network,
}

impl EventClass {
    /// Name of the eBPF map carrying this class.
    #[must_use]
    pub fn map_name(self) -> &'static str {
        match self {
            EventClass::Process => "EXEC_EVENTS",
            EventClass::Network => "NET_EVENTS",
        }
    }
}

impl fmt::Display for EventClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventClass::Process => write!(f, "exec"),
            EventClass::Network => write!(f, "net"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_class_map_names() {
        assert_eq!(EventClass::Process.map_name(), "EXEC_EVENTS");
        assert_eq!(EventClass::Network.map_name(), "NET_EVENTS");
    }

    #[test]
    fn test_display() {
        assert_eq!(CpuId(3).to_string(), "cpu3");
        assert_eq!(EventClass::Process.to_string(), "exec");
    }
}
