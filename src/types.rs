use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub enum AddressFamily {
    IPv4,
    IPv6,
}

/// One address assigned to an interface, as reported by the backend.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct InterfaceAddress {
    pub family: AddressFamily,
    pub address: String,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct InterfaceInfo {
    pub name: String,
    pub is_up: bool,
    pub addresses: Vec<InterfaceAddress>,
}

impl InterfaceInfo {
    /// An interface is usable for DNS configuration when it is up and holds
    /// an IPv4 address other than loopback.
    pub fn has_routable_ipv4(&self) -> bool {
        self.is_up
            && self
                .addresses
                .iter()
                .any(|a| a.family == AddressFamily::IPv4 && a.address != "127.0.0.1")
    }
}

/// The preferred/alternative server pair saved under a profile name.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct DnsPair {
    pub preferred: String,
    #[serde(default)]
    pub alternative: Option<String>,
}

impl DnsPair {
    pub fn new(preferred: impl Into<String>, alternative: Option<String>) -> Self {
        Self {
            preferred: preferred.into(),
            // An empty alternative field means "none".
            alternative: alternative.filter(|a| !a.trim().is_empty()),
        }
    }
}

/// Result of resolving the active interface and its configured DNS.
/// Any of the three fields may be absent; a known interface with no
/// addresses means the DNS report was missing or unreadable.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct ActiveDns {
    pub interface: Option<String>,
    pub preferred: Option<String>,
    pub alternative: Option<String>,
}

impl ActiveDns {
    pub fn none() -> Self {
        Self::default()
    }
}
