use crate::backend::{BackendError, NetworkBackend, Result};
use crate::types::{AddressFamily, InterfaceAddress, InterfaceInfo};
use std::sync::Mutex;

/// In-memory backend for resolver/configurator tests. Records every call so
/// tests can assert which mutations were (or were not) issued.
pub(crate) struct FakeBackend {
    pub interfaces: Vec<InterfaceInfo>,
    pub dns_report: std::result::Result<String, String>,
    pub fail_set: bool,
    pub calls: Mutex<Vec<String>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            interfaces: Vec::new(),
            dns_report: Ok(String::new()),
            fail_set: false,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeBackend {
    pub fn with_up_interface(name: &str) -> Self {
        Self {
            interfaces: vec![InterfaceInfo {
                name: name.to_string(),
                is_up: true,
                addresses: vec![InterfaceAddress {
                    family: AddressFamily::IPv4,
                    address: "192.168.1.20".to_string(),
                }],
            }],
            ..Self::default()
        }
    }

    pub fn recorded_calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

impl NetworkBackend for FakeBackend {
    async fn list_interfaces(&self) -> Result<Vec<InterfaceInfo>> {
        self.record("list".to_string());
        Ok(self.interfaces.clone())
    }

    async fn query_dns(&self, interface: &str) -> Result<String> {
        self.record(format!("query {interface}"));
        match &self.dns_report {
            Ok(report) => Ok(report.clone()),
            Err(msg) => Err(BackendError::CommandFailed(msg.clone())),
        }
    }

    async fn set_dns(&self, interface: &str, address: &str, primary: bool) -> Result<()> {
        self.record(format!("set {interface} {address} primary={primary}"));
        if self.fail_set {
            return Err(BackendError::CommandFailed("set failed".to_string()));
        }
        Ok(())
    }

    async fn set_dns_automatic(&self, interface: &str) -> Result<()> {
        self.record(format!("automatic {interface}"));
        if self.fail_set {
            return Err(BackendError::CommandFailed("reset failed".to_string()));
        }
        Ok(())
    }
}
