use crate::types::{AddressFamily, InterfaceAddress, InterfaceInfo};
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("command failed: {0}")]
    CommandFailed(String),
    #[error("command timed out after {}s", BACKEND_TIMEOUT.as_secs())]
    Timeout,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid output format")]
    InvalidOutput,
}

pub type Result<T> = std::result::Result<T, BackendError>;

/// The single OS-dependent seam. Everything above this trait is pure logic
/// and is tested against a fake implementation.
#[allow(async_fn_in_trait)]
pub trait NetworkBackend {
    async fn list_interfaces(&self) -> Result<Vec<InterfaceInfo>>;

    /// Raw multi-line DNS report for one interface.
    async fn query_dns(&self, interface: &str) -> Result<String>;

    /// Sets a static DNS server. `primary` replaces the server list;
    /// otherwise the address is appended at index 2.
    async fn set_dns(&self, interface: &str, address: &str, primary: bool) -> Result<()>;

    /// Reverts the interface to DHCP-provided DNS.
    async fn set_dns_automatic(&self, interface: &str) -> Result<()>;
}

const AF_INET: u64 = 2;
const AF_INET6: u64 = 23;

const BACKEND_TIMEOUT: Duration = Duration::from_secs(5);

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x08000000;

fn normalize_error_message(msg: &str) -> String {
    msg.lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

async fn run_command(command: Command) -> Result<String> {
    run_command_with_timeout(command, BACKEND_TIMEOUT).await
}

async fn run_command_with_timeout(mut command: Command, timeout: Duration) -> Result<String> {
    #[cfg(windows)]
    command.creation_flags(CREATE_NO_WINDOW);

    let output = tokio::time::timeout(timeout, command.output())
        .await
        .map_err(|_| BackendError::Timeout)??;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(BackendError::CommandFailed(normalize_error_message(
            &stderr,
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

async fn run_powershell(script: &str) -> Result<String> {
    let script_with_setup = format!(
        "[Console]::OutputEncoding = [System.Text.Encoding]::UTF8; $ErrorActionPreference = 'Stop'; {}",
        script
    );
    let mut command = Command::new("powershell.exe");
    command.args([
        "-NoProfile",
        "-NonInteractive",
        "-Command",
        &script_with_setup,
    ]);

    run_command(command).await
}

async fn run_netsh(args: &[&str]) -> Result<String> {
    tracing::debug!(?args, "running netsh");
    let mut command = Command::new("netsh");
    command.args(args);
    run_command(command).await
}

fn parse_family(family: u64) -> Option<AddressFamily> {
    match family {
        AF_INET => Some(AddressFamily::IPv4),
        AF_INET6 => Some(AddressFamily::IPv6),
        _ => None,
    }
}

fn parse_adapter_report(output: &str) -> Result<Vec<InterfaceInfo>> {
    let trimmed = output.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }

    let json_value: serde_json::Value =
        serde_json::from_str(trimmed).map_err(|_| BackendError::InvalidOutput)?;

    // A single adapter serializes as a bare object rather than an array.
    let entries = match json_value {
        serde_json::Value::Array(entries) => entries,
        other => vec![other],
    };

    let mut interfaces = Vec::new();
    for entry in entries {
        let Some(name) = entry.get("Name").and_then(|v| v.as_str()) else {
            continue;
        };
        let is_up = entry.get("Up").and_then(|v| v.as_bool()).unwrap_or(false);

        let mut addresses = Vec::new();
        if let Some(listed) = entry.get("Addresses").and_then(|v| v.as_array()) {
            for addr in listed {
                if let Some(family) = addr.get("Family").and_then(|v| v.as_u64())
                    && let Some(family) = parse_family(family)
                    && let Some(address) = addr.get("Address").and_then(|v| v.as_str())
                {
                    addresses.push(InterfaceAddress {
                        family,
                        address: address.to_string(),
                    });
                }
            }
        }

        interfaces.push(InterfaceInfo {
            name: name.to_string(),
            is_up,
            addresses,
        });
    }

    Ok(interfaces)
}

/// Production backend: PowerShell for adapter enumeration, `netsh` for DNS
/// query and mutation. Windows only in practice; every call is bounded by
/// [`BACKEND_TIMEOUT`].
#[derive(Clone, Copy, Debug, Default)]
pub struct NetshBackend;

impl NetshBackend {
    pub fn new() -> Self {
        Self
    }
}

impl NetworkBackend for NetshBackend {
    async fn list_interfaces(&self) -> Result<Vec<InterfaceInfo>> {
        let script = "Get-NetAdapter | ForEach-Object { [PSCustomObject]@{ \
            Name = $_.Name; \
            Up = ($_.Status -eq 'Up'); \
            Addresses = @(Get-NetIPAddress -InterfaceIndex $_.ifIndex -ErrorAction SilentlyContinue | \
                ForEach-Object { [PSCustomObject]@{ Family = [int]$_.AddressFamily; Address = $_.IPAddress } }) \
            } } | ConvertTo-Json -Compress -Depth 4";

        let output = run_powershell(script).await?;
        parse_adapter_report(&output)
    }

    async fn query_dns(&self, interface: &str) -> Result<String> {
        run_netsh(&["interface", "ip", "show", "dns", interface]).await
    }

    async fn set_dns(&self, interface: &str, address: &str, primary: bool) -> Result<()> {
        if primary {
            run_netsh(&[
                "interface",
                "ip",
                "set",
                "dns",
                &format!("name={}", interface),
                "source=static",
                &format!("addr={}", address),
            ])
            .await?;
        } else {
            run_netsh(&[
                "interface",
                "ip",
                "add",
                "dns",
                &format!("name={}", interface),
                &format!("addr={}", address),
                "index=2",
            ])
            .await?;
        }

        Ok(())
    }

    async fn set_dns_automatic(&self, interface: &str) -> Result<()> {
        run_netsh(&[
            "interface",
            "ip",
            "set",
            "dns",
            &format!("name={}", interface),
            "source=dhcp",
        ])
        .await?;

        Ok(())
    }
}
