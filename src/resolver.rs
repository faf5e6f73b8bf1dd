use crate::backend::NetworkBackend;
use crate::types::{ActiveDns, InterfaceInfo};
use crate::validation::validate_dns_address;

/// Marker line printed by `netsh interface ip show dns` when static servers
/// are configured; the preferred address trails the final colon.
const STATIC_DNS_MARKER: &str = "Statically Configured DNS Servers";

/// Scans a raw DNS report for the static-server marker and pulls out the
/// preferred address (same line, after the last `:`) and, when the next line
/// also validates, the alternative. Either may be absent; a malformed report
/// simply yields nothing.
pub fn parse_dns_report(report: &str) -> (Option<String>, Option<String>) {
    let lines: Vec<&str> = report.lines().collect();
    let mut preferred = None;
    let mut alternative = None;

    for (i, line) in lines.iter().enumerate() {
        let line = line.trim();
        if !line.contains(STATIC_DNS_MARKER) {
            continue;
        }

        let candidate = line.rsplit(':').next().unwrap_or("").trim();
        if validate_dns_address(candidate) {
            preferred = Some(candidate.to_string());
            if let Some(next) = lines.get(i + 1).map(|l| l.trim())
                && validate_dns_address(next)
            {
                alternative = Some(next.to_string());
            }
        }
    }

    (preferred, alternative)
}

/// Finds the first interface that is up with a non-loopback IPv4 address and
/// reads its configured DNS servers.
///
/// Discovery is best effort: backend failures here are logged and reported as
/// "nothing found" rather than propagated, so a flaky report never breaks the
/// caller. Mutation paths handle backend errors strictly; see
/// [`crate::configurator`].
pub async fn find_active_interface_with_dns<B: NetworkBackend>(backend: &B) -> ActiveDns {
    let interfaces = match backend.list_interfaces().await {
        Ok(interfaces) => interfaces,
        Err(e) => {
            tracing::warn!("failed to list network interfaces: {e}");
            return ActiveDns::none();
        }
    };

    let Some(interface) = interfaces.into_iter().find(InterfaceInfo::has_routable_ipv4) else {
        return ActiveDns::none();
    };

    match backend.query_dns(&interface.name).await {
        Ok(report) => {
            let (preferred, alternative) = parse_dns_report(&report);
            ActiveDns {
                interface: Some(interface.name),
                preferred,
                alternative,
            }
        }
        Err(e) => {
            // The interface is still usable for set/reset even when its
            // report cannot be read.
            tracing::warn!(interface = %interface.name, "failed to query DNS: {e}");
            ActiveDns {
                interface: Some(interface.name),
                preferred: None,
                alternative: None,
            }
        }
    }
}
