use crate::backend::{BackendError, NetworkBackend};
use crate::resolver::find_active_interface_with_dns;
use crate::types::DnsPair;
use crate::validation::validate_dns_address;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigureError {
    #[error("invalid DNS address: {0}")]
    InvalidAddress(String),
    #[error("no active network interface found")]
    NoActiveInterface,
    #[error("network backend error: {0}")]
    Backend(#[from] BackendError),
}

pub type Result<T> = std::result::Result<T, ConfigureError>;

/// Top-level entry point for mutating DNS settings. Validation and interface
/// resolution happen before any backend call, so a rejected request leaves
/// the system untouched. Set/reset failures are propagated, unlike the
/// best-effort query path in [`crate::resolver`].
pub struct DnsConfigurator<B: NetworkBackend> {
    backend: B,
}

impl<B: NetworkBackend> DnsConfigurator<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Sets `preferred` (and, when present and valid, `alternative`) as the
    /// static DNS servers of the active interface. An invalid alternative is
    /// skipped with a warning rather than failing the whole change. Returns
    /// the name of the interface that was updated; callers re-resolve to
    /// observe the new state.
    pub async fn change_dns(&self, preferred: &str, alternative: Option<&str>) -> Result<String> {
        if !validate_dns_address(preferred) {
            return Err(ConfigureError::InvalidAddress(preferred.to_string()));
        }

        let active = find_active_interface_with_dns(&self.backend).await;
        let Some(interface) = active.interface else {
            return Err(ConfigureError::NoActiveInterface);
        };

        self.backend.set_dns(&interface, preferred, true).await?;

        if let Some(alternative) = alternative.filter(|a| !a.trim().is_empty()) {
            if validate_dns_address(alternative) {
                self.backend.set_dns(&interface, alternative, false).await?;
            } else {
                tracing::warn!(alternative, "skipping invalid alternative DNS address");
            }
        }

        tracing::info!(%interface, preferred, "DNS servers updated");
        Ok(interface)
    }

    /// Applies a saved profile pair.
    pub async fn apply(&self, pair: &DnsPair) -> Result<String> {
        self.change_dns(&pair.preferred, pair.alternative.as_deref())
            .await
    }

    /// Reverts the active interface to automatic (DHCP-provided) DNS.
    /// Returns the interface name.
    pub async fn reset_dns(&self) -> Result<String> {
        let active = find_active_interface_with_dns(&self.backend).await;
        let Some(interface) = active.interface else {
            return Err(ConfigureError::NoActiveInterface);
        };

        self.backend.set_dns_automatic(&interface).await?;

        tracing::info!(%interface, "DNS reverted to automatic");
        Ok(interface)
    }
}
