pub mod backend;
pub mod configurator;
pub mod profiles;
pub mod resolver;
pub mod types;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use backend::{BackendError, NetshBackend, NetworkBackend};
pub use configurator::{ConfigureError, DnsConfigurator};
pub use profiles::{MAX_PROFILES, ProfileError, ProfileStore};
pub use resolver::find_active_interface_with_dns;
pub use types::{ActiveDns, AddressFamily, DnsPair, InterfaceAddress, InterfaceInfo};
pub use validation::validate_dns_address;
