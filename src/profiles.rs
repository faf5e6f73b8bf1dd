use crate::types::DnsPair;
use crate::validation::validate_dns_address;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Hard cap on distinct profile names. Overwriting an existing name is still
/// allowed once the cap is hit.
pub const MAX_PROFILES: usize = 6;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("profile name must not be empty")]
    MissingName,
    #[error("invalid DNS address: {0}")]
    InvalidAddress(String),
    #[error("profile limit of {MAX_PROFILES} reached")]
    LimitReached,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config directory not found")]
    StoreDirNotFound,
}

pub type Result<T> = std::result::Result<T, ProfileError>;

/// File-backed store of named DNS profiles. The file holds one JSON object
/// mapping profile name to pair and is read and rewritten whole on every
/// call; nothing is cached across calls.
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_location() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .or_else(dirs::data_local_dir)
            .ok_or(ProfileError::StoreDirNotFound)?;

        Ok(Self::at(config_dir.join("dnsdial").join("profiles.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every saved profile. A missing or unreadable file yields the
    /// empty store; this never fails the caller.
    pub fn load_all(&self) -> BTreeMap<String, DnsPair> {
        if !self.path.exists() {
            return BTreeMap::new();
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("failed to read profile store, starting empty: {e}");
                return BTreeMap::new();
            }
        };

        // Tolerate comments in a hand-edited file.
        let stripped = json_comments::StripComments::new(content.as_bytes());
        match serde_json::from_reader(stripped) {
            Ok(profiles) => profiles,
            Err(e) => {
                tracing::warn!("profile store is malformed, starting empty: {e}");
                BTreeMap::new()
            }
        }
    }

    /// Upserts `name -> pair` and persists the whole store. Validation runs
    /// before the store is touched.
    pub fn save(&self, name: &str, pair: &DnsPair) -> Result<()> {
        if name.is_empty() {
            return Err(ProfileError::MissingName);
        }
        if !validate_dns_address(&pair.preferred) {
            return Err(ProfileError::InvalidAddress(pair.preferred.clone()));
        }
        if let Some(alternative) = &pair.alternative
            && !validate_dns_address(alternative)
        {
            return Err(ProfileError::InvalidAddress(alternative.clone()));
        }

        let mut profiles = self.load_all();
        if profiles.len() >= MAX_PROFILES && !profiles.contains_key(name) {
            return Err(ProfileError::LimitReached);
        }

        profiles.insert(name.to_string(), pair.clone());
        self.persist(&profiles)
    }

    /// Removes `name` if present. Deleting an unknown name is a no-op and
    /// leaves the file untouched.
    pub fn delete(&self, name: &str) -> Result<()> {
        let mut profiles = self.load_all();
        if profiles.remove(name).is_some() {
            self.persist(&profiles)?;
        }
        Ok(())
    }

    fn persist(&self, profiles: &BTreeMap<String, DnsPair>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(profiles)?;

        // Whole-file replace through a rename so a crash mid-save cannot
        // leave a torn file behind.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> ProfileStore {
        ProfileStore::at(dir.path().join("profiles.json"))
    }

    fn pair(preferred: &str, alternative: Option<&str>) -> DnsPair {
        DnsPair::new(preferred, alternative.map(String::from))
    }

    #[test]
    fn test_default_location_path() {
        let store = ProfileStore::default_location().expect("should resolve");
        assert!(store.path().to_string_lossy().contains("dnsdial"));
        assert!(store.path().to_string_lossy().ends_with("profiles.json"));
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().expect("tempdir");
        assert!(store_in(&dir).load_all().is_empty());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = TempDir::new().expect("tempdir");
        let store = store_in(&dir);

        store
            .save("home", &pair("1.1.1.1", Some("1.0.0.1")))
            .expect("save should succeed");

        let profiles = store.load_all();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles["home"], pair("1.1.1.1", Some("1.0.0.1")));
    }

    #[test]
    fn test_save_without_alternative() {
        let dir = TempDir::new().expect("tempdir");
        let store = store_in(&dir);

        store
            .save("quad9", &pair("9.9.9.9", None))
            .expect("save should succeed");
        assert_eq!(store.load_all()["quad9"].alternative, None);
    }

    #[test]
    fn test_save_rejects_empty_name() {
        let dir = TempDir::new().expect("tempdir");
        let err = store_in(&dir)
            .save("", &pair("1.1.1.1", None))
            .expect_err("empty name must fail");
        assert!(matches!(err, ProfileError::MissingName));
    }

    #[test]
    fn test_save_rejects_invalid_addresses() {
        let dir = TempDir::new().expect("tempdir");
        let store = store_in(&dir);

        let err = store
            .save("bad", &pair("999.1.1.1", None))
            .expect_err("invalid preferred must fail");
        assert!(matches!(err, ProfileError::InvalidAddress(a) if a == "999.1.1.1"));

        let err = store
            .save("bad", &pair("1.1.1.1", Some("234.1.1.1")))
            .expect_err("invalid alternative must fail");
        assert!(matches!(err, ProfileError::InvalidAddress(a) if a == "234.1.1.1"));

        // Nothing was written.
        assert!(store.load_all().is_empty());
    }

    #[test]
    fn test_profile_limit() {
        let dir = TempDir::new().expect("tempdir");
        let store = store_in(&dir);

        for i in 0..MAX_PROFILES {
            store
                .save(&format!("profile-{i}"), &pair("8.8.8.8", None))
                .expect("under the cap");
        }

        let err = store
            .save("one-too-many", &pair("8.8.8.8", None))
            .expect_err("seventh distinct name must fail");
        assert!(matches!(err, ProfileError::LimitReached));

        // Overwriting an existing name at the cap is an update, not an insert.
        store
            .save("profile-0", &pair("9.9.9.9", None))
            .expect("overwrite at cap should succeed");

        let profiles = store.load_all();
        assert_eq!(profiles.len(), MAX_PROFILES);
        assert_eq!(profiles["profile-0"].preferred, "9.9.9.9");
    }

    #[test]
    fn test_delete() {
        let dir = TempDir::new().expect("tempdir");
        let store = store_in(&dir);

        store
            .save("home", &pair("1.1.1.1", Some("1.0.0.1")))
            .expect("save should succeed");
        store.delete("home").expect("delete should succeed");
        assert!(store.load_all().is_empty());

        // Unknown names are a quiet no-op.
        store.delete("never-existed").expect("no-op delete");
    }

    #[test]
    fn test_malformed_store_loads_empty() {
        let dir = TempDir::new().expect("tempdir");
        let store = store_in(&dir);
        fs::write(store.path(), "[1, 2, 3]").expect("write garbage");
        assert!(store.load_all().is_empty());

        fs::write(store.path(), "{ not json").expect("write garbage");
        assert!(store.load_all().is_empty());

        // A malformed store does not block saving over it.
        store
            .save("home", &pair("1.1.1.1", None))
            .expect("save should recover");
        assert_eq!(store.load_all().len(), 1);
    }

    #[test]
    fn test_load_tolerates_comments() {
        let dir = TempDir::new().expect("tempdir");
        let store = store_in(&dir);
        fs::write(
            store.path(),
            "{\n  // hand-edited\n  \"home\": { \"preferred\": \"1.1.1.1\", \"alternative\": null }\n}",
        )
        .expect("write");

        let profiles = store.load_all();
        assert_eq!(profiles["home"], pair("1.1.1.1", None));
    }
}
