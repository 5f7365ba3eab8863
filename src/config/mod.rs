//! Configuration loading and management

mod io;
mod settings;

pub use settings::{SessionSettings, StorageBackend, StorageSettings};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::identity::Identity;

/// Main configuration structure (`~/.blogportal/config.toml`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Storage settings
    #[serde(default)]
    pub storage: StorageSettings,

    /// Active user
    #[serde(default)]
    pub session: SessionSettings,
}

impl Config {
    /// Directory holding progress records and `battles.json`
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(|| Self::global_config_dir().join("data"))
    }

    /// Identity of the configured user, if any
    pub fn identity(&self) -> Option<Identity> {
        let user_id = self.session.user_id.as_deref()?.trim();
        if user_id.is_empty() {
            return None;
        }
        let name = self
            .session
            .display_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(user_id);
        Some(Identity::new(user_id, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Json);
        assert!(config.identity().is_none());
    }

    #[test]
    fn test_identity_from_session() {
        let config: Config = toml::from_str(
            r#"
            [storage]
            backend = "sqlite"
            data_dir = "/srv/blogportal"

            [session]
            user_id = "u-42"
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.data_dir(), PathBuf::from("/srv/blogportal"));
        let identity = config.identity().unwrap();
        assert_eq!(identity.id.as_str(), "u-42");
        assert_eq!(identity.name, "u-42");
    }

    #[test]
    fn test_blank_user_id_is_no_identity() {
        let mut config = Config::default();
        config.session.user_id = Some("  ".to_string());
        assert!(config.identity().is_none());
    }
}
