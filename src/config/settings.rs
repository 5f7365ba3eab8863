//! Settings configuration types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Progress storage backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One `progress_<user>.json` per user
    #[default]
    Json,
    /// Shared `progress.db`
    Sqlite,
}

/// Where progress and battles are stored
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Data directory override (defaults to ~/.blogportal/data)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

/// The signed-in user. With no `user_id` the engine stays inert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Name shown on leaderboards (defaults to the user id)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}
