//! Shared setup for commands: config, store, identity and engine

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use blogportal::arena::{Arena, BATTLES_FILE};
use blogportal::config::StorageBackend;
use blogportal::store::{JsonFileStore, ProgressStore, SqliteStore};
use blogportal::{open_session, Config, GamificationEngine, Identity, SystemClock};

pub type Engine = GamificationEngine<Box<dyn ProgressStore>, SystemClock>;

pub struct Context {
    pub config: Config,
    pub data_dir: PathBuf,
    pub identity: Option<Identity>,
}

impl Context {
    pub fn new(
        config_path: Option<&Path>,
        data_dir: Option<PathBuf>,
        user: Option<String>,
    ) -> Result<Self> {
        let config = Config::load(config_path)?;
        let data_dir = data_dir.unwrap_or_else(|| config.data_dir());

        let identity = match user {
            Some(user) => {
                // Keep the configured display name when acting as the configured user
                let name = match config.identity() {
                    Some(configured) if configured.id.as_str() == user => configured.name,
                    _ => user.clone(),
                };
                Some(Identity::new(user, name))
            }
            None => config.identity(),
        };

        Ok(Self {
            config,
            data_dir,
            identity,
        })
    }

    pub fn store(&self) -> Result<Box<dyn ProgressStore>> {
        let store: Box<dyn ProgressStore> = match self.config.storage.backend {
            StorageBackend::Json => Box::new(JsonFileStore::new(&self.data_dir)),
            StorageBackend::Sqlite => {
                let path = self.data_dir.join("progress.db");
                Box::new(
                    SqliteStore::open(&path)
                        .with_context(|| format!("Failed to open {}", path.display()))?,
                )
            }
        };
        Ok(store)
    }

    /// Open the active user's engine
    pub fn engine(&self) -> Result<Engine> {
        let store = self.store()?;
        open_session(store, SystemClock, self.identity.clone())
            .context("Failed to load progress")?
            .context("No active user. Run `blogportal init` or pass --user <id>.")
    }

    pub fn battles_path(&self) -> PathBuf {
        self.data_dir.join(BATTLES_FILE)
    }

    pub fn arena(&self) -> Result<Arena> {
        let path = self.battles_path();
        Arena::load(&path).with_context(|| format!("Failed to load {}", path.display()))
    }

    /// Modify the battle file while holding its lock
    pub fn update_arena<T>(&self, op: impl FnOnce(&mut Arena) -> Result<T>) -> Result<T> {
        Arena::update(&self.battles_path(), op)
    }

    pub fn save_arena(&self, arena: &Arena) -> Result<()> {
        let path = self.battles_path();
        arena
            .save(&path)
            .with_context(|| format!("Failed to save {}", path.display()))
    }
}
