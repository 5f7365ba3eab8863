//! Init command implementation

use std::path::Path;

use anyhow::{bail, Result};
use tracing::info;

use blogportal::{Config, UserId};

/// Write a config for a freshly generated user
pub fn init_command(config_path: Option<&Path>, name: Option<String>, force: bool) -> Result<()> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::global_config_path);

    if path.exists() && !force {
        bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    let mut config = if path.exists() {
        Config::load(Some(&path))?
    } else {
        Config::default()
    };
    let user_id = UserId::generate();
    config.session.user_id = Some(user_id.to_string());
    config.session.display_name = name;
    config.save_to_file(&path)?;

    info!("Created config at {}", path.display());
    println!("Signed in as {user_id}");
    Ok(())
}
