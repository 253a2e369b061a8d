//! On-disk configuration for the tally add-on.
//!
//! A single `tally.toml` in the host's config directory. Loading never
//! fails the session: a missing file yields defaults, and a corrupt file
//! logs a warning and yields defaults rather than taking the add-on down
//! with it.

use std::path::{Path, PathBuf};

use tracing::warn;

use tally_core::config::TallyConfig;
use tally_core::error::Result;

/// File name of the configuration inside the host's config directory.
pub const CONFIG_FILE: &str = "tally.toml";

/// Full path of the config file under `dir`.
#[must_use]
pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE)
}

/// Load the configuration from `dir`, falling back to defaults when the
/// file is missing or unreadable.
#[must_use]
pub fn load_or_default(dir: &Path) -> TallyConfig {
    let path = config_path(dir);
    if !path.exists() {
        return TallyConfig::default();
    }
    match TallyConfig::from_file(&path) {
        Ok(config) => config,
        Err(error) => {
            warn!(%error, path = %path.display(), "failed to load config, using defaults");
            TallyConfig::default()
        }
    }
}

/// Write the configuration to `dir`, creating the directory if needed.
///
/// # Errors
/// Returns an error when the directory cannot be created or the file
/// cannot be written or serialized.
pub fn save(dir: &Path, config: &TallyConfig) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let toml_str = config.to_toml()?;
    std::fs::write(config_path(dir), toml_str)?;
    Ok(())
}
