mod config;
mod state;

pub use config::{Config, HoldConfig};
pub use state::{Snapshot, StateStore, SNAPSHOT_FILE};

use std::path::PathBuf;

use crate::error::StoreError;

/// Returns `~/.config/habitdeck[-dev]/` based on HABITDECK_ENV.
///
/// Set HABITDECK_ENV=dev to use a separate development data directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, StoreError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("HABITDECK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("habitdeck-dev")
    } else {
        base_dir.join("habitdeck")
    };

    std::fs::create_dir_all(&dir).map_err(|source| StoreError::WriteFailed {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
