//! Content loaders for reading game data from files.
//!
//! Each loader converts one RON/TOML file into core types; the
//! [`ContentFactory`] loads a whole content directory at once.

pub mod config;
pub mod droids;
pub mod factory;
pub mod obstacles;
pub mod ship;

pub use config::ConfigLoader;
pub use droids::DroidLoader;
pub use factory::{Content, ContentFactory};
pub use obstacles::ObstacleLoader;
pub use ship::{BotPlacement, ShipContent, ShipLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

#[cfg(test)]
pub(crate) fn write_temp(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}
