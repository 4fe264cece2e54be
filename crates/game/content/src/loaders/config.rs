//! Simulation configuration loader.

use std::path::Path;

use droid_core::SimConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for simulation tuning from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Fields missing from the file keep their defaults.
    pub fn load(path: &Path) -> LoadResult<SimConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<SimConfig> {
        let config: SimConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.no_free_waypoint_wait_min > config.no_free_waypoint_wait_max {
            anyhow::bail!(
                "no_free_waypoint_wait_min ({}) exceeds no_free_waypoint_wait_max ({})",
                config.no_free_waypoint_wait_min,
                config.no_free_waypoint_wait_max
            );
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::write_temp;

    #[test]
    fn missing_fields_take_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "sim.toml", "heal_interval = 5.0\nattack_move_rate = 0.5\n");
        let config = ConfigLoader::load(&path).unwrap();
        assert_eq!(config.heal_interval, 5.0);
        assert_eq!(config.attack_move_rate, 0.5);
        assert_eq!(config.wait_collision, SimConfig::DEFAULT_WAIT_COLLISION);
    }

    #[test]
    fn inverted_wait_range_is_rejected() {
        let err = ConfigLoader::parse(
            "no_free_waypoint_wait_min = 2.0\nno_free_waypoint_wait_max = 1.0\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("exceeds"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = ConfigLoader::load(Path::new("/nonexistent/sim.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/sim.toml"));
    }
}
