//! Droid type loader.

use std::path::Path;

use droid_core::{DroidSpec, DroidSpecTable};

use crate::loaders::{LoadResult, read_file};

/// Loader for droid types from RON files.
///
/// Unknown sensor names are reported and replaced by `spectral` while
/// parsing; everything else malformed fails the load.
pub struct DroidLoader;

impl DroidLoader {
    pub fn load(path: &Path) -> LoadResult<DroidSpecTable> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<DroidSpecTable> {
        let specs: Vec<DroidSpec> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse droids RON: {}", e))?;

        let mut table = DroidSpecTable::default();
        for spec in specs {
            if spec.name.is_empty() {
                anyhow::bail!("droid #{} has no name", table.len());
            }
            if table.find(&spec.name).is_some() {
                anyhow::bail!("droid '{}' is defined twice", spec.name);
            }
            if spec.max_energy <= 0.0 {
                anyhow::bail!("droid '{}' needs a positive max_energy", spec.name);
            }
            table.push(spec);
        }
        Ok(table)
    }
}
