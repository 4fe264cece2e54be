//! Obstacle type loader.

use std::path::Path;

use droid_core::{ObstacleSpec, ObstacleSpecTable};

use crate::loaders::{LoadResult, read_file};

/// Loader for obstacle types from RON files.
///
/// The file holds a list of specs; a spec's position in the list is its
/// obstacle kind.
pub struct ObstacleLoader;

impl ObstacleLoader {
    pub fn load(path: &Path) -> LoadResult<ObstacleSpecTable> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ObstacleSpecTable> {
        let specs: Vec<ObstacleSpec> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse obstacles RON: {}", e))?;

        for spec in &specs {
            if spec.upper_border > spec.lower_border || spec.left_border > spec.right_border {
                anyhow::bail!("obstacle '{}' has inverted borders", spec.name);
            }
        }
        Ok(ObstacleSpecTable::new(specs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::write_temp;
    use droid_core::{BlockArea, ObstacleFlags, ObstacleKind, ObstacleOracle};

    const OBSTACLES: &str = r#"[
        (
            name: "wall",
            upper_border: -0.5, lower_border: 0.5,
            left_border: -0.5, right_border: 0.5,
            block_area: Rectangle,
            flags: "BLOCKS_VISION_TOO",
        ),
        (
            name: "open door",
            upper_border: -0.5, lower_border: 0.5,
            left_border: -0.1, right_border: 0.1,
            block_area: Rectangle,
            flags: "IS_WALKABLE",
        ),
        (name: "blood"),
    ]"#;

    #[test]
    fn loads_specs_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "obstacles.ron", OBSTACLES);
        let table = ObstacleLoader::load(&path).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.find("open door"), Some(ObstacleKind(1)));
        let door = table.obstacle_spec(ObstacleKind(1)).unwrap();
        assert_eq!(door.flags, ObstacleFlags::IS_WALKABLE);
        let decal = table.obstacle_spec(ObstacleKind(2)).unwrap();
        assert_eq!(decal.block_area, BlockArea::None);
    }

    #[test]
    fn inverted_borders_are_rejected() {
        let err = ObstacleLoader::parse(
            r#"[(name: "odd", upper_border: 0.5, lower_border: -0.5, block_area: Rectangle)]"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("odd"));
    }

    #[test]
    fn syntax_errors_mention_the_file_kind() {
        let err = ObstacleLoader::parse("[(name: ").unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse obstacles RON"));
    }
}
