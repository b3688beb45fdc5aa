//! Content factory for loading area content from a data directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use area_core::{AreaInstance, MotionConfig, TileRegistry};

use crate::loaders::{AreaLayout, AreaLoader, ConfigLoader, LoadResult, PaletteLoader};

/// Content factory that loads all area content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── motion.toml
/// ├── palette.ron
/// └── areas/
///     ├── overworld.ron
///     └── cave.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load motion tuning from `motion.toml`, or the defaults when the file
    /// does not exist.
    pub fn load_config(&self) -> LoadResult<MotionConfig> {
        let path = self.data_dir.join("motion.toml");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no motion config, using defaults");
            return Ok(MotionConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the tile palette from `palette.ron`.
    pub fn load_palette(&self) -> LoadResult<TileRegistry> {
        PaletteLoader::load(&self.data_dir.join("palette.ron"))
    }

    /// Load a layout from `areas/{area_name}.ron`.
    pub fn load_layout(&self, area_name: &str) -> LoadResult<AreaLayout> {
        let path = self.data_dir.join("areas").join(format!("{}.ron", area_name));
        AreaLoader::load(&path)
    }

    /// Load a layout and build it against a shared palette with this
    /// directory's motion tuning.
    pub fn load_area(
        &self,
        area_name: &str,
        registry: Arc<TileRegistry>,
    ) -> LoadResult<AreaInstance> {
        let config = self.load_config()?;
        let area = self
            .load_layout(area_name)?
            .instantiate(registry)
            .map_err(|e| anyhow::anyhow!("Failed to build area '{}': {}", area_name, e))?;
        Ok(area.with_config(config))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
