//! Tile palette loader.
//!
//! A palette lists every tile kind an area may reference, with the behavior
//! record it contributes to the grid:
//!
//! ```ron
//! (
//!     tiles: [
//!         (id: 1, key: "wall", behaviors: Some((solid: All))),
//!         (id: 2, key: "grass"),
//!         (id: 3, key: "cliff_base", behaviors: Some((
//!             is_ground: Some(true),
//!             ledges: (backfaces: "UP"),
//!         ))),
//!     ],
//! )
//! ```

use std::collections::HashSet;
use std::path::Path;

use area_core::{TileDefinition, TileRegistry};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PaletteRon {
    tiles: Vec<TileDefinition>,
}

/// Loader for tile palettes from RON files.
pub struct PaletteLoader;

impl PaletteLoader {
    pub fn load(path: &Path) -> LoadResult<TileRegistry> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load palette {}: {}", path.display(), e))
    }

    /// Parses a palette. Duplicate ids and duplicate keys are rejected.
    pub fn parse(content: &str) -> LoadResult<TileRegistry> {
        let data: PaletteRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse palette RON: {}", e))?;

        let mut keys = HashSet::new();
        let mut registry = TileRegistry::new();
        for definition in data.tiles {
            if !keys.insert(definition.key.clone()) {
                anyhow::bail!("duplicate tile key '{}'", definition.key);
            }
            let id = definition.id;
            if registry.register(definition).is_some() {
                anyhow::bail!("duplicate tile id {}", id.0);
            }
        }

        tracing::debug!(tiles = registry.len(), "loaded tile palette");
        Ok(registry)
    }
}
