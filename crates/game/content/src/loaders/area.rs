//! Area layout loader.
//!
//! Layouts list their layers bottom to top. Each layer is sparse: an optional
//! fill tile, then explicit `(x, y, id)` cells and mask cells on top of it.
//!
//! ```ron
//! (
//!     dimensions: (8, 6),
//!     origin: (128, 0),
//!     layers: [
//!         (key: "ground", fill: Some(2), tiles: [(3, 2, 1)]),
//!         (key: "canopy", priority: Foreground, tiles: [(3, 1, 5)]),
//!     ],
//! )
//! ```

use std::path::Path;
use std::sync::Arc;

use area_core::{
    AreaError, AreaInstance, AreaLayer, LayerPriority, PixelPoint, TileCoord, TileId,
    TileRegistry,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AreaDataRon {
    dimensions: (u32, u32),
    #[serde(default)]
    origin: (i32, i32),
    layers: Vec<LayerDataRon>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LayerDataRon {
    key: String,
    #[serde(default)]
    priority: LayerPriority,
    #[serde(default)]
    fill: Option<u32>,
    #[serde(default)]
    tiles: Vec<(i32, i32, u32)>, // (x, y, tile id)
    #[serde(default)]
    masks: Vec<(i32, i32, u32)>,
}

/// Layers and placement of one area, not yet bound to a palette.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaLayout {
    pub width: u32,
    pub height: u32,
    pub origin: PixelPoint,
    pub layers: Vec<AreaLayer>,
}

impl AreaLayout {
    /// Builds the area against `registry`, merging every layer into its
    /// behavior grid.
    pub fn instantiate(self, registry: Arc<TileRegistry>) -> Result<AreaInstance, AreaError> {
        Ok(AreaInstance::new(self.width, self.height, self.layers, registry)?
            .with_origin(self.origin))
    }
}

/// Loader for area layouts from RON files.
pub struct AreaLoader;

impl AreaLoader {
    pub fn load(path: &Path) -> LoadResult<AreaLayout> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load area {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<AreaLayout> {
        let data: AreaDataRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse area RON: {}", e))?;
        let (width, height) = data.dimensions;

        let mut layers = Vec::with_capacity(data.layers.len());
        for layer_data in data.layers {
            let mut layer = match layer_data.fill {
                Some(id) => AreaLayer::filled(
                    layer_data.key,
                    layer_data.priority,
                    width,
                    height,
                    TileId(id),
                ),
                None => AreaLayer::new(layer_data.key, layer_data.priority, width, height),
            };
            for (x, y, id) in layer_data.tiles {
                if !layer.set_tile(TileCoord::new(x, y), Some(TileId(id))) {
                    anyhow::bail!("layer '{}': tile ({}, {}) is outside the area", layer.key, x, y);
                }
            }
            for (x, y, id) in layer_data.masks {
                if !layer.set_mask_tile(TileCoord::new(x, y), Some(TileId(id))) {
                    anyhow::bail!("layer '{}': mask ({}, {}) is outside the area", layer.key, x, y);
                }
            }
            layers.push(layer);
        }

        Ok(AreaLayout {
            width,
            height,
            origin: PixelPoint::new(data.origin.0, data.origin.1),
            layers,
        })
    }
}
