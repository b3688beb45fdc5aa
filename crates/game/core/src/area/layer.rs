use crate::env::TileId;
use crate::state::TileCoord;

/// Draw priority of a layer. Only background layers carry collision.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LayerPriority {
    #[default]
    Background,
    Foreground,
}

/// One authored grid of tile references.
///
/// Each cell holds an optional tile and an optional mask tile. When a mask
/// tile is present its behaviors replace the tile's for that cell.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaLayer {
    pub key: String,
    pub priority: LayerPriority,
    width: u32,
    height: u32,
    tiles: Vec<Option<TileId>>,
    mask_tiles: Vec<Option<TileId>>,
}

impl AreaLayer {
    /// An empty layer of the given size.
    pub fn new(key: impl Into<String>, priority: LayerPriority, width: u32, height: u32) -> Self {
        let cells = (width * height) as usize;
        Self {
            key: key.into(),
            priority,
            width,
            height,
            tiles: vec![None; cells],
            mask_tiles: vec![None; cells],
        }
    }

    /// A layer filled with the same tile everywhere.
    pub fn filled(
        key: impl Into<String>,
        priority: LayerPriority,
        width: u32,
        height: u32,
        tile: TileId,
    ) -> Self {
        let mut layer = Self::new(key, priority, width, height);
        layer.tiles.fill(Some(tile));
        layer
    }

    /// A layer from row-major tile rows. Rows shorter than the widest row are
    /// padded with empty cells.
    pub fn from_rows(
        key: impl Into<String>,
        priority: LayerPriority,
        rows: &[Vec<Option<TileId>>],
    ) -> Self {
        let height = rows.len() as u32;
        let width = rows.iter().map(Vec::len).max().unwrap_or(0) as u32;
        let mut layer = Self::new(key, priority, width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, tile) in row.iter().enumerate() {
                layer.tiles[y * width as usize + x] = *tile;
            }
        }
        layer
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_foreground(&self) -> bool {
        self.priority == LayerPriority::Foreground
    }

    fn index(&self, tile: TileCoord) -> Option<usize> {
        let inside = tile.x >= 0
            && tile.y >= 0
            && (tile.x as u32) < self.width
            && (tile.y as u32) < self.height;
        inside.then(|| (tile.y as u32 * self.width + tile.x as u32) as usize)
    }

    pub fn tile(&self, tile: TileCoord) -> Option<TileId> {
        self.index(tile).and_then(|i| self.tiles[i])
    }

    pub fn mask_tile(&self, tile: TileCoord) -> Option<TileId> {
        self.index(tile).and_then(|i| self.mask_tiles[i])
    }

    /// The tile whose behaviors apply at this cell.
    pub fn effective_tile(&self, tile: TileCoord) -> Option<TileId> {
        self.mask_tile(tile).or_else(|| self.tile(tile))
    }

    /// Returns `false` when `tile` is outside the layer.
    pub fn set_tile(&mut self, tile: TileCoord, id: Option<TileId>) -> bool {
        match self.index(tile) {
            Some(i) => {
                self.tiles[i] = id;
                true
            }
            None => false,
        }
    }

    pub fn set_mask_tile(&mut self, tile: TileCoord, id: Option<TileId>) -> bool {
        match self.index(tile) {
            Some(i) => {
                self.mask_tiles[i] = id;
                true
            }
            None => false,
        }
    }

    /// Every tile id referenced by this layer, masks included.
    pub fn referenced_tiles(&self) -> impl Iterator<Item = TileId> + '_ {
        self.tiles.iter().chain(self.mask_tiles.iter()).flatten().copied()
    }
}
