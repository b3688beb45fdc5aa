use crate::behavior::record::BehaviorRecord;
use crate::error::AreaError;
use crate::state::TileCoord;

/// One grid cell: the merged record plus bookkeeping for incremental patches.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct BehaviorCell {
    pub record: BehaviorRecord,
    /// Bumped every time the cell is rewritten.
    pub generation: u32,
    /// Set while something other than the authored layers dictates the record.
    pub overridden: bool,
}

/// Memoized per-tile projection of an area's layers.
#[derive(Clone, Debug, PartialEq)]
pub struct BehaviorGrid {
    width: u32,
    height: u32,
    cells: Vec<BehaviorCell>,
}

impl BehaviorGrid {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![BehaviorCell::default(); (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, tile: TileCoord) -> bool {
        tile.x >= 0 && tile.y >= 0 && (tile.x as u32) < self.width && (tile.y as u32) < self.height
    }

    fn index(&self, tile: TileCoord) -> Option<usize> {
        self.contains(tile)
            .then(|| (tile.y as u32 * self.width + tile.x as u32) as usize)
    }

    pub(crate) fn check(&self, tile: TileCoord) -> Result<usize, AreaError> {
        self.index(tile).ok_or(AreaError::TileOutOfBounds {
            tile,
            width: self.width,
            height: self.height,
        })
    }

    pub fn cell(&self, tile: TileCoord) -> Option<&BehaviorCell> {
        self.index(tile).map(|i| &self.cells[i])
    }

    pub fn record(&self, tile: TileCoord) -> Option<&BehaviorRecord> {
        self.cell(tile).map(|cell| &cell.record)
    }

    /// Mutable access to a record. Marks the cell as rewritten.
    pub fn record_mut(&mut self, tile: TileCoord) -> Option<&mut BehaviorRecord> {
        let index = self.index(tile)?;
        let cell = &mut self.cells[index];
        cell.generation = cell.generation.wrapping_add(1);
        Some(&mut cell.record)
    }

    pub fn generation(&self, tile: TileCoord) -> Option<u32> {
        self.cell(tile).map(|cell| cell.generation)
    }

    pub fn is_overridden(&self, tile: TileCoord) -> bool {
        self.cell(tile).is_some_and(|cell| cell.overridden)
    }

    /// Replaces a record wholesale on behalf of a dynamic object.
    pub fn override_record(
        &mut self,
        tile: TileCoord,
        record: BehaviorRecord,
    ) -> Result<(), AreaError> {
        let index = self.check(tile)?;
        let cell = &mut self.cells[index];
        cell.record = record;
        cell.overridden = true;
        cell.generation = cell.generation.wrapping_add(1);
        Ok(())
    }

    /// Installs a freshly recomputed record and clears the override flag.
    pub(crate) fn restore_record(
        &mut self,
        tile: TileCoord,
        record: BehaviorRecord,
    ) -> Result<(), AreaError> {
        let index = self.check(tile)?;
        let cell = &mut self.cells[index];
        cell.record = record;
        cell.overridden = false;
        cell.generation = cell.generation.wrapping_add(1);
        Ok(())
    }

    pub fn tiles(&self) -> impl Iterator<Item = TileCoord> + use<> {
        let (width, height) = (self.width as i32, self.height as i32);
        (0..height).flat_map(move |y| (0..width).map(move |x| TileCoord::new(x, y)))
    }
}
