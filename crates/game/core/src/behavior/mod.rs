//! Tile behavior records and the static behavior grid.
//!
//! [`BehaviorRecord`] is plain data describing collision and hazards for a
//! tile, a sub-tile bitmap, or a dynamic object. [`BehaviorGrid`] holds one
//! merged record per tile of an area, produced by folding every background
//! layer through [`apply_tile_to_behavior_grid`].
pub mod bitmap;
pub mod grid;
pub mod merge;
pub mod record;

pub use bitmap::{BitmapField, BitmapKinds, SubTileMask, merge_bitmap};
pub use grid::{BehaviorCell, BehaviorGrid};
pub use merge::{
    LedgeWrite, LedgeWriteKind, LedgeWrites, apply_ledge_writes, apply_tile_to_behavior_grid,
    ledge_writes, merge_record,
};
pub use record::{BehaviorRecord, Element, Ledges, TouchHit};
