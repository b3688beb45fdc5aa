//! Static merge of stacked layer behaviors into the behavior grid.
//!
//! Layers are folded one at a time, background to foreground, through
//! [`apply_tile_to_behavior_grid`]. The fold itself ([`merge_record`]) only
//! touches the tile being merged; the cross-tile part of the contract, turning
//! `false` ledge declarations into positive ledges on the neighbor across that
//! edge, is returned as a list of [`LedgeWrite`]s and applied afterwards by
//! [`apply_ledge_writes`]. Keeping the two steps apart makes the neighbor side
//! effect reproducible and testable on its own.

use arrayvec::ArrayVec;

use crate::behavior::bitmap::{BitmapField, BitmapKinds, SubTileMask, merge_bitmap};
use crate::behavior::grid::BehaviorGrid;
use crate::behavior::record::BehaviorRecord;
use crate::error::{AreaError, InvariantViolation, report_invariant};
use crate::state::{Direction, Directions, TileCoord};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedgeWriteKind {
    /// Set the ledge flag on the target.
    Assert,
    /// Remove a flag previously asserted by the source tile.
    Retract,
}

/// A positive ledge flag to write onto (or remove from) a neighboring tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LedgeWrite {
    pub target: TileCoord,
    pub direction: Direction,
    pub kind: LedgeWriteKind,
}

/// At most four retractions followed by four assertions per merge.
pub type LedgeWrites = ArrayVec<LedgeWrite, 8>;

/// Writes implied by `backfaces` declared on `source`.
///
/// A backface `d` on `source` means the tile across edge `d` has a ledge
/// pointing back at `source`, i.e. in direction `d.opposite()`.
pub fn ledge_writes(
    source: TileCoord,
    backfaces: Directions,
    kind: LedgeWriteKind,
    out: &mut LedgeWrites,
) {
    for direction in backfaces.directions() {
        out.push(LedgeWrite {
            target: source.neighbor(direction),
            direction: direction.opposite(),
            kind,
        });
    }
}

/// Applies ledge writes in order. Targets outside the grid are skipped; the
/// map edge has nothing to fall onto.
pub fn apply_ledge_writes(grid: &mut BehaviorGrid, writes: &[LedgeWrite]) {
    for write in writes {
        let Some(record) = grid.record_mut(write.target) else {
            continue;
        };
        match write.kind {
            LedgeWriteKind::Assert => record.ledges.edges.insert(write.direction.flag()),
            LedgeWriteKind::Retract => record.ledges.edges.remove(write.direction.flag()),
        }
    }
}

/// Folds one layer's behavior for `tile` into the accumulated `current` record.
///
/// Returns the ledge writes the fold implies for neighboring tiles; the
/// caller applies them after the merge.
pub fn merge_record(
    tile: TileCoord,
    current: &mut BehaviorRecord,
    new: &BehaviorRecord,
) -> LedgeWrites {
    let mut writes = LedgeWrites::new();

    // Lava, cloud ground and unconditional ground reset the stack.
    if new.clears_stack() {
        ledge_writes(tile, current.ledges.backfaces, LedgeWriteKind::Retract, &mut writes);
        *current = BehaviorRecord::default();
    }

    // Covering layers hide hazards they do not redeclare.
    if new.is_ground != Some(false) {
        if new.bitmap_input(BitmapKinds::LAVA) == (None, None) {
            current.is_lava = BitmapField::Absent;
        }
        if new.bitmap_input(BitmapKinds::PIT) == (None, None) {
            current.pit = BitmapField::Absent;
        }
        current.water &= new.water;
        current.shallow_water &= new.shallow_water;
        current.slippery &= new.slippery;
        current.cloud_ground &= new.cloud_ground;
        current.is_brittle_ground &= new.is_brittle_ground;
        if new.touch_hit.is_none() {
            current.touch_hit = None;
        }
    }

    current.light_radius = current.light_radius.max(new.light_radius);
    current.brightness = current.brightness.max(new.brightness);

    let covers = new.is_ground == Some(true);
    let new_lava_map = new.is_lava.map().copied().unwrap_or(SubTileMask::EMPTY);
    let new_pit_map = new.pit.map().copied().unwrap_or(SubTileMask::EMPTY);

    let (flag, map) = new.bitmap_input(BitmapKinds::SOLID);
    current.solid = merge_bitmap(current.solid, flag, map, &[covers], &[]);

    let (flag, map) = new.bitmap_input(BitmapKinds::LAVA);
    current.is_lava = merge_bitmap(
        current.is_lava,
        flag,
        map,
        &[covers, new.pit.is_all(), new.cloud_ground],
        &[new_pit_map],
    );

    let (flag, map) = new.bitmap_input(BitmapKinds::PIT);
    current.pit = merge_bitmap(
        current.pit,
        flag,
        map,
        &[covers, new.is_lava.is_all(), new.cloud_ground],
        &[new_lava_map],
    );

    if current.is_lava.is_all() && current.pit.is_all() {
        report_invariant(InvariantViolation::UnrecognizedMergeState {
            tile,
            detail: "tile is both lava and pit everywhere",
        });
        current.pit = BitmapField::Absent;
    }

    current.ground_height = current.ground_height.max(new.ground_height);
    current.climbable |= new.climbable;
    current.water |= new.water;
    current.shallow_water |= new.shallow_water;
    current.slippery |= new.slippery;
    current.cloud_ground |= new.cloud_ground;
    current.is_brittle_ground |= new.is_brittle_ground;
    current.is_frozen |= new.is_frozen;
    current.is_not_solid |= new.is_not_solid;
    if new.is_ground.is_some() {
        current.is_ground = new.is_ground;
    }
    if new.touch_hit.is_some() {
        current.touch_hit = new.touch_hit;
    }
    if new.crush_weight.is_some() {
        current.crush_weight = new.crush_weight;
    }

    current.ledges.edges |= new.ledges.edges;
    current.ledges.backfaces |= new.ledges.backfaces;
    ledge_writes(tile, new.ledges.backfaces, LedgeWriteKind::Assert, &mut writes);

    writes
}

/// Folds one layer's behavior for `tile` into the grid.
///
/// Foreground layers and purely decorative records leave the grid untouched.
/// The merge runs first; the neighbor ledge pass runs immediately after it.
pub fn apply_tile_to_behavior_grid(
    grid: &mut BehaviorGrid,
    tile: TileCoord,
    behaviors: &BehaviorRecord,
    is_foreground: bool,
) -> Result<(), AreaError> {
    grid.check(tile)?;
    if is_foreground || behaviors.is_decorative() {
        return Ok(());
    }

    let writes = match grid.record_mut(tile) {
        Some(current) => merge_record(tile, current, behaviors),
        None => return Ok(()),
    };
    apply_ledge_writes(grid, &writes);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::record::Ledges;

    fn merged(layers: &[BehaviorRecord]) -> BehaviorRecord {
        let mut grid = BehaviorGrid::new(1, 1);
        for layer in layers {
            apply_tile_to_behavior_grid(&mut grid, TileCoord::new(0, 0), layer, false).unwrap();
        }
        grid.record(TileCoord::new(0, 0)).unwrap().clone()
    }

    #[test]
    fn decoration_keeps_pit() {
        let result = merged(&[BehaviorRecord::pit(), BehaviorRecord::default()]);
        assert!(result.pit.is_all());
    }

    #[test]
    fn ground_covers_pit() {
        let result = merged(&[BehaviorRecord::pit(), BehaviorRecord::ground()]);
        assert!(result.pit.is_absent());
        assert_eq!(result.is_ground, Some(true));
    }

    #[test]
    fn covering_layer_hides_undeclared_hazards() {
        let mut wet = BehaviorRecord::water();
        wet.slippery = true;
        let result = merged(&[wet, BehaviorRecord::climbable()]);
        assert!(!result.water);
        assert!(!result.slippery);
        assert!(result.climbable);
    }

    #[test]
    fn decorate_only_layer_keeps_hazards() {
        let decorate = BehaviorRecord {
            is_ground: Some(false),
            light_radius: 3,
            ..BehaviorRecord::default()
        };
        let result = merged(&[BehaviorRecord::water(), BehaviorRecord::pit(), decorate]);
        // the pit layer itself covered the water
        assert!(!result.water);
        assert!(result.pit.is_all());
        assert_eq!(result.light_radius, 3);
    }

    #[test]
    fn lava_erases_the_stack() {
        let result = merged(&[BehaviorRecord::solid().with_ground_height(2), BehaviorRecord::lava()]);
        assert!(result.is_lava.is_all());
        assert!(result.solid.is_absent());
        assert_eq!(result.ground_height, 0);
    }

    #[test]
    fn light_takes_the_max() {
        let bright = BehaviorRecord {
            light_radius: 5,
            brightness: 0.8,
            is_ground: Some(false),
            ..BehaviorRecord::default()
        };
        let dim = BehaviorRecord {
            light_radius: 2,
            brightness: 0.3,
            is_ground: Some(false),
            ..BehaviorRecord::default()
        };
        let result = merged(&[bright, dim]);
        assert_eq!(result.light_radius, 5);
        assert_eq!(result.brightness, 0.8);
    }

    #[test]
    fn partial_solids_union() {
        let left = BehaviorRecord::solid_mask(SubTileMask::columns(0, 8));
        let right = BehaviorRecord::solid_mask(SubTileMask::columns(8, 16));
        assert!(merged(&[left, right]).solid.is_all());
    }

    #[test]
    fn explicit_false_clears_solid() {
        let opening = BehaviorRecord {
            cleared: BitmapKinds::SOLID,
            ..BehaviorRecord::default()
        };
        assert!(merged(&[BehaviorRecord::solid(), opening]).solid.is_absent());
    }

    #[test]
    fn partial_pit_carves_lava() {
        let pit_half = BehaviorRecord {
            pit: BitmapField::Mask(SubTileMask::columns(0, 8)),
            is_ground: Some(false),
            ..BehaviorRecord::default()
        };
        let result = merged(&[BehaviorRecord::lava(), pit_half]);
        assert_eq!(result.is_lava, BitmapField::Mask(SubTileMask::columns(8, 16)));
        assert_eq!(result.pit, BitmapField::Mask(SubTileMask::columns(0, 8)));
    }

    #[test]
    fn reapplying_a_layer_is_idempotent() {
        let layer = BehaviorRecord {
            solid: BitmapField::Mask(SubTileMask::rows_between(0, 4)),
            climbable: true,
            ..BehaviorRecord::default()
        };
        let once = merged(&[BehaviorRecord::pit(), layer.clone()]);
        let twice = merged(&[BehaviorRecord::pit(), layer.clone(), layer]);
        assert_eq!(once, twice);
    }

    #[test]
    fn foreground_layers_are_ignored() {
        let mut grid = BehaviorGrid::new(1, 1);
        let tile = TileCoord::new(0, 0);
        apply_tile_to_behavior_grid(&mut grid, tile, &BehaviorRecord::solid(), true).unwrap();
        assert!(grid.record(tile).unwrap().solid.is_absent());
        assert_eq!(grid.generation(tile), Some(0));
    }

    #[test]
    fn false_ledge_writes_onto_neighbor() {
        let mut grid = BehaviorGrid::new(1, 2);
        let lower = TileCoord::new(0, 1);
        let cliff_top = TileCoord::new(0, 0);
        let layer = BehaviorRecord::ground().with_ledges(Ledges::backface(Direction::Up));
        apply_tile_to_behavior_grid(&mut grid, lower, &layer, false).unwrap();

        assert!(grid.record(cliff_top).unwrap().ledges.has(Direction::Down));
        assert!(!grid.record(lower).unwrap().ledges.has(Direction::Up));
    }

    #[test]
    fn clearing_layer_retracts_propagated_ledges() {
        let mut grid = BehaviorGrid::new(2, 1);
        let source = TileCoord::new(1, 0);
        let neighbor = TileCoord::new(0, 0);
        let layer = BehaviorRecord::ground().with_ledges(Ledges::backface(Direction::Left));
        apply_tile_to_behavior_grid(&mut grid, source, &layer, false).unwrap();
        assert!(grid.record(neighbor).unwrap().ledges.has(Direction::Right));

        apply_tile_to_behavior_grid(&mut grid, source, &BehaviorRecord::lava(), false).unwrap();
        assert!(!grid.record(neighbor).unwrap().ledges.has(Direction::Right));
        assert!(grid.record(source).unwrap().ledges.is_empty());
    }

    #[test]
    fn ledge_writes_skip_the_map_edge() {
        let mut grid = BehaviorGrid::new(1, 1);
        let layer = BehaviorRecord::ground().with_ledges(Ledges::backface(Direction::Left));
        apply_tile_to_behavior_grid(&mut grid, TileCoord::new(0, 0), &layer, false).unwrap();
        assert!(grid.record(TileCoord::new(0, 0)).unwrap().ledges.edges.is_empty());
    }

    #[test]
    fn writes_are_computed_without_a_grid() {
        let mut writes = LedgeWrites::new();
        ledge_writes(
            TileCoord::new(4, 4),
            Directions::UP | Directions::RIGHT,
            LedgeWriteKind::Assert,
            &mut writes,
        );
        assert_eq!(
            writes.as_slice(),
            &[
                LedgeWrite {
                    target: TileCoord::new(4, 3),
                    direction: Direction::Down,
                    kind: LedgeWriteKind::Assert,
                },
                LedgeWrite {
                    target: TileCoord::new(5, 4),
                    direction: Direction::Left,
                    kind: LedgeWriteKind::Assert,
                },
            ]
        );
    }
}
