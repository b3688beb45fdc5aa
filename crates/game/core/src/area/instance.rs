use std::sync::Arc;

use crate::behavior::{
    BehaviorGrid, BehaviorRecord, LedgeWrite, LedgeWriteKind, LedgeWrites,
    apply_ledge_writes, apply_tile_to_behavior_grid, ledge_writes, merge_record,
};
use crate::config::MotionConfig;
use crate::env::{AreaObject, TileId, TileRegistry};
use crate::error::AreaError;
use crate::movement::{MoveOutcome, MovementProperties, move_actor};
use crate::state::{Actor, Direction, ObjectId, PixelPoint, TileCoord};

use super::{AreaEvent, AreaLayer};

/// A loaded area: authored layers, the behavior grid derived from them, and
/// everything currently alive inside it.
///
/// The grid is built once in [`AreaInstance::new`] and afterwards patched one
/// tile at a time. Mutation goes through `&mut self`, so it can never overlap
/// a movement resolution that is reading the grid.
pub struct AreaInstance {
    width: u32,
    height: u32,
    /// World-space pixel of this area's top-left corner.
    origin: PixelPoint,
    layers: Vec<AreaLayer>,
    grid: BehaviorGrid,
    registry: Arc<TileRegistry>,
    config: MotionConfig,

    objects: Vec<Box<dyn AreaObject>>,
    effects: Vec<Box<dyn AreaObject>>,
    actors: Vec<Actor>,

    events: Vec<AreaEvent>,
}

impl AreaInstance {
    /// Loads an area from its layers.
    ///
    /// Every layer must match the area size and every referenced tile must be
    /// registered.
    pub fn new(
        width: u32,
        height: u32,
        layers: Vec<AreaLayer>,
        registry: Arc<TileRegistry>,
    ) -> Result<Self, AreaError> {
        for layer in &layers {
            if (layer.width(), layer.height()) != (width, height) {
                return Err(AreaError::LayerSizeMismatch {
                    layer: layer.key.clone(),
                    expected: (width, height),
                    actual: (layer.width(), layer.height()),
                });
            }
            for id in layer.referenced_tiles() {
                registry.behaviors(id)?;
            }
        }

        let grid = build_grid(width, height, &layers, &registry)?;

        Ok(Self {
            width,
            height,
            origin: PixelPoint::default(),
            layers,
            grid,
            registry,
            config: MotionConfig::default(),
            objects: Vec::new(),
            effects: Vec::new(),
            actors: Vec::new(),
            events: Vec::new(),
        })
    }

    pub fn with_origin(mut self, origin: PixelPoint) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_config(mut self, config: MotionConfig) -> Self {
        self.config = config;
        self
    }

    // ===== geometry =====

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn origin(&self) -> PixelPoint {
        self.origin
    }

    pub fn contains_pixel(&self, point: PixelPoint) -> bool {
        self.grid.contains(point.tile())
    }

    /// Converts an area-local pixel into world space.
    pub fn to_world(&self, point: PixelPoint) -> PixelPoint {
        point.offset(self.origin.x, self.origin.y)
    }

    /// Converts a world-space pixel into this area's local space.
    pub fn to_local(&self, world: PixelPoint) -> PixelPoint {
        world.offset(-self.origin.x, -self.origin.y)
    }

    // ===== accessors =====

    pub fn grid(&self) -> &BehaviorGrid {
        &self.grid
    }

    pub fn layers(&self) -> &[AreaLayer] {
        &self.layers
    }

    pub fn registry(&self) -> &TileRegistry {
        &self.registry
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    // ===== live contents =====

    pub fn add_object(&mut self, object: Box<dyn AreaObject>) {
        self.objects.push(object);
    }

    pub fn add_effect(&mut self, effect: Box<dyn AreaObject>) {
        self.effects.push(effect);
    }

    pub fn add_actor(&mut self, actor: Actor) {
        self.actors.push(actor);
    }

    /// Removes an object or effect by id.
    pub fn remove_object(&mut self, id: ObjectId) -> Option<Box<dyn AreaObject>> {
        if let Some(index) = self.objects.iter().position(|o| o.id() == id) {
            return Some(self.objects.remove(index));
        }
        let index = self.effects.iter().position(|e| e.id() == id)?;
        Some(self.effects.remove(index))
    }

    pub fn remove_actor(&mut self, id: ObjectId) -> Option<Actor> {
        let index = self.actors.iter().position(|a| a.id == id)?;
        Some(self.actors.remove(index))
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn actor(&self, id: ObjectId) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }

    pub fn actor_mut(&mut self, id: ObjectId) -> Option<&mut Actor> {
        self.actors.iter_mut().find(|a| a.id == id)
    }

    /// Every body that can contribute behaviors: objects, then effects, then
    /// actors. Later entries win ties in the compositor.
    pub fn bodies(&self) -> impl Iterator<Item = &dyn AreaObject> + '_ {
        let objects = self.objects.iter().map(|o| o.as_ref() as &dyn AreaObject);
        let effects = self.effects.iter().map(|e| e.as_ref() as &dyn AreaObject);
        let actors = self.actors.iter().map(|a| a as &dyn AreaObject);
        objects.chain(effects).chain(actors)
    }

    pub fn body(&self, id: ObjectId) -> Option<&dyn AreaObject> {
        self.bodies().find(|body| body.id() == id)
    }

    pub fn body_mut(&mut self, id: ObjectId) -> Option<&mut dyn AreaObject> {
        if let Some(object) = self.objects.iter_mut().find(|o| o.id() == id) {
            return Some(object.as_mut());
        }
        if let Some(effect) = self.effects.iter_mut().find(|e| e.id() == id) {
            return Some(effect.as_mut());
        }
        self.actors
            .iter_mut()
            .find(|a| a.id == id)
            .map(|a| a as &mut dyn AreaObject)
    }

    // ===== events =====

    pub fn emit(&mut self, event: AreaEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[AreaEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<AreaEvent> {
        std::mem::take(&mut self.events)
    }

    // ===== behavior maintenance =====

    /// Behaviors one layer contributes at `tile`, mask tile first.
    pub fn layer_behaviors(
        &self,
        layer: usize,
        tile: TileCoord,
    ) -> Result<Option<&BehaviorRecord>, AreaError> {
        let layer = self.layers.get(layer).ok_or(AreaError::UnknownLayer(layer))?;
        cell_behaviors(layer, &self.registry, tile)
    }

    /// Recomputes one tile's record from its own layers.
    ///
    /// Ledges this tile previously wrote onto its neighbors are retracted
    /// first, the layers are replayed through the same merge used on load,
    /// and finally ledges that the neighbors' backfaces point at this tile
    /// are imported again. Clears any override.
    pub fn reset_tile_behavior(&mut self, tile: TileCoord) -> Result<(), AreaError> {
        self.grid.check(tile)?;

        let mut writes: Vec<LedgeWrite> = Vec::new();
        if let Some(old) = self.grid.record(tile) {
            let mut retract = LedgeWrites::new();
            ledge_writes(tile, old.ledges.backfaces, LedgeWriteKind::Retract, &mut retract);
            writes.extend(retract);
        }

        let mut record = BehaviorRecord::default();
        for layer in self.layers.iter().filter(|layer| !layer.is_foreground()) {
            let Some(behaviors) = cell_behaviors(layer, &self.registry, tile)? else {
                continue;
            };
            if behaviors.is_decorative() {
                continue;
            }
            writes.extend(merge_record(tile, &mut record, behaviors));
        }

        // On load a neighbor's ledge lands when the neighbor's layer is merged,
        // and a later clearing layer on this tile wipes it again.
        let last_clear = self.last_layer_where(tile, BehaviorRecord::clears_stack)?;
        for direction in Direction::ALL {
            let neighbor = tile.neighbor(direction);
            let backface = direction.opposite();
            let points_here = self
                .grid
                .record(neighbor)
                .is_some_and(|n| n.ledges.backfaces.has(backface));
            if !points_here {
                continue;
            }
            let declared =
                self.last_layer_where(neighbor, |r| r.ledges.backfaces.has(backface))?;
            if survives_clear(declared, last_clear, direction) {
                record.ledges.edges.insert(direction.flag());
            }
        }

        // The same rule holds for the ledges this tile hands to its neighbors.
        let mut kept = Vec::with_capacity(writes.len());
        for write in writes {
            if write.kind == LedgeWriteKind::Assert {
                let backface = write.direction.opposite();
                let declared = self.last_layer_where(tile, |r| r.ledges.backfaces.has(backface))?;
                let cleared = self.last_layer_where(write.target, BehaviorRecord::clears_stack)?;
                if !survives_clear(declared, cleared, write.direction) {
                    continue;
                }
            }
            kept.push(write);
        }

        self.grid.restore_record(tile, record)?;
        apply_ledge_writes(&mut self.grid, &kept);

        tracing::debug!(
            x = tile.x,
            y = tile.y,
            generation = self.grid.generation(tile),
            "tile behavior reset"
        );
        Ok(())
    }

    /// Index of the last background layer whose behaviors at `tile` match.
    fn last_layer_where(
        &self,
        tile: TileCoord,
        matches: impl Fn(&BehaviorRecord) -> bool,
    ) -> Result<Option<usize>, AreaError> {
        let mut last = None;
        for (index, layer) in self.layers.iter().enumerate() {
            if layer.is_foreground() {
                continue;
            }
            let Some(behaviors) = cell_behaviors(layer, &self.registry, tile)? else {
                continue;
            };
            if !behaviors.is_decorative() && matches(behaviors) {
                last = Some(index);
            }
        }
        Ok(last)
    }

    /// Replaces a tile's record on behalf of a dynamic object until the tile
    /// is reset.
    pub fn override_tile_behavior(
        &mut self,
        tile: TileCoord,
        record: BehaviorRecord,
    ) -> Result<(), AreaError> {
        self.grid.override_record(tile, record)
    }

    /// Changes one layer cell and patches the grid.
    ///
    /// An overridden tile keeps its override; the new content takes effect
    /// once the override is lifted with [`reset_tile_behavior`].
    ///
    /// [`reset_tile_behavior`]: Self::reset_tile_behavior
    pub fn set_layer_tile(
        &mut self,
        layer: usize,
        tile: TileCoord,
        id: Option<TileId>,
    ) -> Result<(), AreaError> {
        self.edit_cell(layer, tile, id, AreaLayer::set_tile)
    }

    /// Changes one cell's mask tile and patches the grid.
    pub fn set_mask_tile(
        &mut self,
        layer: usize,
        tile: TileCoord,
        id: Option<TileId>,
    ) -> Result<(), AreaError> {
        self.edit_cell(layer, tile, id, AreaLayer::set_mask_tile)
    }

    fn edit_cell(
        &mut self,
        layer: usize,
        tile: TileCoord,
        id: Option<TileId>,
        edit: fn(&mut AreaLayer, TileCoord, Option<TileId>) -> bool,
    ) -> Result<(), AreaError> {
        self.grid.check(tile)?;
        if let Some(id) = id {
            self.registry.behaviors(id)?;
        }
        let target = self
            .layers
            .get_mut(layer)
            .ok_or(AreaError::UnknownLayer(layer))?;
        edit(target, tile, id);

        if self.grid.is_overridden(tile) {
            return Ok(());
        }
        self.reset_tile_behavior(tile)
    }

    // ===== movement =====

    /// Moves an actor that lives in this area.
    ///
    /// The actor is taken out of the area for the duration of the call, so it
    /// never collides with itself, and put back at the same position in the
    /// actor list.
    pub fn move_actor_by_id(
        &mut self,
        id: ObjectId,
        dx: f32,
        dy: f32,
    ) -> Result<MoveOutcome, AreaError> {
        let index = self
            .actors
            .iter()
            .position(|a| a.id == id)
            .ok_or(AreaError::UnknownActor(id))?;
        let mut actor = self.actors.remove(index);
        let props = MovementProperties::for_actor(&actor);
        let outcome = move_actor(self, &mut actor, dx, dy, &props);
        self.actors.insert(index, actor);
        Ok(outcome)
    }
}

fn cell_behaviors<'r>(
    layer: &AreaLayer,
    registry: &'r TileRegistry,
    tile: TileCoord,
) -> Result<Option<&'r BehaviorRecord>, AreaError> {
    match layer.effective_tile(tile) {
        Some(id) => registry.behaviors(id),
        None => Ok(None),
    }
}

/// Whether a ledge imported from the neighbor across `direction` outlives the
/// tile's last clearing layer, in load order (layer, then row-major tile).
///
/// `declared` is `None` when no layer authors the neighbor's backface, i.e. it
/// comes from an override; those always apply.
fn survives_clear(declared: Option<usize>, last_clear: Option<usize>, direction: Direction) -> bool {
    let (Some(declared), Some(cleared)) = (declared, last_clear) else {
        return true;
    };
    let neighbor_merges_later = matches!(direction, Direction::Down | Direction::Right);
    declared > cleared || (declared == cleared && neighbor_merges_later)
}

fn build_grid(
    width: u32,
    height: u32,
    layers: &[AreaLayer],
    registry: &TileRegistry,
) -> Result<BehaviorGrid, AreaError> {
    let mut grid = BehaviorGrid::new(width, height);
    for layer in layers {
        for tile in grid.tiles() {
            if let Some(behaviors) = cell_behaviors(layer, registry, tile)? {
                apply_tile_to_behavior_grid(&mut grid, tile, behaviors, layer.is_foreground())?;
            }
        }
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::LayerPriority;
    use crate::behavior::Ledges;
    use crate::env::{Prop, TileDefinition};
    use crate::state::Rect;

    const FLOOR: TileId = TileId(1);
    const PIT: TileId = TileId(2);
    const WALL: TileId = TileId(3);
    const RUG: TileId = TileId(4);
    const CLIFF: TileId = TileId(5);

    fn registry() -> Arc<TileRegistry> {
        Arc::new(TileRegistry::from_definitions([
            TileDefinition::new(FLOOR, "floor", Some(BehaviorRecord::ground())),
            TileDefinition::new(PIT, "pit", Some(BehaviorRecord::pit())),
            TileDefinition::new(WALL, "wall", Some(BehaviorRecord::solid())),
            TileDefinition::new(RUG, "rug", None),
            TileDefinition::new(
                CLIFF,
                "cliff_base",
                Some(BehaviorRecord::ground().with_ledges(Ledges::backface(Direction::Up))),
            ),
        ]))
    }

    fn area(layers: Vec<AreaLayer>) -> AreaInstance {
        AreaInstance::new(3, 3, layers, registry()).unwrap()
    }

    #[test]
    fn layers_must_match_area_size() {
        let layer = AreaLayer::new("floor", LayerPriority::Background, 2, 3);
        let err = AreaInstance::new(3, 3, vec![layer], registry()).err().unwrap();
        assert!(matches!(err, AreaError::LayerSizeMismatch { .. }));
    }

    #[test]
    fn unknown_tiles_are_rejected_on_load() {
        let layer = AreaLayer::filled("floor", LayerPriority::Background, 3, 3, TileId(42));
        let err = AreaInstance::new(3, 3, vec![layer], registry()).err().unwrap();
        assert_eq!(err, AreaError::UnknownTile(42));
    }

    #[test]
    fn foreground_walls_do_not_collide() {
        let floor = AreaLayer::filled("floor", LayerPriority::Background, 3, 3, FLOOR);
        let roof = AreaLayer::filled("roof", LayerPriority::Foreground, 3, 3, WALL);
        let area = area(vec![floor, roof]);
        assert!(!area.grid().record(TileCoord::new(1, 1)).unwrap().is_solid());
    }

    #[test]
    fn reset_restores_authored_state_after_override() {
        let floor = AreaLayer::filled("floor", LayerPriority::Background, 3, 3, FLOOR);
        let mut area = area(vec![floor]);
        let tile = TileCoord::new(1, 1);

        area.override_tile_behavior(tile, BehaviorRecord::solid()).unwrap();
        assert!(area.grid().is_overridden(tile));
        assert!(area.grid().record(tile).unwrap().is_solid());

        area.reset_tile_behavior(tile).unwrap();
        assert!(!area.grid().is_overridden(tile));
        assert_eq!(area.grid().record(tile), Some(&BehaviorRecord::ground()));
    }

    #[test]
    fn set_layer_tile_patches_one_cell() {
        let floor = AreaLayer::filled("floor", LayerPriority::Background, 3, 3, FLOOR);
        let mut area = area(vec![floor]);
        let tile = TileCoord::new(2, 0);
        let before = area.grid().generation(TileCoord::new(0, 0));

        area.set_layer_tile(0, tile, Some(PIT)).unwrap();

        assert!(area.grid().record(tile).unwrap().pit.is_all());
        assert_eq!(area.grid().generation(TileCoord::new(0, 0)), before);
        assert_eq!(
            area.set_layer_tile(4, tile, None),
            Err(AreaError::UnknownLayer(4))
        );
        assert_eq!(
            area.set_layer_tile(0, tile, Some(TileId(99))),
            Err(AreaError::UnknownTile(99))
        );
    }

    #[test]
    fn decoration_over_pit_keeps_pit() {
        let pits = AreaLayer::filled("pits", LayerPriority::Background, 3, 3, PIT);
        let rugs = AreaLayer::filled("rugs", LayerPriority::Background, 3, 3, RUG);
        let mut area = area(vec![pits, rugs]);
        let tile = TileCoord::new(0, 0);
        assert!(area.grid().record(tile).unwrap().pit.is_all());

        area.set_layer_tile(1, tile, Some(FLOOR)).unwrap();
        assert!(area.grid().record(tile).unwrap().pit.is_absent());
    }

    #[test]
    fn mask_tile_replaces_cell_behavior() {
        let walls = AreaLayer::filled("walls", LayerPriority::Background, 3, 3, WALL);
        let mut area = area(vec![walls]);
        let tile = TileCoord::new(1, 0);

        area.set_mask_tile(0, tile, Some(FLOOR)).unwrap();
        assert!(!area.grid().record(tile).unwrap().is_solid());

        area.set_mask_tile(0, tile, None).unwrap();
        assert!(area.grid().record(tile).unwrap().is_solid());
    }

    #[test]
    fn reset_moves_neighbor_ledges_with_the_tile() {
        let floor = AreaLayer::filled("floor", LayerPriority::Background, 3, 3, FLOOR);
        let mut area = area(vec![floor]);
        let base = TileCoord::new(1, 2);
        let top = TileCoord::new(1, 1);

        area.set_layer_tile(0, base, Some(CLIFF)).unwrap();
        assert!(area.grid().record(top).unwrap().ledges.has(Direction::Down));

        area.set_layer_tile(0, base, Some(FLOOR)).unwrap();
        assert!(!area.grid().record(top).unwrap().ledges.has(Direction::Down));
    }

    #[test]
    fn reset_reimports_ledges_from_neighbors() {
        let mut floor = AreaLayer::filled("floor", LayerPriority::Background, 3, 3, FLOOR);
        floor.set_tile(TileCoord::new(1, 2), Some(CLIFF));
        let mut area = area(vec![floor]);
        let top = TileCoord::new(1, 1);
        assert!(area.grid().record(top).unwrap().ledges.has(Direction::Down));

        area.reset_tile_behavior(top).unwrap();
        assert!(area.grid().record(top).unwrap().ledges.has(Direction::Down));
    }

    #[test]
    fn reset_of_an_untouched_tile_matches_load() {
        let top = TileCoord::new(0, 0);
        let base = TileCoord::new(0, 1);
        let mut cliffs = AreaLayer::new("cliffs", LayerPriority::Background, 3, 3);
        cliffs.set_tile(base, Some(CLIFF));
        let mut floor = AreaLayer::new("floor", LayerPriority::Background, 3, 3);
        floor.set_tile(top, Some(FLOOR));

        // floor merged after the cliff wipes the imported ledge
        let mut wiped = area(vec![cliffs.clone(), floor.clone()]);
        let loaded = wiped.grid().record(top).cloned();
        assert!(loaded.as_ref().is_some_and(|r| !r.ledges.has(Direction::Down)));

        wiped.reset_tile_behavior(top).unwrap();
        assert_eq!(wiped.grid().record(top).cloned(), loaded);
        wiped.reset_tile_behavior(base).unwrap();
        assert_eq!(wiped.grid().record(top).cloned(), loaded);

        // cliff merged last keeps it
        let mut kept = area(vec![floor, cliffs]);
        assert!(kept.grid().record(top).unwrap().ledges.has(Direction::Down));
        kept.reset_tile_behavior(top).unwrap();
        assert!(kept.grid().record(top).unwrap().ledges.has(Direction::Down));
        kept.reset_tile_behavior(base).unwrap();
        assert!(kept.grid().record(top).unwrap().ledges.has(Direction::Down));
    }

    #[test]
    fn overridden_tiles_keep_their_override_on_edit() {
        let floor = AreaLayer::filled("floor", LayerPriority::Background, 3, 3, FLOOR);
        let mut area = area(vec![floor]);
        let tile = TileCoord::new(0, 0);
        area.override_tile_behavior(tile, BehaviorRecord::climbable()).unwrap();

        area.set_layer_tile(0, tile, Some(WALL)).unwrap();
        assert!(area.grid().record(tile).unwrap().climbable);

        area.reset_tile_behavior(tile).unwrap();
        assert!(area.grid().record(tile).unwrap().is_solid());
    }

    #[test]
    fn bodies_cover_objects_effects_and_actors() {
        let floor = AreaLayer::filled("floor", LayerPriority::Background, 3, 3, FLOOR);
        let mut area = area(vec![floor]);
        let rect = Rect::new(0.0, 0.0, 8.0, 8.0);
        area.add_object(Box::new(Prop::new(ObjectId(1), rect, BehaviorRecord::solid())));
        area.add_effect(Box::new(Prop::new(ObjectId(2), rect, BehaviorRecord::water())));
        area.add_actor(Actor::new(ObjectId(3), 0.0, 0.0, rect));

        let ids: Vec<_> = area.bodies().map(|b| b.id()).collect();
        assert_eq!(ids, vec![ObjectId(1), ObjectId(2), ObjectId(3)]);
        assert!(area.body_mut(ObjectId(3)).is_some());
        assert!(area.remove_object(ObjectId(2)).is_some());
        assert!(area.body(ObjectId(2)).is_none());
    }

    #[test]
    fn layer_behaviors_reads_one_cell() {
        let mut floor = AreaLayer::filled("floor", LayerPriority::Background, 3, 3, FLOOR);
        floor.set_mask_tile(TileCoord::new(2, 2), Some(PIT));
        let area = area(vec![floor]);

        assert_eq!(
            area.layer_behaviors(0, TileCoord::new(0, 0)),
            Ok(Some(&BehaviorRecord::ground()))
        );
        assert_eq!(
            area.layer_behaviors(0, TileCoord::new(2, 2)),
            Ok(Some(&BehaviorRecord::pit()))
        );
        assert_eq!(
            area.layer_behaviors(1, TileCoord::new(0, 0)),
            Err(AreaError::UnknownLayer(1))
        );
    }

    #[test]
    fn actors_can_be_edited_and_removed() {
        let floor = AreaLayer::filled("floor", LayerPriority::Background, 3, 3, FLOOR);
        let mut area = area(vec![floor]);
        area.add_actor(Actor::new(ObjectId(3), 0.0, 0.0, Rect::new(0.0, 0.0, 8.0, 8.0)));

        area.actor_mut(ObjectId(3)).unwrap().x = 12.0;
        assert_eq!(area.actor(ObjectId(3)).map(|a| a.x), Some(12.0));

        let removed = area.remove_actor(ObjectId(3)).unwrap();
        assert_eq!(removed.x, 12.0);
        assert!(area.actors().is_empty());
        assert!(area.remove_actor(ObjectId(3)).is_none());
        assert!(area.actor_mut(ObjectId(3)).is_none());
    }

    #[test]
    fn moving_an_unknown_actor_is_an_error() {
        let floor = AreaLayer::filled("floor", LayerPriority::Background, 3, 3, FLOOR);
        let mut area = area(vec![floor]);
        assert_eq!(
            area.move_actor_by_id(ObjectId(5), 1.0, 0.0),
            Err(AreaError::UnknownActor(ObjectId(5)))
        );
    }
}
