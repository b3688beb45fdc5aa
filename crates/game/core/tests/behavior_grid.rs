use std::sync::Arc;

use area_core::{
    Actor, ActorAction, ActorCapabilities, AreaInstance, AreaLayer, BehaviorRecord, Direction,
    LayerPriority, Ledges, MovementProperties, ObjectId, PixelPoint, Prop, Rect, TileCoord,
    TileDefinition, TileId, TileRegistry, get_composite_behaviors, move_actor,
};

const PIT: TileId = TileId(1);
const RUG: TileId = TileId(2);
const FLOOR: TileId = TileId(3);
const CLIFF_BASE: TileId = TileId(4);
const WATER: TileId = TileId(5);
const ICE: TileId = TileId(6);

fn registry() -> Arc<TileRegistry> {
    Arc::new(TileRegistry::from_definitions([
        TileDefinition::new(PIT, "pit", Some(BehaviorRecord::pit())),
        TileDefinition::new(RUG, "rug", Some(BehaviorRecord::default())),
        TileDefinition::new(FLOOR, "floor", Some(BehaviorRecord::ground())),
        TileDefinition::new(
            CLIFF_BASE,
            "cliff_base",
            Some(BehaviorRecord::ground().with_ledges(Ledges::backface(Direction::Up))),
        ),
        TileDefinition::new(WATER, "water", Some(BehaviorRecord::water())),
        TileDefinition::new(
            ICE,
            "ice",
            Some(BehaviorRecord {
                is_frozen: true,
                slippery: true,
                ..BehaviorRecord::ground()
            }),
        ),
    ]))
}

fn layer(key: &str, tiles: &[(i32, i32, TileId)]) -> AreaLayer {
    let mut layer = AreaLayer::new(key, LayerPriority::Background, 8, 8);
    for &(x, y, id) in tiles {
        layer.set_tile(TileCoord::new(x, y), Some(id));
    }
    layer
}

fn load(layers: Vec<AreaLayer>) -> AreaInstance {
    AreaInstance::new(8, 8, layers, registry()).expect("fixture area should load")
}

#[test]
fn decoration_does_not_cover_a_pit() {
    let area = load(vec![
        layer("pits", &[(2, 2, PIT)]),
        layer("decor", &[(2, 2, RUG)]),
    ]);
    let point = PixelPoint::new(2 * 16 + 5, 2 * 16 + 5);
    assert!(get_composite_behaviors(&area, point, None, None).is_pit());
}

#[test]
fn ground_layer_covers_a_pit() {
    let area = load(vec![
        layer("pits", &[(2, 2, PIT)]),
        layer("decor", &[(2, 2, FLOOR)]),
    ]);
    let point = PixelPoint::new(2 * 16 + 5, 2 * 16 + 5);
    let behavior = get_composite_behaviors(&area, point, None, None);
    assert!(!behavior.is_pit());
    assert_eq!(behavior.is_ground, Some(true));
}

#[test]
fn cliff_base_gives_the_tile_above_a_ledge() {
    let area = load(vec![layer("ground", &[(3, 3, FLOOR), (3, 4, CLIFF_BASE)])]);
    let top = area.grid().record(TileCoord::new(3, 3)).expect("in bounds");
    let base = area.grid().record(TileCoord::new(3, 4)).expect("in bounds");
    assert!(top.ledges.has(Direction::Down));
    assert!(!base.ledges.has(Direction::Up));
}

#[test]
fn hero_jumps_off_an_authored_cliff() {
    let mut area = load(vec![layer("ground", &[(3, 3, FLOOR), (3, 4, CLIFF_BASE)])]);
    let mut hero = Actor::new(ObjectId::HERO, 48.0, 40.0, Rect::new(0.0, 0.0, 16.0, 16.0))
        .with_capabilities(ActorCapabilities::hero());
    let props = MovementProperties::for_actor(&hero);

    move_actor(&mut area, &mut hero, 0.0, 20.0, &props);

    assert_eq!(hero.action, ActorAction::JumpingDown);
    assert!(hero.z >= 1.0);
}

#[test]
fn freezing_water_patches_only_that_tile() {
    let mut area = load(vec![
        layer("ground", &[(1, 1, WATER), (2, 1, WATER)]),
        layer("overlay", &[]),
    ]);
    let frozen = TileCoord::new(1, 1);
    let untouched = TileCoord::new(2, 1);
    let untouched_generation = area.grid().generation(untouched);

    area.set_layer_tile(1, frozen, Some(ICE)).expect("ice is registered");
    let record = area.grid().record(frozen).expect("in bounds");
    assert!(!record.water);
    assert!(record.is_frozen && record.slippery);
    assert_eq!(area.grid().generation(untouched), untouched_generation);

    area.set_layer_tile(1, frozen, None).expect("clearing a cell");
    assert!(area.grid().record(frozen).expect("in bounds").water);
}

#[test]
fn bridge_over_a_pit_is_walkable_until_removed() {
    let mut area = load(vec![layer("pits", &[(2, 1, PIT), (2, 2, PIT)])]);
    area.add_object(Box::new(Prop::new(
        ObjectId(60),
        Rect::new(32.0, 16.0, 16.0, 32.0),
        BehaviorRecord::ground().with_ground_height(1),
    )));
    let mut walker = Actor::new(ObjectId(21), 8.0, 24.0, Rect::new(0.0, 0.0, 8.0, 8.0));
    let props = MovementProperties::for_actor(&walker);

    assert_eq!(move_actor(&mut area, &mut walker, 30.0, 0.0, &props).mx, 30.0);

    area.remove_object(ObjectId(60));
    let mut second = Actor::new(ObjectId(22), 8.0, 24.0, Rect::new(0.0, 0.0, 8.0, 8.0));
    assert_eq!(move_actor(&mut area, &mut second, 30.0, 0.0, &props).mx, 16.0);
}

#[test]
fn neighboring_area_answers_at_the_seam() {
    let west = load(vec![layer("ground", &[])]);
    let east = load(vec![layer("ground", &[(0, 0, PIT)])]).with_origin(PixelPoint::new(128, 0));

    let across = PixelPoint::new(130, 4);
    assert!(get_composite_behaviors(&west, across, Some(&east), None).is_pit());
    assert!(get_composite_behaviors(&west, across, None, None).is_solid());
}
