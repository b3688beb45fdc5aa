use crate::area::AreaInstance;
use crate::behavior::BehaviorRecord;
use crate::config::MotionConfig;
use crate::env::AreaObject;
use crate::error::{InvariantViolation, report_invariant};
use crate::state::{Direction, Directions, ObjectId, PixelPoint, TileCoord};

use super::stack::BehaviorStack;

/// Optional predicate deciding which bodies take part in a query.
pub type ObjectFilter<'f> = &'f dyn Fn(&dyn AreaObject) -> bool;

/// Result of [`get_tile_behaviors_and_obstacles`].
pub struct TileQuery<'a> {
    /// Pixel-resolved composite, with ledges trimmed to the query pixel.
    pub behavior: BehaviorRecord,
    /// Tile the pixel resolved to, in the coordinates of the area that
    /// answered (the neighbor area for out-of-bounds points).
    pub tile: TileCoord,
    /// Bodies whose hitbox covers the pixel and that contributed behaviors.
    pub objects: Vec<&'a dyn AreaObject>,
}

impl TileQuery<'_> {
    pub fn object_ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects.iter().map(|object| object.id())
    }
}

struct Resolved<'a> {
    area: &'a AreaInstance,
    point: PixelPoint,
    query: TileQuery<'a>,
}

/// Composite behaviors at one pixel of `area`.
///
/// Bitmap fields come back as `All` or `Absent`. Points outside the area are
/// answered by `next_area` when it covers them, otherwise they are solid.
pub fn get_composite_behaviors(
    area: &AreaInstance,
    point: PixelPoint,
    next_area: Option<&AreaInstance>,
    ignore_object: Option<ObjectId>,
) -> BehaviorRecord {
    compose(area, point, ignore_object.as_slice(), next_area, None)
        .query
        .behavior
}

/// Composite behaviors at one pixel plus the bodies that produced them.
///
/// A tile's ledge flags only apply on its boundary row or column facing that
/// direction. When `direction` is given and the pixel sits on the boundary the
/// mover just crossed, the tile being left is inspected too, so a ledge is
/// seen from both sides of the edge.
pub fn get_tile_behaviors_and_obstacles<'a>(
    area: &'a AreaInstance,
    point: PixelPoint,
    excluded: &[ObjectId],
    next_area: Option<&'a AreaInstance>,
    object_filter: Option<ObjectFilter<'_>>,
    direction: Option<Direction>,
) -> TileQuery<'a> {
    let Resolved {
        area,
        point,
        mut query,
    } = compose(area, point, excluded, next_area, object_filter);

    let (ox, oy) = point.sub_tile();
    let mut edges = trim_ledges(query.behavior.ledges.edges, ox, oy);
    if let Some(direction) = direction {
        if exited_tile_has_ledge(area, query.tile, ox, oy, direction) {
            edges.insert(direction.flag());
        }
    }
    query.behavior.ledges.edges = edges;
    query
}

fn compose<'a>(
    area: &'a AreaInstance,
    point: PixelPoint,
    excluded: &[ObjectId],
    next_area: Option<&'a AreaInstance>,
    object_filter: Option<ObjectFilter<'_>>,
) -> Resolved<'a> {
    if !area.contains_pixel(point) {
        if let Some(next) = next_area {
            let local = next.to_local(area.to_world(point));
            if next.contains_pixel(local) {
                return compose(next, local, excluded, None, object_filter);
            }
        }
        return Resolved {
            area,
            point,
            query: TileQuery {
                behavior: BehaviorRecord::solid(),
                tile: point.tile(),
                objects: Vec::new(),
            },
        };
    }

    let tile = point.tile();
    let (ox, oy) = point.sub_tile();
    let base = area
        .grid()
        .record(tile)
        .map(|record| record.at_pixel(ox, oy))
        .unwrap_or_default();

    let mut stack = BehaviorStack::new(base);
    let mut objects = Vec::new();
    for body in area.bodies() {
        if excluded.contains(&body.id()) {
            continue;
        }
        if object_filter.is_some_and(|keep| !keep(body)) {
            continue;
        }
        let Some(behaviors) = body.behaviors() else {
            continue;
        };
        let Some(hitbox) = body.hitbox() else {
            report_invariant(InvariantViolation::MissingHitbox { object: body.id() });
            continue;
        };
        if !hitbox.contains_pixel(point) {
            continue;
        }
        // object masks are laid out from the object's own top-left corner
        let local = point.offset(-(hitbox.x.floor() as i32), -(hitbox.y.floor() as i32));
        let (lx, ly) = local.sub_tile();
        stack.push(&behaviors.at_pixel(lx, ly));
        objects.push(body);
    }

    Resolved {
        area,
        point,
        query: TileQuery {
            behavior: stack.finish(),
            tile,
            objects,
        },
    }
}

/// Keeps only the ledge flags whose edge the sub-tile offset lies on.
fn trim_ledges(edges: Directions, ox: u8, oy: u8) -> Directions {
    let last = (MotionConfig::TILE_SIZE - 1) as u8;
    let mut trimmed = Directions::empty();
    for direction in edges.directions() {
        let on_edge = match direction {
            Direction::Up => oy == 0,
            Direction::Down => oy == last,
            Direction::Left => ox == 0,
            Direction::Right => ox == last,
        };
        if on_edge {
            trimmed.insert(direction.flag());
        }
    }
    trimmed
}

fn exited_tile_has_ledge(
    area: &AreaInstance,
    tile: TileCoord,
    ox: u8,
    oy: u8,
    direction: Direction,
) -> bool {
    let last = (MotionConfig::TILE_SIZE - 1) as u8;
    let on_entry_edge = match direction {
        Direction::Down => oy == 0,
        Direction::Up => oy == last,
        Direction::Right => ox == 0,
        Direction::Left => ox == last,
    };
    if !on_entry_edge {
        return false;
    }
    let exited = tile.neighbor(direction.opposite());
    area.grid()
        .record(exited)
        .is_some_and(|record| record.ledges.has(direction))
}
