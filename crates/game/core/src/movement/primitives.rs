//! Single-pixel obstacle tests.
//!
//! A step only has to look at the pixels it newly enters: the column (or row)
//! of the movement hitbox that lies past the old leading edge. Sub-pixel steps
//! that keep the hitbox on the same integer pixels are always free.

use crate::area::AreaInstance;
use crate::behavior::BehaviorRecord;
use crate::collision::get_tile_behaviors_and_obstacles;
use crate::state::{Actor, Direction, ObjectId, PixelBounds, PixelPoint, Rect};

use super::MovementProperties;

/// Climbing and wiggle rules for one step, chosen by the resolver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepRules {
    pub can_climb: bool,
    pub must_climb: bool,
    pub can_wiggle: bool,
}

impl StepRules {
    pub fn from_props(props: &MovementProperties) -> Self {
        Self {
            can_climb: props.can_climb,
            must_climb: props.must_climb,
            can_wiggle: props.can_wiggle,
        }
    }
}

/// Verdict for one step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepCheck {
    Clear,
    /// The step is refused. Lists the solid bodies in the way.
    Blocked(Vec<ObjectId>),
    /// The step is refused, but the obstacle only clips a corner; sliding one
    /// pixel this way would round it.
    Wiggle(Direction),
}

impl StepCheck {
    pub fn is_clear(&self) -> bool {
        matches!(self, StepCheck::Clear)
    }
}

/// Tests a step of `amount` (at most one pixel) in `direction` without
/// changing anything.
pub fn check_step(
    area: &AreaInstance,
    actor: &Actor,
    amount: f32,
    direction: Direction,
    props: &MovementProperties,
    rules: StepRules,
) -> StepCheck {
    if !enters_new_pixel(actor, amount, direction) {
        return StepCheck::Clear;
    }
    let (dx, dy) = direction.delta();
    let after = actor
        .movement_bounds()
        .translated(dx as f32 * amount, dy as f32 * amount)
        .pixel_bounds();

    let mut any_climbable = false;
    let mut blocked: Vec<usize> = Vec::new();
    let mut blockers: Vec<ObjectId> = Vec::new();

    for (index, point) in after.edge(direction).enumerate() {
        let query = get_tile_behaviors_and_obstacles(
            area,
            point,
            &props.excluded,
            None,
            None,
            Some(direction),
        );
        any_climbable |= query.behavior.climbable;

        if !rules.can_climb && query.behavior.climbable {
            return StepCheck::Blocked(Vec::new());
        }
        if pixel_blocks(&query.behavior, direction, props) {
            blocked.push(index);
        }

        for object in &query.objects {
            let solid = object
                .behaviors()
                .is_some_and(|b| b.is_solid() && !crushable(b, props));
            if solid && !blockers.contains(&object.id()) {
                blockers.push(object.id());
            }
        }
    }

    if rules.must_climb && !any_climbable {
        return StepCheck::Blocked(Vec::new());
    }
    if blocked.is_empty() {
        return StepCheck::Clear;
    }

    if rules.can_wiggle {
        let tolerance = usize::from(area.config().wiggle_tolerance);
        let edge_len = if direction.is_horizontal() {
            after.height
        } else {
            after.width
        };
        if let Some((slide, need)) =
            wiggle_direction(&blocked, edge_len as usize, tolerance, direction)
        {
            // the pixels the edge slides onto must be open too, or the actor
            // just bounces between two obstacles
            let need = need as i32;
            let mut beyond = if slide == Direction::Down || slide == Direction::Right {
                edge_len..edge_len + need
            } else {
                -need..0
            };
            let fits = beyond.all(|index| {
                let query = get_tile_behaviors_and_obstacles(
                    area,
                    edge_point(&after, direction, index),
                    &props.excluded,
                    None,
                    None,
                    Some(direction),
                );
                !pixel_blocks(&query.behavior, direction, props)
            });
            if fits {
                return StepCheck::Wiggle(slide);
            }
        }
    }
    StepCheck::Blocked(blockers)
}

/// Whether one composite pixel refuses entry.
pub fn pixel_blocks(
    behavior: &BehaviorRecord,
    direction: Direction,
    props: &MovementProperties,
) -> bool {
    if behavior.is_solid() && !crushable(behavior, props) {
        return true;
    }
    if behavior.is_pit() && !props.can_fall {
        return true;
    }
    if behavior.is_lava() && !props.can_move_in_lava {
        return true;
    }
    if behavior.water && !props.can_swim {
        return true;
    }
    // a ledge pointing back at the mover is a cliff face
    if behavior.ledges.has(direction.opposite()) {
        return true;
    }
    behavior.ledges.has(direction) && !props.can_cross_ledges
}

fn crushable(behavior: &BehaviorRecord, props: &MovementProperties) -> bool {
    behavior
        .crush_weight
        .is_some_and(|weight| props.crushing_power > weight)
}

/// Pixel `index` along the leading edge of `bounds`, which may lie past
/// either end of the edge.
fn edge_point(bounds: &PixelBounds, direction: Direction, index: i32) -> PixelPoint {
    match direction {
        Direction::Left => PixelPoint::new(bounds.left, bounds.top + index),
        Direction::Right => PixelPoint::new(bounds.right(), bounds.top + index),
        Direction::Up => PixelPoint::new(bounds.left + index, bounds.top),
        Direction::Down => PixelPoint::new(bounds.left + index, bounds.bottom()),
    }
}

/// Perpendicular slide for an obstacle confined to one end of the edge,
/// with the number of pixels the edge must move to clear it.
///
/// `blocked` holds ascending edge indices; index 0 is the top (for
/// horizontal steps) or left (for vertical steps) end.
fn wiggle_direction(
    blocked: &[usize],
    edge_len: usize,
    tolerance: usize,
    direction: Direction,
) -> Option<(Direction, usize)> {
    let (&first, &last) = (blocked.first()?, blocked.last()?);
    if tolerance == 0 || edge_len <= tolerance {
        return None;
    }
    let (toward_start, toward_end) = if direction.is_horizontal() {
        (Direction::Up, Direction::Down)
    } else {
        (Direction::Left, Direction::Right)
    };
    if last < tolerance {
        Some((toward_end, last + 1))
    } else if first >= edge_len - tolerance {
        Some((toward_start, edge_len - first))
    } else {
        None
    }
}

/// How far the hitbox sticks out of `bounding_box` on the side facing
/// `direction`.
pub fn bounding_box_violation(bounds: &Rect, bounding_box: &Rect, direction: Direction) -> f32 {
    let overshoot = match direction {
        Direction::Left => bounding_box.left() - bounds.left(),
        Direction::Right => bounds.right() - bounding_box.right(),
        Direction::Up => bounding_box.top() - bounds.top(),
        Direction::Down => bounds.bottom() - bounding_box.bottom(),
    };
    overshoot.max(0.0)
}

/// A step is refused only when it makes an existing violation worse.
pub fn increases_violation(
    bounds: &Rect,
    bounding_box: &Rect,
    amount: f32,
    direction: Direction,
) -> bool {
    let (dx, dy) = direction.delta();
    let moved = bounds.translated(dx as f32 * amount, dy as f32 * amount);
    bounding_box_violation(&moved, bounding_box, direction)
        > bounding_box_violation(bounds, bounding_box, direction)
}

/// Whether a step of `amount` moves the hitbox onto new integer pixels.
pub fn enters_new_pixel(actor: &Actor, amount: f32, direction: Direction) -> bool {
    let bounds = actor.movement_bounds();
    let (dx, dy) = direction.delta();
    let moved = bounds.translated(dx as f32 * amount, dy as f32 * amount);
    moved.pixel_bounds() != bounds.pixel_bounds()
}

/// Leading-edge midpoint after a step, used by the ledge trigger.
pub fn leading_midpoint(actor: &Actor, direction: Direction) -> PixelPoint {
    actor.movement_bounds().pixel_bounds().edge_midpoint(direction)
}
