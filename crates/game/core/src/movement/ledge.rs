use crate::area::{AreaEvent, AreaInstance};
use crate::collision::get_tile_behaviors_and_obstacles;
use crate::state::{Actor, ActorCapabilities, Direction};

use super::primitives::leading_midpoint;

/// Direction of the ledge the actor just stepped over, if any.
///
/// Probes the middle of the leading edge after a step in `direction`. Actors
/// that cannot jump off ledges, are climbing, or already jumped during this
/// resolution never trigger.
pub fn ledge_jump_direction(
    area: &AreaInstance,
    actor: &Actor,
    direction: Direction,
) -> Option<Direction> {
    if !actor.can(ActorCapabilities::CAN_JUMP_OFF_LEDGES)
        || actor.is_climbing()
        || actor.ignore_ledges
    {
        return None;
    }
    let midpoint = leading_midpoint(actor, direction);
    let query = get_tile_behaviors_and_obstacles(
        area,
        midpoint,
        &[actor.id],
        None,
        None,
        Some(direction),
    );
    query.behavior.ledges.has(direction).then_some(direction)
}

/// Starts a fall if the last step crossed a ledge. Returns `true` when the
/// actor is now jumping down.
pub fn trigger_ledge_jump(area: &mut AreaInstance, actor: &mut Actor, direction: Direction) -> bool {
    let Some(ledge) = ledge_jump_direction(area, actor, direction) else {
        return false;
    };

    let dropped = actor.begin_jump_down(ledge, area.config());
    if let Some(object) = dropped {
        area.emit(AreaEvent::CarriedObjectDropped {
            actor: actor.id,
            object,
        });
    }
    area.emit(AreaEvent::FallCue { actor: actor.id });
    area.emit(AreaEvent::LedgeJump {
        actor: actor.id,
        direction: ledge,
    });

    tracing::debug!(
        actor = %actor.id,
        direction = %ledge,
        wreckless = actor.wreckless_jump,
        "actor jumped off ledge"
    );
    true
}
