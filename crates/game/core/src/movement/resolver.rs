use arrayvec::ArrayVec;

use crate::area::{AreaEvent, AreaInstance};
use crate::config::MotionConfig;
use crate::env::Push;
use crate::error::{InvariantViolation, report_invariant};
use crate::state::{Actor, Direction, ObjectId};

use super::MovementProperties;
use super::ledge::trigger_ledge_jump;
use super::primitives::{
    StepCheck, StepRules, check_step, enters_new_pixel, increases_violation,
};

/// Displacement achieved by [`move_actor`].
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct MoveOutcome {
    pub mx: f32,
    pub my: f32,
    /// Resolver passes used; never more than
    /// [`MotionConfig::MAX_RESOLVE_ITERATIONS`].
    pub iterations: u32,
}

impl MoveOutcome {
    pub fn is_still(&self) -> bool {
        self.mx == 0.0 && self.my == 0.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StepOutcome {
    Moved,
    /// Slid one pixel sideways around a corner instead of moving.
    Wiggled(Direction),
    Blocked,
}

/// Moves `actor` by up to `(dx, dy)` pixels, stopping at whatever refuses it.
///
/// Each pass advances at most one pixel per axis, alternating which axis goes
/// first, until neither axis makes progress or nothing remains. Refused
/// movement is the normal outcome of an obstacle, not an error.
pub fn move_actor(
    area: &mut AreaInstance,
    actor: &mut Actor,
    dx: f32,
    dy: f32,
    props: &MovementProperties,
) -> MoveOutcome {
    actor.ignore_ledges = false;

    let mut outcome = MoveOutcome::default();
    let (mut sx, mut sy) = (dx, dy);
    let dominant = Direction::dominant(dx, dy);
    let mut horizontal_first = true;

    while sx != 0.0 || sy != 0.0 {
        if outcome.iterations >= MotionConfig::MAX_RESOLVE_ITERATIONS {
            report_invariant(InvariantViolation::IterationCapExceeded {
                actor: actor.id,
                iterations: outcome.iterations,
            });
            break;
        }
        outcome.iterations += 1;

        let mut progressed = false;
        for horizontal in [horizontal_first, !horizontal_first] {
            let (remaining, cross) = if horizontal {
                (&mut sx, dy)
            } else {
                (&mut sy, dx)
            };
            if *remaining == 0.0 {
                continue;
            }

            let amount = remaining.abs().min(1.0);
            let direction = if horizontal {
                Direction::horizontal(*remaining)
            } else {
                Direction::vertical(*remaining)
            };
            let can_push = props.can_push && dominant == Some(direction);
            let can_wiggle = props.can_wiggle && cross == 0.0;

            match step(area, actor, amount, direction, props, can_push, can_wiggle) {
                StepOutcome::Moved => {
                    *remaining -= amount.copysign(*remaining);
                    let (ux, uy) = direction.delta();
                    outcome.mx += ux as f32 * amount;
                    outcome.my += uy as f32 * amount;
                    progressed = true;
                }
                StepOutcome::Wiggled(slide) => {
                    let (ux, uy) = slide.delta();
                    outcome.mx += ux as f32;
                    outcome.my += uy as f32;
                    progressed = true;
                }
                StepOutcome::Blocked => {}
            }
        }

        horizontal_first = !horizontal_first;
        if !progressed {
            break;
        }
    }

    outcome
}

/// Attempts a single step of at most one pixel. Returns whether the actor
/// moved at all (a corner wiggle counts).
pub fn move_actor_in_direction(
    area: &mut AreaInstance,
    actor: &mut Actor,
    amount: f32,
    direction: Direction,
    props: &MovementProperties,
) -> bool {
    let outcome = step(
        area,
        actor,
        amount,
        direction,
        props,
        props.can_push,
        props.can_wiggle,
    );
    outcome != StepOutcome::Blocked
}

fn step(
    area: &mut AreaInstance,
    actor: &mut Actor,
    amount: f32,
    direction: Direction,
    props: &MovementProperties,
    can_push: bool,
    can_wiggle: bool,
) -> StepOutcome {
    if actor.is_jumping_down() {
        return StepOutcome::Blocked;
    }
    if let Some(bounding_box) = &props.bounding_box {
        if increases_violation(&actor.movement_bounds(), bounding_box, amount, direction) {
            return StepOutcome::Blocked;
        }
    }

    let base = StepRules {
        can_wiggle,
        ..StepRules::from_props(props)
    };
    let (first, retry) = attempts(actor, direction, base);
    let mut check = check_step(area, actor, amount, direction, props, first);
    if check.is_clear() {
        if !direction.is_horizontal() && enters_new_pixel(actor, amount, direction) {
            actor.stop_climbing();
        }
    } else if let Some(retry) = retry {
        if check_step(area, actor, amount, direction, props, retry).is_clear() {
            actor.start_climbing();
            check = StepCheck::Clear;
        }
    }

    match check {
        StepCheck::Clear => {
            let (ux, uy) = direction.delta();
            actor.x += ux as f32 * amount;
            actor.y += uy as f32 * amount;
            trigger_ledge_jump(area, actor, direction);
            StepOutcome::Moved
        }
        StepCheck::Wiggle(slide) => {
            if step(area, actor, 1.0, slide, props, false, false) == StepOutcome::Moved {
                StepOutcome::Wiggled(slide)
            } else {
                StepOutcome::Blocked
            }
        }
        StepCheck::Blocked(blockers) => {
            if can_push {
                push_all(area, actor, &blockers, direction);
            }
            StepOutcome::Blocked
        }
    }
}

fn push_all(area: &mut AreaInstance, actor: &Actor, blockers: &[ObjectId], direction: Direction) {
    for &object in blockers {
        let Some(body) = area.body_mut(object) else {
            continue;
        };
        body.on_push(Push {
            pusher: actor.id,
            direction,
        });
        tracing::trace!(pusher = %actor.id, object = %object, direction = %direction, "push");
        area.emit(AreaEvent::ObjectPushed {
            pusher: actor.id,
            object,
            direction,
        });
    }
}

/// Whether any of the four directions is open right now. Nothing is moved
/// or pushed.
pub fn can_actor_move(area: &AreaInstance, actor: &Actor, props: &MovementProperties) -> bool {
    !open_directions(area, actor, props).is_empty()
}

/// The directions a one-pixel step would currently succeed in.
pub fn open_directions(
    area: &AreaInstance,
    actor: &Actor,
    props: &MovementProperties,
) -> ArrayVec<Direction, 4> {
    let mut open = ArrayVec::new();
    if actor.is_jumping_down() {
        return open;
    }
    for direction in Direction::ALL {
        if step_is_open(area, actor, direction, props) {
            open.push(direction);
        }
    }
    open
}

fn step_is_open(area: &AreaInstance, actor: &Actor, direction: Direction, props: &MovementProperties) -> bool {
    if let Some(bounding_box) = &props.bounding_box {
        if increases_violation(&actor.movement_bounds(), bounding_box, 1.0, direction) {
            return false;
        }
    }
    let base = StepRules {
        can_wiggle: false,
        ..StepRules::from_props(props)
    };
    let (first, retry) = attempts(actor, direction, base);
    check_step(area, actor, 1.0, direction, props, first).is_clear()
        || retry.is_some_and(|rules| check_step(area, actor, 1.0, direction, props, rules).is_clear())
}

/// Climbing rules for a step, plus the forced-climb retry for vertical steps.
///
/// Lateral steps keep a climber on climbable pixels and keep a walker off
/// them. Vertical steps first try to walk; only when that is refused and the
/// mover may climb do they retry as a climb.
fn attempts(actor: &Actor, direction: Direction, base: StepRules) -> (StepRules, Option<StepRules>) {
    if direction.is_horizontal() {
        let lateral = if actor.is_climbing() {
            StepRules {
                must_climb: true,
                ..base
            }
        } else {
            StepRules {
                can_climb: false,
                ..base
            }
        };
        return (lateral, None);
    }
    let walking = StepRules {
        can_climb: false,
        must_climb: false,
        ..base
    };
    let climbing = base.can_climb.then_some(StepRules {
        can_climb: true,
        must_climb: true,
        ..base
    });
    (walking, climbing)
}
