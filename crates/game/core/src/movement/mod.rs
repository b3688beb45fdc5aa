//! Actor movement resolution.
//!
//! [`move_actor`] turns a requested displacement into single-pixel axis steps
//! and resolves each one against the composite collision map. The pieces:
//!
//! - [`properties`]: the per-call rules (what terrain may be entered)
//! - [`primitives`]: the pure per-step obstacle test
//! - [`ledge`]: the post-step ledge trigger that starts a fall
//! - [`resolver`]: the stepping loop, pushing, wiggling and climbing
pub mod ledge;
pub mod primitives;
pub mod properties;
pub mod resolver;

pub use ledge::{ledge_jump_direction, trigger_ledge_jump};
pub use primitives::{StepCheck, StepRules, check_step, pixel_blocks};
pub use properties::MovementProperties;
pub use resolver::{
    MoveOutcome, can_actor_move, move_actor, move_actor_in_direction, open_directions,
};
