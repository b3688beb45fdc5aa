//! Per-actor movement state.
//!
//! Only the fields the collision core reads or writes live here: position,
//! velocity, hitboxes, the current action and the capability flags that gate
//! which movement rules apply.
//!
//! The ledge/fall transition is a three-state cycle:
//!
//! ```text
//! grounded ──ledge crossed──▶ JumpingDown ──z reaches 0──▶ grounded (Idle)
//! ```
//!
//! It is entered only through [`Actor::begin_jump_down`] (called by the
//! resolver's ledge trigger) and left through [`Actor::land`].

use bitflags::bitflags;

use crate::behavior::BehaviorRecord;
use crate::config::MotionConfig;
use crate::env::AreaObject;

use super::{Direction, ObjectId, Rect};

/// What an actor is currently doing, as far as movement is concerned.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Default,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ActorAction {
    #[default]
    Idle,
    Walking,
    Climbing,
    Thrown,
    Knocked,
    KnockedHard,
    /// Mid fall-arc after crossing a ledge. Not steerable.
    JumpingDown,
}

impl ActorAction {
    /// States that carry momentum the actor did not choose.
    pub fn is_launched(self) -> bool {
        matches!(
            self,
            ActorAction::Thrown | ActorAction::Knocked | ActorAction::KnockedHard
        )
    }
}

bitflags! {
    /// Terrain an actor is allowed to enter.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ActorCapabilities: u8 {
        const CAN_FALL            = 1 << 0;
        const CAN_SWIM            = 1 << 1;
        const CAN_MOVE_IN_LAVA    = 1 << 2;
        const CAN_CLIMB           = 1 << 3;
        const CAN_JUMP_OFF_LEDGES = 1 << 4;
    }
}

impl ActorCapabilities {
    /// What the hero starts with.
    pub fn hero() -> Self {
        Self::CAN_FALL | Self::CAN_SWIM | Self::CAN_CLIMB | Self::CAN_JUMP_OFF_LEDGES
    }
}

/// A moving body in an area.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Actor {
    pub id: ObjectId,

    pub x: f32,
    pub y: f32,
    /// Height above the ground; positive while airborne.
    pub z: f32,
    pub vx: f32,
    pub vy: f32,
    pub vz: f32,

    /// Body relative to `(x, y)`.
    pub hitbox: Rect,
    /// Footprint used for terrain collision, relative to `(x, y)`.
    /// Falls back to `hitbox` when unset.
    pub movement_hitbox: Option<Rect>,

    pub action: ActorAction,
    pub capabilities: ActorCapabilities,
    pub crushing_power: u32,

    /// Suppresses the ledge trigger for the rest of the current resolution.
    pub ignore_ledges: bool,
    /// Launch came from a throw or knockback; the arc is not corrected.
    pub wreckless_jump: bool,
    pub carrying: Option<ObjectId>,

    /// Behaviors this actor projects onto others (e.g. a solid enemy).
    pub behaviors: Option<BehaviorRecord>,
}

impl Actor {
    pub fn new(id: ObjectId, x: f32, y: f32, hitbox: Rect) -> Self {
        Self {
            id,
            x,
            y,
            z: 0.0,
            vx: 0.0,
            vy: 0.0,
            vz: 0.0,
            hitbox,
            movement_hitbox: None,
            action: ActorAction::Idle,
            capabilities: ActorCapabilities::empty(),
            crushing_power: 0,
            ignore_ledges: false,
            wreckless_jump: false,
            carrying: None,
            behaviors: None,
        }
    }

    pub fn with_capabilities(mut self, capabilities: ActorCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_movement_hitbox(mut self, movement_hitbox: Rect) -> Self {
        self.movement_hitbox = Some(movement_hitbox);
        self
    }

    pub fn with_behaviors(mut self, behaviors: BehaviorRecord) -> Self {
        self.behaviors = Some(behaviors);
        self
    }

    pub fn can(&self, capability: ActorCapabilities) -> bool {
        self.capabilities.contains(capability)
    }

    /// Absolute hitbox in area pixels.
    pub fn bounds(&self) -> Rect {
        self.hitbox.translated(self.x, self.y)
    }

    /// Absolute footprint used by the movement resolver.
    pub fn movement_bounds(&self) -> Rect {
        self.movement_hitbox
            .unwrap_or(self.hitbox)
            .translated(self.x, self.y)
    }

    pub fn is_climbing(&self) -> bool {
        self.action == ActorAction::Climbing
    }

    pub fn is_jumping_down(&self) -> bool {
        self.action == ActorAction::JumpingDown
    }

    pub fn is_airborne(&self) -> bool {
        self.z > 0.0
    }

    pub fn start_climbing(&mut self) {
        self.action = ActorAction::Climbing;
    }

    pub fn stop_climbing(&mut self) {
        if self.is_climbing() {
            self.action = ActorAction::Idle;
        }
    }

    /// Enters the fall arc after crossing a ledge in `direction`.
    ///
    /// Launched actors keep their momentum and are flagged wreckless; anyone
    /// else gets a fresh arc toward the ledge. Returns the object that was
    /// being carried, which the caller must drop.
    pub fn begin_jump_down(
        &mut self,
        direction: Direction,
        config: &MotionConfig,
    ) -> Option<ObjectId> {
        if self.action.is_launched() {
            self.wreckless_jump = true;
        } else {
            let (dx, dy) = direction.delta();
            self.vx = dx as f32 * config.ledge_jump_speed;
            self.vy = dy as f32 * config.ledge_jump_speed;
            self.vz = config.ledge_jump_vz;
            self.wreckless_jump = false;
        }
        self.z = self.z.max(MotionConfig::MIN_AIRBORNE_Z);
        self.action = ActorAction::JumpingDown;
        self.ignore_ledges = true;
        self.carrying.take()
    }

    /// Integrates one frame of the fall arc. Returns `true` on the frame the
    /// actor lands.
    ///
    /// Horizontal velocity is integrated straight into the position here; the
    /// fall is not routed through the resolver, which refuses to steer a
    /// jumping actor.
    pub fn advance_fall_arc(&mut self, gravity: f32) -> bool {
        if !self.is_jumping_down() {
            return false;
        }
        self.x += self.vx;
        self.y += self.vy;
        self.z += self.vz;
        self.vz -= gravity;
        if self.z <= 0.0 {
            self.land();
            return true;
        }
        false
    }

    pub fn land(&mut self) {
        self.z = 0.0;
        self.vx = 0.0;
        self.vy = 0.0;
        self.vz = 0.0;
        self.wreckless_jump = false;
        self.action = ActorAction::Idle;
    }
}

impl AreaObject for Actor {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn hitbox(&self) -> Option<Rect> {
        Some(self.bounds())
    }

    fn behaviors(&self) -> Option<&BehaviorRecord> {
        self.behaviors.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walker() -> Actor {
        Actor::new(ObjectId(3), 32.0, 32.0, Rect::new(0.0, 0.0, 16.0, 16.0))
            .with_capabilities(ActorCapabilities::hero())
    }

    #[test]
    fn fresh_jump_aims_toward_the_ledge() {
        let config = MotionConfig::default();
        let mut actor = walker();
        actor.carrying = Some(ObjectId(9));

        let dropped = actor.begin_jump_down(Direction::Down, &config);

        assert_eq!(dropped, Some(ObjectId(9)));
        assert_eq!(actor.action, ActorAction::JumpingDown);
        assert!(actor.z >= 1.0);
        assert!(actor.is_airborne());
        assert_eq!((actor.vx, actor.vy), (0.0, config.ledge_jump_speed));
        assert_eq!(actor.vz, config.ledge_jump_vz);
        assert!(actor.ignore_ledges);
        assert!(!actor.wreckless_jump);
    }

    #[test]
    fn knocked_actor_keeps_momentum() {
        let mut actor = walker();
        actor.action = ActorAction::KnockedHard;
        actor.vx = -3.0;
        actor.vz = 0.5;
        actor.z = 4.0;

        actor.begin_jump_down(Direction::Down, &MotionConfig::default());

        assert_eq!(actor.vx, -3.0);
        assert_eq!(actor.vz, 0.5);
        assert_eq!(actor.z, 4.0);
        assert!(actor.wreckless_jump);
    }

    #[test]
    fn fall_arc_lands_and_returns_to_idle() {
        let config = MotionConfig::default();
        let mut actor = walker();
        actor.begin_jump_down(Direction::Down, &config);

        let mut frames = 0;
        while !actor.advance_fall_arc(config.gravity) {
            frames += 1;
            assert!(frames < 100, "fall arc never landed");
        }

        assert_eq!(actor.action, ActorAction::Idle);
        assert_eq!(actor.z, 0.0);
        assert!(!actor.is_airborne());
        assert!(actor.y > 32.0);
        assert!(!actor.advance_fall_arc(config.gravity));
    }

    #[test]
    fn climbing_toggles() {
        let mut actor = walker();
        actor.start_climbing();
        assert!(actor.is_climbing());
        actor.stop_climbing();
        assert_eq!(actor.action, ActorAction::Idle);

        actor.action = ActorAction::Knocked;
        actor.stop_climbing();
        assert_eq!(actor.action, ActorAction::Knocked);
    }

    #[test]
    fn movement_hitbox_overrides_body() {
        let actor = walker().with_movement_hitbox(Rect::new(2.0, 8.0, 12.0, 8.0));
        assert_eq!(actor.bounds(), Rect::new(32.0, 32.0, 16.0, 16.0));
        assert_eq!(actor.movement_bounds(), Rect::new(34.0, 40.0, 12.0, 8.0));
    }
}
