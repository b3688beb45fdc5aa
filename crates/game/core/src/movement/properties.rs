use crate::state::{Actor, ActorCapabilities, ObjectId, Rect};

/// Per-call movement rules.
///
/// The default value allows nothing beyond plain walking on solid ground;
/// [`MovementProperties::for_actor`] derives the usual rules from an actor's
/// capabilities.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct MovementProperties {
    /// Absolute area the mover should stay inside.
    pub bounding_box: Option<Rect>,
    pub can_push: bool,
    pub can_wiggle: bool,
    pub can_fall: bool,
    pub can_swim: bool,
    pub can_move_in_lava: bool,
    pub can_climb: bool,
    /// Every step must keep touching something climbable.
    pub must_climb: bool,
    pub can_cross_ledges: bool,
    pub crushing_power: u32,
    /// Bodies ignored by every collision query of this call.
    pub excluded: Vec<ObjectId>,
}

impl MovementProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_actor(actor: &Actor) -> Self {
        Self {
            bounding_box: None,
            can_push: true,
            can_wiggle: true,
            can_fall: actor.can(ActorCapabilities::CAN_FALL),
            can_swim: actor.can(ActorCapabilities::CAN_SWIM),
            can_move_in_lava: actor.can(ActorCapabilities::CAN_MOVE_IN_LAVA),
            can_climb: actor.can(ActorCapabilities::CAN_CLIMB),
            must_climb: false,
            can_cross_ledges: actor.can(ActorCapabilities::CAN_JUMP_OFF_LEDGES),
            crushing_power: actor.crushing_power,
            excluded: vec![actor.id],
        }
    }

    pub fn with_bounding_box(mut self, bounding_box: Rect) -> Self {
        self.bounding_box = Some(bounding_box);
        self
    }

    pub fn without_push(mut self) -> Self {
        self.can_push = false;
        self
    }

    pub fn without_wiggle(mut self) -> Self {
        self.can_wiggle = false;
        self
    }

    pub fn excluding(mut self, id: ObjectId) -> Self {
        if !self.excluded.contains(&id) {
            self.excluded.push(id);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_from_capabilities() {
        let mut actor = Actor::new(ObjectId(2), 0.0, 0.0, Rect::new(0.0, 0.0, 16.0, 16.0))
            .with_capabilities(ActorCapabilities::CAN_SWIM | ActorCapabilities::CAN_CLIMB);
        actor.crushing_power = 3;

        let props = MovementProperties::for_actor(&actor).excluding(ObjectId(9));

        assert!(props.can_swim && props.can_climb);
        assert!(!props.can_fall && !props.can_cross_ledges);
        assert_eq!(props.crushing_power, 3);
        assert_eq!(props.excluded, vec![ObjectId(2), ObjectId(9)]);
    }

    #[test]
    fn bare_properties_allow_nothing_special() {
        let props = MovementProperties::new();
        assert_eq!(props, MovementProperties::default());
        assert!(!props.can_push && !props.can_fall);
        assert!(props.excluded.is_empty());

        let actor = Actor::new(ObjectId(2), 0.0, 0.0, Rect::new(0.0, 0.0, 16.0, 16.0));
        let timid = MovementProperties::for_actor(&actor).without_push();
        assert!(!timid.can_push);
        assert!(timid.can_wiggle);
    }
}
