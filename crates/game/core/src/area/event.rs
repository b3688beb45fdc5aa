use crate::state::{Direction, ObjectId};

/// Side effects of movement that other systems react to.
///
/// The area queues these; the frame loop drains them once per frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AreaEvent {
    /// An actor crossed a ledge and started falling.
    LedgeJump {
        actor: ObjectId,
        direction: Direction,
    },
    /// Play the fall sound for this actor.
    FallCue { actor: ObjectId },
    /// The actor let go of what it was carrying.
    CarriedObjectDropped { actor: ObjectId, object: ObjectId },
    ObjectPushed {
        pusher: ObjectId,
        object: ObjectId,
        direction: Direction,
    },
}
