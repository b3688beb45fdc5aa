use crate::behavior::BehaviorRecord;
use crate::state::{Direction, ObjectId, Rect};

/// A push delivered to an object that blocked a moving actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Push {
    pub pusher: ObjectId,
    pub direction: Direction,
}

/// The capabilities the collision core needs from anything placed in an area.
///
/// Objects, effects and actors all expose this narrow surface; everything
/// else about them is owned by their own update logic.
pub trait AreaObject {
    fn id(&self) -> ObjectId;

    /// Absolute hitbox in area pixels. `None` for objects without a body.
    fn hitbox(&self) -> Option<Rect>;

    /// Behaviors this object contributes at every pixel of its hitbox.
    fn behaviors(&self) -> Option<&BehaviorRecord> {
        None
    }

    /// Called when an actor is blocked by this object while allowed to push.
    fn on_push(&mut self, _push: Push) {}
}

/// General-purpose placed object: a block, a platform, a bridge.
///
/// Pushes are recorded for the owning game logic to act on.
#[derive(Clone, Debug, PartialEq)]
pub struct Prop {
    pub id: ObjectId,
    pub hitbox: Option<Rect>,
    pub behaviors: Option<BehaviorRecord>,
    pub pushable: bool,
    pub pushes: u32,
    pub last_push: Option<Push>,
}

impl Prop {
    pub fn new(id: ObjectId, hitbox: Rect, behaviors: BehaviorRecord) -> Self {
        Self {
            id,
            hitbox: Some(hitbox),
            behaviors: Some(behaviors),
            pushable: false,
            pushes: 0,
            last_push: None,
        }
    }

    pub fn pushable(mut self) -> Self {
        self.pushable = true;
        self
    }
}

impl AreaObject for Prop {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn hitbox(&self) -> Option<Rect> {
        self.hitbox
    }

    fn behaviors(&self) -> Option<&BehaviorRecord> {
        self.behaviors.as_ref()
    }

    fn on_push(&mut self, push: Push) {
        if self.pushable {
            self.pushes += 1;
            self.last_push = Some(push);
        }
    }
}
