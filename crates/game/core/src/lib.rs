//! Tile-behavior compositing and actor-movement resolution.
//!
//! `area-core` merges per-tile collision and hazard metadata from stacked map
//! layers into a [`BehaviorGrid`], composes it with live objects into a
//! per-pixel view ([`collision`]), and resolves actor displacements against
//! that view every frame ([`movement`]). Everything is synchronous and
//! single-threaded; grid mutation happens through `&mut AreaInstance`, which
//! keeps it out of any in-flight resolution.
pub mod area;
pub mod behavior;
pub mod collision;
pub mod config;
pub mod env;
pub mod error;
pub mod movement;
pub mod state;

pub use area::{AreaEvent, AreaInstance, AreaLayer, LayerPriority};
pub use behavior::{
    BehaviorGrid, BehaviorRecord, BitmapField, BitmapKinds, Element, Ledges, SubTileMask,
    TouchHit, apply_tile_to_behavior_grid, merge_bitmap,
};
pub use collision::{TileQuery, get_composite_behaviors, get_tile_behaviors_and_obstacles};
pub use config::MotionConfig;
pub use env::{AreaObject, Prop, Push, TileDefinition, TileId, TileRegistry};
pub use error::{AreaError, ErrorSeverity, GameError, InvariantViolation};
pub use movement::{
    MoveOutcome, MovementProperties, can_actor_move, move_actor, move_actor_in_direction,
    open_directions,
};
pub use state::{
    Actor, ActorAction, ActorCapabilities, Direction, Directions, ObjectId, PixelPoint, Rect,
    TileCoord,
};
