//! Geometry primitives and per-actor movement state.
//!
//! Everything here is plain data. Areas own actors for their lifetime; the
//! movement resolver only borrows one for the duration of a call.
pub mod types;

pub use types::{
    Actor, ActorAction, ActorCapabilities, Direction, Directions, ObjectId, PixelBounds,
    PixelPoint, Rect, TileCoord,
};
