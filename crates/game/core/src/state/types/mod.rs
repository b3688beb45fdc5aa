pub mod actor;
pub mod common;

pub use actor::{Actor, ActorAction, ActorCapabilities};
pub use common::{Direction, Directions, ObjectId, PixelBounds, PixelPoint, Rect, TileCoord};
