//! Per-pixel behavior compositing.
//!
//! Combines an area's static behavior grid with every live body whose hitbox
//! covers the queried pixel. This is the only view of the world the movement
//! resolver sees.
mod query;
mod stack;

pub use query::{
    ObjectFilter, TileQuery, get_composite_behaviors, get_tile_behaviors_and_obstacles,
};
