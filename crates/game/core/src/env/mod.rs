//! Read-only world data and the object seam.
//!
//! The [`TileRegistry`] maps tile ids to authored behaviors and is injected
//! into every area that uses it. [`AreaObject`] is the narrow capability set
//! the compositor and resolver need from dynamic objects.
mod object;
mod registry;

pub use object::{AreaObject, Prop, Push};
pub use registry::{TileDefinition, TileId, TileRegistry};
