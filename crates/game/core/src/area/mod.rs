//! Loaded areas: layers, the derived behavior grid and live contents.
mod event;
mod instance;
mod layer;

pub use event::AreaEvent;
pub use instance::AreaInstance;
pub use layer::{AreaLayer, LayerPriority};
