//! Data-driven content definitions and loaders.
//!
//! This crate reads authored data files into `area-core` types:
//! - Tile palettes (RON) into a [`area_core::TileRegistry`]
//! - Area layouts (RON) into background/foreground layers
//! - Motion tuning (TOML) into a [`area_core::MotionConfig`]
//!
//! All loaders deserialize `area-core` types directly through its `serde`
//! feature.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{AreaLayout, AreaLoader, ConfigLoader, ContentFactory, PaletteLoader};
