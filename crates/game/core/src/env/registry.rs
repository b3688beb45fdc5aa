use std::collections::BTreeMap;

use crate::behavior::BehaviorRecord;
use crate::error::AreaError;

/// Key of a tile definition in a [`TileRegistry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TileId(pub u32);

/// Authored description of one tile kind.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileDefinition {
    pub id: TileId,
    pub key: String,
    /// `None` for tiles that are pure art.
    #[cfg_attr(feature = "serde", serde(default))]
    pub behaviors: Option<BehaviorRecord>,
}

impl TileDefinition {
    pub fn new(id: TileId, key: impl Into<String>, behaviors: Option<BehaviorRecord>) -> Self {
        Self {
            id,
            key: key.into(),
            behaviors,
        }
    }
}

/// Lookup table of tile definitions.
///
/// Built once at startup and shared with every area that references it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TileRegistry {
    tiles: BTreeMap<TileId, TileDefinition>,
}

impl TileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_definitions(definitions: impl IntoIterator<Item = TileDefinition>) -> Self {
        let mut registry = Self::new();
        for definition in definitions {
            registry.register(definition);
        }
        registry
    }

    /// Adds or replaces a definition, returning the one it replaced.
    pub fn register(&mut self, definition: TileDefinition) -> Option<TileDefinition> {
        self.tiles.insert(definition.id, definition)
    }

    pub fn get(&self, id: TileId) -> Option<&TileDefinition> {
        self.tiles.get(&id)
    }

    pub fn find_by_key(&self, key: &str) -> Option<&TileDefinition> {
        self.tiles.values().find(|definition| definition.key == key)
    }

    /// Behaviors of a registered tile. Errors on unknown ids.
    pub fn behaviors(&self, id: TileId) -> Result<Option<&BehaviorRecord>, AreaError> {
        self.get(id)
            .map(|definition| definition.behaviors.as_ref())
            .ok_or(AreaError::UnknownTile(id.0))
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}
