//! Entity ids and the repository they live in
//!
//! Cards and wonders are allocated once at load time and referenced by id
//! everywhere else - the model never copies an entity after creation. Ids
//! are simple contiguous integers for human readability and dense storage.

use crate::DuelError;
use crate::Result;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// Key type stored in an [`EntityStore`]
pub trait EntityKey: Copy + Eq + Hash {
    fn from_raw(raw: u32) -> Self;
    fn as_u32(&self) -> u32;
}

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            pub fn new(id: u32) -> Self {
                $name(id)
            }
        }

        impl EntityKey for $name {
            fn from_raw(raw: u32) -> Self {
                $name(raw)
            }

            fn as_u32(&self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Id of a card in the repository
    CardId
);
entity_id!(
    /// Id of a wonder in the repository
    WonderId
);

/// Central storage for one kind of game entity
///
/// Provides fast lookup by id and hands out fresh ids at load time.
/// Entities are stable for the whole game - nothing is deallocated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityStore<K: EntityKey, T> {
    entities: FxHashMap<K, T>,
    next_id: u32,
}

impl<K: EntityKey, T> EntityStore<K, T> {
    pub fn new() -> Self {
        EntityStore {
            entities: FxHashMap::default(),
            next_id: 0,
        }
    }

    /// Generate a new unique id
    pub fn next_id(&mut self) -> K {
        let id = K::from_raw(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn insert(&mut self, id: K, entity: T) {
        self.entities.insert(id, entity);
    }

    pub fn get(&self, id: K) -> Result<&T> {
        self.entities
            .get(&id)
            .ok_or(DuelError::EntityNotFound(id.as_u32()))
    }

    pub fn get_mut(&mut self, id: K) -> Result<&mut T> {
        self.entities
            .get_mut(&id)
            .ok_or(DuelError::EntityNotFound(id.as_u32()))
    }

    pub fn contains(&self, id: K) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &T)> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl<K: EntityKey, T> Default for EntityStore<K, T> {
    fn default() -> Self {
        Self::new()
    }
}
