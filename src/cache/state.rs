use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::cache::entry::CacheEntry;
use crate::cache::key::CacheKey;
use crate::mvi::State;

/// Entries are reference counted so cloning the state for a new snapshot
/// does not copy cached payloads.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CacheState {
    pub(crate) entries: BTreeMap<CacheKey, Arc<CacheEntry>>,
}

impl State for CacheState {}

impl CacheState {
    pub fn entry(&self, key: &CacheKey) -> Option<&CacheEntry> {
        self.entries.get(key).map(Arc::as_ref)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&CacheKey, &CacheEntry)> {
        self.entries.iter().map(|(key, entry)| (key, entry.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Serialized as `{"queries": {"<endpoint>(<args>)": entry}}`.
impl Serialize for CacheState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Queries<'a> {
            queries: BTreeMap<String, &'a CacheEntry>,
        }

        Queries {
            queries: self
                .entries
                .iter()
                .map(|(key, entry)| (key.to_string(), entry.as_ref()))
                .collect(),
        }
        .serialize(serializer)
    }
}
