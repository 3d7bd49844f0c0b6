//! Disease info store: one-time database load plus fallback synthesis.
//!
//! The database is read at most once per store. Concurrent first callers
//! block on the same load and only ever see the fully built map. A failed
//! load leaves the store permanently in fallback mode.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use crate::domain::fallback::generic_disease_info;
use crate::domain::label::{display_name, lookup_key};
use crate::domain::{solution_for, DiseaseInfo};
use crate::ports::DiseaseSource;

type Cache = HashMap<String, Arc<DiseaseInfo>>;

/// Read-only disease lookup with lazy, single-assignment initialization.
pub struct DiseaseInfoStore<S>
where
    S: DiseaseSource,
{
    source: S,
    cache: OnceLock<Cache>,
}

impl<S> DiseaseInfoStore<S>
where
    S: DiseaseSource,
{
    /// Create a cold store. Nothing is read until first use.
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: OnceLock::new(),
        }
    }

    fn load(&self) -> Cache {
        match self.source.load() {
            Ok(entries) => {
                tracing::info!(
                    "Loaded {} disease entries from {}",
                    entries.len(),
                    self.source.describe()
                );
                entries
                    .into_iter()
                    .map(|(key, info)| (key, Arc::new(info)))
                    .collect()
            }
            Err(e) => {
                tracing::error!(
                    "Error loading disease database from {}, falling back to generic advice: {}",
                    self.source.describe(),
                    e
                );
                Cache::new()
            }
        }
    }

    fn cache(&self) -> &Cache {
        self.cache.get_or_init(|| self.load())
    }

    /// Load the database now instead of on first lookup.
    ///
    /// Returns the number of entries available (0 in fallback mode).
    pub fn warm(&self) -> usize {
        self.cache().len()
    }

    /// Whether the one-time load has happened.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.cache.get().is_some()
    }

    /// Number of database entries (loads on first call).
    pub fn len(&self) -> usize {
        self.cache().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache().is_empty()
    }

    /// Whether the label has a database entry.
    pub fn contains(&self, raw_label: &str) -> bool {
        self.cache().contains_key(&lookup_key(raw_label))
    }

    /// Disease information for a raw classifier label.
    ///
    /// Returns the shared database entry when one exists, otherwise a fresh
    /// generic entry named after the label.
    pub fn resolve(&self, raw_label: &str) -> Arc<DiseaseInfo> {
        let key = lookup_key(raw_label);
        if let Some(info) = self.cache().get(&key) {
            return Arc::clone(info);
        }

        tracing::debug!("No database entry for '{}', using generic advice", key);
        Arc::new(generic_disease_info(&display_name(raw_label)))
    }

    /// Flat solution string for a label: its first treatment step.
    pub fn solution(&self, raw_label: &str) -> String {
        solution_for(&self.resolve(raw_label))
    }
}
