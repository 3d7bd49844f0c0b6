//! Disease source port: Trait for the disease database.
//!
//! The database is read once per store; implementations only need to
//! produce the full mapping on demand.

use std::collections::HashMap;

use crate::domain::DiseaseInfo;

/// Mapping from lookup key to disease information.
pub type DiseaseMap = HashMap<String, DiseaseInfo>;

/// Trait for read-only disease databases.
pub trait DiseaseSource: Send + Sync {
    /// Error type for load failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load every entry, keyed by normalized lookup key.
    ///
    /// # Errors
    /// Returns error if the data is missing or malformed.
    fn load(&self) -> Result<DiseaseMap, Self::Error>;

    /// Short description for log lines (file path, "embedded", ...).
    fn describe(&self) -> String;
}
