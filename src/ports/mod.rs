//! Ports layer: Trait definitions for external operations.
//!
//! These traits define the boundaries between the resolution pipeline and
//! the systems around it (model runtime, disease database, history storage).

mod classifier;
mod source;
mod storage;

pub use classifier::{ClassifierError, LeafClassifier};
pub use source::{DiseaseMap, DiseaseSource};
pub use storage::{HistoryPage, HistoryStore};
