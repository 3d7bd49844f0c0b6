//! Domain layer: Core types and pure logic.
//!
//! Nothing in this module performs I/O. All types are serializable.

pub mod classification;
mod disease;
pub mod fallback;
mod history;
pub mod label;
pub mod progress;
pub mod report;
mod result;

pub use classification::{Classification, DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_MAX_RESULTS};
pub use disease::{DiseaseInfo, Emergency, Medication, Recovery, Stage, Treatment};
pub use history::{sha256_hex, HistoryRecord, HistoryStatus};
pub use result::{solution_for, DiseaseResult, NO_SOLUTION};
