//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use cases of the application.

mod diagnosis;
mod store;
mod worker;

pub use diagnosis::DiagnosisService;
pub use store::DiseaseInfoStore;
pub use worker::{DiagnosisProgress, DiagnosisWorker, DiagnosisWorkerHandle};
