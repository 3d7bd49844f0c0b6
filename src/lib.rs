//! # FloraGuard
//!
//! Plant disease result resolution for an on-device leaf classifier.
//!
//! This crate provides:
//! - Label normalization from classifier identifiers to lookup keys and
//!   display names
//! - A disease information store with one-time lazy loading and a generic
//!   fallback for unknown diseases
//! - Result assembly, rich-text and PDF reports, and a local detection history
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (labels, disease info, results, history)
//! - `ports`: Trait definitions for external operations
//! - `adapters`: Concrete implementations (JSON, SQLite, PDF)
//! - `application`: Use cases orchestrating domain and ports

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use application::{DiagnosisService, DiseaseInfoStore};
pub use config::Config;
pub use domain::{DiseaseInfo, DiseaseResult};

/// Result type for FloraGuard operations
pub type Result<T> = std::result::Result<T, FloraguardError>;

/// Main error type for FloraGuard
#[derive(Debug, thiserror::Error)]
pub enum FloraguardError {
    #[error("Storage operation failed: {0}")]
    Storage(#[from] adapters::StorageError),

    #[error("Disease database error: {0}")]
    Source(#[from] adapters::SourceError),

    #[error("Classifier error: {0}")]
    Classifier(String),

    #[error("Report generation failed: {0}")]
    Report(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
