//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external libraries:
//! - `json`: serde_json disease databases (file or bundled)
//! - `sqlite`: SQLite history storage
//! - `pdf`: printpdf report rendering
//! - `sanitize`: log output sanitization

pub mod json;
pub mod pdf;
pub mod sanitize;
pub mod sqlite;

// Re-export adapter errors for lib.rs
pub use json::SourceError;
pub use sqlite::StorageError;
