//! JSON adapter: Disease databases backed by JSON documents.
//!
//! The document is a single object mapping lookup keys to disease entries:
//!
//! ```json
//! { "tomato_late_blight": { "name": "Late Blight", "treatment": { "stages": [] } } }
//! ```

use std::path::{Path, PathBuf};

use crate::ports::{DiseaseMap, DiseaseSource};

/// Database shipped inside the binary.
const BUNDLED_DATABASE: &str = include_str!("../../assets/DISEASE_DATABASE.json");

/// Error type for disease database loading.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid disease database: {0}")]
    Parse(#[from] serde_json::Error),
}

fn parse(content: &str) -> Result<DiseaseMap, SourceError> {
    let map: DiseaseMap = serde_json::from_str(content)?;
    Ok(map)
}

/// Disease database read from a file on each load.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DiseaseSource for JsonFileSource {
    type Error = SourceError;

    fn load(&self) -> Result<DiseaseMap, Self::Error> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        parse(&content)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Disease database held in memory.
#[derive(Debug, Clone)]
pub struct JsonStrSource {
    content: String,
}

impl JsonStrSource {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// The database bundled with the crate.
    #[must_use]
    pub fn bundled() -> Self {
        Self::new(BUNDLED_DATABASE)
    }
}

impl DiseaseSource for JsonStrSource {
    type Error = SourceError;

    fn load(&self) -> Result<DiseaseMap, Self::Error> {
        parse(&self.content)
    }

    fn describe(&self) -> String {
        format!("in-memory ({} bytes)", self.content.len())
    }
}
