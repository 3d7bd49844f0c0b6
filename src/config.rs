//! Runtime configuration.

use std::path::PathBuf;

use crate::domain::{DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_MAX_RESULTS};

/// Default location of the disease database.
pub const DEFAULT_DISEASE_DB: &str = "assets/DISEASE_DATABASE.json";

/// Default location of the detection history database.
pub const DEFAULT_HISTORY_DB: &str = "data/history.db";

/// Configuration for the detection pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// JSON disease database path
    pub disease_db: PathBuf,

    /// SQLite history database path
    pub history_db: PathBuf,

    /// Minimum confidence for a prediction to be reported, in (0, 1]
    pub confidence_threshold: f32,

    /// Maximum number of predictions listed
    pub max_results: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            disease_db: PathBuf::from(DEFAULT_DISEASE_DB),
            history_db: PathBuf::from(DEFAULT_HISTORY_DB),
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl Config {
    /// Load config overrides from environment (best-effort).
    ///
    /// Supported:
    /// - FLORAGUARD_DISEASE_DB
    /// - FLORAGUARD_HISTORY_DB
    /// - FLORAGUARD_CONFIDENCE_THRESHOLD
    /// - FLORAGUARD_MAX_RESULTS
    ///
    /// Invalid values are ignored and the default is kept.
    #[must_use]
    pub fn from_env_or_default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(v) = lookup("FLORAGUARD_DISEASE_DB") {
            if !v.trim().is_empty() {
                cfg.disease_db = PathBuf::from(v.trim());
            }
        }

        if let Some(v) = lookup("FLORAGUARD_HISTORY_DB") {
            if !v.trim().is_empty() {
                cfg.history_db = PathBuf::from(v.trim());
            }
        }

        if let Some(v) = lookup("FLORAGUARD_CONFIDENCE_THRESHOLD") {
            if let Ok(x) = v.trim().parse::<f32>() {
                if x.is_finite() && x > 0.0 && x <= 1.0 {
                    cfg.confidence_threshold = x;
                }
            }
        }

        if let Some(v) = lookup("FLORAGUARD_MAX_RESULTS") {
            if let Ok(n) = v.trim().parse::<usize>() {
                if n > 0 {
                    cfg.max_results = n;
                }
            }
        }

        cfg
    }
}
