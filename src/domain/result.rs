//! Displayable disease result.
//!
//! Produced once per successful classification and never mutated afterwards.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::disease::DiseaseInfo;
use super::label;

/// Solution text when the disease has no treatment stages.
pub const NO_SOLUTION: &str = "No solution available.";

/// Label the classifier uses for images without a leaf.
const BACKGROUND_LABEL: &str = "background";

/// Final result of one classification, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseResult {
    /// Raw classifier label
    pub disease: String,

    /// Top class probability (0.0 to 1.0)
    pub confidence: f32,

    /// First treatment step, kept as a flat string for older consumers
    pub solution: String,

    /// Wall time of the classification call
    pub processing_time_ms: u64,

    /// Resolved disease information (shared with the store cache)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disease_info: Option<Arc<DiseaseInfo>>,
}

impl DiseaseResult {
    /// Assemble a result from a classification and its resolved information.
    #[must_use]
    pub fn assemble(
        raw_label: &str,
        confidence: f32,
        elapsed_ms: u64,
        info: Arc<DiseaseInfo>,
    ) -> Self {
        Self {
            disease: raw_label.to_string(),
            confidence,
            solution: solution_for(&info),
            processing_time_ms: elapsed_ms,
            disease_info: Some(info),
        }
    }

    /// Whether the label names a healthy plant.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.disease.to_lowercase().contains("healthy")
    }

    /// Whether the classifier saw no leaf at all.
    #[must_use]
    pub fn is_background(&self) -> bool {
        self.disease.to_lowercase() == BACKGROUND_LABEL
    }

    #[must_use]
    pub fn display_name(&self) -> String {
        label::display_name(&self.disease)
    }

    /// Confidence as a whole percentage, truncated towards zero.
    #[must_use]
    pub fn confidence_percentage(&self) -> u8 {
        // The cast saturates, so NaN maps to 0.
        ((self.confidence * 100.0).floor() as i32).clamp(0, 100) as u8
    }
}

/// Flat solution string for a disease: its first treatment step.
#[must_use]
pub fn solution_for(info: &DiseaseInfo) -> String {
    info.stages()
        .first()
        .map(|stage| stage.description.clone())
        .unwrap_or_else(|| NO_SOLUTION.to_string())
}
