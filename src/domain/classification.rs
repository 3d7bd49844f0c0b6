//! Classifier output interpretation.
//!
//! The model emits one probability per label. These helpers pick the
//! predictions worth showing.

use serde::{Deserialize, Serialize};

/// Minimum probability for a prediction to count as a result.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.4;

/// Number of predictions listed by default.
pub const DEFAULT_MAX_RESULTS: usize = 3;

/// Label used when the model emits more classes than the label file lists.
const UNKNOWN_LABEL: &str = "unknown";

/// One class prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Class index in the model output
    pub id: String,

    /// Raw label
    pub label: String,

    /// Probability (0.0 to 1.0)
    pub confidence: f32,
}

impl Classification {
    fn at(index: usize, labels: &[String], confidence: f32) -> Self {
        Self {
            id: index.to_string(),
            label: labels
                .get(index)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
            confidence,
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Title = {}, Confidence = {}", self.label, self.confidence)
    }
}

/// The highest-scoring class, if it clears `threshold`.
///
/// Ties resolve to the lowest index. NaN scores never win.
#[must_use]
pub fn top_prediction(scores: &[f32], labels: &[String], threshold: f32) -> Option<Classification> {
    let (index, &confidence) = scores
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, s)| !s.is_nan())
        .max_by(|a, b| a.1.total_cmp(b.1))?;

    if confidence < threshold {
        tracing::debug!("Confidence {} below threshold {}", confidence, threshold);
        return None;
    }

    Some(Classification::at(index, labels, confidence))
}

/// Classes at or above `threshold`, best first, at most `count`.
#[must_use]
pub fn top_predictions(
    scores: &[f32],
    labels: &[String],
    threshold: f32,
    count: usize,
) -> Vec<Classification> {
    let mut ranked: Vec<(usize, f32)> = scores
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, s)| *s >= threshold)
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    ranked
        .into_iter()
        .take(count)
        .map(|(index, confidence)| Classification::at(index, labels, confidence))
        .collect()
}

/// Parse a label file: one label per line, surrounding whitespace trimmed.
#[must_use]
pub fn parse_labels(content: &str) -> Vec<String> {
    content.lines().map(|l| l.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Vec<String> {
        parse_labels("Apple___Apple_scab\nApple___healthy\nTomato___Late_blight\nbackground\n")
    }

    #[test]
    fn test_top_prediction() {
        let top = top_prediction(&[0.1, 0.2, 0.65, 0.05], &labels(), DEFAULT_CONFIDENCE_THRESHOLD)
            .expect("Should find a prediction");
        assert_eq!(top.id, "2");
        assert_eq!(top.label, "Tomato___Late_blight");
        assert!((top.confidence - 0.65).abs() < f32::EPSILON);
    }

    #[test]
    fn test_top_prediction_below_threshold() {
        assert!(top_prediction(&[0.3, 0.35, 0.2, 0.15], &labels(), 0.4).is_none());
        assert!(top_prediction(&[], &labels(), 0.4).is_none());
    }

    #[test]
    fn test_top_prediction_at_threshold_counts() {
        let top = top_prediction(&[0.4, 0.3], &labels(), 0.4).expect("Should accept threshold");
        assert_eq!(top.label, "Apple___Apple_scab");
    }

    #[test]
    fn test_top_prediction_unknown_index() {
        let top = top_prediction(&[0.0, 0.0, 0.0, 0.0, 0.9], &labels(), 0.4).expect("Should find");
        assert_eq!(top.label, "unknown");
        assert_eq!(top.id, "4");
    }

    #[test]
    fn test_top_prediction_tie_prefers_first() {
        let top = top_prediction(&[0.5, 0.5, 0.1], &labels(), 0.4).expect("Should find");
        assert_eq!(top.id, "0");
    }

    #[test]
    fn test_top_prediction_ignores_nan() {
        let top = top_prediction(&[f32::NAN, 0.8], &labels(), 0.4).expect("Should find");
        assert_eq!(top.id, "1");
    }

    #[test]
    fn test_top_predictions() {
        let ranked = top_predictions(&[0.45, 0.05, 0.9, 0.6], &labels(), 0.4, 2);
        let ids: Vec<&str> = ranked.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);

        let all = top_predictions(&[0.45, 0.05, 0.9, 0.6], &labels(), 0.4, DEFAULT_MAX_RESULTS);
        assert_eq!(all.len(), 3);
        assert_eq!(all[2].label, "Apple___Apple_scab");
    }

    #[test]
    fn test_display() {
        let c = Classification::at(1, &labels(), 0.5);
        assert_eq!(c.to_string(), "Title = Apple___healthy, Confidence = 0.5");
    }
}
