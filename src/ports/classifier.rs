//! Classifier port: Trait for the on-device image model.
//!
//! The model runtime itself lives outside this crate. Implementations load
//! their model and labels, preprocess the image, and return one probability
//! per label.

/// Errors raised by a classifier implementation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClassifierError {
    #[error("Classifier not initialized")]
    NotInitialized,

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Inference failed: {0}")]
    Inference(String),
}

/// Trait for leaf image classifiers.
pub trait LeafClassifier: Send + Sync {
    /// Labels in model output order.
    fn labels(&self) -> &[String];

    /// Run one forward pass and return the output probabilities.
    ///
    /// # Errors
    /// Returns error if the model is not ready or inference fails.
    fn scores(&self, image: &[u8]) -> Result<Vec<f32>, ClassifierError>;

    /// Whether the model and labels are loaded.
    fn is_initialized(&self) -> bool {
        !self.labels().is_empty()
    }
}
