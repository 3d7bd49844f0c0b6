//! Diagnosis service: Orchestrates the detection pipeline.
//!
//! This service coordinates:
//! - Classifier inference
//! - Confidence thresholding
//! - Disease information resolution
//! - Result assembly
//! - History persistence

use std::sync::Arc;
use std::time::Instant;

use crate::application::DiseaseInfoStore;
use crate::domain::classification::{self, Classification};
use crate::domain::{
    DiseaseResult, HistoryRecord, HistoryStatus, DEFAULT_CONFIDENCE_THRESHOLD,
    DEFAULT_MAX_RESULTS,
};
use crate::ports::{
    ClassifierError, DiseaseSource, HistoryPage, HistoryStore, LeafClassifier,
};
use crate::{Config, FloraguardError};

/// Service turning leaf images into disease results.
pub struct DiagnosisService<C, S, H>
where
    C: LeafClassifier,
    S: DiseaseSource,
    H: HistoryStore,
{
    classifier: Arc<C>,
    store: Arc<DiseaseInfoStore<S>>,
    history: Arc<H>,
    threshold: f32,
    max_results: usize,
}

impl<C, S, H> DiagnosisService<C, S, H>
where
    C: LeafClassifier,
    S: DiseaseSource,
    H: HistoryStore,
    H::Error: Into<crate::adapters::StorageError>,
{
    /// Create a new diagnosis service with the default confidence threshold.
    pub fn new(classifier: Arc<C>, store: Arc<DiseaseInfoStore<S>>, history: Arc<H>) -> Self {
        Self {
            classifier,
            store,
            history,
            threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Apply the threshold and result limit from a configuration.
    #[must_use]
    pub fn with_config(mut self, config: &Config) -> Self {
        self.threshold = config.confidence_threshold;
        self.max_results = config.max_results;
        self
    }

    /// Set the minimum confidence for a prediction to count as a result.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    #[must_use]
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Default number of predictions for `top_predictions`.
    #[must_use]
    pub fn max_results(&self) -> usize {
        self.max_results
    }

    #[must_use]
    pub fn store(&self) -> &DiseaseInfoStore<S> {
        &self.store
    }

    fn scores(&self, image: &[u8]) -> Result<Vec<f32>, FloraguardError> {
        if !self.classifier.is_initialized() {
            return Err(FloraguardError::Classifier(
                ClassifierError::NotInitialized.to_string(),
            ));
        }
        self.classifier
            .scores(image)
            .map_err(|e| FloraguardError::Classifier(e.to_string()))
    }

    /// Classify an image and build the full result for the top prediction.
    ///
    /// Returns `Ok(None)` when no class reaches the confidence threshold.
    ///
    /// # Errors
    /// Returns `FloraguardError::Classifier` if inference fails.
    pub fn diagnose(&self, image: &[u8]) -> Result<Option<DiseaseResult>, FloraguardError> {
        let started = Instant::now();
        Ok(self
            .classify(image)?
            .map(|top| self.complete(&top, image, started)))
    }

    /// Top prediction for an image, if it reaches the threshold.
    ///
    /// # Errors
    /// Returns `FloraguardError::Classifier` if inference fails.
    pub fn classify(&self, image: &[u8]) -> Result<Option<Classification>, FloraguardError> {
        tracing::info!("Starting diagnosis ({} image bytes)...", image.len());

        let scores = self.scores(image)?;
        let top = classification::top_prediction(&scores, self.classifier.labels(), self.threshold);
        match &top {
            Some(top) => tracing::debug!("Top prediction: {}", top),
            None => tracing::info!("No prediction above {:.2} confidence", self.threshold),
        }
        Ok(top)
    }

    /// Resolve, assemble, and record the result for a classification.
    ///
    /// `started` marks the beginning of the pipeline for the reported
    /// processing time.
    pub fn complete(&self, top: &Classification, image: &[u8], started: Instant) -> DiseaseResult {
        let info = self.store.resolve(&top.label);
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let result = DiseaseResult::assemble(&top.label, top.confidence, elapsed_ms, info);

        let record = HistoryRecord::from_result(&result, Some(image));
        if let Err(e) = self.history.save_record(&record) {
            tracing::warn!("Failed to save history record: {:?}", e);
        }

        tracing::info!(
            "Diagnosis complete: disease={}, confidence={:.2}%, time={}ms",
            result.disease,
            result.confidence * 100.0,
            result.processing_time_ms
        );

        result
    }

    /// Up to `count` predictions at or above the threshold, best first.
    ///
    /// # Errors
    /// Returns `FloraguardError::Classifier` if inference fails.
    pub fn top_predictions(
        &self,
        image: &[u8],
        count: usize,
    ) -> Result<Vec<Classification>, FloraguardError> {
        let scores = self.scores(image)?;
        Ok(classification::top_predictions(
            &scores,
            self.classifier.labels(),
            self.threshold,
            count,
        ))
    }

    /// Get recent history records, newest first.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    pub fn recent_history(&self, limit: usize) -> Result<Vec<HistoryRecord>, FloraguardError> {
        self.history
            .load_recent(limit)
            .map_err(|e| FloraguardError::Storage(e.into()))
    }

    /// # Errors
    /// Returns error if storage operation fails.
    pub fn history_page(&self, offset: usize, limit: usize) -> Result<HistoryPage, FloraguardError> {
        self.history
            .load_paginated(offset, limit)
            .map_err(|e| FloraguardError::Storage(e.into()))
    }

    /// # Errors
    /// Returns error if storage operation fails.
    pub fn history_count(&self) -> Result<usize, FloraguardError> {
        self.history
            .count()
            .map_err(|e| FloraguardError::Storage(e.into()))
    }

    /// Mark a detection as resolved.
    ///
    /// # Errors
    /// Returns error if the record does not exist or storage fails.
    pub fn mark_resolved(&self, id: &str) -> Result<(), FloraguardError> {
        self.history
            .update_status(id, HistoryStatus::Resolved)
            .map_err(|e| FloraguardError::Storage(e.into()))?;
        tracing::info!("Marked history record {} as resolved", id);
        Ok(())
    }

    /// # Errors
    /// Returns error if storage operation fails.
    pub fn delete_record(&self, id: &str) -> Result<(), FloraguardError> {
        self.history
            .delete_record(id)
            .map_err(|e| FloraguardError::Storage(e.into()))
    }
}
