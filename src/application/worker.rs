//! Background diagnosis worker.
//!
//! Runs the detection pipeline on its own thread and reports progress over a
//! channel, so a caller's main loop never blocks on inference.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crate::application::DiagnosisService;
use crate::domain::DiseaseResult;
use crate::ports::{DiseaseSource, HistoryStore, LeafClassifier};

/// Progress updates from the diagnosis worker.
#[derive(Debug, Clone)]
pub enum DiagnosisProgress {
    /// Running the classifier
    Classifying,
    /// Classification done, looking up disease information
    Resolving,
    /// Diagnosis finished with a result
    Complete(DiseaseResult),
    /// No class reached the confidence threshold
    NoResult,
    /// Error occurred during diagnosis
    Error(String),
}

impl DiagnosisProgress {
    /// Whether this is the last message the worker sends.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete(_) | Self::NoResult | Self::Error(_))
    }
}

/// Handle to a running diagnosis worker.
pub struct DiagnosisWorkerHandle {
    /// Receiver for progress updates
    pub progress_rx: Receiver<DiagnosisProgress>,
    _handle: JoinHandle<()>,
}

impl DiagnosisWorkerHandle {
    /// Try to receive the next progress update (non-blocking).
    #[must_use]
    pub fn try_recv(&self) -> Option<DiagnosisProgress> {
        self.progress_rx.try_recv().ok()
    }

    /// Block until the worker reports its final state.
    ///
    /// A worker that exits without a final message is reported as an error.
    pub fn wait(self) -> DiagnosisProgress {
        for progress in self.progress_rx.iter() {
            if progress.is_terminal() {
                return progress;
            }
        }
        DiagnosisProgress::Error("Diagnosis worker exited unexpectedly".to_string())
    }
}

/// Worker that runs diagnosis in the background.
pub struct DiagnosisWorker;

impl DiagnosisWorker {
    /// Spawn a background diagnosis task.
    ///
    /// Returns a handle to receive progress updates.
    pub fn spawn<C, S, H>(
        service: Arc<DiagnosisService<C, S, H>>,
        image: Vec<u8>,
    ) -> DiagnosisWorkerHandle
    where
        C: LeafClassifier + 'static,
        S: DiseaseSource + 'static,
        H: HistoryStore + 'static,
        H::Error: Into<crate::adapters::StorageError>,
    {
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            Self::run_with_progress(&service, &image, &tx);
        });

        DiagnosisWorkerHandle {
            progress_rx: rx,
            _handle: handle,
        }
    }

    fn run_with_progress<C, S, H>(
        service: &DiagnosisService<C, S, H>,
        image: &[u8],
        tx: &Sender<DiagnosisProgress>,
    ) where
        C: LeafClassifier,
        S: DiseaseSource,
        H: HistoryStore,
        H::Error: Into<crate::adapters::StorageError>,
    {
        let started = Instant::now();
        let _ = tx.send(DiagnosisProgress::Classifying);

        let progress = match service.classify(image) {
            Ok(Some(top)) => {
                let _ = tx.send(DiagnosisProgress::Resolving);
                DiagnosisProgress::Complete(service.complete(&top, image, started))
            }
            Ok(None) => DiagnosisProgress::NoResult,
            Err(e) => {
                tracing::warn!("Background diagnosis failed: {}", e);
                DiagnosisProgress::Error(e.to_string())
            }
        };
        let _ = tx.send(progress);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::json::JsonStrSource;
    use crate::adapters::sqlite::SqliteHistory;
    use crate::application::DiseaseInfoStore;
    use crate::ports::ClassifierError;

    struct OneLabel(Vec<String>, f32);

    impl LeafClassifier for OneLabel {
        fn labels(&self) -> &[String] {
            &self.0
        }

        fn scores(&self, image: &[u8]) -> Result<Vec<f32>, ClassifierError> {
            if image.is_empty() {
                return Err(ClassifierError::InvalidImage("empty image".to_string()));
            }
            Ok(vec![self.1])
        }
    }

    fn service(score: f32) -> Arc<DiagnosisService<OneLabel, JsonStrSource, SqliteHistory>> {
        Arc::new(DiagnosisService::new(
            Arc::new(OneLabel(vec!["Apple___Apple_scab".to_string()], score)),
            Arc::new(DiseaseInfoStore::new(JsonStrSource::bundled())),
            Arc::new(SqliteHistory::in_memory().expect("Should create db")),
        ))
    }

    #[test]
    fn test_worker_completes() {
        let handle = DiagnosisWorker::spawn(service(0.8), b"leaf".to_vec());
        match handle.wait() {
            DiagnosisProgress::Complete(result) => {
                assert_eq!(result.display_name(), "Apple - Apple scab");
                assert_eq!(
                    result.solution,
                    "Apply a protective fungicide from green tip through petal fall."
                );
            }
            other => panic!("Unexpected progress: {other:?}"),
        }
    }

    #[test]
    fn test_worker_no_result() {
        let handle = DiagnosisWorker::spawn(service(0.1), b"leaf".to_vec());
        assert!(matches!(handle.wait(), DiagnosisProgress::NoResult));
    }

    #[test]
    fn test_worker_reports_error() {
        let handle = DiagnosisWorker::spawn(service(0.8), Vec::new());
        assert!(matches!(handle.wait(), DiagnosisProgress::Error(_)));
    }

    #[test]
    fn test_progress_order() {
        let handle = DiagnosisWorker::spawn(service(0.8), b"leaf".to_vec());
        let updates: Vec<DiagnosisProgress> = handle.progress_rx.iter().collect();

        assert!(matches!(updates[0], DiagnosisProgress::Classifying));
        assert!(matches!(updates[1], DiagnosisProgress::Resolving));
        assert!(matches!(updates[2], DiagnosisProgress::Complete(_)));
        assert_eq!(updates.len(), 3);
    }
}
