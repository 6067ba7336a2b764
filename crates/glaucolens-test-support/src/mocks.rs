//! Mock implementations of core port traits.

use std::sync::{Arc, Mutex, PoisonError};

use glaucolens_core::domain::{ClassificationReport, ImageInfo};
use glaucolens_core::inference::NormalizedTensor;
use glaucolens_core::ports::{ImageSource, ResultOutput, ScoreModel};

/// Mock implementation of `ScoreModel` returning a fixed score.
///
/// Records every tensor it receives for later assertions.
pub struct MockScoreModel {
    score: f32,
    inputs: Mutex<Vec<NormalizedTensor>>,
}

impl MockScoreModel {
    /// Creates a mock that always predicts `score`.
    #[must_use]
    pub fn new(score: f32) -> Arc<Self> {
        Arc::new(Self {
            score,
            inputs: Mutex::new(Vec::new()),
        })
    }

    /// A model that always reports a healthy eye.
    #[must_use]
    pub fn healthy() -> Arc<Self> {
        Self::new(0.9)
    }

    /// A model that always flags glaucoma.
    #[must_use]
    pub fn suspected() -> Arc<Self> {
        Self::new(0.1)
    }

    /// Returns the number of predictions made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.inputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns every tensor the model was called with.
    #[must_use]
    pub fn inputs(&self) -> Vec<NormalizedTensor> {
        self.inputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ScoreModel for MockScoreModel {
    fn predict(&self, input: &NormalizedTensor) -> anyhow::Result<f32> {
        self.inputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(input.clone());
        Ok(self.score)
    }
}

/// Mock implementation of `ScoreModel` that always fails.
pub struct FailingScoreModel;

impl ScoreModel for FailingScoreModel {
    fn predict(&self, _input: &NormalizedTensor) -> anyhow::Result<f32> {
        anyhow::bail!("mock model failure")
    }
}

/// Mock implementation of `ImageSource` for testing.
///
/// Yields pre-built images, or an error for entries registered as broken.
pub struct MockImageSource {
    images: Vec<(String, Option<ImageInfo>)>,
}

impl MockImageSource {
    /// Creates a new mock source with the given images.
    #[must_use]
    pub fn new(images: Vec<ImageInfo>) -> Self {
        Self {
            images: images
                .into_iter()
                .map(|info| (info.path.clone(), Some(info)))
                .collect(),
        }
    }

    /// Creates an empty mock source.
    #[must_use]
    pub fn empty() -> Self {
        Self { images: Vec::new() }
    }

    /// Adds an entry that fails to load.
    #[must_use]
    pub fn with_broken(mut self, path: impl Into<String>) -> Self {
        self.images.push((path.into(), None));
        self
    }
}

impl ImageSource for MockImageSource {
    fn images(
        &self,
    ) -> Box<dyn Iterator<Item = (String, anyhow::Result<ImageInfo>)> + Send + '_> {
        Box::new(self.images.iter().map(|(path, info)| {
            let result = info
                .clone()
                .ok_or_else(|| anyhow::anyhow!("mock decode failure for {path}"));
            (path.clone(), result)
        }))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.images.len())
    }
}

/// Mock implementation of `ResultOutput` for testing.
///
/// Captures reports for later assertions.
pub struct MockResultOutput {
    reports: Arc<Mutex<Vec<ClassificationReport>>>,
    flush_count: Arc<Mutex<usize>>,
}

impl MockResultOutput {
    /// Creates a new mock output.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reports: Arc::new(Mutex::new(Vec::new())),
            flush_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Returns all captured reports.
    #[must_use]
    pub fn reports(&self) -> Vec<ClassificationReport> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of times `flush()` was called.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        *self
            .flush_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockResultOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultOutput for MockResultOutput {
    fn write(&self, report: &ClassificationReport) -> anyhow::Result<()> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(report.clone());
        Ok(())
    }

    fn flush(&self) -> anyhow::Result<()> {
        if let Ok(mut c) = self.flush_count.lock() {
            *c += 1;
        }
        Ok(())
    }
}
