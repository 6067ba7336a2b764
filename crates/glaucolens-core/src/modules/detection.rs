//! Inference adapter: image in, verdict out.

use std::sync::Arc;

use image::DynamicImage;
use tracing::debug;

use crate::domain::{DetectionError, DetectionOutcome, PredictionScore, Verdict};
use crate::inference::preprocess;
use crate::ports::ScoreModel;

/// Turns fundus images into verdicts using an injected model.
///
/// The model is constructed once at startup and shared; the adapter never
/// mutates or reloads it.
#[derive(Clone)]
pub struct InferenceAdapter {
    model: Arc<dyn ScoreModel>,
}

impl InferenceAdapter {
    /// Creates an adapter around an already loaded model.
    #[must_use]
    pub fn new(model: Arc<dyn ScoreModel>) -> Self {
        Self { model }
    }

    /// Classifies an image.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be preprocessed or the model
    /// fails or returns a score outside `[0, 1]`.
    pub fn classify(&self, image: &DynamicImage) -> Result<Verdict, DetectionError> {
        self.classify_scored(image).map(|(_, verdict)| verdict)
    }

    /// Classifies an image, also returning the raw score.
    ///
    /// # Errors
    ///
    /// Same as [`InferenceAdapter::classify`].
    pub fn classify_scored(
        &self,
        image: &DynamicImage,
    ) -> Result<(PredictionScore, Verdict), DetectionError> {
        let input = preprocess(image)?;

        let raw = self
            .model
            .predict(&input)
            .map_err(|e| DetectionError::Inference {
                reason: format!("{e:#}"),
            })?;

        let score = PredictionScore::new(raw).ok_or_else(|| DetectionError::Inference {
            reason: format!("model returned score {raw} outside [0, 1]"),
        })?;
        let verdict = Verdict::from_score(score);

        debug!("Classified fundus: score={:.4}, verdict={verdict}", score.value());
        Ok((score, verdict))
    }

    /// Evaluates one interaction with the detection view.
    ///
    /// `decoded` is `None` when nothing was uploaded, or the result of
    /// decoding the upload otherwise.
    ///
    /// # Errors
    ///
    /// Only inference failures are returned; rejected uploads become
    /// [`DetectionOutcome::Rejected`].
    pub fn evaluate(
        &self,
        decoded: Option<Result<DynamicImage, DetectionError>>,
    ) -> Result<DetectionOutcome, DetectionError> {
        let image = match decoded {
            None => return Ok(DetectionOutcome::NoUploadYet),
            Some(Err(e)) if e.is_user_error() => {
                return Ok(DetectionOutcome::Rejected {
                    message: e.to_string(),
                })
            }
            Some(Err(e)) => return Err(e),
            Some(Ok(image)) => image,
        };

        match self.classify_scored(&image) {
            Ok((score, verdict)) => Ok(DetectionOutcome::Classified { score, verdict }),
            Err(e) if e.is_user_error() => Ok(DetectionOutcome::Rejected {
                message: e.to_string(),
            }),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::NormalizedTensor;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedModel {
        score: f32,
        calls: AtomicUsize,
    }

    impl FixedModel {
        fn new(score: f32) -> Arc<Self> {
            Arc::new(Self {
                score,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl ScoreModel for FixedModel {
        fn predict(&self, input: &NormalizedTensor) -> anyhow::Result<f32> {
            assert_eq!(input.shape(), [1, 100, 100, 3]);
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.score)
        }
    }

    struct FailingModel;

    impl ScoreModel for FailingModel {
        fn predict(&self, _input: &NormalizedTensor) -> anyhow::Result<f32> {
            anyhow::bail!("device lost")
        }
    }

    fn fundus() -> DynamicImage {
        DynamicImage::new_rgb8(320, 240)
    }

    #[test]
    fn test_boundary_scores() {
        let at = InferenceAdapter::new(FixedModel::new(0.5));
        assert_eq!(at.classify(&fundus()).ok(), Some(Verdict::GlaucomaSuspected));

        let above = InferenceAdapter::new(FixedModel::new(0.500_000_1));
        assert_eq!(above.classify(&fundus()).ok(), Some(Verdict::Healthy));
    }

    #[test]
    fn test_classify_is_deterministic() {
        let model = FixedModel::new(0.73);
        let adapter = InferenceAdapter::new(model.clone());
        let image = fundus();
        let first = adapter.classify(&image).ok();
        for _ in 0..5 {
            assert_eq!(adapter.classify(&image).ok(), first);
        }
        assert_eq!(model.calls.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn test_out_of_range_score_is_inference_error() {
        let adapter = InferenceAdapter::new(FixedModel::new(1.7));
        assert!(matches!(
            adapter.classify(&fundus()),
            Err(DetectionError::Inference { .. })
        ));
    }

    #[test]
    fn test_model_failure_is_inference_error() {
        let adapter = InferenceAdapter::new(Arc::new(FailingModel));
        let err = adapter.classify(&fundus()).err();
        assert!(matches!(err, Some(DetectionError::Inference { ref reason }) if reason.contains("device lost")));
    }

    #[test]
    fn test_evaluate_without_upload() {
        let model = FixedModel::new(0.9);
        let adapter = InferenceAdapter::new(model.clone());
        assert_eq!(adapter.evaluate(None).ok(), Some(DetectionOutcome::NoUploadYet));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_evaluate_rejected_upload() {
        let adapter = InferenceAdapter::new(FixedModel::new(0.9));
        let outcome = adapter
            .evaluate(Some(Err(DetectionError::unsupported("not an image"))))
            .ok();
        assert!(matches!(
            outcome,
            Some(DetectionOutcome::Rejected { ref message }) if message.contains("not an image")
        ));
    }

    #[test]
    fn test_evaluate_classified_upload() {
        let adapter = InferenceAdapter::new(FixedModel::new(0.2));
        let outcome = adapter.evaluate(Some(Ok(fundus()))).ok();
        assert!(matches!(
            outcome,
            Some(DetectionOutcome::Classified {
                verdict: Verdict::GlaucomaSuspected,
                ..
            })
        ));
    }
}
