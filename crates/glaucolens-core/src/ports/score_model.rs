//! Classifier port used by the inference adapter.

use crate::inference::NormalizedTensor;

/// A loaded, read-only image classifier.
///
/// Implementations must be safe to call concurrently; the model is never
/// mutated after construction.
pub trait ScoreModel: Send + Sync {
    /// Returns the probability that the fundus shown in `input` is healthy.
    ///
    /// # Errors
    ///
    /// Returns an error if the forward pass fails.
    fn predict(&self, input: &NormalizedTensor) -> anyhow::Result<f32>;
}
