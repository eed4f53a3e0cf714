/// Numerical constants shared by the pipeline and the visualizations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    norm_epsilon: f32,
    sparsity_threshold: f32,
}

impl EngineConfig {
    pub const DEFAULT_NORM_EPSILON: f32 = 1e-5;
    pub const DEFAULT_SPARSITY_THRESHOLD: f32 = 1e-3;

    /// Creates a new engine configuration.
    ///
    /// # Args
    /// * `norm_epsilon` - Added to a channel's standard deviation before dividing by it.
    /// * `sparsity_threshold` - Activations with an absolute value below this are near-zero.
    ///
    /// # Returns
    /// An `EngineConfig` instance.
    pub fn new(norm_epsilon: f32, sparsity_threshold: f32) -> Self {
        Self {
            norm_epsilon,
            sparsity_threshold,
        }
    }

    pub fn with_norm_epsilon(self, norm_epsilon: f32) -> Self {
        Self {
            norm_epsilon,
            ..self
        }
    }

    pub fn with_sparsity_threshold(self, sparsity_threshold: f32) -> Self {
        Self {
            sparsity_threshold,
            ..self
        }
    }

    /// Returns the normalization stabilizer.
    pub fn norm_epsilon(&self) -> f32 {
        self.norm_epsilon
    }

    /// Returns the near-zero cutoff used for sparsity.
    pub fn sparsity_threshold(&self) -> f32 {
        self.sparsity_threshold
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_NORM_EPSILON, Self::DEFAULT_SPARSITY_THRESHOLD)
    }
}
