use log::debug;

use crate::{
    config::EngineConfig,
    error::{EngineErr, Result},
    image::Image,
    ops,
    receptive::{ReceptiveField, Tracker},
    spec::LayerSpec,
    visualize::{self, StatisticsRecord},
};

/// One entry of a `PipelineResult`: a layer together with its output.
#[derive(Debug, Clone)]
pub struct Stage {
    layer: Option<LayerSpec>,
    image: Image,
    field: ReceptiveField,
}

impl Stage {
    /// The layer that produced this stage, `None` for the input stage.
    pub fn layer(&self) -> Option<&LayerSpec> {
        self.layer.as_ref()
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn field(&self) -> ReceptiveField {
        self.field
    }

    /// `"input"` for the input stage, the layer kind otherwise.
    pub fn label(&self) -> &'static str {
        self.layer.as_ref().map_or("input", LayerSpec::kind)
    }
}

/// Every intermediate image of a run: the input first, then one stage per layer.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    stages: Vec<Stage>,
}

impl PipelineResult {
    /// The amount of stages, always the amount of layers plus one.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stage> {
        self.stages.iter()
    }

    /// Returns the stage at `index` or `EngineErr::StageOutOfRange`.
    pub fn stage(&self, index: usize) -> Result<&Stage> {
        self.stages.get(index).ok_or(EngineErr::StageOutOfRange {
            index,
            len: self.stages.len(),
        })
    }

    /// The output of the last layer (the input itself for an empty stack).
    pub fn output(&self) -> &Image {
        // A result always holds at least the input stage.
        &self.stages[self.stages.len() - 1].image
    }

    /// Activation statistics of every stage, in order.
    pub fn statistics(&self, config: &EngineConfig) -> Vec<StatisticsRecord> {
        self.stages
            .iter()
            .map(|stage| visualize::statistics(&stage.image, config.sparsity_threshold()))
            .collect()
    }
}

/// Runs an ordered layer stack over an image.
///
/// A `Pipeline` holds no state between runs. The request id only seeds the stochastic layers,
/// so the same request always produces the same images.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: EngineConfig,
    request_id: u64,
}

impl Pipeline {
    /// Creates a new `Pipeline`.
    ///
    /// # Arguments
    /// * `config` - Numerical constants for the layers.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            request_id: 0,
        }
    }

    pub fn with_request_id(self, request_id: u64) -> Self {
        Self { request_id, ..self }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    /// Applies `specs` in order, each layer consuming the previous one's output.
    ///
    /// # Arguments
    /// * `input` - The image to transform.
    /// * `specs` - The ordered layers.
    ///
    /// # Returns
    /// A result with `specs.len() + 1` stages, or the first failing layer as
    /// `EngineErr::Layer`. Nothing is returned for the layers before a failure.
    pub fn run(&self, input: &Image, specs: &[LayerSpec]) -> Result<PipelineResult> {
        let mut tracker = Tracker::new(input.height(), input.width());
        let mut stages = Vec::with_capacity(specs.len() + 1);
        stages.push(Stage {
            layer: None,
            image: input.clone(),
            field: tracker.current(),
        });

        for (i, spec) in specs.iter().enumerate() {
            let field = tracker.push(spec).map_err(|cause| EngineErr::at(i, cause))?;
            let seed = stage_seed(self.request_id, i);
            let current = &stages[stages.len() - 1].image;
            let image = ops::apply(spec, current, &self.config, seed)
                .map_err(|cause| EngineErr::at(i, cause))?;

            debug_assert_eq!((image.height(), image.width()), (field.height, field.width));
            debug!(stage = i, kind = spec.kind(); "layer applied, output {}", image.shape());

            stages.push(Stage {
                layer: Some(spec.clone()),
                image,
                field,
            });
        }

        Ok(PipelineResult { stages })
    }
}

/// Derives the seed of a stage from its request, mixing both with SplitMix64.
pub fn stage_seed(request_id: u64, index: usize) -> u64 {
    let mut z = request_id
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(index as u64)
        .wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
