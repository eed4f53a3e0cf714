//! Layer engine: runs an ordered stack of image transformation layers (convolution kernels,
//! pooling, rectification, normalization, dropout) over an image, keeping every intermediate
//! stage together with its receptive field, and derives visualizations from the result.

pub mod config;
pub mod error;
pub mod geometry;
pub mod image;
pub mod kernels;
pub mod ops;
pub mod pipeline;
pub mod receptive;
pub mod spec;
pub mod visualize;

pub use config::EngineConfig;
pub use error::{EngineErr, OpErr, Result};
pub use image::{Image, ImageShape};
pub use kernels::Kernel;
pub use pipeline::{Pipeline, PipelineResult, Stage};
pub use receptive::{ReceptiveField, Tracker};
pub use spec::{LayerSpec, PoolMode};
pub use visualize::{StatisticsRecord, Visualization, VisualizeRequest, visualize};

/// Runs `specs` over `image` with the default configuration and request id 0.
///
/// # Returns
/// One stage per layer plus the input stage, or the first failing layer.
pub fn process(image: &Image, specs: &[LayerSpec]) -> Result<PipelineResult> {
    Pipeline::default().run(image, specs)
}
