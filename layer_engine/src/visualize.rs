use ndarray::Zip;
use serde::{Deserialize, Serialize};

use crate::{
    config::EngineConfig,
    error::{EngineErr, Result},
    image::Image,
    pipeline::PipelineResult,
};

/// Activation statistics of a single stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatisticsRecord {
    pub mean: f32,
    /// Population standard deviation.
    pub std: f32,
    /// Fraction of samples whose absolute value is below the sparsity threshold.
    pub sparsity: f32,
    pub min: f32,
    pub max: f32,
}

/// What to derive from a `PipelineResult`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VisualizeRequest {
    FeatureMaps { stage: usize },
    Statistics { stage: usize },
    Compare { a: usize, b: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Visualization {
    FeatureMaps(Vec<Image>),
    Statistics(StatisticsRecord),
    Delta(Image),
}

/// Splits an image into one single-channel image per channel.
pub fn feature_maps(image: &Image) -> Vec<Image> {
    (0..image.channels())
        .map(|c| Image::from_plane(image.plane(c).to_owned()))
        .collect()
}

/// Computes the mean, standard deviation, sparsity and range of every sample of `image`.
///
/// # Arguments
/// * `image` - The stage output.
/// * `threshold` - Samples with `|x| < threshold` count as near-zero.
pub fn statistics(image: &Image, threshold: f32) -> StatisticsRecord {
    let view = image.view();
    let n = view.len() as f64;

    let mean = view.iter().map(|&x| x as f64).sum::<f64>() / n;
    let var = view.iter().map(|&x| (x as f64 - mean).powi(2)).sum::<f64>() / n;
    let near_zero = view.iter().filter(|&&x| x.abs() < threshold).count();
    let (min, max) = view
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        });

    StatisticsRecord {
        mean: mean as f32,
        std: var.sqrt() as f32,
        sparsity: (near_zero as f64 / n) as f32,
        min,
        max,
    }
}

/// Computes `|a - b|` elementwise.
///
/// # Returns
/// The delta image, or `EngineErr::IncompatibleShapes` unless both images have the same shape.
pub fn delta(a: &Image, b: &Image) -> Result<Image> {
    if a.shape() != b.shape() {
        return Err(EngineErr::IncompatibleShapes {
            a: a.shape(),
            b: b.shape(),
        });
    }

    let data = Zip::from(a.view())
        .and(b.view())
        .map_collect(|&x, &y| (x - y).abs());

    Ok(Image::from_array(data))
}

/// Derives a visualization from a completed run.
///
/// # Arguments
/// * `result` - The pipeline's output.
/// * `request` - What to derive.
/// * `config` - Supplies the sparsity threshold.
///
/// # Returns
/// The visualization or an error if a stage index is out of range or a comparison is
/// between differently shaped stages.
pub fn visualize(
    result: &PipelineResult,
    request: VisualizeRequest,
    config: &EngineConfig,
) -> Result<Visualization> {
    let visualization = match request {
        VisualizeRequest::FeatureMaps { stage } => {
            Visualization::FeatureMaps(feature_maps(result.stage(stage)?.image()))
        }
        VisualizeRequest::Statistics { stage } => Visualization::Statistics(statistics(
            result.stage(stage)?.image(),
            config.sparsity_threshold(),
        )),
        VisualizeRequest::Compare { a, b } => {
            let a = result.stage(a)?.image();
            let b = result.stage(b)?.image();
            Visualization::Delta(delta(a, b)?)
        }
    };

    Ok(visualization)
}
