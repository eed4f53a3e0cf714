use std::collections::BTreeMap;

use layer_engine::{ImageShape, LayerSpec, PipelineResult, StatisticsRecord};
use log::warn;
use serde::Serialize;

/// What the lab reports about a single stage.
#[derive(Debug, Serialize)]
pub struct StageReport {
    /// `None` for the input stage.
    pub layer_index: Option<usize>,
    pub layer_type: &'static str,
    pub layer: Option<LayerSpec>,
    pub output_shape: ImageShape,
    pub receptive_field: usize,
    pub jump: usize,
    pub statistics: StatisticsRecord,
    pub explanation: String,
    /// File name of the rendered stage, relative to the output directory.
    pub image: String,
}

/// The comparison between two stages.
#[derive(Debug, Serialize)]
pub struct ComparisonReport {
    pub a: usize,
    pub b: usize,
    pub statistics: StatisticsRecord,
    pub image: String,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub request_id: u64,
    pub stages: Vec<StageReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonReport>,
}

impl Report {
    /// Builds the report of a completed run.
    ///
    /// # Arguments
    /// * `request_id` - The id that seeded the run.
    /// * `result` - The pipeline's output.
    /// * `statistics` - One record per stage.
    /// * `explanations` - Externally provided explanations by stage index, the layer's own
    ///   description is used for the rest.
    /// * `image_name` - Names the rendered file of a stage.
    pub fn new<F>(
        request_id: u64,
        result: &PipelineResult,
        statistics: &[StatisticsRecord],
        explanations: &BTreeMap<usize, String>,
        image_name: F,
    ) -> Self
    where
        F: Fn(usize) -> String,
    {
        for &index in explanations.keys() {
            if index >= result.len() {
                warn!(stage = index; "explanation for a stage that doesn't exist, ignoring it");
            }
        }

        let stages = result
            .iter()
            .zip(statistics)
            .enumerate()
            .map(|(i, (stage, &statistics))| {
                let field = stage.field();
                let explanation = explanations.get(&i).cloned().unwrap_or_else(|| {
                    stage.layer().map_or_else(
                        || "The unmodified input image.".to_string(),
                        LayerSpec::describe,
                    )
                });

                StageReport {
                    layer_index: i.checked_sub(1),
                    layer_type: stage.label(),
                    layer: stage.layer().cloned(),
                    output_shape: stage.image().shape(),
                    receptive_field: field.extent,
                    jump: field.jump,
                    statistics,
                    explanation,
                    image: image_name(i),
                }
            })
            .collect();

        Self {
            request_id,
            stages,
            comparison: None,
        }
    }

    pub fn with_comparison(self, comparison: ComparisonReport) -> Self {
        Self {
            comparison: Some(comparison),
            ..self
        }
    }
}
