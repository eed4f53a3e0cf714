use std::{fs, path::Path};

use layer_engine::{
    Pipeline,
    visualize::{delta, feature_maps, statistics},
};
use log::info;

use crate::{
    adapter::Adapter,
    codec,
    config::LabConfig,
    error::Result,
    report::{ComparisonReport, Report},
    request::Request,
};

/// File name of the rendered stage `i`.
pub fn stage_name(i: usize) -> String {
    format!("stage_{i}.png")
}

/// Runs the request at `request_path` over the image at `image_path` and writes every stage,
/// the optional feature maps and comparison, and `report.json` into `out_dir`.
///
/// # Arguments
/// * `config` - The lab's settings.
/// * `image_path` - The input image.
/// * `request_path` - The JSON request.
/// * `out_dir` - Created if missing.
///
/// # Returns
/// The report that was written.
pub fn run(
    config: &LabConfig,
    image_path: &Path,
    request_path: &Path,
    out_dir: &Path,
) -> Result<Report> {
    let request = Request::from_path(request_path)?;
    let specs = Adapter::new().adapt_layers(&request.layers)?;

    let input = codec::decode(image_path, config.max_side())?;
    info!(
        request_id = request.request_id;
        "processing {} through {} layers", input.shape(), specs.len()
    );

    let pipeline = Pipeline::new(config.engine()).with_request_id(request.request_id);
    let result = pipeline.run(&input, &specs)?;
    info!(
        request_id = request.request_id;
        "pipeline finished, output {}", result.output().shape()
    );

    fs::create_dir_all(out_dir)?;

    for (i, stage) in result.iter().enumerate() {
        codec::encode(stage.image(), out_dir.join(stage_name(i)))?;

        if config.feature_maps() {
            for (c, map) in feature_maps(stage.image()).iter().enumerate() {
                codec::encode(map, out_dir.join(format!("stage_{i}_channel_{c}.png")))?;
            }
        }
    }

    let records = result.statistics(pipeline.config());
    let mut report = Report::new(
        request.request_id,
        &result,
        &records,
        &request.explanations,
        stage_name,
    );

    if let Some((a, b)) = request.compare {
        let delta = delta(result.stage(a)?.image(), result.stage(b)?.image())?;
        let image = format!("delta_{a}_{b}.png");
        codec::encode(&delta, out_dir.join(&image))?;

        report = report.with_comparison(ComparisonReport {
            a,
            b,
            statistics: statistics(&delta, pipeline.config().sparsity_threshold()),
            image,
        });
    }

    fs::write(out_dir.join("report.json"), serde_json::to_string_pretty(&report)?)?;
    info!("wrote {} stages to {}", result.len(), out_dir.display());

    Ok(report)
}
