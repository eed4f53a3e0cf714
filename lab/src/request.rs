use std::{collections::BTreeMap, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A layer as the client describes it.
///
/// Omitted parameters take the service defaults: a conv layer is a 3x3 sharpen with stride 1
/// and padding 1, pools are 2x2 with a stride equal to their size, dropout drops 10%.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerConfig {
    Conv {
        #[serde(default = "default_kernel")]
        kernel_type: String,
        #[serde(default = "one")]
        stride: usize,
        #[serde(default = "one")]
        padding: usize,
    },
    Maxpool {
        #[serde(default = "two")]
        kernel_size: usize,
        #[serde(default)]
        stride: Option<usize>,
        #[serde(default)]
        padding: usize,
    },
    Avgpool {
        #[serde(default = "two")]
        kernel_size: usize,
        #[serde(default)]
        stride: Option<usize>,
        #[serde(default)]
        padding: usize,
    },
    Relu,
    Batchnorm,
    Dropout {
        #[serde(default = "default_dropout_rate")]
        dropout_rate: f32,
    },
}

fn default_kernel() -> String {
    "sharpen".to_string()
}

fn one() -> usize {
    1
}

fn two() -> usize {
    2
}

fn default_dropout_rate() -> f32 {
    0.1
}

/// A processing request: the layer stack plus what to report about it.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    /// Seeds the stochastic layers, the same id reproduces the same images.
    #[serde(default)]
    pub request_id: u64,
    pub layers: Vec<LayerConfig>,
    /// A pair of stage indices whose outputs get compared.
    #[serde(default)]
    pub compare: Option<(usize, usize)>,
    /// Externally written explanations keyed by stage index.
    #[serde(default)]
    pub explanations: BTreeMap<usize, String>,
}

impl Request {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_service() {
        let request = Request::from_json(
            r#"{"layers": [{"type": "conv"}, {"type": "maxpool"}, {"type": "dropout"}]}"#,
        )
        .unwrap();

        assert_eq!(request.request_id, 0);
        assert_eq!(
            request.layers,
            vec![
                LayerConfig::Conv {
                    kernel_type: "sharpen".into(),
                    stride: 1,
                    padding: 1
                },
                LayerConfig::Maxpool {
                    kernel_size: 2,
                    stride: None,
                    padding: 0
                },
                LayerConfig::Dropout { dropout_rate: 0.1 },
            ]
        );
    }

    #[test]
    fn full_request() {
        let request = Request::from_json(
            r#"{
                "request_id": 7,
                "layers": [
                    {"type": "conv", "kernel_type": "sobel_x", "stride": 1, "padding": 1, "out_channels": 3},
                    {"type": "relu"},
                    {"type": "avgpool", "kernel_size": 3, "stride": 1, "padding": 1},
                    {"type": "batchnorm"}
                ],
                "compare": [0, 1],
                "explanations": {"1": "edges pop out"}
            }"#,
        )
        .unwrap();

        assert_eq!(request.request_id, 7);
        assert_eq!(request.layers.len(), 4);
        assert_eq!(request.layers[1], LayerConfig::Relu);
        assert_eq!(request.compare, Some((0, 1)));
        assert_eq!(request.explanations.get(&1).map(String::as_str), Some("edges pop out"));
    }

    #[test]
    fn unknown_layer_type() {
        let err = Request::from_json(r#"{"layers": [{"type": "lstm"}]}"#).unwrap_err();
        assert!(err.to_string().contains("malformed request"));
    }
}
