use std::num::NonZeroUsize;

use layer_engine::LayerSpec;

use crate::{
    error::{LabErr, Result},
    request::LayerConfig,
};

/// Turns client layer descriptions into engine layer specs.
pub struct Adapter;

impl Adapter {
    pub fn new() -> Self {
        Self
    }

    /// Validates and converts the whole stack.
    ///
    /// # Arguments
    /// * `layers` - The layers as sent by the client.
    ///
    /// # Returns
    /// The engine specs or `LabErr::InvalidRequest` naming the first offending layer.
    pub fn adapt_layers(&self, layers: &[LayerConfig]) -> Result<Vec<LayerSpec>> {
        if layers.is_empty() {
            return Err(LabErr::InvalidRequest(
                "at least one layer is required".into(),
            ));
        }

        layers
            .iter()
            .enumerate()
            .map(|(i, layer)| self.adapt_layer(i, layer))
            .collect()
    }

    fn adapt_layer(&self, i: usize, layer: &LayerConfig) -> Result<LayerSpec> {
        let spec = match layer {
            LayerConfig::Conv {
                kernel_type,
                stride,
                padding,
            } => LayerSpec::convolution(
                kernel_type.as_str(),
                positive(i, "stride", *stride)?,
                *padding,
            ),
            LayerConfig::Maxpool {
                kernel_size,
                stride,
                padding,
            } => {
                let window = positive(i, "kernel_size", *kernel_size)?;
                let stride = positive(i, "stride", stride.unwrap_or(*kernel_size))?;
                LayerSpec::max_pool(window, stride, *padding)
            }
            LayerConfig::Avgpool {
                kernel_size,
                stride,
                padding,
            } => {
                let window = positive(i, "kernel_size", *kernel_size)?;
                let stride = positive(i, "stride", stride.unwrap_or(*kernel_size))?;
                LayerSpec::avg_pool(window, stride, *padding)
            }
            LayerConfig::Relu => LayerSpec::Rectify,
            LayerConfig::Batchnorm => LayerSpec::Normalize,
            LayerConfig::Dropout { dropout_rate } => {
                if !(0.0..1.0).contains(dropout_rate) {
                    return Err(LabErr::InvalidRequest(format!(
                        "layer {i}: dropout_rate must be in [0, 1), got {dropout_rate}"
                    )));
                }
                LayerSpec::dropout(1.0 - dropout_rate)
            }
        };

        Ok(spec)
    }
}

impl Default for Adapter {
    fn default() -> Self {
        Self::new()
    }
}

fn positive(i: usize, what: &str, value: usize) -> Result<NonZeroUsize> {
    NonZeroUsize::new(value).ok_or_else(|| {
        LabErr::InvalidRequest(format!("layer {i}: {what} must be greater than 0"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn adapts_every_kind() {
        let layers = [
            LayerConfig::Conv {
                kernel_type: "sobel_x".into(),
                stride: 1,
                padding: 1,
            },
            LayerConfig::Relu,
            LayerConfig::Maxpool {
                kernel_size: 2,
                stride: None,
                padding: 0,
            },
            LayerConfig::Avgpool {
                kernel_size: 3,
                stride: Some(1),
                padding: 1,
            },
            LayerConfig::Batchnorm,
            LayerConfig::Dropout { dropout_rate: 0.25 },
        ];

        let specs = Adapter::new().adapt_layers(&layers).unwrap();

        assert_eq!(
            specs,
            vec![
                LayerSpec::convolution("sobel_x", nz(1), 1),
                LayerSpec::Rectify,
                LayerSpec::max_pool(nz(2), nz(2), 0),
                LayerSpec::avg_pool(nz(3), nz(1), 1),
                LayerSpec::Normalize,
                LayerSpec::dropout(0.75),
            ]
        );
    }

    #[test]
    fn zero_dropout_keeps_everything() {
        let specs = Adapter::new()
            .adapt_layers(&[LayerConfig::Dropout { dropout_rate: 0.0 }])
            .unwrap();

        assert_eq!(specs, vec![LayerSpec::dropout(1.0)]);
    }

    #[test]
    fn rejects_empty_stacks() {
        let err = Adapter::new().adapt_layers(&[]).unwrap_err();
        assert!(matches!(err, LabErr::InvalidRequest(_)));
    }

    #[test]
    fn rejects_zero_stride() {
        let layers = [
            LayerConfig::Relu,
            LayerConfig::Conv {
                kernel_type: "blur".into(),
                stride: 0,
                padding: 0,
            },
        ];

        let err = Adapter::new().adapt_layers(&layers).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid request: layer 1: stride must be greater than 0"
        );
    }

    #[test]
    fn rejects_full_dropout() {
        let err = Adapter::new()
            .adapt_layers(&[LayerConfig::Dropout { dropout_rate: 1.0 }])
            .unwrap_err();

        assert!(matches!(err, LabErr::InvalidRequest(_)));
    }
}
