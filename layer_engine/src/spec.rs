use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::kernels::Kernel;

/// Pooling aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolMode {
    Max,
    Avg,
}

/// The description of a single layer in the stack.
///
/// Each variant only carries what its kind needs. Kernel identifiers are kept as given so an
/// unsupported one surfaces as a stage error when the stack runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerSpec {
    Convolution {
        kernel: String,
        stride: NonZeroUsize,
        padding: usize,
    },
    MaxPool {
        window: NonZeroUsize,
        stride: NonZeroUsize,
        padding: usize,
    },
    AvgPool {
        window: NonZeroUsize,
        stride: NonZeroUsize,
        padding: usize,
    },
    Rectify,
    Normalize,
    Dropout {
        retention: f32,
    },
}
use LayerSpec::*;

impl LayerSpec {
    pub fn convolution(kernel: impl Into<String>, stride: NonZeroUsize, padding: usize) -> Self {
        Convolution {
            kernel: kernel.into(),
            stride,
            padding,
        }
    }

    pub fn max_pool(window: NonZeroUsize, stride: NonZeroUsize, padding: usize) -> Self {
        MaxPool {
            window,
            stride,
            padding,
        }
    }

    pub fn avg_pool(window: NonZeroUsize, stride: NonZeroUsize, padding: usize) -> Self {
        AvgPool {
            window,
            stride,
            padding,
        }
    }

    pub fn dropout(retention: f32) -> Self {
        Dropout { retention }
    }

    /// A short identifier of the layer kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Convolution { .. } => "convolution",
            MaxPool { .. } => "max_pool",
            AvgPool { .. } => "avg_pool",
            Rectify => "rectify",
            Normalize => "normalize",
            Dropout { .. } => "dropout",
        }
    }

    /// Explains in one sentence what this layer does to its input.
    pub fn describe(&self) -> String {
        match self {
            Convolution {
                kernel,
                stride,
                padding,
            } => {
                let effect = match Kernel::lookup(kernel) {
                    Ok(Kernel::Sharpen) => "boosts each pixel against its neighbours, sharpening detail",
                    Ok(Kernel::Blur) => "averages each 3x3 neighbourhood, smoothing the image",
                    Ok(Kernel::Gaussian) => "takes a centre-weighted average, a soft blur that keeps edges better than a box blur",
                    Ok(Kernel::SobelX) => "responds to horizontal intensity changes, highlighting vertical edges",
                    Ok(Kernel::SobelY) => "responds to vertical intensity changes, highlighting horizontal edges",
                    Ok(Kernel::Laplacian) => "responds to intensity changes in every direction, outlining edges",
                    Ok(Kernel::Emboss) => "subtracts one diagonal from the other, giving a raised relief look",
                    Ok(Kernel::EdgeEnhance) => "subtracts the left neighbour, emphasising horizontal transitions",
                    Ok(Kernel::Identity) => "passes every pixel through unchanged",
                    Err(_) => "uses an unsupported kernel",
                };
                format!(
                    "Convolution with the {kernel} kernel {effect}; stride {stride} and padding {padding} set the output size."
                )
            }
            MaxPool { window, stride, .. } => format!(
                "Max pooling keeps the strongest value of every {window}x{window} window, moving {stride} pixels at a time and shrinking the image."
            ),
            AvgPool { window, stride, .. } => format!(
                "Average pooling replaces every {window}x{window} window by its mean, moving {stride} pixels at a time and shrinking the image."
            ),
            Rectify => "ReLU sets every negative activation to zero and keeps positive ones as they are.".to_string(),
            Normalize => "Normalization shifts each channel to zero mean and unit standard deviation.".to_string(),
            Dropout { retention } => format!(
                "Dropout randomly zeroes about {:.0}% of the activations and scales the rest up to keep the average magnitude.",
                (1.0 - retention) * 100.0
            ),
        }
    }
}
