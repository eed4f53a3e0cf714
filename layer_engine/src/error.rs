use std::{
    error::Error,
    fmt::{self, Display},
};

use crate::image::ImageShape;

/// The result type used in the entire layer engine.
pub type Result<T> = std::result::Result<T, EngineErr>;

/// Failures of a single transform primitive or kernel lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum OpErr {
    /// The kernel identifier is not one of the supported kernels.
    UnknownKernel(String),
    /// The window, stride and padding combination yields no output along `axis`.
    InvalidGeometry {
        axis: &'static str,
        input: usize,
        window: usize,
        stride: usize,
        padding: usize,
    },
    /// A dropout retention probability outside of `(0, 1]`.
    InvalidProbability(f32),
    /// An image with no rows, columns or channels.
    EmptyImage,
    /// A raw buffer whose length disagrees with the declared dimensions.
    ShapeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
}

impl Display for OpErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpErr::UnknownKernel(name) => write!(f, "unknown kernel '{name}'"),
            OpErr::InvalidGeometry {
                axis,
                input,
                window,
                stride,
                padding,
            } => write!(
                f,
                "invalid geometry along {axis}: input {input}, window {window}, stride {stride} and padding {padding} leave no output"
            ),
            OpErr::InvalidProbability(p) => {
                write!(f, "retention probability must be in (0, 1], got {p}")
            }
            OpErr::EmptyImage => write!(f, "the image has no pixels"),
            OpErr::ShapeMismatch {
                what,
                got,
                expected,
            } => write!(f, "shape mismatch for {what}: got {got}, expected {expected}"),
        }
    }
}

impl Error for OpErr {}

/// The layer engine's error type.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineErr {
    /// The stage at `index` (0-based over the layer list) failed.
    Layer { index: usize, cause: OpErr },
    /// Two stages were compared whose outputs differ in shape.
    IncompatibleShapes { a: ImageShape, b: ImageShape },
    /// A visualization referenced a stage the result doesn't have.
    StageOutOfRange { index: usize, len: usize },
}

impl EngineErr {
    /// Wraps a primitive failure with the position of the failing layer.
    pub fn at(index: usize, cause: OpErr) -> Self {
        Self::Layer { index, cause }
    }
}

impl Display for EngineErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineErr::Layer { index, cause } => write!(f, "layer {index} failed: {cause}"),
            EngineErr::IncompatibleShapes { a, b } => {
                write!(f, "cannot compare stages with shapes {a} and {b}")
            }
            EngineErr::StageOutOfRange { index, len } => {
                write!(f, "stage {index} out of range, the result has {len} stages")
            }
        }
    }
}

impl Error for EngineErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EngineErr::Layer { cause, .. } => Some(cause),
            _ => None,
        }
    }
}
