use std::fmt::{self, Display};

use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis, s};
use serde::{Deserialize, Serialize};

use crate::error::OpErr;

/// The number of channels of a color input.
pub const COLOR_CHANNELS: usize = 3;

/// Dimensions of an `Image` as (height, width, channels).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageShape {
    pub height: usize,
    pub width: usize,
    pub channels: usize,
}

impl ImageShape {
    pub fn new(height: usize, width: usize, channels: usize) -> Self {
        Self {
            height,
            width,
            channels,
        }
    }

    /// The total amount of samples.
    pub fn len(&self) -> usize {
        self.height * self.width * self.channels
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Display for ImageShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.height, self.width, self.channels)
    }
}

/// A dense image indexed by (row, column, channel).
///
/// Samples are `f32` in a normalized range. An `Image` is never modified once built, every
/// transform produces a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    data: Array3<f32>,
}

impl Image {
    /// Creates a new `Image` from an (height, width, channels) array.
    ///
    /// # Arguments
    /// * `data` - The samples.
    ///
    /// # Returns
    /// The image, or `OpErr::EmptyImage` if any of its axes is empty.
    pub fn new(data: Array3<f32>) -> Result<Self, OpErr> {
        if data.is_empty() {
            return Err(OpErr::EmptyImage);
        }

        Ok(Self { data })
    }

    /// Creates a new `Image` from interleaved samples in row-major order.
    ///
    /// # Arguments
    /// * `shape` - The dimensions of the image.
    /// * `samples` - `shape.len()` samples laid out as `[row][column][channel]`.
    pub fn from_shape_vec(shape: ImageShape, samples: Vec<f32>) -> Result<Self, OpErr> {
        if samples.len() != shape.len() {
            return Err(OpErr::ShapeMismatch {
                what: "samples",
                got: samples.len(),
                expected: shape.len(),
            });
        }

        let data = Array3::from_shape_vec((shape.height, shape.width, shape.channels), samples)
            .map_err(|_| OpErr::ShapeMismatch {
                what: "samples",
                got: shape.len(),
                expected: shape.len(),
            })?;

        Self::new(data)
    }

    /// Decodes 8-bit interleaved RGB samples into the normalized `[0, 1]` range.
    ///
    /// # Arguments
    /// * `height` - The amount of rows.
    /// * `width` - The amount of columns.
    /// * `raw` - `height * width * 3` bytes.
    pub fn from_rgb8(height: usize, width: usize, raw: &[u8]) -> Result<Self, OpErr> {
        let shape = ImageShape::new(height, width, COLOR_CHANNELS);
        let samples = raw.iter().map(|&b| b as f32 / 255.0).collect();
        Self::from_shape_vec(shape, samples)
    }

    /// Builds a single-channel image out of a plane.
    pub(crate) fn from_plane(plane: Array2<f32>) -> Self {
        Self {
            data: plane.insert_axis(Axis(2)),
        }
    }

    /// Wraps an array known to be non-empty.
    pub(crate) fn from_array(data: Array3<f32>) -> Self {
        debug_assert!(!data.is_empty());
        Self { data }
    }

    pub fn shape(&self) -> ImageShape {
        let (height, width, channels) = self.data.dim();
        ImageShape::new(height, width, channels)
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn channels(&self) -> usize {
        self.data.dim().2
    }

    pub fn view(&self) -> ArrayView3<'_, f32> {
        self.data.view()
    }

    /// A view over a single channel as a (height, width) plane.
    ///
    /// # Panics
    /// If `channel` is out of range.
    pub fn plane(&self, channel: usize) -> ArrayView2<'_, f32> {
        self.data.slice(s![.., .., channel])
    }

    pub fn get(&self, row: usize, col: usize, channel: usize) -> Option<f32> {
        self.data.get((row, col, channel)).copied()
    }

    pub fn into_inner(self) -> Array3<f32> {
        self.data
    }

    /// Encodes the image for display: samples are clamped to `[0, 1]` and quantized to 8 bits.
    ///
    /// # Returns
    /// Interleaved bytes in `[row][column][channel]` order.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.data
            .iter()
            .map(|&x| (x.clamp(0.0, 1.0) * 255.0).round() as u8)
            .collect()
    }
}
