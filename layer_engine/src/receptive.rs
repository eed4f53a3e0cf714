use serde::{Deserialize, Serialize};

use crate::{
    error::{EngineErr, OpErr, Result},
    geometry::Window,
    kernels::Kernel,
    spec::LayerSpec,
};

/// Where a stage stands with respect to the input image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceptiveField {
    /// Side, in input pixels, of the region that determines one output pixel.
    pub extent: usize,
    /// Distance, in input pixels, between two neighbouring output pixels (cumulative stride).
    pub jump: usize,
    /// Output height after the stage.
    pub height: usize,
    /// Output width after the stage.
    pub width: usize,
}

impl ReceptiveField {
    /// The receptive field of the unmodified input: every pixel only sees itself.
    pub fn input(height: usize, width: usize) -> Self {
        Self {
            extent: 1,
            jump: 1,
            height,
            width,
        }
    }
}

/// Accumulates the receptive field over a stack of layers, one layer at a time.
///
/// Only layer parameters are looked at, never pixels.
#[derive(Debug, Clone)]
pub struct Tracker {
    current: ReceptiveField,
}

impl Tracker {
    /// Creates a new `Tracker` for an input of the given spatial size.
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            current: ReceptiveField::input(height, width),
        }
    }

    pub fn current(&self) -> ReceptiveField {
        self.current
    }

    /// Advances the tracker past `spec`.
    ///
    /// # Returns
    /// The receptive field after the layer, or the reason why the layer can't follow the
    /// current geometry. On error the tracker is left untouched.
    pub fn push(&mut self, spec: &LayerSpec) -> std::result::Result<ReceptiveField, OpErr> {
        let window = match spec {
            LayerSpec::Convolution {
                kernel,
                stride,
                padding,
            } => {
                let size = Kernel::lookup(kernel)?.size();
                Window::new(size, stride.get(), *padding)
            }
            LayerSpec::MaxPool {
                window,
                stride,
                padding,
            }
            | LayerSpec::AvgPool {
                window,
                stride,
                padding,
            } => {
                let window = Window::new(window.get(), stride.get(), *padding);
                window.check_pool_padding()?;
                window
            }
            LayerSpec::Rectify | LayerSpec::Normalize | LayerSpec::Dropout { .. } => {
                return Ok(self.current);
            }
        };

        let ReceptiveField {
            extent,
            jump,
            height,
            width,
        } = self.current;
        let (height, width) = window.output_dims((height, width))?;

        let overflow = |axis| OpErr::InvalidGeometry {
            axis,
            input: extent,
            window: window.size,
            stride: window.stride,
            padding: window.padding,
        };
        let extent = (window.size - 1)
            .checked_mul(jump)
            .and_then(|grow| grow.checked_add(extent))
            .ok_or_else(|| overflow("receptive field"))?;
        let jump = jump
            .checked_mul(window.stride)
            .ok_or_else(|| overflow("jump"))?;

        self.current = ReceptiveField {
            extent,
            jump,
            height,
            width,
        };

        Ok(self.current)
    }
}

/// Computes the receptive field after every layer of the stack.
///
/// # Arguments
/// * `height` - The input height.
/// * `width` - The input width.
/// * `specs` - The ordered layers.
///
/// # Returns
/// `specs.len() + 1` descriptors, the first one being the input's, or the first failing layer.
pub fn track(height: usize, width: usize, specs: &[LayerSpec]) -> Result<Vec<ReceptiveField>> {
    let mut tracker = Tracker::new(height, width);
    let mut fields = Vec::with_capacity(specs.len() + 1);
    fields.push(tracker.current());

    for (i, spec) in specs.iter().enumerate() {
        let field = tracker.push(spec).map_err(|cause| EngineErr::at(i, cause))?;
        fields.push(field);
    }

    Ok(fields)
}
