//! Transform primitives. Every function here is pure: it reads an `Image` and builds a new one.

mod correlate;
mod dropout;
mod normalize;
mod pool;
mod rectify;

use ndarray::{Array2, Array3};

pub use correlate::correlate;
pub use dropout::dropout;
pub use normalize::normalize;
pub use pool::pool;
pub use rectify::rectify;

use crate::{
    config::EngineConfig,
    error::OpErr,
    image::Image,
    kernels::Kernel,
    spec::{LayerSpec, PoolMode},
};

/// Applies a single layer to `image`.
///
/// # Arguments
/// * `spec` - The layer to apply.
/// * `image` - The layer's input.
/// * `config` - Numerical constants of the engine.
/// * `seed` - Seed for the stochastic layers, ignored by the deterministic ones.
///
/// # Returns
/// The layer's output or the primitive's failure.
pub fn apply(
    spec: &LayerSpec,
    image: &Image,
    config: &EngineConfig,
    seed: u64,
) -> Result<Image, OpErr> {
    match spec {
        LayerSpec::Convolution {
            kernel,
            stride,
            padding,
        } => {
            let kernel = Kernel::lookup(kernel)?;
            correlate(
                image,
                kernel.matrix().view(),
                kernel.factor(),
                stride.get(),
                *padding,
            )
        }
        LayerSpec::MaxPool {
            window,
            stride,
            padding,
        } => pool(image, window.get(), stride.get(), *padding, PoolMode::Max),
        LayerSpec::AvgPool {
            window,
            stride,
            padding,
        } => pool(image, window.get(), stride.get(), *padding, PoolMode::Avg),
        LayerSpec::Rectify => Ok(rectify(image)),
        LayerSpec::Normalize => Ok(normalize(image, config.norm_epsilon())),
        LayerSpec::Dropout { retention } => dropout(image, *retention, seed),
    }
}

/// Reassembles per-channel planes, all of the same size, into an image.
fn stack_planes(planes: Vec<Array2<f32>>) -> Image {
    let (height, width) = planes[0].dim();
    let data = Array3::from_shape_fn((height, width, planes.len()), |(y, x, c)| {
        planes[c][[y, x]]
    });

    Image::from_array(data)
}
