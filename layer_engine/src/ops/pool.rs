use ndarray::{Array2, ArrayView2, Axis, parallel::prelude::*, s};

use super::stack_planes;
use crate::{error::OpErr, geometry::Window, image::Image, spec::PoolMode};

/// Aggregates every `window`x`window` neighbourhood of each channel.
///
/// The geometry is the one of `correlate`. Padding is virtual: `Max` only looks at real pixels
/// while `Avg` counts padded positions as zeros and always divides by the full window area.
///
/// # Arguments
/// * `image` - The input image.
/// * `window` - The side of the pooling window.
/// * `stride` - Step between successive window positions.
/// * `padding` - Virtual border added on each side, at most half the window.
/// * `mode` - How the window gets aggregated.
pub fn pool(
    image: &Image,
    window: usize,
    stride: usize,
    padding: usize,
    mode: PoolMode,
) -> Result<Image, OpErr> {
    let window = Window::new(window, stride, padding);
    window.check_pool_padding()?;
    let out = window.output_dims((image.height(), image.width()))?;

    let planes = image
        .view()
        .axis_iter(Axis(2))
        .into_par_iter()
        .map(|plane| pool_plane(plane, window, out, mode))
        .collect();

    Ok(stack_planes(planes))
}

fn pool_plane(
    plane: ArrayView2<f32>,
    window: Window,
    out: (usize, usize),
    mode: PoolMode,
) -> Array2<f32> {
    let (height, width) = plane.dim();
    let area = (window.size * window.size) as f32;

    Array2::from_shape_fn(out, |(y, x)| {
        let (y0, y1) = window.span(y, height);
        let (x0, x1) = window.span(x, width);
        let patch = plane.slice(s![y0..y1, x0..x1]);

        match mode {
            PoolMode::Max => patch.fold(f32::NEG_INFINITY, |acc, &v| acc.max(v)),
            PoolMode::Avg => patch.sum() / area,
        }
    })
}

#[cfg(test)]
mod tests {
    use ndarray::{Array3, arr2};

    use super::*;

    fn from_plane(plane: Array2<f32>) -> Image {
        Image::from_plane(plane)
    }

    #[test]
    fn unit_window_is_a_no_op() {
        let data = Array3::from_shape_fn((4, 3, 3), |(y, x, c)| (y + 2 * x) as f32 - c as f32);
        let image = Image::new(data).unwrap();

        for mode in [PoolMode::Max, PoolMode::Avg] {
            assert_eq!(pool(&image, 1, 1, 0, mode).unwrap(), image);
        }
    }

    #[test]
    fn max_and_avg_2x2() {
        let image = from_plane(arr2(&[
            [1., 2., 5., 6.],
            [3., 4., 7., 8.],
            [-1., -2., 0., 0.],
            [-3., -4., 0., 4.],
        ]));

        let max = pool(&image, 2, 2, 0, PoolMode::Max).unwrap();
        let avg = pool(&image, 2, 2, 0, PoolMode::Avg).unwrap();

        assert_eq!(max.plane(0), arr2(&[[4., 8.], [-1., 4.]]));
        assert_eq!(avg.plane(0), arr2(&[[2.5, 6.5], [-2.5, 1.]]));
    }

    #[test]
    fn padding_never_wins_a_max() {
        let image = from_plane(arr2(&[[-1., -2.], [-3., -4.]]));

        let max = pool(&image, 2, 2, 1, PoolMode::Max).unwrap();
        let avg = pool(&image, 2, 2, 1, PoolMode::Avg).unwrap();

        assert_eq!(max.plane(0), arr2(&[[-1., -2.], [-3., -4.]]));
        assert_eq!(avg.plane(0), arr2(&[[-0.25, -0.5], [-0.75, -1.]]));
    }

    #[test]
    fn odd_sizes_drop_the_remainder() {
        let image = Image::new(Array3::ones((7, 5, 3))).unwrap();
        let out = pool(&image, 2, 2, 0, PoolMode::Max).unwrap();

        assert_eq!(out.shape().height, 3);
        assert_eq!(out.shape().width, 2);
        assert_eq!(out.shape().channels, 3);
    }

    #[test]
    fn rejects_excessive_padding() {
        let image = Image::new(Array3::ones((4, 4, 3))).unwrap();
        let err = pool(&image, 2, 2, 2, PoolMode::Avg).unwrap_err();

        assert!(matches!(err, OpErr::InvalidGeometry { padding: 2, .. }));
    }

    #[test]
    fn rejects_window_larger_than_input() {
        let image = Image::new(Array3::ones((2, 8, 3))).unwrap();
        let err = pool(&image, 3, 1, 0, PoolMode::Max).unwrap_err();

        assert!(matches!(err, OpErr::InvalidGeometry { axis: "height", .. }));
    }
}
