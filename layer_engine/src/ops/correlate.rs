use ndarray::{Array2, ArrayView2, Axis, parallel::prelude::*, s};

use super::stack_planes;
use crate::{error::OpErr, geometry::Window, image::Image};

/// Slides `kernel` over every channel of the zero-padded `image` and takes the weighted sum of
/// each window divided by `factor` (cross-correlation, the kernel is not flipped).
///
/// # Arguments
/// * `image` - The input image.
/// * `kernel` - A square weight matrix.
/// * `factor` - The normalization factor of the kernel.
/// * `stride` - Step between successive window positions.
/// * `padding` - Zeros added on each spatial border.
///
/// # Returns
/// An image with the same channel count and
/// `floor((input + 2 * padding - kernel) / stride) + 1` rows and columns.
pub fn correlate(
    image: &Image,
    kernel: ArrayView2<f32>,
    factor: f32,
    stride: usize,
    padding: usize,
) -> Result<Image, OpErr> {
    let (rows, cols) = kernel.dim();
    if rows != cols {
        return Err(OpErr::ShapeMismatch {
            what: "kernel columns",
            got: cols,
            expected: rows,
        });
    }

    let window = Window::new(rows, stride, padding);
    let out = window.output_dims((image.height(), image.width()))?;

    let planes = image
        .view()
        .axis_iter(Axis(2))
        .into_par_iter()
        .map(|plane| correlate_plane(plane, kernel, factor, window, out))
        .collect();

    Ok(stack_planes(planes))
}

fn correlate_plane(
    plane: ArrayView2<f32>,
    kernel: ArrayView2<f32>,
    factor: f32,
    window: Window,
    out: (usize, usize),
) -> Array2<f32> {
    let (height, width) = plane.dim();

    // Padding is virtual: taps outside the plane are zeros and contribute nothing.
    Array2::from_shape_fn(out, |(y, x)| {
        let (y0, y1) = window.span(y, height);
        let (x0, x1) = window.span(x, width);
        if y0 == y1 || x0 == x1 {
            return 0.0;
        }

        let ky = y0 + window.padding - y * window.stride;
        let kx = x0 + window.padding - x * window.stride;

        let patch = plane.slice(s![y0..y1, x0..x1]);
        let taps = kernel.slice(s![ky..ky + (y1 - y0), kx..kx + (x1 - x0)]);
        let sum: f32 = patch.iter().zip(taps.iter()).map(|(&p, &k)| p * k).sum();
        sum / factor
    })
}

#[cfg(test)]
mod tests {
    use ndarray::{Array3, arr2};

    use super::*;
    use crate::kernels::Kernel;

    fn ramp(height: usize, width: usize, channels: usize) -> Image {
        let data = Array3::from_shape_fn((height, width, channels), |(y, x, c)| {
            (y * width + x) as f32 / 10.0 + c as f32
        });
        Image::new(data).unwrap()
    }

    #[test]
    fn identity_is_a_no_op() {
        let image = ramp(5, 4, 3);
        let kernel = Kernel::Identity;

        let out = correlate(&image, kernel.matrix().view(), kernel.factor(), 1, 0).unwrap();
        assert_eq!(out, image);
    }

    #[test]
    fn blur_of_a_constant_is_constant() {
        let image = Image::new(Array3::from_elem((4, 4, 3), 0.5)).unwrap();
        let kernel = Kernel::Blur;

        let out = correlate(&image, kernel.matrix().view(), kernel.factor(), 1, 0).unwrap();

        assert_eq!(out.shape().height, 2);
        assert_eq!(out.shape().width, 2);
        for &x in out.view().iter() {
            assert!((x - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn rejects_non_square_kernels() {
        let image = ramp(3, 4, 1);
        let kernel = arr2(&[[0., 0., 1.]]);

        let err = correlate(&image, kernel.view(), 1.0, 1, 0).unwrap_err();
        assert!(matches!(err, OpErr::ShapeMismatch { .. }));
    }

    #[test]
    fn not_flipped() {
        // Picks the right neighbour, a flipped kernel would pick the left one.
        let image = ramp(1, 4, 1);
        let kernel = arr2(&[[0., 0., 0.], [0., 0., 1.], [0., 0., 0.]]);
        let out = correlate(&image, kernel.view(), 1.0, 1, 1).unwrap();

        let row: Vec<f32> = out.plane(0).iter().copied().collect();
        assert_eq!(row, vec![0.1, 0.2, 0.3, 0.0]);
    }

    #[test]
    fn zero_padding_and_stride() {
        let image = Image::new(Array3::ones((5, 5, 1))).unwrap();
        let kernel = Array2::ones((3, 3));

        let out = correlate(&image, kernel.view(), 1.0, 2, 1).unwrap();

        assert_eq!(out.shape().height, 3);
        assert_eq!(out.shape().width, 3);
        // Corners see a 2x2 patch of ones, the centre a full 3x3 one.
        assert_eq!(out.get(0, 0, 0), Some(4.0));
        assert_eq!(out.get(1, 1, 0), Some(9.0));
        assert_eq!(out.get(0, 1, 0), Some(6.0));
    }

    #[test]
    fn padding_is_virtual() {
        // Only the middle window touches the plane, the others lie entirely in the padding.
        let image = Image::new(Array3::ones((4, 4, 2))).unwrap();
        let kernel = Kernel::Blur;

        let out = correlate(&image, kernel.matrix().view(), kernel.factor(), 1000, 1000).unwrap();

        assert_eq!(out.shape().height, 3);
        assert_eq!(out.shape().width, 3);
        for c in 0..2 {
            assert_eq!(
                out.plane(c),
                arr2(&[[0., 0., 0.], [0., 1., 0.], [0., 0., 0.]])
            );
        }
    }

    #[test]
    fn channels_are_independent() {
        let image = ramp(3, 3, 3);
        let kernel = Kernel::Laplacian;

        let out = correlate(&image, kernel.matrix().view(), kernel.factor(), 1, 0).unwrap();

        // A linear ramp has zero Laplacian regardless of the per-channel offset.
        assert_eq!(out.shape().channels, 3);
        for &x in out.view().iter() {
            assert!(x.abs() < 1e-5);
        }
    }

    #[test]
    fn too_small_for_the_kernel() {
        let image = ramp(2, 2, 3);
        let kernel = Kernel::Sharpen;

        let err = correlate(&image, kernel.matrix().view(), 1.0, 1, 0).unwrap_err();
        assert!(matches!(err, OpErr::InvalidGeometry { axis: "height", .. }));
    }
}
