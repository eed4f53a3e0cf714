use ndarray::{Array2, ArrayView2, Axis};

use super::stack_planes;
use crate::image::Image;

/// Shifts every channel to zero mean and scales it by `1 / (std + epsilon)`.
///
/// The standard deviation is the sample one (`n - 1` denominator) except for single-pixel
/// channels. Statistics are accumulated in `f64`.
pub fn normalize(image: &Image, epsilon: f32) -> Image {
    let planes = image
        .view()
        .axis_iter(Axis(2))
        .map(|plane| normalize_plane(plane, epsilon as f64))
        .collect();

    stack_planes(planes)
}

fn normalize_plane(plane: ArrayView2<f32>, epsilon: f64) -> Array2<f32> {
    let n = plane.len() as f64;
    let mean = plane.iter().map(|&x| x as f64).sum::<f64>() / n;

    let dof = if plane.len() > 1 { n - 1.0 } else { n };
    let var = plane.iter().map(|&x| (x as f64 - mean).powi(2)).sum::<f64>() / dof;
    let scale = var.sqrt() + epsilon;

    plane.mapv(|x| ((x as f64 - mean) / scale) as f32)
}

#[cfg(test)]
mod tests {
    use ndarray::{Array3, arr2};

    use super::*;

    #[test]
    fn zero_mean_unit_std() {
        let data = Array3::from_shape_fn((4, 5, 3), |(y, x, c)| {
            (y * 5 + x) as f32 * (c + 1) as f32 + 3.0
        });
        let image = Image::new(data).unwrap();

        let out = normalize(&image, 1e-5);

        for c in 0..3 {
            let plane = out.plane(c);
            let n = plane.len() as f32;
            let mean = plane.sum() / n;
            let var = plane.iter().map(|&x| (x - mean).powi(2)).sum::<f32>() / (n - 1.0);

            assert!(mean.abs() < 1e-5, "channel {c} mean {mean}");
            assert!((var.sqrt() - 1.0).abs() < 1e-3, "channel {c} std {}", var.sqrt());
        }
    }

    #[test]
    fn constant_channel_becomes_zero() {
        let image = Image::new(Array3::from_elem((3, 3, 3), 0.7)).unwrap();
        let out = normalize(&image, 1e-5);

        assert!(out.view().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn single_pixel() {
        let image = Image::from_plane(arr2(&[[0.3]]));
        let out = normalize(&image, 1e-5);

        assert_eq!(out.get(0, 0, 0), Some(0.0));
    }

    #[test]
    fn produces_negatives() {
        let image = Image::from_plane(arr2(&[[0.0, 1.0], [0.0, 1.0]]));
        let out = normalize(&image, 0.0);

        assert!(out.get(0, 0, 0).unwrap() < 0.0);
        assert!(out.get(0, 1, 0).unwrap() > 0.0);
    }
}
