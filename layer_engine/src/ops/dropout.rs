use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Bernoulli, Distribution};

use crate::{error::OpErr, image::Image};

/// Keeps each sample with probability `retention` and zeroes it otherwise; kept samples are
/// scaled by `1 / retention` so the expected magnitude is preserved.
///
/// # Arguments
/// * `image` - The input image.
/// * `retention` - Probability of keeping a sample, in `(0, 1]`. `1` is the identity.
/// * `seed` - Seed of the mask's random stream, the same seed always draws the same mask.
///
/// # Returns
/// The masked image or `OpErr::InvalidProbability`.
pub fn dropout(image: &Image, retention: f32, seed: u64) -> Result<Image, OpErr> {
    if !(retention > 0.0 && retention <= 1.0) {
        return Err(OpErr::InvalidProbability(retention));
    }

    if retention == 1.0 {
        return Ok(image.clone());
    }

    let keep =
        Bernoulli::new(retention as f64).map_err(|_| OpErr::InvalidProbability(retention))?;
    let mut rng = StdRng::seed_from_u64(seed);

    let data = image.view().mapv(|x| {
        if keep.sample(&mut rng) {
            x / retention
        } else {
            0.0
        }
    });

    Ok(Image::from_array(data))
}

#[cfg(test)]
mod tests {
    use ndarray::Array3;

    use super::*;

    fn ones() -> Image {
        Image::new(Array3::ones((16, 16, 3))).unwrap()
    }

    #[test]
    fn same_seed_same_mask() {
        let a = dropout(&ones(), 0.5, 42).unwrap();
        let b = dropout(&ones(), 0.5, 42).unwrap();

        assert_eq!(a.to_bytes(), b.to_bytes());
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let a = dropout(&ones(), 0.5, 1).unwrap();
        let b = dropout(&ones(), 0.5, 2).unwrap();

        assert_ne!(a, b);
    }

    #[test]
    fn survivors_are_rescaled() {
        let out = dropout(&ones(), 0.25, 7).unwrap();

        assert!(out.view().iter().all(|&x| x == 0.0 || x == 4.0));

        let kept = out.view().iter().filter(|&&x| x > 0.0).count() as f32;
        let ratio = kept / out.shape().len() as f32;
        assert!((ratio - 0.25).abs() < 0.1, "kept ratio {ratio}");
    }

    #[test]
    fn full_retention_is_identity() {
        let image = ones();
        assert_eq!(dropout(&image, 1.0, 3).unwrap(), image);
    }

    #[test]
    fn rejects_out_of_range() {
        for p in [0.0, -0.5, 1.5, f32::NAN] {
            let err = dropout(&ones(), p, 0).unwrap_err();
            assert!(matches!(err, OpErr::InvalidProbability(_)));
        }
    }
}
