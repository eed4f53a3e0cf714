use crate::image::Image;

/// Elementwise `max(0, x)`.
pub fn rectify(image: &Image) -> Image {
    Image::from_array(image.view().mapv(|x| x.max(0.0)))
}

#[cfg(test)]
mod tests {
    use ndarray::Array3;

    use super::*;

    fn signed() -> Image {
        let data = Array3::from_shape_fn((3, 4, 3), |(y, x, c)| {
            (y as f32 - 1.0) * (x as f32 - 1.5) + c as f32 * 0.25
        });
        Image::new(data).unwrap()
    }

    #[test]
    fn clamps_negatives() {
        let out = rectify(&signed());

        assert!(out.view().iter().all(|&x| x >= 0.0));
        assert_eq!(out.get(0, 3, 0), Some(0.0));
        assert_eq!(out.get(2, 3, 0), Some(1.5));
    }

    #[test]
    fn idempotent() {
        let once = rectify(&signed());
        assert_eq!(rectify(&once), once);
    }
}
