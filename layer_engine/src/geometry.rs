use crate::error::OpErr;

/// A square sliding window over the spatial axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub size: usize,
    pub stride: usize,
    pub padding: usize,
}

impl Window {
    pub fn new(size: usize, stride: usize, padding: usize) -> Self {
        Self {
            size,
            stride,
            padding,
        }
    }

    /// Computes how many window positions fit along one axis:
    /// `floor((input + 2 * padding - size) / stride) + 1`.
    ///
    /// # Arguments
    /// * `axis` - The axis name, for error reporting.
    /// * `input` - The input length along that axis.
    ///
    /// # Returns
    /// The output length or `OpErr::InvalidGeometry` if it would not be positive.
    pub fn output_len(&self, axis: &'static str, input: usize) -> Result<usize, OpErr> {
        let invalid = || OpErr::InvalidGeometry {
            axis,
            input,
            window: self.size,
            stride: self.stride,
            padding: self.padding,
        };

        if self.size == 0 || self.stride == 0 || input == 0 {
            return Err(invalid());
        }

        let span = self
            .padding
            .checked_mul(2)
            .and_then(|p| p.checked_add(input))
            .ok_or_else(invalid)?;
        if span < self.size {
            return Err(invalid());
        }

        Ok((span - self.size) / self.stride + 1)
    }

    /// Output (height, width) for an input of (height, width).
    pub fn output_dims(&self, (height, width): (usize, usize)) -> Result<(usize, usize), OpErr> {
        Ok((
            self.output_len("height", height)?,
            self.output_len("width", width)?,
        ))
    }

    /// Pooling windows may not be padded beyond half their size, otherwise a window could hold
    /// nothing but padding.
    pub fn check_pool_padding(&self) -> Result<(), OpErr> {
        if self.padding > self.size / 2 {
            return Err(OpErr::InvalidGeometry {
                axis: "padding",
                input: 0,
                window: self.size,
                stride: self.stride,
                padding: self.padding,
            });
        }

        Ok(())
    }

    /// The input index range covered by the `i`-th output position, clipped to `[0, input)`.
    ///
    /// Positions are taken in padded coordinates, so the window starts at `i * stride - padding`
    /// in input coordinates. A window lying entirely in the padding yields an empty range.
    pub(crate) fn span(&self, i: usize, input: usize) -> (usize, usize) {
        let start = i.saturating_mul(self.stride);
        let end = start.saturating_add(self.size);
        let lo = start.saturating_sub(self.padding).min(input);
        let hi = end.saturating_sub(self.padding).min(input);
        (lo, hi.max(lo))
    }
}
