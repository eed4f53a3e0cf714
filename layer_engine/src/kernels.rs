use std::{fmt, str::FromStr};

use ndarray::{Array2, arr2};
use serde::{Deserialize, Serialize};

use crate::error::OpErr;

/// The fixed convolution kernels a `Convolution` layer can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Kernel {
    Sharpen,
    Blur,
    Gaussian,
    SobelX,
    SobelY,
    Laplacian,
    Emboss,
    EdgeEnhance,
    Identity,
}
use Kernel::*;

impl Kernel {
    pub const ALL: [Kernel; 9] = [
        Sharpen,
        Blur,
        Gaussian,
        SobelX,
        SobelY,
        Laplacian,
        Emboss,
        EdgeEnhance,
        Identity,
    ];

    /// Resolves a kernel identifier.
    ///
    /// Both `sobel-x` and `sobel_x` spellings are accepted, `default` is the sharpen kernel.
    pub fn lookup(name: &str) -> Result<Self, OpErr> {
        let kernel = match name.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "sharpen" | "default" => Sharpen,
            "blur" => Blur,
            "gaussian" => Gaussian,
            "sobel-x" => SobelX,
            "sobel-y" => SobelY,
            "laplacian" => Laplacian,
            "emboss" => Emboss,
            "edge-enhance" => EdgeEnhance,
            "identity" => Identity,
            _ => return Err(OpErr::UnknownKernel(name.to_string())),
        };

        Ok(kernel)
    }

    /// The canonical identifier of this kernel.
    pub fn name(&self) -> &'static str {
        match self {
            Sharpen => "sharpen",
            Blur => "blur",
            Gaussian => "gaussian",
            SobelX => "sobel-x",
            SobelY => "sobel-y",
            Laplacian => "laplacian",
            Emboss => "emboss",
            EdgeEnhance => "edge-enhance",
            Identity => "identity",
        }
    }

    /// The side length of the (square) kernel matrix.
    pub fn size(&self) -> usize {
        match self {
            Identity => 1,
            _ => 3,
        }
    }

    /// The weighted sum over a window gets divided by this factor.
    pub fn factor(&self) -> f32 {
        match self {
            Blur => 9.0,
            Gaussian => 16.0,
            _ => 1.0,
        }
    }

    /// Returns a fresh copy of the kernel's weights (before normalization).
    pub fn matrix(&self) -> Array2<f32> {
        match self {
            Sharpen => arr2(&[[0., -1., 0.], [-1., 5., -1.], [0., -1., 0.]]),
            Blur => Array2::ones((3, 3)),
            Gaussian => arr2(&[[1., 2., 1.], [2., 4., 2.], [1., 2., 1.]]),
            SobelX => arr2(&[[-1., 0., 1.], [-2., 0., 2.], [-1., 0., 1.]]),
            SobelY => arr2(&[[-1., -2., -1.], [0., 0., 0.], [1., 2., 1.]]),
            Laplacian => arr2(&[[0., -1., 0.], [-1., 4., -1.], [0., -1., 0.]]),
            Emboss => arr2(&[[-2., -1., 0.], [-1., 1., 1.], [0., 1., 2.]]),
            EdgeEnhance => arr2(&[[0., 0., 0.], [-1., 1., 0.], [0., 0., 0.]]),
            Identity => arr2(&[[1.]]),
        }
    }
}

impl FromStr for Kernel {
    type Err = OpErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s)
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Looks up a kernel by name and returns its weights along with its normalization factor.
///
/// # Arguments
/// * `name` - A kernel identifier, e.g. `"sobel-x"`.
///
/// # Returns
/// `(matrix, factor)` or `OpErr::UnknownKernel`.
pub fn lookup(name: &str) -> Result<(Array2<f32>, f32), OpErr> {
    let kernel = Kernel::lookup(name)?;
    Ok((kernel.matrix(), kernel.factor()))
}
