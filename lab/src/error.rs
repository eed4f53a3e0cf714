use std::{error::Error, fmt, io};

use layer_engine::EngineErr;

/// The lab's result type.
pub type Result<T> = std::result::Result<T, LabErr>;

/// Failures of the lab driver.
#[derive(Debug)]
pub enum LabErr {
    Io(io::Error),
    Json(serde_json::Error),
    Image(image::ImageError),
    /// The request or the environment holds a value the engine can't be given.
    InvalidRequest(String),
    Engine(EngineErr),
}

impl fmt::Display for LabErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabErr::Io(e) => write!(f, "io error: {e}"),
            LabErr::Json(e) => write!(f, "malformed request: {e}"),
            LabErr::Image(e) => write!(f, "image error: {e}"),
            LabErr::InvalidRequest(msg) => write!(f, "invalid request: {msg}"),
            LabErr::Engine(e) => write!(f, "processing failed: {e}"),
        }
    }
}

impl Error for LabErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LabErr::Io(e) => Some(e),
            LabErr::Json(e) => Some(e),
            LabErr::Image(e) => Some(e),
            LabErr::Engine(e) => Some(e),
            LabErr::InvalidRequest(_) => None,
        }
    }
}

impl From<io::Error> for LabErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for LabErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<image::ImageError> for LabErr {
    fn from(value: image::ImageError) -> Self {
        Self::Image(value)
    }
}

impl From<EngineErr> for LabErr {
    fn from(value: EngineErr) -> Self {
        Self::Engine(value)
    }
}

/// Boundary conversion for the binary.
impl From<LabErr> for io::Error {
    fn from(value: LabErr) -> Self {
        match value {
            LabErr::Io(e) => e,
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}
