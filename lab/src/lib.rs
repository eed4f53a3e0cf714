//! Command line driver of the layer engine: decodes an image, runs a JSON described layer
//! stack over it and writes every stage plus a report to an output directory.

pub mod adapter;
pub mod codec;
pub mod config;
pub mod error;
pub mod report;
pub mod request;
pub mod run;

pub use adapter::Adapter;
pub use config::LabConfig;
pub use error::{LabErr, Result};
pub use request::{LayerConfig, Request};
pub use run::run;
