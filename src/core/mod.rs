//! Core types shared across the form-fill pipeline: error taxonomy and
//! configuration.

pub mod config;
pub mod errors;

pub use config::{FillConfig, LlmConfig, OcrConfig, PipelineConfig};
pub use errors::{FillResult, FormFillError};
