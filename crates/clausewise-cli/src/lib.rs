//! ClauseWise command-line application
//!
//! Configuration loading, the extract/detect/analyze/save pipeline,
//! terminal rendering and the metrics recorder used by the `clausewise`
//! binary.

pub mod cli;
pub mod config;
pub mod display;
pub mod pipeline;
pub mod telemetry;

pub use config::{AppConfig, LlmSettings, Overrides};
pub use pipeline::{document_stem, DocumentScanner, Pipeline, RunOutput};
pub use telemetry::init_metrics;
