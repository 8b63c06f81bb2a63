//! Pipeline orchestration for DealBrief.
//!
//! This crate ties together document extraction, context aggregation, brief
//! synthesis, and report formatting into end-to-end workflows for a single
//! company and for a batch.

pub mod pipeline;

pub use pipeline::{
    BatchOutcome, CompanyOutcome, Pipeline, PipelineConfig, ProgressReporter, SilentProgress,
};
