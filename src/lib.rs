//! Streamtag - in-place media stream title, language and attachment editing
//!
//! This library crate exposes the binary's configuration loading and batch
//! runner for integration testing.

pub mod batch;
pub mod config;

pub use streamtag_av::{EditOutcome, RemuxPlan, ToolRegistry};
pub use streamtag_core::{Error, StreamDescriptor};
