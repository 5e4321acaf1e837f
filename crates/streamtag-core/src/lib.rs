//! streamtag-core: shared types, errors and configuration.
//!
//! This crate is the foundational dependency for the other streamtag crates,
//! providing the unified error type, the stream descriptor model produced by
//! probing, and the serde configuration sections.

pub mod config;
pub mod error;
pub mod media;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use media::*;
