//! # streamtag-av
//!
//! Stream probing, remux planning and atomic in-place remuxing.
//!
//! This crate provides:
//!
//! - **Tool discovery** ([`ToolRegistry`]) -- find and cache paths to ffmpeg
//!   and ffprobe.
//! - **Command execution** ([`ToolCommand`]) -- async builder with separate
//!   stdout/stderr capture and an optional timeout.
//! - **Probing** ([`probe::FfprobeProber`]) -- ffprobe JSON into
//!   [`streamtag_core::StreamDescriptor`]s.
//! - **Planning** ([`plan`]) -- the ffmpeg argument vectors for a metadata
//!   rewrite or an attachment.
//! - **Workspace management** ([`Workspace`]) -- the temporary sibling file
//!   and its atomic finalization.
//! - **Actions** ([`actions`]) -- metadata rewrite and attachment injection.

pub mod actions;
pub mod command;
pub mod plan;
pub mod probe;
pub mod tools;
pub mod workspace;

// ---- Re-exports for convenience ----

pub use command::{ToolCommand, ToolOutput};
pub use plan::{build_attachment_plan, build_metadata_plan, RemuxPlan};
pub use probe::FfprobeProber;
pub use tools::{ToolConfig, ToolInfo, ToolRegistry};
pub use workspace::Workspace;

// Action functions
pub use actions::{add_attachment, change_metadata, execute_plan, plan_metadata, EditOutcome};
