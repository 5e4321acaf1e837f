//! Add an attached file (e.g. a cover image) to a container.

use std::path::{Path, PathBuf};

use streamtag_core::config::EditConfig;
use streamtag_core::{Error, Result};

use crate::actions::execute_plan;
use crate::plan::{attachment_mime_type, build_attachment_plan};
use crate::tools::ToolRegistry;
use crate::workspace::Workspace;

/// Append `attachment` to `file` as a new attached-file stream, keeping every
/// existing stream, and replace `file` atomically.
pub async fn add_attachment(
    file: &Path,
    attachment: &Path,
    tools: &ToolRegistry,
    config: &EditConfig,
) -> Result<PathBuf> {
    tracing::info!(
        "adding {} attachment to file: {}",
        attachment_mime_type(attachment),
        file.display()
    );

    for path in [file, attachment] {
        if !path.exists() {
            return Err(Error::file_not_found(path));
        }
    }

    let ffmpeg = tools.require("ffmpeg")?;
    let workspace = Workspace::new(file, config.temp_suffix())?;
    let plan = build_attachment_plan(file, workspace.output(), attachment);

    let path = execute_plan(&plan, workspace, ffmpeg, config.backup_extension()).await?;

    tracing::info!("attachment added successfully to file: {}", path.display());
    Ok(path)
}
