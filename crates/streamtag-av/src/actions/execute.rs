//! Run a remux plan and commit its output over the source file.

use std::path::PathBuf;

use streamtag_core::{Error, Result};

use crate::plan::RemuxPlan;
use crate::tools::ToolConfig;
use crate::workspace::Workspace;

/// Run `plan` with the remux tool and, on success, atomically replace the
/// workspace input with the plan output.
///
/// On any failure the original file is left untouched, the temporary file is
/// deleted and [`Error::Remux`] carries the captured diagnostic text.
pub async fn execute_plan(
    plan: &RemuxPlan,
    workspace: Workspace,
    ffmpeg: &ToolConfig,
    backup_ext: Option<&str>,
) -> Result<PathBuf> {
    let input = workspace.input().to_path_buf();

    if plan.output() != workspace.output() {
        workspace.discard();
        return Err(Error::Validation(format!(
            "plan writes to {} but the workspace output is elsewhere",
            plan.output().display()
        )));
    }

    let mut cmd = ffmpeg.command();
    cmd.args(plan.args());

    let output = match cmd.run().await {
        Ok(output) => output,
        Err(e) => {
            tracing::error!("failed to run {} for {}: {e}", ffmpeg.name, input.display());
            workspace.discard();
            return Err(Error::remux(input, e.to_string()));
        }
    };

    if !output.success() {
        let stderr = output.stderr.trim().to_string();
        tracing::error!("{stderr}");
        tracing::error!(
            "{} exited with status {} for file: {}",
            ffmpeg.name,
            output.status,
            input.display()
        );
        workspace.discard();
        let message = if stderr.is_empty() {
            format!("exited with status {}", output.status)
        } else {
            stderr
        };
        return Err(Error::remux(input, message));
    }

    workspace.finalize(backup_ext)
}
