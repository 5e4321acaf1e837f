//! Rewrite stream titles and languages in place.

use std::path::{Path, PathBuf};

use serde::Serialize;
use streamtag_core::config::EditConfig;
use streamtag_core::{Error, LanguageMap, Result, StreamDescriptor};

use crate::actions::execute_plan;
use crate::plan::{build_metadata_plan, RemuxPlan};
use crate::probe::FfprobeProber;
use crate::tools::ToolRegistry;
use crate::workspace::{preview_output, Workspace};

/// Result of a metadata edit that did not fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EditOutcome {
    /// The file was rewritten.
    Edited {
        path: PathBuf,
        /// Global indices kept in the output.
        mapped: Vec<u32>,
        /// Global indices dropped from the output.
        skipped: Vec<u32>,
    },
    /// Nothing was done, e.g. the file could not be probed.
    Skipped { reason: String },
}

/// Set every stream title (and the container title) of `file` to `title`,
/// keeping the existing language tags.
///
/// A probe failure or an empty stream list is not an error: the file is left
/// alone and [`EditOutcome::Skipped`] is returned.
pub async fn change_metadata(
    file: &Path,
    title: &str,
    tools: &ToolRegistry,
    config: &EditConfig,
) -> Result<EditOutcome> {
    tracing::info!("starting metadata modification for file: {}", file.display());

    let streams = match probe_for_edit(file, tools).await? {
        Probed::Streams(streams) => streams,
        Probed::NothingToDo(reason) => return Ok(EditOutcome::Skipped { reason }),
    };

    let ffmpeg = tools.require("ffmpeg")?;
    let languages = LanguageMap::from_streams(&streams);
    let workspace = Workspace::new(file, config.temp_suffix())?;
    let plan = build_metadata_plan(file, workspace.output(), &streams, &languages, title);
    log_plan(&plan);

    let path = execute_plan(&plan, workspace, ffmpeg, config.backup_extension()).await?;

    tracing::info!("metadata modified successfully for file: {}", path.display());

    Ok(EditOutcome::Edited {
        path,
        mapped: plan.mapped_streams().to_vec(),
        skipped: plan.skipped_streams().to_vec(),
    })
}

/// Probe `file` and build the plan [`change_metadata`] would run, without
/// creating or modifying any file. Returns `None` when there is nothing to do.
pub async fn plan_metadata(
    file: &Path,
    title: &str,
    tools: &ToolRegistry,
    config: &EditConfig,
) -> Result<Option<RemuxPlan>> {
    let streams = match probe_for_edit(file, tools).await? {
        Probed::Streams(streams) => streams,
        Probed::NothingToDo(_) => return Ok(None),
    };

    let output = preview_output(file, config.temp_suffix());
    let languages = LanguageMap::from_streams(&streams);
    let plan = build_metadata_plan(file, &output, &streams, &languages, title);
    log_plan(&plan);

    Ok(Some(plan))
}

enum Probed {
    Streams(Vec<StreamDescriptor>),
    NothingToDo(String),
}

async fn probe_for_edit(file: &Path, tools: &ToolRegistry) -> Result<Probed> {
    if !file.exists() {
        return Err(Error::file_not_found(file));
    }

    let prober = FfprobeProber::from_registry(tools)?;
    match prober.probe(file).await {
        Ok(streams) if streams.is_empty() => {
            tracing::warn!("skipping {}: no streams", file.display());
            Ok(Probed::NothingToDo("no streams".into()))
        }
        Ok(streams) => Ok(Probed::Streams(streams)),
        Err(e) if e.is_probe() => {
            tracing::warn!("skipping {}: {e}", file.display());
            Ok(Probed::NothingToDo(e.to_string()))
        }
        Err(e) => Err(e),
    }
}

fn log_plan(plan: &RemuxPlan) {
    tracing::debug!(
        "planned {} maps, skipped {:?}, primary video {:?}",
        plan.map_count(),
        plan.skipped_streams(),
        plan.primary_video()
    );
}
