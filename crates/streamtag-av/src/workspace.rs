//! Workspace management for a single in-place edit.
//!
//! A [`Workspace`] owns the temporary sibling file the remux tool writes to.
//! Finalizing renames it over the original in one step; any other exit path
//! deletes it.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

use streamtag_core::{Error, Result};
use tempfile::NamedTempFile;

/// Extension used when the source has none.
const FALLBACK_EXTENSION: &str = "mkv";

/// Workspace for one edit of one file.
///
/// The temporary file lives in the same directory as the input so that the
/// final rename never crosses a filesystem boundary.
///
/// # Example
///
/// ```no_run
/// use streamtag_av::Workspace;
///
/// let workspace = Workspace::new(std::path::Path::new("/media/movie.mkv"), "temp").unwrap();
/// // ... run the remux tool, writing to workspace.output() ...
/// workspace.finalize(None).unwrap();
/// ```
#[derive(Debug)]
pub struct Workspace {
    input_path: PathBuf,
    temp: NamedTempFile,
}

impl Workspace {
    /// Create the temporary sibling file for `input`.
    ///
    /// The file is named `<input name>.<random>.<suffix>.<ext>`, keeping the
    /// source extension so the remux tool picks the same container.
    pub fn new(input: &Path, temp_suffix: &str) -> Result<Self> {
        let file_name = input
            .file_name()
            .ok_or_else(|| Error::Validation(format!("invalid input path: {}", input.display())))?;

        let mut prefix = file_name.to_os_string();
        prefix.push(".");

        let temp = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(&temp_tail(input, temp_suffix))
            .tempfile_in(parent_dir(input))?;

        tracing::debug!("workspace for {} at {}", input.display(), temp.path().display());

        Ok(Self {
            input_path: input.to_path_buf(),
            temp,
        })
    }

    /// The original input file path.
    pub fn input(&self) -> &Path {
        &self.input_path
    }

    /// The temporary output path the remux tool writes to.
    pub fn output(&self) -> &Path {
        self.temp.path()
    }

    /// Replace the original with the output.
    ///
    /// The original's permissions are copied onto the output first. If
    /// `backup_ext` is set, a copy of the original is written to
    /// `<input>.<ext>` before the swap. The swap itself is a single rename,
    /// so the input path always holds either the old or the new content.
    ///
    /// # Errors
    ///
    /// Returns an error if the output is missing or any filesystem step
    /// fails. The temporary file is removed in every error case.
    pub fn finalize(self, backup_ext: Option<&str>) -> Result<PathBuf> {
        let Workspace { input_path, temp } = self;

        if !temp.path().exists() {
            return Err(Error::tool(
                "workspace",
                format!("output file does not exist: {}", temp.path().display()),
            ));
        }

        if let Ok(meta) = fs::metadata(&input_path) {
            fs::set_permissions(temp.path(), meta.permissions())?;

            if let Some(ext) = backup_ext {
                let backup = backup_path(&input_path, ext);
                fs::copy(&input_path, &backup).map_err(|e| {
                    Error::tool("workspace", format!("failed to create backup: {e}"))
                })?;
                tracing::debug!("backup written to {}", backup.display());
            }
        }

        temp.persist(&input_path).map_err(|e| {
            Error::tool(
                "workspace",
                format!("failed to replace {}: {}", input_path.display(), e.error),
            )
        })?;

        Ok(input_path)
    }

    /// Drop the output without touching the original.
    pub fn discard(self) {
        let path = self.temp.path().to_path_buf();
        if let Err(e) = self.temp.close() {
            tracing::warn!("failed to remove temporary file {}: {e}", path.display());
        }
    }
}

/// Deterministic stand-in for [`Workspace::output`], used when showing a
/// plan without creating any file.
pub fn preview_output(input: &Path, temp_suffix: &str) -> PathBuf {
    let mut name = input
        .file_name()
        .map(OsStr::to_os_string)
        .unwrap_or_else(|| OsString::from("output"));
    name.push(temp_tail(input, temp_suffix));
    parent_dir(input).join(name)
}

fn backup_path(input: &Path, ext: &str) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

fn parent_dir(input: &Path) -> &Path {
    match input.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// `.<suffix>.<ext>`, keeping the source extension as-is.
fn temp_tail(input: &Path, temp_suffix: &str) -> OsString {
    let mut tail = OsString::from(format!(".{temp_suffix}."));
    tail.push(input.extension().unwrap_or(OsStr::new(FALLBACK_EXTENSION)));
    tail
}
