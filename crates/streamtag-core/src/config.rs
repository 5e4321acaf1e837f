//! Configuration types.
//!
//! The top-level [`Config`] struct carries the tool and edit sections. Every
//! section defaults sensibly so an empty file is valid. Reading the file is
//! left to the caller.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tools: ToolsConfig,
    pub edit: EditConfig,
}

impl Config {
    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        for (name, path) in [
            ("tools.ffmpeg_path", &self.tools.ffmpeg_path),
            ("tools.ffprobe_path", &self.tools.ffprobe_path),
        ] {
            if let Some(path) = path {
                if !path.exists() {
                    warnings.push(format!(
                        "{name} '{}' does not exist; falling back to PATH",
                        path.display()
                    ));
                }
            }
        }

        if self.tools.timeout_secs == Some(0) {
            warnings.push("tools.timeout_secs is 0; every tool call will time out".into());
        }

        if self.edit.temp_suffix.is_empty() {
            warnings.push("edit.temp_suffix is empty; using \"temp\"".into());
        }

        if self.edit.backup_extension.as_deref() == Some("") {
            warnings.push("edit.backup_extension is empty; no backup will be written".into());
        }

        if self.edit.jobs == 0 {
            warnings.push("edit.jobs is 0; files will be processed one at a time".into());
        }

        warnings
    }
}

/// Paths and limits for the external tools.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Override for the remux tool (defaults to `ffmpeg` on PATH).
    pub ffmpeg_path: Option<PathBuf>,
    /// Override for the probing tool (defaults to `ffprobe` on PATH).
    pub ffprobe_path: Option<PathBuf>,
    /// Maximum run time for a single tool invocation. Unset means no limit.
    pub timeout_secs: Option<u64>,
}

impl ToolsConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// How edits are written back to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditConfig {
    /// Marker placed in the temporary sibling file name.
    pub temp_suffix: String,
    /// When set, a copy of the original is kept as `<file>.<ext>`.
    pub backup_extension: Option<String>,
    /// Maximum number of files edited concurrently.
    pub jobs: usize,
}

impl Default for EditConfig {
    fn default() -> Self {
        Self {
            temp_suffix: "temp".into(),
            backup_extension: None,
            jobs: 2,
        }
    }
}

impl EditConfig {
    /// Temp suffix with the empty string replaced by the default.
    pub fn temp_suffix(&self) -> &str {
        if self.temp_suffix.is_empty() {
            "temp"
        } else {
            &self.temp_suffix
        }
    }

    /// Backup extension, ignoring an empty value.
    pub fn backup_extension(&self) -> Option<&str> {
        self.backup_extension.as_deref().filter(|ext| !ext.is_empty())
    }
}
