//! FFprobe-based stream prober.
//!
//! Shells out to `ffprobe -print_format json -show_streams` and maps the
//! JSON output into [`StreamDescriptor`]s.

use std::path::Path;

use serde::Deserialize;
use streamtag_core::{CodecType, Error, Result, StreamDescriptor};

use crate::tools::{ToolConfig, ToolRegistry};

/// A prober backed by the `ffprobe` CLI.
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    tool: ToolConfig,
}

impl FfprobeProber {
    /// Create a new prober for the given ffprobe tool.
    pub fn new(tool: ToolConfig) -> Self {
        Self { tool }
    }

    /// Create a prober from the registry's ffprobe entry.
    pub fn from_registry(tools: &ToolRegistry) -> Result<Self> {
        Ok(Self::new(tools.require("ffprobe")?.clone()))
    }

    /// List the streams of `path` in container order.
    ///
    /// # Errors
    ///
    /// - [`Error::Tool`] if ffprobe cannot be spawned or times out.
    /// - [`Error::Probe`] if ffprobe exits non-zero (with its stderr), prints
    ///   something that is not JSON, or the output has no `streams` key.
    pub async fn probe(&self, path: &Path) -> Result<Vec<StreamDescriptor>> {
        let mut cmd = self.tool.command();
        cmd.args([
            "-hide_banner",
            "-loglevel",
            "error",
            "-print_format",
            "json",
            "-show_streams",
        ]);
        cmd.arg(path);

        let output = cmd.run().await?;

        if !output.success() {
            let stderr = output.stderr.trim();
            tracing::error!("error getting stream info for {}: {stderr}", path.display());
            return Err(Error::Probe(format!(
                "ffprobe exited with status {}: {stderr}",
                output.status
            )));
        }

        let streams = parse_streams(&output.stdout)?;
        tracing::debug!("probed {} streams in {}", streams.len(), path.display());
        Ok(streams)
    }
}

// ---------------------------------------------------------------------------
// JSON structures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    streams: Option<Vec<FfprobeStream>>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    index: u32,
    codec_type: Option<String>,
    codec_name: Option<String>,
    #[serde(default)]
    tags: FfprobeTags,
}

#[derive(Debug, Default, Deserialize)]
struct FfprobeTags {
    language: Option<String>,
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

/// Parse ffprobe's `-show_streams` JSON.
///
/// # Errors
///
/// Returns [`Error::Probe`] for malformed JSON or a missing `streams` key.
pub fn parse_streams(json: &str) -> Result<Vec<StreamDescriptor>> {
    let output: FfprobeOutput = serde_json::from_str(json)
        .map_err(|e| Error::Probe(format!("ffprobe JSON parse error: {e}")))?;

    let streams = output.streams.ok_or_else(|| {
        Error::Probe(format!("no streams found in the ffprobe output: {}", json.trim()))
    })?;

    Ok(streams
        .into_iter()
        .map(|stream| StreamDescriptor {
            index: stream.index,
            codec_type: CodecType::from_ffprobe(stream.codec_type.as_deref().unwrap_or("")),
            codec_name: stream.codec_name,
            language: stream.tags.language,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MULTI_TRACK: &str = r#"{
        "streams": [
            {
                "index": 0,
                "codec_name": "hevc",
                "codec_type": "video",
                "width": 1920,
                "height": 1080,
                "disposition": {"default": 1, "forced": 0},
                "tags": {"title": "Old Title", "BPS": "8000000"}
            },
            {
                "index": 1,
                "codec_name": "eac3",
                "codec_type": "audio",
                "channels": 6,
                "tags": {"language": "eng", "title": "Surround"}
            },
            {
                "index": 2,
                "codec_name": "subrip",
                "codec_type": "subtitle",
                "tags": {"language": "eng"}
            },
            {
                "index": 3,
                "codec_type": "subtitle"
            },
            {
                "index": 4,
                "codec_name": "ttf",
                "codec_type": "attachment",
                "tags": {"filename": "font.ttf", "mimetype": "font/ttf"}
            }
        ]
    }"#;

    #[test]
    fn parses_all_streams_in_order() {
        let streams = parse_streams(MULTI_TRACK).unwrap();
        let indices: Vec<u32> = streams.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);

        assert_eq!(streams[0].codec_type, CodecType::Video);
        assert_eq!(streams[0].codec_name.as_deref(), Some("hevc"));
        assert_eq!(streams[0].language, None);

        assert_eq!(streams[1].codec_type, CodecType::Audio);
        assert_eq!(streams[1].language.as_deref(), Some("eng"));

        assert_eq!(streams[2].codec_type, CodecType::Subtitle);
        assert_eq!(streams[2].codec_name.as_deref(), Some("subrip"));
    }

    #[test]
    fn missing_codec_name_and_tags() {
        let streams = parse_streams(MULTI_TRACK).unwrap();
        assert_eq!(streams[3].codec_type, CodecType::Subtitle);
        assert_eq!(streams[3].codec_name, None);
        assert_eq!(streams[3].language, None);
    }

    #[test]
    fn attachment_is_other() {
        let streams = parse_streams(MULTI_TRACK).unwrap();
        assert_eq!(streams[4].codec_type, CodecType::Other);
    }

    #[test]
    fn missing_streams_key_is_probe_error() {
        let err = parse_streams(r#"{"format": {"filename": "x.mkv"}}"#).unwrap_err();
        assert!(err.is_probe());
        assert!(err.to_string().contains("no streams found"));
    }

    #[test]
    fn malformed_json_is_probe_error() {
        let err = parse_streams("not json").unwrap_err();
        assert!(err.is_probe());
    }

    #[test]
    fn empty_stream_list() {
        assert!(parse_streams(r#"{"streams": []}"#).unwrap().is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_is_probe_error() {
        let tool = ToolConfig {
            name: "ffprobe".into(),
            path: std::path::PathBuf::from("false"),
            timeout: None,
        };
        let err = FfprobeProber::new(tool)
            .probe(Path::new("/nonexistent.mkv"))
            .await
            .unwrap_err();
        assert!(err.is_probe(), "unexpected error: {err}");
    }
}
