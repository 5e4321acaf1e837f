//! Remux command planning.
//!
//! A [`RemuxPlan`] is the ffmpeg argument vector for one stream-copy remux,
//! ending with the output path. Input streams are always addressed by their
//! global index (`-map 0:<index>`); metadata flags address the output stream
//! by kind and sub-index (`-metadata:s:a:<n>`), because ffmpeg numbers the
//! output streams of each kind separately.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use streamtag_core::{CodecType, LanguageMap, StreamDescriptor};

/// Subtitle codecs whose title/language cannot be rewritten. Streams with
/// these codecs (or with no codec name) are dropped from the output.
pub const UNSUPPORTED_SUBTITLE_CODECS: &[&str] = &["webvtt"];

/// Fallback MIME type for attachments with an unknown extension.
pub const GENERIC_MIME_TYPE: &str = "application/octet-stream";

/// An ordered ffmpeg argument list plus bookkeeping about what it maps.
///
/// Paths are kept as [`OsString`]s so file names that are not valid UTF-8
/// reach the tool unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemuxPlan {
    args: Vec<OsString>,
    output: PathBuf,
    mapped: Vec<u32>,
    skipped: Vec<u32>,
    primary_video: Option<u32>,
}

impl RemuxPlan {
    /// Full argument vector; the last element is the output path.
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// The argument vector joined with spaces, for display only.
    pub fn command_line(&self) -> String {
        self.args
            .iter()
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Global indices mapped into the output, ascending. Empty when the plan
    /// maps the whole input (`-map 0`).
    pub fn mapped_streams(&self) -> &[u32] {
        &self.mapped
    }

    /// Global indices deliberately left out of the output.
    pub fn skipped_streams(&self) -> &[u32] {
        &self.skipped
    }

    /// Global index of the first video stream, if any.
    pub fn primary_video(&self) -> Option<u32> {
        self.primary_video
    }

    /// Number of `-map` directives in the argument list.
    pub fn map_count(&self) -> usize {
        self.args.iter().filter(|a| *a == "-map").count()
    }
}

/// Independent zero-based counters for the audio and subtitle streams
/// placed so far.
///
/// Video streams have no counter: they are tagged at their global index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerKindCounter {
    pub audio: u32,
    pub subtitle: u32,
}

impl PerKindCounter {
    /// Return the next sub-index for `kind` and advance its counter.
    /// Video and [`CodecType::Other`] have no counter and yield `None`.
    pub fn next(&mut self, kind: CodecType) -> Option<u32> {
        let slot = match kind {
            CodecType::Video | CodecType::Other => return None,
            CodecType::Audio => &mut self.audio,
            CodecType::Subtitle => &mut self.subtitle,
        };
        let current = *slot;
        *slot += 1;
        Some(current)
    }
}

/// Whether a subtitle stream's title/language can be rewritten.
pub fn is_rewritable_subtitle(stream: &StreamDescriptor) -> bool {
    match stream.codec_name.as_deref() {
        None => false,
        Some(codec) => !UNSUPPORTED_SUBTITLE_CODECS.contains(&codec),
    }
}

/// Accumulator threaded through the stream fold.
struct PlanState<'a> {
    title: &'a str,
    languages: &'a LanguageMap,
    args: Vec<OsString>,
    mapped: Vec<u32>,
    skipped: Vec<u32>,
    primary_video: Option<u32>,
    counter: PerKindCounter,
}

impl<'a> PlanState<'a> {
    fn place(mut self, stream: &StreamDescriptor) -> Self {
        let index = stream.index;

        match stream.codec_type {
            CodecType::Video => {
                self.map(index);
                if self.primary_video.is_none() {
                    self.primary_video = Some(index);
                }
                // Video streams are tagged at their global index.
                self.tag(CodecType::Video, index, index);
            }
            CodecType::Audio => {
                self.map(index);
                if let Some(sub_index) = self.counter.next(CodecType::Audio) {
                    self.tag(CodecType::Audio, sub_index, index);
                }
            }
            CodecType::Subtitle if !is_rewritable_subtitle(stream) => {
                let codec = stream.codec_name.as_deref().unwrap_or("unknown");
                tracing::warn!(
                    "skipping unsupported subtitle metadata modification: {codec} for stream {index}"
                );
                self.skipped.push(index);
            }
            CodecType::Subtitle => {
                self.map(index);
                if let Some(sub_index) = self.counter.next(CodecType::Subtitle) {
                    self.tag(CodecType::Subtitle, sub_index, index);
                }
            }
            CodecType::Other => self.map(index),
        }

        self
    }

    fn map(&mut self, index: u32) {
        self.args.push("-map".into());
        self.args.push(format!("0:{index}").into());
        self.mapped.push(index);
    }

    fn tag(&mut self, kind: CodecType, sub_index: u32, index: u32) {
        let Some(specifier) = kind.specifier() else {
            return;
        };
        let flag = format!("-metadata:s:{specifier}:{sub_index}");
        self.args.push(flag.clone().into());
        self.args.push(format!("title={}", self.title).into());
        if let Some(language) = self.languages.get(index) {
            self.args.push(flag.into());
            self.args.push(format!("language={language}").into());
        }
    }
}

/// Build the stream-copy remux that sets every stream title to `title`.
///
/// Global metadata is stripped and the container title set once. Streams are
/// placed in ascending global index order; see [`UNSUPPORTED_SUBTITLE_CODECS`]
/// for the streams that are dropped.
pub fn build_metadata_plan(
    input: &Path,
    output: &Path,
    streams: &[StreamDescriptor],
    languages: &LanguageMap,
    title: &str,
) -> RemuxPlan {
    let mut ordered: Vec<&StreamDescriptor> = streams.iter().collect();
    ordered.sort_by_key(|s| s.index);

    let header: Vec<OsString> = vec![
        "-hide_banner".into(),
        "-loglevel".into(),
        "error".into(),
        "-progress".into(),
        "pipe:1".into(),
        "-y".into(),
        "-i".into(),
        input.into(),
        "-map_metadata".into(),
        "-1".into(),
        "-c".into(),
        "copy".into(),
        "-metadata".into(),
        format!("title={title}").into(),
    ];

    let initial = PlanState {
        title,
        languages,
        args: header,
        mapped: Vec::with_capacity(ordered.len()),
        skipped: Vec::new(),
        primary_video: None,
        counter: PerKindCounter::default(),
    };

    let mut state = ordered
        .into_iter()
        .fold(initial, |state, stream| state.place(stream));

    state.args.push(output.into());

    RemuxPlan {
        args: state.args,
        output: output.to_path_buf(),
        mapped: state.mapped,
        skipped: state.skipped,
        primary_video: state.primary_video,
    }
}

/// MIME type for an attachment, from its extension.
pub fn attachment_mime_type(attachment: &Path) -> &'static str {
    let ext = attachment
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => GENERIC_MIME_TYPE,
    }
}

/// Build the stream-copy remux that keeps every stream and appends
/// `attachment` as a new attached-file stream.
pub fn build_attachment_plan(input: &Path, output: &Path, attachment: &Path) -> RemuxPlan {
    let args: Vec<OsString> = vec![
        "-hide_banner".into(),
        "-loglevel".into(),
        "error".into(),
        "-y".into(),
        "-i".into(),
        input.into(),
        "-attach".into(),
        attachment.into(),
        "-metadata:s:t".into(),
        format!("mimetype={}", attachment_mime_type(attachment)).into(),
        "-c".into(),
        "copy".into(),
        "-map".into(),
        "0".into(),
        output.into(),
    ];

    RemuxPlan {
        args,
        output: output.to_path_buf(),
        mapped: Vec::new(),
        skipped: Vec::new(),
        primary_video: None,
    }
}
