//! Stream descriptors as reported by the probing tool.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Kind of a container stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecType {
    Video,
    Audio,
    Subtitle,
    /// Data, attachment and anything else the container carries.
    Other,
}

impl CodecType {
    /// Map an ffprobe `codec_type` string. Unknown kinds become [`CodecType::Other`].
    pub fn from_ffprobe(codec_type: &str) -> Self {
        match codec_type {
            "video" => CodecType::Video,
            "audio" => CodecType::Audio,
            "subtitle" => CodecType::Subtitle,
            _ => CodecType::Other,
        }
    }

    /// Stream specifier letter used by ffmpeg for per-kind addressing.
    pub fn specifier(&self) -> Option<char> {
        match self {
            CodecType::Video => Some('v'),
            CodecType::Audio => Some('a'),
            CodecType::Subtitle => Some('s'),
            CodecType::Other => None,
        }
    }
}

impl fmt::Display for CodecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecType::Video => write!(f, "video"),
            CodecType::Audio => write!(f, "audio"),
            CodecType::Subtitle => write!(f, "subtitle"),
            CodecType::Other => write!(f, "other"),
        }
    }
}

/// One stream of a media file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    /// Global index in the container, unique per file.
    pub index: u32,
    /// Kind of stream.
    pub codec_type: CodecType,
    /// Codec name (e.g. "hevc", "subrip"), if reported.
    pub codec_name: Option<String>,
    /// Language tag (e.g. "eng"), if the stream carries one.
    pub language: Option<String>,
}

impl StreamDescriptor {
    pub fn new(index: u32, codec_type: CodecType) -> Self {
        Self {
            index,
            codec_type,
            codec_name: None,
            language: None,
        }
    }

    pub fn with_codec(mut self, codec_name: impl Into<String>) -> Self {
        self.codec_name = Some(codec_name.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// Global stream index to language tag, built once per edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageMap(BTreeMap<u32, String>);

impl LanguageMap {
    /// Collect the language tag of every stream that has one.
    pub fn from_streams(streams: &[StreamDescriptor]) -> Self {
        Self(
            streams
                .iter()
                .filter_map(|s| s.language.as_ref().map(|lang| (s.index, lang.clone())))
                .collect(),
        )
    }

    pub fn get(&self, index: u32) -> Option<&str> {
        self.0.get(&index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
