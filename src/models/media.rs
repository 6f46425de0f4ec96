//! Media-related data structures (tracks, source files, segments).

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::enums::StreamKind;

/// A single track within a source file, as probed.
///
/// Immutable once probed; the planner never mutates track metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Stream index within the source file (unique per file).
    pub index: u32,
    /// Kind of stream (video, audio, subtitle, ...).
    pub kind: StreamKind,
    /// Codec identifier (e.g., "h264", "hevc", "mov_text").
    #[serde(default)]
    pub codec_name: String,
    /// Codec tag as a hex-like token, "0x0000" when absent.
    #[serde(default = "default_codec_tag")]
    pub codec_tag: String,
    /// Disposition flags (flag name -> 0/1), as probed from the container.
    ///
    /// Stored sorted by key so "first active flag" is deterministic.
    #[serde(default)]
    pub disposition: BTreeMap<String, u8>,
}

fn default_codec_tag() -> String {
    // Sentinel the prober reports when the container carries no tag.
    "0x0000".to_string()
}

impl Track {
    /// Create a new track with an empty codec tag and no disposition.
    pub fn new(index: u32, kind: StreamKind, codec_name: impl Into<String>) -> Self {
        Self {
            index,
            kind,
            codec_name: codec_name.into(),
            codec_tag: default_codec_tag(),
            disposition: BTreeMap::new(),
        }
    }

    /// Set the codec tag.
    pub fn with_codec_tag(mut self, tag: impl Into<String>) -> Self {
        self.codec_tag = tag.into();
        self
    }

    /// Set a disposition flag.
    pub fn with_disposition_flag(mut self, flag: impl Into<String>, active: bool) -> Self {
        self.disposition.insert(flag.into(), u8::from(active));
        self
    }

    /// Whether this is a cover-art/attached-picture video track.
    pub fn is_attached_picture(&self) -> bool {
        self.kind == StreamKind::Video
            && self.disposition.get("attached_pic").copied().unwrap_or(0) != 0
    }

    /// The first active disposition flag, in sorted key order.
    pub fn first_active_disposition(&self) -> Option<&str> {
        self.disposition
            .iter()
            .find(|(_, &active)| active != 0)
            .map(|(flag, _)| flag.as_str())
    }

    /// Get a display string for this track.
    pub fn display_name(&self) -> String {
        format!("{} track {} ({})", self.kind, self.index, self.codec_name)
    }
}

/// A probed source file and its tracks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Path of the source file.
    pub path: PathBuf,
    /// Tracks in probe order. Indices are unique within one file.
    pub tracks: Vec<Track>,
}

impl SourceFile {
    /// Create a new source file.
    pub fn new(path: impl Into<PathBuf>, tracks: Vec<Track>) -> Self {
        Self {
            path: path.into(),
            tracks,
        }
    }

    /// Look up a track by its stream index.
    pub fn track_by_index(&self, index: u32) -> Option<&Track> {
        self.tracks.iter().find(|t| t.index == index)
    }
}

/// Tracks selected for copying from one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopySelection {
    /// Index of the source file among all inputs of the export.
    pub source_index: usize,
    /// Stream indices to copy, in output order.
    pub track_indices: Vec<u32>,
}

impl CopySelection {
    /// Create a new selection.
    pub fn new(source_index: usize, track_indices: Vec<u32>) -> Self {
        Self {
            source_index,
            track_indices,
        }
    }

    /// Selection covering every track of a source file.
    pub fn all_of(source_index: usize, source: &SourceFile) -> Self {
        Self {
            source_index,
            track_indices: source.tracks.iter().map(|t| t.index).collect(),
        }
    }
}

/// A user-defined time range to export as one output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Start time in seconds (>= 0).
    pub start: f64,
    /// End time in seconds (> start).
    pub end: f64,
    /// User-given label, possibly empty.
    #[serde(default)]
    pub name: String,
    /// Free-form tags, available to the naming template.
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl Segment {
    /// Create an unnamed segment.
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start,
            end,
            name: String::new(),
            tags: BTreeMap::new(),
        }
    }

    /// Set the segment label.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Add a tag.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}
