//! Core enums used throughout the planner.

use serde::{Deserialize, Serialize};

/// Kind of media stream, as reported by the prober.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    Video,
    Audio,
    Subtitle,
    Attachment,
    Data,
    /// Anything the prober reports that we do not model.
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for StreamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamKind::Video => write!(f, "video"),
            StreamKind::Audio => write!(f, "audio"),
            StreamKind::Subtitle => write!(f, "subtitle"),
            StreamKind::Attachment => write!(f, "attachment"),
            StreamKind::Data => write!(f, "data"),
            StreamKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// Target container format for an export.
///
/// Drives the per-format compatibility quirks applied while building the
/// stream map (codec-tag fix-ups, subtitle re-encodes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerFormat {
    Mp4,
    Mov,
    Matroska,
    Webm,
    /// A format with no quirk rules of its own.
    Other,
}

impl ContainerFormat {
    /// Whether this is an mp4-family container (mp4/mov share quirk rules).
    pub fn is_mp4_family(&self) -> bool {
        matches!(self, ContainerFormat::Mp4 | ContainerFormat::Mov)
    }

    /// Canonical output extension, without the dot.
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            ContainerFormat::Mp4 => Some("mp4"),
            ContainerFormat::Mov => Some("mov"),
            ContainerFormat::Matroska => Some("mkv"),
            ContainerFormat::Webm => Some("webm"),
            ContainerFormat::Other => None,
        }
    }

    /// Map a muxer/demuxer name (as reported by the external tool) to a
    /// format. Unrecognized names become `Other`.
    pub fn from_muxer_name(name: &str) -> Self {
        match name {
            "mp4" | "m4a" | "ipod" => ContainerFormat::Mp4,
            "mov" => ContainerFormat::Mov,
            "matroska" | "mkv" => ContainerFormat::Matroska,
            "webm" => ContainerFormat::Webm,
            _ => ContainerFormat::Other,
        }
    }
}

impl std::fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainerFormat::Mp4 => write!(f, "mp4"),
            ContainerFormat::Mov => write!(f, "mov"),
            ContainerFormat::Matroska => write!(f, "matroska"),
            ContainerFormat::Webm => write!(f, "webm"),
            ContainerFormat::Other => write!(f, "other"),
        }
    }
}

/// Platform flavor for output-path validation.
///
/// Passed explicitly so validation rules stay testable on any host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    /// The platform this build is running on.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Windows => write!(f, "windows"),
            Platform::MacOs => write!(f, "macos"),
            Platform::Linux => write!(f, "linux"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_kind_serializes_lowercase() {
        let json = serde_json::to_string(&StreamKind::Subtitle).unwrap();
        assert_eq!(json, "\"subtitle\"");
    }

    #[test]
    fn stream_kind_unknown_catches_unrecognized() {
        let kind: StreamKind = serde_json::from_str("\"sidecar\"").unwrap();
        assert_eq!(kind, StreamKind::Unknown);
    }

    #[test]
    fn mp4_family_covers_mov() {
        assert!(ContainerFormat::Mp4.is_mp4_family());
        assert!(ContainerFormat::Mov.is_mp4_family());
        assert!(!ContainerFormat::Matroska.is_mp4_family());
    }

    #[test]
    fn muxer_name_maps_to_format() {
        assert_eq!(
            ContainerFormat::from_muxer_name("matroska"),
            ContainerFormat::Matroska
        );
        assert_eq!(ContainerFormat::from_muxer_name("m4a"), ContainerFormat::Mp4);
        assert_eq!(
            ContainerFormat::from_muxer_name("avi"),
            ContainerFormat::Other
        );
    }

    #[test]
    fn extension_matches_format() {
        assert_eq!(ContainerFormat::Matroska.extension(), Some("mkv"));
        assert_eq!(ContainerFormat::Other.extension(), None);
    }
}
