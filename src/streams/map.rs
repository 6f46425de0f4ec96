//! Stream-map argument synthesis.
//!
//! Builds the ordered transcoder argument tokens that copy the selected
//! tracks into the target container, applying per-format compatibility
//! quirks. The tokens are appended verbatim to the external transcoder's
//! argument list and must never be reordered downstream.
//!
//! Quirks are a data-driven rule table: one entry per
//! (container, track condition) pair, evaluated in fixed order for each
//! track. New containers or quirks are added as table rows.

use crate::models::{ContainerFormat, CopySelection, SourceFile, StreamKind, Track};

/// Sentinel codec tag meaning "the container carries no tag".
const EMPTY_CODEC_TAG: &str = "0x0000";
/// The mp4-native text subtitle codec.
const MP4_TEXT_CODEC: &str = "mov_text";

/// Error types for stream-map synthesis.
///
/// These indicate an upstream invariant violation (a selection referencing
/// data that does not exist), not recoverable user input.
#[derive(Debug, thiserror::Error)]
pub enum StreamMapError {
    /// Selection references a source file index we were not given.
    #[error("Selection references source file {index}, but only {count} sources were provided")]
    UnknownSource { index: usize, count: usize },

    /// Selection references a track index absent from the source file.
    #[error("Selection references track {track} which does not exist in '{path}'")]
    UnknownTrack { track: u32, path: String },
}

/// Per-track override: return `Some(args)` to replace the table-driven
/// transcode quirks for that output slot. The disposition-copy rule still
/// applies independently.
pub type TrackArgsOverride<'a> = &'a dyn Fn(&Track, usize) -> Option<Vec<String>>;

/// Which containers a quirk rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContainerRule {
    Mp4Family,
    Exactly(ContainerFormat),
}

/// Which tracks a quirk rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrackRule {
    /// HEVC video whose container carried no codec tag.
    HevcWithEmptyTag,
    /// Subtitle track not already using the given codec.
    SubtitleNotIn(&'static str),
    /// Subtitle track using the given codec.
    SubtitleIn(&'static str),
}

/// What a quirk rule emits for its output slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuirkAction {
    ForceCodecTag(&'static str),
    Transcode(&'static str),
}

struct QuirkRule {
    container: ContainerRule,
    track: TrackRule,
    action: QuirkAction,
}

/// The per-format compatibility table, in evaluation order.
const QUIRK_RULES: &[QuirkRule] = &[
    // mp4 demands an Apple-compatible tag for untagged HEVC.
    QuirkRule {
        container: ContainerRule::Mp4Family,
        track: TrackRule::HevcWithEmptyTag,
        action: QuirkAction::ForceCodecTag("hvc1"),
    },
    // mp4 can only hold its native text subtitles.
    QuirkRule {
        container: ContainerRule::Mp4Family,
        track: TrackRule::SubtitleNotIn(MP4_TEXT_CODEC),
        action: QuirkAction::Transcode(MP4_TEXT_CODEC),
    },
    // matroska cannot hold mp4 text subtitles.
    QuirkRule {
        container: ContainerRule::Exactly(ContainerFormat::Matroska),
        track: TrackRule::SubtitleIn(MP4_TEXT_CODEC),
        action: QuirkAction::Transcode("srt"),
    },
    QuirkRule {
        container: ContainerRule::Exactly(ContainerFormat::Webm),
        track: TrackRule::SubtitleIn(MP4_TEXT_CODEC),
        action: QuirkAction::Transcode("webvtt"),
    },
];

impl QuirkRule {
    fn applies(&self, format: ContainerFormat, track: &Track) -> bool {
        let container_ok = match self.container {
            ContainerRule::Mp4Family => format.is_mp4_family(),
            ContainerRule::Exactly(f) => format == f,
        };
        if !container_ok {
            return false;
        }
        match self.track {
            TrackRule::HevcWithEmptyTag => {
                track.codec_name == "hevc" && track.codec_tag == EMPTY_CODEC_TAG
            }
            TrackRule::SubtitleNotIn(codec) => {
                track.kind == StreamKind::Subtitle && track.codec_name != codec
            }
            TrackRule::SubtitleIn(codec) => {
                track.kind == StreamKind::Subtitle && track.codec_name == codec
            }
        }
    }

    fn emit(&self, slot: usize) -> [String; 2] {
        match self.action {
            QuirkAction::ForceCodecTag(tag) => [format!("-tag:{slot}"), tag.to_string()],
            QuirkAction::Transcode(codec) => [format!("-c:{slot}"), codec.to_string()],
        }
    }
}

/// Builder for the stream-map portion of a transcoder command.
///
/// For each selected track, in selection order, emits one map instruction at
/// the next sequential output slot, then that slot's quirk instructions.
/// The slot counter increments once per track regardless of how many quirk
/// instructions the track generates.
pub struct StreamMapBuilder<'a> {
    sources: &'a [SourceFile],
    selections: &'a [CopySelection],
    format: ContainerFormat,
    copy_disposition: bool,
    override_args: Option<TrackArgsOverride<'a>>,
}

impl<'a> StreamMapBuilder<'a> {
    /// Create a new builder.
    pub fn new(
        sources: &'a [SourceFile],
        selections: &'a [CopySelection],
        format: ContainerFormat,
    ) -> Self {
        Self {
            sources,
            selections,
            format,
            copy_disposition: false,
            override_args: None,
        }
    }

    /// Emit an explicit set-disposition instruction for tracks with an
    /// active disposition flag. Needed for concatenation-style merges,
    /// which do not propagate disposition automatically.
    pub fn with_copied_disposition(mut self, yes: bool) -> Self {
        self.copy_disposition = yes;
        self
    }

    /// Install a per-track override for the transcode quirks.
    pub fn with_track_args_override(mut self, f: TrackArgsOverride<'a>) -> Self {
        self.override_args = Some(f);
        self
    }

    /// Build the ordered argument tokens.
    pub fn build(&self) -> Result<Vec<String>, StreamMapError> {
        let mut args = Vec::new();
        let mut slot = 0usize;

        for selection in self.selections {
            let source = self.sources.get(selection.source_index).ok_or(
                StreamMapError::UnknownSource {
                    index: selection.source_index,
                    count: self.sources.len(),
                },
            )?;

            for &track_index in &selection.track_indices {
                let track = source.track_by_index(track_index).ok_or_else(|| {
                    StreamMapError::UnknownTrack {
                        track: track_index,
                        path: source.path.display().to_string(),
                    }
                })?;

                args.push("-map".to_string());
                args.push(format!("{}:{}", selection.source_index, track_index));

                match self.override_args.and_then(|f| f(track, slot)) {
                    Some(custom) => args.extend(custom),
                    None => {
                        for rule in QUIRK_RULES {
                            if rule.applies(self.format, track) {
                                tracing::debug!(
                                    "quirk {:?} applied to {} at slot {}",
                                    rule.action,
                                    track.display_name(),
                                    slot
                                );
                                args.extend(rule.emit(slot));
                            }
                        }
                    }
                }

                if self.copy_disposition {
                    if let Some(flag) = track.first_active_disposition() {
                        args.push(format!("-disposition:{slot}"));
                        args.push(flag.to_string());
                    }
                }

                slot += 1;
            }
        }

        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceFile;

    fn single_source(tracks: Vec<Track>) -> Vec<SourceFile> {
        vec![SourceFile::new("/media/in.mkv", tracks)]
    }

    #[test]
    fn maps_tracks_in_selection_order() {
        let sources = single_source(vec![
            Track::new(0, StreamKind::Video, "h264"),
            Track::new(1, StreamKind::Audio, "aac"),
        ]);
        let selections = vec![CopySelection::new(0, vec![1, 0])];

        let args = StreamMapBuilder::new(&sources, &selections, ContainerFormat::Matroska)
            .build()
            .unwrap();
        assert_eq!(args, vec!["-map", "0:1", "-map", "0:0"]);
    }

    #[test]
    fn mov_text_to_matroska_transcodes_to_srt() {
        let sources = single_source(vec![Track::new(0, StreamKind::Subtitle, "mov_text")]);
        let selections = vec![CopySelection::new(0, vec![0])];

        let args = StreamMapBuilder::new(&sources, &selections, ContainerFormat::Matroska)
            .build()
            .unwrap();
        assert_eq!(args, vec!["-map", "0:0", "-c:0", "srt"]);
    }

    #[test]
    fn mov_text_to_webm_transcodes_to_webvtt() {
        let sources = single_source(vec![Track::new(0, StreamKind::Subtitle, "mov_text")]);
        let selections = vec![CopySelection::new(0, vec![0])];

        let args = StreamMapBuilder::new(&sources, &selections, ContainerFormat::Webm)
            .build()
            .unwrap();
        assert_eq!(args, vec!["-map", "0:0", "-c:0", "webvtt"]);
    }

    #[test]
    fn untagged_hevc_gets_apple_tag_in_mp4() {
        let sources = single_source(vec![Track::new(0, StreamKind::Video, "hevc")]);
        let selections = vec![CopySelection::new(0, vec![0])];

        let args = StreamMapBuilder::new(&sources, &selections, ContainerFormat::Mp4)
            .build()
            .unwrap();
        assert_eq!(args, vec!["-map", "0:0", "-tag:0", "hvc1"]);

        // Already tagged: no quirk.
        let tagged = single_source(vec![Track::new(0, StreamKind::Video, "hevc")
            .with_codec_tag("0x31637668")]);
        let args = StreamMapBuilder::new(&tagged, &selections, ContainerFormat::Mp4)
            .build()
            .unwrap();
        assert_eq!(args, vec!["-map", "0:0"]);
    }

    #[test]
    fn foreign_subtitle_in_mp4_transcodes_to_mov_text() {
        let sources = single_source(vec![Track::new(0, StreamKind::Subtitle, "subrip")]);
        let selections = vec![CopySelection::new(0, vec![0])];

        let args = StreamMapBuilder::new(&sources, &selections, ContainerFormat::Mov)
            .build()
            .unwrap();
        assert_eq!(args, vec!["-map", "0:0", "-c:0", "mov_text"]);
    }

    #[test]
    fn slot_counter_increments_once_per_track() {
        let sources = single_source(vec![
            Track::new(0, StreamKind::Subtitle, "mov_text"),
            Track::new(1, StreamKind::Subtitle, "mov_text"),
        ]);
        let selections = vec![CopySelection::new(0, vec![0, 1])];

        let args = StreamMapBuilder::new(&sources, &selections, ContainerFormat::Matroska)
            .build()
            .unwrap();
        assert_eq!(
            args,
            vec!["-map", "0:0", "-c:0", "srt", "-map", "0:1", "-c:1", "srt"]
        );
    }

    #[test]
    fn disposition_is_copied_when_requested() {
        let sources = single_source(vec![
            Track::new(0, StreamKind::Audio, "aac").with_disposition_flag("default", true)
        ]);
        let selections = vec![CopySelection::new(0, vec![0])];

        let args = StreamMapBuilder::new(&sources, &selections, ContainerFormat::Matroska)
            .with_copied_disposition(true)
            .build()
            .unwrap();
        assert_eq!(args, vec!["-map", "0:0", "-disposition:0", "default"]);
    }

    #[test]
    fn override_replaces_quirks_but_not_disposition() {
        let sources = single_source(vec![Track::new(0, StreamKind::Subtitle, "mov_text")
            .with_disposition_flag("forced", true)]);
        let selections = vec![CopySelection::new(0, vec![0])];

        let custom = |_: &Track, slot: usize| -> Option<Vec<String>> {
            Some(vec![format!("-c:{slot}"), "ass".to_string()])
        };
        let args = StreamMapBuilder::new(&sources, &selections, ContainerFormat::Matroska)
            .with_copied_disposition(true)
            .with_track_args_override(&custom)
            .build()
            .unwrap();
        assert_eq!(
            args,
            vec!["-map", "0:0", "-c:0", "ass", "-disposition:0", "forced"]
        );
    }

    #[test]
    fn unknown_track_index_fails_loudly() {
        let sources = single_source(vec![Track::new(0, StreamKind::Video, "h264")]);
        let selections = vec![CopySelection::new(0, vec![7])];

        let err = StreamMapBuilder::new(&sources, &selections, ContainerFormat::Matroska)
            .build()
            .unwrap_err();
        assert!(matches!(err, StreamMapError::UnknownTrack { track: 7, .. }));
    }

    #[test]
    fn unknown_source_index_fails_loudly() {
        let sources = single_source(vec![Track::new(0, StreamKind::Video, "h264")]);
        let selections = vec![CopySelection::new(3, vec![0])];

        let err = StreamMapBuilder::new(&sources, &selections, ContainerFormat::Matroska)
            .build()
            .unwrap_err();
        assert!(matches!(err, StreamMapError::UnknownSource { index: 3, .. }));
    }
}
