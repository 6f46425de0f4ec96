//! Default track selection.
//!
//! When the caller has not asked for all tracks, we pick the first real
//! video track, the first audio track, and the first subtitle track. This
//! approximates the external transcoder's own automatic selection - it is
//! deliberately not canonical. It exists because relying on automatic
//! selection is unsafe once we emit explicit per-track mapping (which we
//! must, e.g. when additional global metadata is merged in), so the default
//! has to be deterministic and explainable instead.

use crate::models::{StreamKind, Track};

/// Result of default selection: what is copied and what is left behind.
///
/// The excluded list exists for UI feedback ("these tracks were skipped").
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultSelection {
    /// Selected stream indices, in video/audio/subtitle priority order.
    pub included: Vec<u32>,
    /// Stream indices not selected, in probe order.
    pub excluded: Vec<u32>,
}

/// Pick the default tracks to copy from a probed track list.
///
/// Selects the first video track that is not an attached picture, the first
/// audio track, and the first subtitle track, each only when present.
/// Attachment and data tracks are never selected.
pub fn default_copy_selection(tracks: &[Track]) -> DefaultSelection {
    let video = tracks
        .iter()
        .find(|t| t.kind == StreamKind::Video && !t.is_attached_picture());
    let audio = tracks.iter().find(|t| t.kind == StreamKind::Audio);
    let subtitle = tracks.iter().find(|t| t.kind == StreamKind::Subtitle);

    let included: Vec<u32> = [video, audio, subtitle]
        .into_iter()
        .flatten()
        .map(|t| t.index)
        .collect();

    let excluded: Vec<u32> = tracks
        .iter()
        .map(|t| t.index)
        .filter(|index| !included.contains(index))
        .collect();

    tracing::debug!(
        "default selection kept {} of {} tracks",
        included.len(),
        tracks.len()
    );

    DefaultSelection { included, excluded }
}
