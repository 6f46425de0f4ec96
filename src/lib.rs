//! Cutplan - deterministic planning core for a video segment export pipeline.
//!
//! This crate contains the side-effect-free half of the export pipeline:
//! timecode conversion, default track selection, ffmpeg stream-map synthesis
//! with per-container compatibility quirks, output-name template expansion,
//! and batch path validation with a safe fallback policy.
//!
//! Launching the transcoder, decoding media, and the UI live elsewhere. They
//! feed this crate a probed track-metadata snapshot and a segment list, and
//! consume the computed argument list and file-name list. Every planning API
//! here is a pure function of its inputs and safe to call from any thread.

pub mod config;
pub mod models;
pub mod naming;
pub mod planner;
pub mod streams;
pub mod timecode;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
