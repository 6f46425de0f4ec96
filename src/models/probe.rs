//! Parsing of an external prober's stream report.
//!
//! The collaborator that probes media hands us the JSON text of an
//! ffprobe-style `-show_streams -show_format` report. We only parse it;
//! no process is spawned here.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use super::enums::StreamKind;
use super::media::{SourceFile, Track};

/// Errors from probe-report parsing.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// Report is not valid JSON or has an unexpected shape.
    #[error("Failed to parse probe report: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Result of a prober run, matching its JSON output.
#[derive(Debug, Deserialize)]
struct ProbeReport {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    index: u32,
    codec_type: StreamKind,
    #[serde(default)]
    codec_name: String,
    #[serde(default)]
    codec_tag: Option<String>,
    #[serde(default)]
    disposition: BTreeMap<String, u8>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    filename: Option<String>,
}

/// Parse a prober JSON report into a `SourceFile`.
pub fn parse_probe_report(json: &str) -> Result<SourceFile, ProbeError> {
    let report: ProbeReport = serde_json::from_str(json)?;

    let tracks = report
        .streams
        .into_iter()
        .map(|s| {
            let mut track = Track::new(s.index, s.codec_type, s.codec_name);
            if let Some(tag) = s.codec_tag {
                track.codec_tag = tag;
            }
            track.disposition = s.disposition;
            track
        })
        .collect();

    let path = report
        .format
        .and_then(|f| f.filename)
        .map(PathBuf::from)
        .unwrap_or_default();

    Ok(SourceFile::new(path, tracks))
}
