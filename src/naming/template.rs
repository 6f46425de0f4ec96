//! Output-name template expansion.
//!
//! Expands a user-authored `${TOKEN}` template once per segment. Expansion
//! is a pure function of its inputs: the batch timestamp (`EPOCH_MS`) is an
//! explicit caller-held value, never ambient state, so previews are
//! reproducible and testable.

use std::collections::BTreeMap;

use crate::models::Segment;
use crate::timecode::{format_timecode, TimecodeFormat};

use super::sanitize::{sanitize_file_name, truncate_chars};

/// Template the planner falls back to when a user template produces invalid
/// or colliding names. The start/end timecodes make it collision-free
/// whenever segment boundaries differ, and `SEG_SUFFIX` numbers unnamed
/// segments whenever there is more than one.
pub const DEFAULT_TEMPLATE: &str = "${FILENAME}-${CUT_FROM}-${CUT_TO}${SEG_SUFFIX}${EXT}";

/// Maximum length, in characters, of a generated file name.
const MAX_FILE_NAME_CHARS: usize = 200;

/// Per-expansion context for [`expand_template`].
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateContext {
    /// Source file base name without extension, used verbatim.
    pub file_base_name: String,
    /// Output extension including the leading dot (e.g. ".mp4").
    pub extension: String,
    /// Batch-wide timestamp, identical for every segment of one expansion.
    pub epoch_ms: i64,
    /// Minimum zero-padding width for segment numbers. The effective width
    /// is this or the digit count of the segment total, whichever is larger.
    pub min_zero_padding: usize,
    /// Maximum length of a segment label, in characters.
    pub max_label_length: usize,
    /// Strip filename-illegal characters from generated values and cap the
    /// final name component.
    pub sanitize: bool,
    /// Frame rate for `CUT_FROM`/`CUT_TO` timecodes.
    pub fps: Option<f64>,
}

impl TemplateContext {
    /// Create a context with the standard defaults.
    pub fn new(
        file_base_name: impl Into<String>,
        extension: impl Into<String>,
        epoch_ms: i64,
    ) -> Self {
        Self {
            file_base_name: file_base_name.into(),
            extension: extension.into(),
            epoch_ms,
            min_zero_padding: 2,
            max_label_length: 100,
            sanitize: true,
            fps: None,
        }
    }

    /// Set the minimum zero-padding width for segment numbers.
    pub fn with_min_zero_padding(mut self, width: usize) -> Self {
        self.min_zero_padding = width;
        self
    }

    /// Set the maximum segment-label length.
    pub fn with_max_label_length(mut self, length: usize) -> Self {
        self.max_label_length = length;
        self
    }

    /// Enable or disable sanitization.
    pub fn with_sanitize(mut self, yes: bool) -> Self {
        self.sanitize = yes;
        self
    }

    /// Set the frame rate used for timecode variables.
    pub fn with_fps(mut self, fps: Option<f64>) -> Self {
        self.fps = fps;
        self
    }
}

/// Expand a naming template against a segment list.
///
/// Returns exactly one candidate name per segment, in input order. Unknown
/// `${...}` tokens pass through literally.
pub fn expand_template(segments: &[Segment], template: &str, ctx: &TemplateContext) -> Vec<String> {
    let width = ctx.min_zero_padding.max(digit_count(segments.len()));
    let timecode_opts = TimecodeFormat::new()
        .with_file_name_friendly(true)
        .with_fps(ctx.fps);

    segments
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            let vars = build_variables(segment, i, segments.len(), width, &timecode_opts, ctx);
            let expanded = interpolate(template, &vars);
            cap_final_component(&expanded, ctx.sanitize)
        })
        .collect()
}

/// Build the variable bag for one segment.
///
/// Segment tags go in first under their original key, then again under
/// their uppercased key; the uppercase pass overwrites a differently-cased
/// original. Built-in variables go in last, so a tag can never shadow them.
fn build_variables(
    segment: &Segment,
    index: usize,
    total: usize,
    width: usize,
    timecode_opts: &TimecodeFormat,
    ctx: &TemplateContext,
) -> BTreeMap<String, String> {
    let clean = |value: &str| {
        if ctx.sanitize {
            sanitize_file_name(value)
        } else {
            value.to_string()
        }
    };

    let mut vars = BTreeMap::new();

    for (key, value) in &segment.tags {
        vars.insert(key.clone(), clean(value));
    }
    for (key, value) in &segment.tags {
        vars.insert(key.to_uppercase(), clean(value));
    }

    let seg_num = format!("{:0width$}", index + 1, width = width);
    let label = truncate_chars(&clean(&segment.name), ctx.max_label_length);
    let suffix = if !segment.name.is_empty() {
        format!("-{label}")
    } else if total > 1 {
        format!("-seg{seg_num}")
    } else {
        String::new()
    };

    vars.insert("FILENAME".to_string(), ctx.file_base_name.clone());
    vars.insert("EXT".to_string(), ctx.extension.clone());
    vars.insert("SEG_NUM".to_string(), seg_num);
    vars.insert("SEG_LABEL".to_string(), label);
    vars.insert("SEG_SUFFIX".to_string(), suffix);
    vars.insert("EPOCH_MS".to_string(), ctx.epoch_ms.to_string());
    vars.insert(
        "CUT_FROM".to_string(),
        format_timecode(segment.start, timecode_opts),
    );
    vars.insert(
        "CUT_TO".to_string(),
        format_timecode(segment.end, timecode_opts),
    );

    vars
}

/// Literal `${TOKEN}` substitution. Unknown tokens stay as written.
fn interpolate(template: &str, vars: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let key = &after[..end];
                match vars.get(key) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push_str("${");
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                // Unterminated token: keep the tail verbatim.
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Cap the final path component to the file-name length limit. Earlier
/// components (directories the template may have introduced) are left
/// untouched. Both separators count: sanitized values cannot contain them,
/// so any separator left came from literal template text.
fn cap_final_component(path: &str, sanitize: bool) -> String {
    if !sanitize {
        return path.to_string();
    }
    match path.rfind(['/', '\\']) {
        Some(pos) => {
            let (dir, name) = path.split_at(pos + 1);
            format!("{dir}{}", truncate_chars(name, MAX_FILE_NAME_CHARS))
        }
        None => truncate_chars(path, MAX_FILE_NAME_CHARS),
    }
}

fn digit_count(n: usize) -> usize {
    n.to_string().len()
}
