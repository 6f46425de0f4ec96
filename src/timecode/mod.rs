//! Timecode formatting and parsing.
//!
//! Conversion between a signed seconds value and a human-readable timecode
//! string. Formatting works entirely in integer units (milliseconds, or
//! frames when an fps is given) so repeated conversions cannot drift.

use serde::{Deserialize, Serialize};

/// Formatting options for [`format_timecode`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimecodeFormat {
    /// Use "." instead of ":" between groups, for use in file names.
    #[serde(default)]
    pub file_name_friendly: bool,
    /// Emit the fractional suffix (milliseconds or frame index).
    #[serde(default = "default_true")]
    pub show_fraction: bool,
    /// Drop zero-valued leading hour/minute groups.
    #[serde(default)]
    pub shorten: bool,
    /// Frame rate. When set, the fraction is a 2-digit frame index within
    /// the second; otherwise it is 3-digit milliseconds.
    #[serde(default)]
    pub fps: Option<f64>,
}

fn default_true() -> bool {
    true
}

impl Default for TimecodeFormat {
    fn default() -> Self {
        Self {
            file_name_friendly: false,
            show_fraction: true,
            shorten: false,
            fps: None,
        }
    }
}

impl TimecodeFormat {
    /// Create options with the defaults (":" delimiter, 3-digit fraction).
    pub fn new() -> Self {
        Self::default()
    }

    /// Use "." instead of ":" as the group delimiter.
    pub fn with_file_name_friendly(mut self, yes: bool) -> Self {
        self.file_name_friendly = yes;
        self
    }

    /// Emit or suppress the fractional suffix.
    pub fn with_fraction(mut self, yes: bool) -> Self {
        self.show_fraction = yes;
        self
    }

    /// Drop zero-valued leading groups.
    pub fn with_shorten(mut self, yes: bool) -> Self {
        self.shorten = yes;
        self
    }

    /// Set the frame rate used for the fractional part.
    pub fn with_fps(mut self, fps: Option<f64>) -> Self {
        self.fps = fps;
        self
    }
}

/// Format a seconds value as a timecode string.
///
/// The value is first rounded (half-up) to a whole number of units, where
/// one second holds `fps` units when a frame rate is given and 1000 units
/// otherwise. All fields are then derived from that integer, so a remainder
/// within half a unit of the next second rolls the second over instead of
/// truncating. A leading `-` is emitted only when the input is negative and
/// does not round to zero.
pub fn format_timecode(seconds: f64, options: &TimecodeFormat) -> String {
    let units_per_sec = options.fps.unwrap_or(1000.0);
    let total_units = (seconds.abs() * units_per_sec).round() as u64;

    let whole_seconds = (total_units as f64 / units_per_sec).floor() as u64;
    let frac_units = (total_units as f64 - whole_seconds as f64 * units_per_sec).floor() as u64;

    let hours = whole_seconds / 3600;
    let minutes = (whole_seconds % 3600) / 60;
    let secs = whole_seconds % 60;

    let delim = if options.file_name_friendly { '.' } else { ':' };

    let mut out = String::new();
    if seconds < 0.0 && total_units > 0 {
        out.push('-');
    }
    if !(options.shorten && hours == 0) {
        out.push_str(&format!("{hours:02}{delim}"));
    }
    if !(options.shorten && hours == 0 && minutes == 0) {
        out.push_str(&format!("{minutes:02}{delim}"));
    }
    out.push_str(&format!("{secs:02}"));

    if options.show_fraction {
        if options.fps.is_some() {
            out.push_str(&format!(".{frac_units:02}"));
        } else {
            out.push_str(&format!(".{frac_units:03}"));
        }
    }

    out
}

/// Parse a timecode of the form `[-][[HH:]MM:]SS[.ms]`.
///
/// Hour/minute/second groups are 1-2 digits, the fraction 0-3 digits after
/// `.` or `,`. Surrounding whitespace is ignored. Returns `None` when the
/// pattern does not match, or when minutes > 59 or seconds >= 60. Never
/// panics; callers treat `None` as "no timecode".
pub fn parse_timecode(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let groups: Vec<&str> = body.split(':').collect();
    let (hours_str, minutes_str, last) = match groups.as_slice() {
        [s] => (None, None, *s),
        [m, s] => (None, Some(*m), *s),
        [h, m, s] => (Some(*h), Some(*m), *s),
        _ => return None,
    };

    let (seconds_str, fraction_str) = match last.split_once(['.', ',']) {
        Some((s, f)) => (s, Some(f)),
        None => (last, None),
    };

    let hours = match hours_str {
        Some(h) => parse_group(h)?,
        None => 0,
    };
    let minutes = match minutes_str {
        Some(m) => parse_group(m)?,
        None => 0,
    };
    let seconds = parse_group(seconds_str)?;

    if minutes > 59 || seconds >= 60 {
        return None;
    }

    let millis = match fraction_str {
        None => 0,
        Some(f) => {
            if f.len() > 3 || !f.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            if f.is_empty() {
                0
            } else {
                format!("{f:0<3}").parse::<u32>().ok()?
            }
        }
    };

    let total = f64::from(hours) * 3600.0
        + f64::from(minutes) * 60.0
        + f64::from(seconds)
        + f64::from(millis) / 1000.0;

    Some(if negative { -total } else { total })
}

/// Parse a 1-2 digit group.
fn parse_group(s: &str) -> Option<u32> {
    if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
