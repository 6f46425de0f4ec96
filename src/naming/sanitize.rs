//! File-name sanitization helpers.

/// Characters illegal in file names on at least one supported platform,
/// plus both path separators.
const ILLEGAL_CHARS: &[char] = &['/', '\\', '<', '>', ':', '"', '|', '?', '*'];

/// Strip characters that cannot appear in a file name.
///
/// Control characters are stripped too. The result may be empty; the
/// validator catches that case.
pub fn sanitize_file_name(value: &str) -> String {
    value
        .chars()
        .filter(|c| !ILLEGAL_CHARS.contains(c) && !c.is_control())
        .collect()
}

/// Truncate to at most `max_chars` characters, never splitting a char.
pub fn truncate_chars(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}
