//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Every field carries a serde default so a partial file loads cleanly.

use serde::{Deserialize, Serialize};

use crate::models::ContainerFormat;
use crate::naming::DEFAULT_TEMPLATE;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Output naming settings.
    #[serde(default)]
    pub output: OutputSettings,

    /// Track selection and mapping settings.
    #[serde(default)]
    pub streams: StreamSettings,
}

/// Output file naming configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Strip characters and limit lengths in generated file names.
    #[serde(default = "default_true")]
    pub safe_output_file_name: bool,

    /// Minimum zero-padding width for segment numbers.
    #[serde(default = "default_min_zero_padding")]
    pub output_file_name_min_zero_padding: usize,

    /// Maximum length of a segment label in generated names.
    #[serde(default = "default_max_label_length")]
    pub max_label_length: usize,

    /// Target container format for exports.
    #[serde(default = "default_file_format")]
    pub file_format: ContainerFormat,

    /// Whether the user explicitly picked `file_format` (otherwise the
    /// source file's own extension is kept).
    #[serde(default)]
    pub is_custom_format_selected: bool,

    /// User-authored naming template.
    #[serde(default = "default_name_template")]
    pub output_name_template: String,
}

fn default_true() -> bool {
    true
}

fn default_min_zero_padding() -> usize {
    2
}

fn default_max_label_length() -> usize {
    100
}

fn default_file_format() -> ContainerFormat {
    ContainerFormat::Matroska
}

fn default_name_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            safe_output_file_name: default_true(),
            output_file_name_min_zero_padding: default_min_zero_padding(),
            max_label_length: default_max_label_length(),
            file_format: default_file_format(),
            is_custom_format_selected: false,
            output_name_template: default_name_template(),
        }
    }
}

/// Track selection and mapping configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamSettings {
    /// Copy every track instead of the default selection.
    #[serde(default)]
    pub include_all_tracks: bool,

    /// Emit explicit set-disposition instructions per track.
    #[serde(default)]
    pub manually_copy_disposition: bool,
}
