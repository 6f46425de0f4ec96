//! Export plan builder.
//!
//! The name-planning half expands the user's template, validates the batch,
//! and on any blocking problem retries exactly once with the fallback
//! template and sanitization forced on. The fallback is valid and
//! collision-free by construction whenever segment boundaries differ, so a
//! second retry can never be needed.
//!
//! The stream half turns the configured selection policy into explicit map
//! instructions for the transcoder.

use std::path::Path;

use crate::config::Settings;
use crate::models::{ContainerFormat, CopySelection, Platform, Segment, SourceFile};
use crate::naming::{expand_template, PathValidator, TemplateContext, ValidationReport};
use crate::streams::{default_copy_selection, StreamMapBuilder, StreamMapError, TrackArgsOverride};

/// Current wall-clock time in milliseconds, for `EPOCH_MS`.
///
/// Callers hold the value themselves and pass it in, so one batch shares a
/// single timestamp and planning stays a pure function of its inputs.
pub fn current_epoch_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Input for [`plan_file_names`].
pub struct NamePlanInput<'a> {
    /// Segments to name, in output order.
    pub segments: &'a [Segment],
    /// User-authored naming template.
    pub template: &'a str,
    /// Template used for the single retry. Must be valid by construction;
    /// [`crate::naming::DEFAULT_TEMPLATE`] qualifies.
    pub fallback_template: &'a str,
    /// The opened input file, if any.
    pub original_file: Option<&'a Path>,
    /// Directory the outputs will land in.
    pub output_dir: &'a Path,
    /// Platform whose file-name rules apply.
    pub platform: Platform,
    /// Apply the Windows-only checks regardless of platform.
    pub diagnostics: bool,
    /// Expansion context (base name, extension, epoch, padding, ...).
    pub context: TemplateContext,
}

/// Planned output names plus the diagnostics that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct NamePlan {
    /// One name per segment, in segment order.
    pub file_names: Vec<String>,
    /// Whether the fallback template was used.
    pub used_fallback: bool,
    /// Validation outcome of the *desired* template, kept for user-facing
    /// diagnostics even after falling back.
    pub validation: ValidationReport,
}

/// Expand and validate output names, falling back once if needed.
pub fn plan_file_names(input: &NamePlanInput) -> NamePlan {
    let candidates = expand_template(input.segments, input.template, &input.context);

    let validator = PathValidator::new(input.original_file, input.output_dir, input.platform)
        .with_safe_mode(input.context.sanitize)
        .with_diagnostics(input.diagnostics);
    let validation = validator.validate(&candidates);

    if validation.is_ok() {
        return NamePlan {
            file_names: candidates,
            used_fallback: false,
            validation,
        };
    }

    if let Some(problem) = validation.blocking_problem() {
        tracing::debug!("naming template rejected ({problem}); using fallback template");
    }

    // Sanitization is forced on for the retry regardless of settings.
    let safe_context = input.context.clone().with_sanitize(true);
    let file_names = expand_template(input.segments, input.fallback_template, &safe_context);

    NamePlan {
        file_names,
        used_fallback: true,
        validation,
    }
}

/// Input for [`build_export_plan`].
pub struct ExportPlanInput<'a> {
    /// Probed source files, primary first.
    pub sources: &'a [SourceFile],
    /// Segments to export.
    pub segments: &'a [Segment],
    /// Container format of the source material. Superseded by the
    /// configured `file_format` when `is_custom_format_selected` is set.
    pub format: ContainerFormat,
    /// Directory the outputs will land in.
    pub output_dir: &'a Path,
    /// Platform whose file-name rules apply.
    pub platform: Platform,
    /// Planner configuration.
    pub settings: &'a Settings,
    /// Batch timestamp for `EPOCH_MS`; see [`current_epoch_ms`].
    pub epoch_ms: i64,
    /// Frame rate of the primary video track, for frame-accurate timecodes.
    pub fps: Option<f64>,
    /// Optional per-track override for transcode instructions.
    pub track_args_override: Option<TrackArgsOverride<'a>>,
}

/// A complete export plan for the external execution layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPlan {
    /// Ordered remap/transcode tokens, appended verbatim to the
    /// transcoder's argument list.
    pub stream_args: Vec<String>,
    /// Tracks selected per source, in output order.
    pub selections: Vec<CopySelection>,
    /// One output name per segment.
    pub file_names: Vec<String>,
    /// Whether the fallback naming template was used.
    pub used_fallback: bool,
    /// Validation outcome of the desired template.
    pub validation: ValidationReport,
}

/// Build the full export plan: track selection, stream map, output names.
pub fn build_export_plan(input: &ExportPlanInput) -> Result<ExportPlan, StreamMapError> {
    let selections = build_selections(input.sources, input.settings.streams.include_all_tracks);

    // The configured format wins once the user picked one explicitly.
    let custom = input.settings.output.is_custom_format_selected;
    let format = if custom {
        input.settings.output.file_format
    } else {
        input.format
    };

    let mut builder = StreamMapBuilder::new(input.sources, &selections, format)
        .with_copied_disposition(input.settings.streams.manually_copy_disposition);
    if let Some(f) = input.track_args_override {
        builder = builder.with_track_args_override(f);
    }
    let stream_args = builder.build()?;

    let original_file = input.sources.first().map(|s| s.path.as_path());
    let base_name = original_file
        .and_then(|p| p.file_stem())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = output_extension(original_file, format, custom);

    let context = TemplateContext::new(base_name, extension, input.epoch_ms)
        .with_min_zero_padding(input.settings.output.output_file_name_min_zero_padding)
        .with_max_label_length(input.settings.output.max_label_length)
        .with_sanitize(input.settings.output.safe_output_file_name)
        .with_fps(input.fps);

    let names = plan_file_names(&NamePlanInput {
        segments: input.segments,
        template: &input.settings.output.output_name_template,
        fallback_template: crate::naming::DEFAULT_TEMPLATE,
        original_file,
        output_dir: input.output_dir,
        platform: input.platform,
        diagnostics: false,
        context,
    });

    Ok(ExportPlan {
        stream_args,
        selections,
        file_names: names.file_names,
        used_fallback: names.used_fallback,
        validation: names.validation,
    })
}

/// Selection policy: every track of every source, or the default selection
/// applied per source.
fn build_selections(sources: &[SourceFile], include_all: bool) -> Vec<CopySelection> {
    sources
        .iter()
        .enumerate()
        .map(|(index, source)| {
            if include_all {
                CopySelection::all_of(index, source)
            } else {
                CopySelection::new(index, default_copy_selection(&source.tracks).included)
            }
        })
        .collect()
}

/// The output extension: the chosen format's when the user picked one
/// explicitly, otherwise the source file's own.
fn output_extension(source: Option<&Path>, format: ContainerFormat, custom: bool) -> String {
    if custom {
        if let Some(ext) = format.extension() {
            return format!(".{ext}");
        }
    }
    source
        .and_then(|p| p.extension())
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StreamKind, Track};
    use crate::naming::{PathProblem, DEFAULT_TEMPLATE};

    fn name_input<'a>(
        segments: &'a [Segment],
        template: &'a str,
        context: TemplateContext,
    ) -> NamePlanInput<'a> {
        NamePlanInput {
            segments,
            template,
            fallback_template: DEFAULT_TEMPLATE,
            original_file: Some(Path::new("/media/clip.mp4")),
            output_dir: Path::new("/out"),
            platform: Platform::Linux,
            diagnostics: false,
            context,
        }
    }

    #[test]
    fn valid_template_is_used_as_is() {
        let segments = vec![Segment::new(0.0, 10.0)];
        let context = TemplateContext::new("clip", ".mp4", 0);
        let plan = plan_file_names(&name_input(&segments, DEFAULT_TEMPLATE, context));

        assert!(!plan.used_fallback);
        assert!(plan.validation.is_ok());
        assert_eq!(plan.file_names, vec!["clip-00.00.00.000-00.00.10.000.mp4"]);
    }

    #[test]
    fn colliding_names_switch_to_fallback() {
        // Two identical unnamed segments under a template without any
        // per-segment variable collide; the fallback numbers them.
        let segments = vec![Segment::new(0.0, 10.0), Segment::new(0.0, 10.0)];
        let context = TemplateContext::new("clip", ".mp4", 0);
        let plan = plan_file_names(&name_input(&segments, "${FILENAME}${EXT}", context));

        assert!(plan.used_fallback);
        assert!(matches!(
            plan.validation.duplicate,
            Some(PathProblem::Duplicate { first: 0, second: 1 })
        ));
        assert_eq!(
            plan.file_names,
            vec![
                "clip-00.00.00.000-00.00.10.000-seg01.mp4",
                "clip-00.00.00.000-00.00.10.000-seg02.mp4",
            ]
        );
    }

    #[test]
    fn fallback_forces_sanitization_on() {
        let segments = vec![
            Segment::new(0.0, 10.0).with_name("a:b"),
            Segment::new(0.0, 10.0).with_name("a:b"),
        ];
        let context = TemplateContext::new("clip", ".mp4", 0).with_sanitize(false);
        let plan = plan_file_names(&name_input(&segments, "${FILENAME}${EXT}", context));

        assert!(plan.used_fallback);
        // The ':' in the label is stripped even though sanitize was off.
        assert_eq!(
            plan.file_names,
            vec![
                "clip-00.00.00.000-00.00.10.000-ab.mp4",
                "clip-00.00.00.000-00.00.10.000-ab.mp4",
            ]
        );
    }

    #[test]
    fn distinct_boundaries_never_collide_under_fallback() {
        let segments: Vec<Segment> = (0..25)
            .map(|i| Segment::new(f64::from(i) * 1.5, f64::from(i) * 1.5 + 1.0))
            .collect();
        let context = TemplateContext::new("clip", ".mp4", 0);
        let plan = plan_file_names(&name_input(&segments, DEFAULT_TEMPLATE, context));

        let mut unique = plan.file_names.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), segments.len());
    }

    #[test]
    fn invalid_template_keeps_original_diagnostics() {
        let segments = vec![Segment::new(0.0, 10.0)];
        let context = TemplateContext::new("clip", ".mp4", 0).with_sanitize(false);
        let mut input = name_input(&segments, "bad:name${EXT}", context);
        input.platform = Platform::MacOs;
        let plan = plan_file_names(&input);

        assert!(plan.used_fallback);
        assert!(matches!(
            plan.validation.error,
            Some(PathProblem::InvalidChar { index: 0, ch: ':' })
        ));
    }

    fn sample_sources() -> Vec<SourceFile> {
        vec![SourceFile::new(
            "/media/clip.mp4",
            vec![
                Track::new(0, StreamKind::Video, "h264"),
                Track::new(1, StreamKind::Audio, "aac"),
                Track::new(2, StreamKind::Audio, "ac3"),
                Track::new(3, StreamKind::Subtitle, "mov_text"),
            ],
        )]
    }

    #[test]
    fn full_plan_uses_default_selection() {
        let sources = sample_sources();
        let segments = vec![Segment::new(0.0, 10.0)];
        let settings = Settings::default();

        let plan = build_export_plan(&ExportPlanInput {
            sources: &sources,
            segments: &segments,
            format: ContainerFormat::Matroska,
            output_dir: Path::new("/out"),
            platform: Platform::Linux,
            settings: &settings,
            epoch_ms: 0,
            fps: None,
            track_args_override: None,
        })
        .unwrap();

        // Default selection: first video, first audio, first subtitle;
        // the mov_text subtitle picks up the matroska transcode quirk.
        assert_eq!(plan.selections, vec![CopySelection::new(0, vec![0, 1, 3])]);
        assert_eq!(
            plan.stream_args,
            vec!["-map", "0:0", "-map", "0:1", "-map", "0:3", "-c:2", "srt"]
        );
        assert_eq!(plan.file_names, vec!["clip-00.00.00.000-00.00.10.000.mp4"]);
        assert!(!plan.used_fallback);
    }

    #[test]
    fn full_plan_can_include_all_tracks() {
        let sources = sample_sources();
        let segments = vec![Segment::new(0.0, 10.0)];
        let mut settings = Settings::default();
        settings.streams.include_all_tracks = true;

        let plan = build_export_plan(&ExportPlanInput {
            sources: &sources,
            segments: &segments,
            format: ContainerFormat::Matroska,
            output_dir: Path::new("/out"),
            platform: Platform::Linux,
            settings: &settings,
            epoch_ms: 0,
            fps: None,
            track_args_override: None,
        })
        .unwrap();

        assert_eq!(
            plan.selections,
            vec![CopySelection::new(0, vec![0, 1, 2, 3])]
        );
    }

    #[test]
    fn custom_format_comes_from_settings() {
        let sources = sample_sources();
        let segments = vec![Segment::new(0.0, 10.0)];
        let mut settings = Settings::default();
        settings.output.is_custom_format_selected = true;
        settings.output.file_format = ContainerFormat::Matroska;

        let plan = build_export_plan(&ExportPlanInput {
            sources: &sources,
            segments: &segments,
            format: ContainerFormat::Mp4,
            output_dir: Path::new("/out"),
            platform: Platform::Linux,
            settings: &settings,
            epoch_ms: 0,
            fps: None,
            track_args_override: None,
        })
        .unwrap();

        // The configured matroska target supersedes the mp4 source format
        // for both the extension and the quirk table: the selected
        // mov_text subtitle at slot 2 gets the matroska srt transcode.
        assert_eq!(plan.file_names, vec!["clip-00.00.00.000-00.00.10.000.mkv"]);
        assert!(plan
            .stream_args
            .ends_with(&["-c:2".to_string(), "srt".to_string()]));
    }

    #[test]
    fn no_sources_means_empty_map_and_no_input_error() {
        let sources: Vec<SourceFile> = Vec::new();
        let segments = vec![Segment::new(0.0, 1.0)];
        let settings = Settings::default();

        let plan = build_export_plan(&ExportPlanInput {
            sources: &sources,
            segments: &segments,
            format: ContainerFormat::Matroska,
            output_dir: Path::new("/out"),
            platform: Platform::Linux,
            settings: &settings,
            epoch_ms: 0,
            fps: None,
            track_args_override: None,
        })
        .unwrap();

        assert!(plan.stream_args.is_empty());
        assert!(plan.used_fallback);
        assert_eq!(plan.validation.error, Some(PathProblem::NoInput));
    }
}
