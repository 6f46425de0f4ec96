//! Data models for export planning.
//!
//! This module contains the core data structures consumed and produced by
//! the planner:
//! - Enums for stream kinds, container formats, and target platforms
//! - Media structures (tracks, source files, copy selections, segments)
//! - Parsing of an external prober's stream report into a `SourceFile`

mod enums;
mod media;
mod probe;

// Re-export all public types
pub use enums::{ContainerFormat, Platform, StreamKind};
pub use media::{CopySelection, Segment, SourceFile, Track};
pub use probe::{parse_probe_report, ProbeError};
