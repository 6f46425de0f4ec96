//! Track selection and stream-map synthesis.
//!
//! # Architecture
//!
//! - **select**: decides which tracks are copied by default
//! - **map**: turns copy selections into ordered transcoder argument tokens

mod map;
mod select;

pub use map::{StreamMapBuilder, StreamMapError, TrackArgsOverride};
pub use select::{default_copy_selection, DefaultSelection};
