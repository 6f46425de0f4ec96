//! Export plan composition.
//!
//! Composes template expansion + validation (with the single fallback
//! retry) and track selection + stream-map synthesis into one plan the
//! external execution layer consumes.

mod plan;

pub use plan::{
    build_export_plan, current_epoch_ms, plan_file_names, ExportPlan, ExportPlanInput, NamePlan,
    NamePlanInput,
};
