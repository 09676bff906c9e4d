pub mod aggregate;
pub mod filter;
pub mod impact;
pub mod render;
pub mod report;
pub mod severity;
pub mod table;

pub use aggregate::{MaintenanceAggregation, NodeShards, SequencerFact, ShardFact, StateCount};
pub use filter::{FilterCriteria, filter_maintenances};
pub use impact::{ImpactFormatter, PlainImpactFormatter};
pub use render::{NO_MATCHING_MAINTENANCES, RenderMode, RenderOptions, Renderer};
pub use report::{render_removal_preview, render_unrecoverable_report};
pub use severity::{Painter, Severity, StatusKind, classify};
