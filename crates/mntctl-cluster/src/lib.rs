pub mod plan;
pub mod provider;
pub mod record;
pub mod shard;
pub mod snapshot;
pub mod types;
pub mod unrecoverable;

pub use plan::{ApplyRequest, MaintenanceDefinition, plan_maintenance};
pub use provider::{FileSnapshotProvider, SnapshotProvider, StaticSnapshotProvider};
pub use record::{ImpactResult, LogImpact, MaintenanceRecord, SequencerProgress, ShardProgress};
pub use shard::{ALL_SHARDS, NodeIndex, ShardId, parse_shards};
pub use snapshot::ClusterSnapshot;
pub use types::NodeView;
pub use unrecoverable::MarkUnrecoverableResponse;
