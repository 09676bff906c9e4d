pub mod error;
pub mod state;
pub mod time;
pub mod types;

pub use error::{MntError, Result};
pub use state::satisfies;
pub use types::{
    MaintenancePriority, MaintenanceProgress, MaintenanceStatus, OperationImpact,
    SequencingState, ShardOperationalState, ShardTargetState,
};
