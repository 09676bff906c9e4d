use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MntError;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ShardOperationalState {
    #[default]
    Unknown,
    Enabled,
    MayDisappear,
    Drained,
    MigratingData,
    Enabling,
    Provisioning,
    PassiveDraining,
    Invalid,
}

impl ShardOperationalState {
    pub const ALL: [Self; 9] = [
        Self::Unknown,
        Self::Enabled,
        Self::MayDisappear,
        Self::Drained,
        Self::MigratingData,
        Self::Enabling,
        Self::Provisioning,
        Self::PassiveDraining,
        Self::Invalid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Enabled => "ENABLED",
            Self::MayDisappear => "MAY_DISAPPEAR",
            Self::Drained => "DRAINED",
            Self::MigratingData => "MIGRATING_DATA",
            Self::Enabling => "ENABLING",
            Self::Provisioning => "PROVISIONING",
            Self::PassiveDraining => "PASSIVE_DRAINING",
            Self::Invalid => "INVALID",
        }
    }
}

/// Operational goal a maintenance sets for its shards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShardTargetState {
    MayDisappear,
    Drained,
}

impl ShardTargetState {
    pub const ALL: [Self; 2] = [Self::MayDisappear, Self::Drained];

    pub fn as_str(&self) -> &'static str {
        self.as_operational_state().as_str()
    }

    pub fn as_operational_state(&self) -> ShardOperationalState {
        match self {
            Self::MayDisappear => ShardOperationalState::MayDisappear,
            Self::Drained => ShardOperationalState::Drained,
        }
    }
}

impl FromStr for ShardTargetState {
    type Err = MntError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "may-disappear" => Ok(Self::MayDisappear),
            "drained" => Ok(Self::Drained),
            _ => Err(MntError::invalid_value("shard_target_state", value)),
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum SequencingState {
    Enabled,
    Boycotted,
    Disabled,
    #[default]
    Unknown,
}

impl SequencingState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enabled => "ENABLED",
            Self::Boycotted => "BOYCOTTED",
            Self::Disabled => "DISABLED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// Workflow status of a single shard or sequencer under a maintenance.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum MaintenanceStatus {
    #[default]
    NotStarted,
    BlockedUntilSafe,
    AwaitingSafetyCheck,
    AwaitingDataRebuilding,
    RebuildingIsBlocked,
    AwaitingNodeToBeAlive,
    AwaitingStateChange,
    Retry,
    Completed,
}

impl MaintenanceStatus {
    pub const ALL: [Self; 9] = [
        Self::NotStarted,
        Self::BlockedUntilSafe,
        Self::AwaitingSafetyCheck,
        Self::AwaitingDataRebuilding,
        Self::RebuildingIsBlocked,
        Self::AwaitingNodeToBeAlive,
        Self::AwaitingStateChange,
        Self::Retry,
        Self::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "NOT_STARTED",
            Self::BlockedUntilSafe => "BLOCKED_UNTIL_SAFE",
            Self::AwaitingSafetyCheck => "AWAITING_SAFETY_CHECK",
            Self::AwaitingDataRebuilding => "AWAITING_DATA_REBUILDING",
            Self::RebuildingIsBlocked => "REBUILDING_IS_BLOCKED",
            Self::AwaitingNodeToBeAlive => "AWAITING_NODE_TO_BE_ALIVE",
            Self::AwaitingStateChange => "AWAITING_STATE_CHANGE",
            Self::Retry => "RETRY",
            Self::Completed => "COMPLETED",
        }
    }
}

/// Aggregate progress of a maintenance across all of its shards and sequencers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum MaintenanceProgress {
    #[default]
    Unknown,
    InProgress,
    BlockedUntilSafe,
    Completed,
}

impl MaintenanceProgress {
    pub const ALL: [Self; 4] = [
        Self::Unknown,
        Self::InProgress,
        Self::BlockedUntilSafe,
        Self::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::InProgress => "IN_PROGRESS",
            Self::BlockedUntilSafe => "BLOCKED_UNTIL_SAFE",
            Self::Completed => "COMPLETED",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum MaintenancePriority {
    Imminent,
    High,
    #[default]
    Medium,
    Low,
}

impl MaintenancePriority {
    pub const ALL: [Self; 4] = [Self::Imminent, Self::High, Self::Medium, Self::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Imminent => "IMMINENT",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

impl FromStr for MaintenancePriority {
    type Err = MntError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "IMMINENT" => Ok(Self::Imminent),
            "HIGH" => Ok(Self::High),
            "MEDIUM" => Ok(Self::Medium),
            "LOW" => Ok(Self::Low),
            _ => Err(MntError::invalid_value("priority", value)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum OperationImpact {
    Invalid,
    RebuildingStall,
    WriteAvailabilityLoss,
    ReadAvailabilityLoss,
    SequencingCapacityLoss,
    StorageCapacityLoss,
}

impl OperationImpact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invalid => "INVALID",
            Self::RebuildingStall => "REBUILDING_STALL",
            Self::WriteAvailabilityLoss => "WRITE_AVAILABILITY_LOSS",
            Self::ReadAvailabilityLoss => "READ_AVAILABILITY_LOSS",
            Self::SequencingCapacityLoss => "SEQUENCING_CAPACITY_LOSS",
            Self::StorageCapacityLoss => "STORAGE_CAPACITY_LOSS",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )+
    };
}

display_as_str!(
    ShardOperationalState,
    ShardTargetState,
    SequencingState,
    MaintenanceStatus,
    MaintenanceProgress,
    MaintenancePriority,
    OperationImpact,
);

#[cfg(test)]
mod tests {
    use super::{MaintenancePriority, ShardOperationalState, ShardTargetState};

    #[test]
    fn priority_parses_case_insensitively() {
        assert_eq!(
            "Imminent".parse::<MaintenancePriority>().unwrap(),
            MaintenancePriority::Imminent
        );
        assert_eq!(
            " low ".parse::<MaintenancePriority>().unwrap(),
            MaintenancePriority::Low
        );
        let err = "urgent".parse::<MaintenancePriority>().unwrap_err();
        assert_eq!(err.error_code(), "InvalidFilterValue");
    }

    #[test]
    fn target_state_uses_dashed_names() {
        assert_eq!(
            "MAY-DISAPPEAR".parse::<ShardTargetState>().unwrap(),
            ShardTargetState::MayDisappear
        );
        assert_eq!(
            "drained".parse::<ShardTargetState>().unwrap(),
            ShardTargetState::Drained
        );
        assert!("may_disappear".parse::<ShardTargetState>().is_err());
    }

    #[test]
    fn target_state_names_match_operational_names() {
        for target in ShardTargetState::ALL {
            assert_eq!(target.to_string(), target.as_operational_state().to_string());
        }
        assert_eq!(ShardOperationalState::MigratingData.to_string(), "MIGRATING_DATA");
    }

    #[test]
    fn priority_defaults_to_medium() {
        assert_eq!(MaintenancePriority::default(), MaintenancePriority::Medium);
    }
}
