use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use mntctl_common::state::satisfies;
use mntctl_common::types::{
    MaintenancePriority, MaintenanceProgress, MaintenanceStatus, OperationImpact,
    SequencingState, ShardOperationalState, ShardTargetState,
};
use serde::{Deserialize, Serialize};

use crate::shard::{NodeIndex, ShardId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardProgress {
    pub shard: ShardId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_operational_state: Option<ShardOperationalState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_status: Option<MaintenanceStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencerProgress {
    pub node_index: NodeIndex,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_state: Option<SequencingState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_status: Option<MaintenanceStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogImpact {
    pub log_id: u64,
    pub epoch: u32,
    #[serde(default)]
    pub impact: Vec<OperationImpact>,
    #[serde(default)]
    pub replication: String,
    #[serde(default)]
    pub storage_set: Vec<ShardId>,
    #[serde(default)]
    pub is_metadata_log: bool,
}

/// Outcome of the last safety check that blocked a maintenance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactResult {
    #[serde(default)]
    pub impact: Vec<OperationImpact>,
    #[serde(default)]
    pub internal_logs_affected: bool,
    #[serde(default)]
    pub logs_affected: Vec<LogImpact>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceRecord {
    pub id: String,
    pub shards: Vec<ShardId>,
    pub shard_target_state: Option<ShardTargetState>,
    pub sequencer_nodes: Vec<NodeIndex>,
    pub sequencer_target_state: Option<SequencingState>,
    pub overall_status: MaintenanceProgress,
    pub priority: Option<MaintenancePriority>,
    pub user: String,
    pub reason: Option<String>,
    pub extras: BTreeMap<String, String>,
    pub created_on: Option<DateTime<Utc>>,
    pub expires_on: Option<DateTime<Utc>>,
    pub skip_safety_checks: bool,
    pub skip_capacity_checks: bool,
    pub allow_passive_drains: bool,
    pub force_restore_rebuilding: bool,
    pub is_internal: bool,
    pub last_check_impact_result: Option<ImpactResult>,
    pub shard_progress: Vec<ShardProgress>,
    pub sequencer_progress: Vec<SequencerProgress>,
}

impl MaintenanceRecord {
    pub fn affects_shards(&self) -> bool {
        self.shard_target_state.is_some() && !self.shards.is_empty()
    }

    pub fn affects_sequencers(&self) -> bool {
        self.sequencer_target_state.is_some() && !self.sequencer_nodes.is_empty()
    }

    pub fn effective_priority(&self) -> MaintenancePriority {
        self.priority.unwrap_or_default()
    }

    pub fn affected_node_indexes(&self) -> BTreeSet<NodeIndex> {
        self.shards
            .iter()
            .map(|shard| shard.node_index)
            .chain(self.sequencer_nodes.iter().copied())
            .collect()
    }

    pub fn affected_storage_node_indexes(&self) -> BTreeSet<NodeIndex> {
        self.shards.iter().map(|shard| shard.node_index).collect()
    }

    /// This maintenance's shards on `node_index`, ordered by shard index.
    pub fn shards_for_node(&self, node_index: NodeIndex) -> Vec<ShardId> {
        let mut shards: Vec<ShardId> = self
            .shards
            .iter()
            .filter(|shard| shard.node_index == node_index)
            .copied()
            .collect();
        shards.sort();
        shards.dedup();
        shards
    }

    /// Per-shard progress keyed by shard. The first entry wins when a shard is
    /// reported twice.
    pub fn progress_by_shard(&self) -> BTreeMap<ShardId, &ShardProgress> {
        let mut index = BTreeMap::new();
        for progress in &self.shard_progress {
            index.entry(progress.shard).or_insert(progress);
        }
        index
    }

    pub fn sequencer_progress_for(&self, node_index: NodeIndex) -> Option<&SequencerProgress> {
        self.sequencer_progress
            .iter()
            .find(|progress| progress.node_index == node_index)
    }

    pub fn sequencer_maintenance_status(&self, node_index: NodeIndex) -> MaintenanceStatus {
        self.sequencer_progress_for(node_index)
            .and_then(|progress| progress.maintenance_status)
            .unwrap_or_default()
    }

    pub fn sequencer_last_updated_at(&self, node_index: NodeIndex) -> Option<DateTime<Utc>> {
        self.sequencer_progress_for(node_index)
            .and_then(|progress| progress.last_updated_at)
    }

    pub fn num_shards_total(&self) -> usize {
        self.shards.len()
    }

    pub fn num_shards_done(&self) -> usize {
        let Some(target) = self.shard_target_state else {
            return 0;
        };
        let progress = self.progress_by_shard();
        self.shards
            .iter()
            .filter(|shard| {
                let current = progress
                    .get(*shard)
                    .and_then(|progress| progress.current_operational_state)
                    .unwrap_or(ShardOperationalState::Unknown);
                satisfies(current, target)
            })
            .count()
    }

    pub fn are_all_shards_done(&self) -> bool {
        self.num_shards_done() == self.num_shards_total()
    }

    pub fn num_sequencers_total(&self) -> usize {
        self.sequencer_nodes.len()
    }

    pub fn num_sequencers_done(&self) -> usize {
        let Some(target) = self.sequencer_target_state else {
            return 0;
        };
        self.sequencer_nodes
            .iter()
            .filter(|node_index| {
                self.sequencer_progress_for(**node_index)
                    .and_then(|progress| progress.current_state)
                    == Some(target)
            })
            .count()
    }

    pub fn are_all_sequencers_done(&self) -> bool {
        self.num_sequencers_done() == self.num_sequencers_total()
    }

    pub fn is_blocked(&self) -> bool {
        self.overall_status == MaintenanceProgress::BlockedUntilSafe
    }

    pub fn is_completed(&self) -> bool {
        self.overall_status == MaintenanceProgress::Completed
    }

    /// Blocked maintenances are still in progress.
    pub fn is_in_progress(&self) -> bool {
        matches!(
            self.overall_status,
            MaintenanceProgress::InProgress | MaintenanceProgress::BlockedUntilSafe
        )
    }
}
