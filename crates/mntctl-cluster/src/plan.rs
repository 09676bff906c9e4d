use std::collections::BTreeSet;

use mntctl_common::error::{MntError, Result};
use mntctl_common::types::{MaintenancePriority, SequencingState, ShardTargetState};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::shard::{NodeIndex, ShardId, parse_shards};
use crate::snapshot::ClusterSnapshot;

/// What a user asked to put under maintenance, as typed on the command line.
#[derive(Debug, Clone, Default)]
pub struct ApplyRequest {
    pub node_indexes: Vec<NodeIndex>,
    pub node_names: Vec<String>,
    pub shards: Vec<String>,
    pub shard_target_state: Option<String>,
    pub sequencer_node_indexes: Vec<NodeIndex>,
    pub sequencer_node_names: Vec<String>,
    pub user: String,
    pub reason: String,
    pub group: bool,
    pub skip_safety_checks: bool,
    pub skip_capacity_checks: bool,
    pub ttl_seconds: u64,
    pub allow_passive_drains: bool,
    pub force_restore_rebuilding: bool,
    pub priority: Option<String>,
}

/// Maintenance ready to be submitted to the maintenance manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceDefinition {
    pub shards: BTreeSet<ShardId>,
    pub shard_target_state: ShardTargetState,
    pub sequencer_nodes: BTreeSet<NodeIndex>,
    pub sequencer_target_state: SequencingState,
    pub user: String,
    pub reason: String,
    pub group: bool,
    pub ttl_seconds: u64,
    pub priority: MaintenancePriority,
    pub skip_safety_checks: bool,
    pub skip_capacity_checks: bool,
    pub allow_passive_drains: bool,
    pub force_restore_rebuilding: bool,
}

pub fn plan_maintenance(
    snapshot: &ClusterSnapshot,
    request: &ApplyRequest,
) -> Result<MaintenanceDefinition> {
    if request.reason.trim().is_empty() {
        return Err(MntError::invalid_value("reason", request.reason.clone()));
    }
    if request.user.trim().is_empty() {
        return Err(MntError::invalid_value("user", request.user.clone()));
    }

    let shard_target_state = request
        .shard_target_state
        .as_deref()
        .map(str::parse::<ShardTargetState>)
        .transpose()?
        .unwrap_or(ShardTargetState::MayDisappear);
    let priority = request
        .priority
        .as_deref()
        .map(str::parse::<MaintenancePriority>)
        .transpose()?
        .unwrap_or_default();

    let mut node_indexes: BTreeSet<NodeIndex> = request.node_indexes.iter().copied().collect();
    for name in &request.node_names {
        node_indexes.insert(snapshot.node_index(name)?);
    }

    let mut shards = BTreeSet::new();
    let mut sequencer_nodes = BTreeSet::new();
    for node_index in &node_indexes {
        let node = snapshot.node_view(*node_index)?;
        shards.extend(node.shard_ids());
        if node.is_sequencer() {
            sequencer_nodes.insert(node.node_index);
        }
    }

    for node_index in &request.sequencer_node_indexes {
        let node = snapshot.node_view(*node_index)?;
        if node.is_sequencer() {
            sequencer_nodes.insert(node.node_index);
        }
    }
    for name in &request.sequencer_node_names {
        let node = snapshot.node_view_by_name(name)?;
        if node.is_sequencer() {
            sequencer_nodes.insert(node.node_index);
        }
    }

    let parsed = parse_shards(request.shards.as_slice())?;
    shards.extend(snapshot.expand_shards(&parsed)?);

    if shards.is_empty() && sequencer_nodes.is_empty() {
        return Err(MntError::invalid_value(
            "targets",
            "no storage or sequencer nodes selected",
        ));
    }

    debug!(
        shards = shards.len(),
        sequencers = sequencer_nodes.len(),
        target = %shard_target_state,
        "planned maintenance"
    );

    Ok(MaintenanceDefinition {
        shards,
        shard_target_state,
        sequencer_nodes,
        sequencer_target_state: SequencingState::Disabled,
        user: request.user.clone(),
        reason: request.reason.clone(),
        group: request.group,
        ttl_seconds: request.ttl_seconds,
        priority,
        skip_safety_checks: request.skip_safety_checks,
        skip_capacity_checks: request.skip_capacity_checks,
        allow_passive_drains: request.allow_passive_drains,
        force_restore_rebuilding: request.force_restore_rebuilding,
    })
}
