use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use mntctl_cluster::{ClusterSnapshot, MaintenanceRecord, NodeView, ShardId};
use mntctl_common::error::Result;
use mntctl_common::state::satisfies;
use mntctl_common::types::{
    MaintenanceStatus, SequencingState, ShardOperationalState, ShardTargetState,
};

pub trait Named: Copy {
    fn name(&self) -> &'static str;
}

impl Named for ShardOperationalState {
    fn name(&self) -> &'static str {
        self.as_str()
    }
}

impl Named for MaintenanceStatus {
    fn name(&self) -> &'static str {
        self.as_str()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateCount<T> {
    pub value: T,
    pub count: usize,
}

/// Counts occurrences per value, ordered by value name.
pub fn group_by_name<T: Named>(values: impl IntoIterator<Item = T>) -> Vec<StateCount<T>> {
    let mut groups: BTreeMap<&'static str, StateCount<T>> = BTreeMap::new();
    for value in values {
        groups
            .entry(value.name())
            .or_insert(StateCount { value, count: 0 })
            .count += 1;
    }
    groups.into_values().collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardFact {
    pub shard: ShardId,
    pub current: ShardOperationalState,
    pub target: ShardTargetState,
    pub status: MaintenanceStatus,
    pub last_updated_at: Option<DateTime<Utc>>,
}

impl ShardFact {
    pub fn is_done(&self) -> bool {
        satisfies(self.current, self.target)
    }
}

/// One storage node's shards under a single maintenance.
#[derive(Debug, Clone)]
pub struct NodeShards<'a> {
    pub node: &'a NodeView,
    pub target: ShardTargetState,
    pub shards: Vec<ShardFact>,
}

impl NodeShards<'_> {
    pub fn current_state_groups(&self) -> Vec<StateCount<ShardOperationalState>> {
        group_by_name(self.shards.iter().map(|fact| fact.current))
    }

    pub fn status_groups(&self) -> Vec<StateCount<MaintenanceStatus>> {
        group_by_name(self.shards.iter().map(|fact| fact.status))
    }

    pub fn earliest_update(&self) -> Option<DateTime<Utc>> {
        self.shards
            .iter()
            .filter_map(|fact| fact.last_updated_at)
            .min()
    }

    pub fn num_done(&self) -> usize {
        self.shards.iter().filter(|fact| fact.is_done()).count()
    }
}

#[derive(Debug, Clone)]
pub struct SequencerFact<'a> {
    pub node: &'a NodeView,
    pub target: SequencingState,
    pub current: SequencingState,
    pub status: MaintenanceStatus,
    pub last_updated_at: Option<DateTime<Utc>>,
}

/// Everything the expanded renderings need about one maintenance, resolved
/// once against the topology.
#[derive(Debug, Clone)]
pub struct MaintenanceAggregation<'a> {
    pub record: &'a MaintenanceRecord,
    pub storage_nodes: Vec<NodeShards<'a>>,
    pub sequencers: Vec<SequencerFact<'a>>,
}

impl<'a> MaintenanceAggregation<'a> {
    pub fn build(record: &'a MaintenanceRecord, snapshot: &'a ClusterSnapshot) -> Result<Self> {
        let mut storage_nodes = Vec::new();
        if let Some(target) = record.shard_target_state {
            let progress = record.progress_by_shard();
            for node_index in record.affected_storage_node_indexes() {
                let node = snapshot.node_view(node_index)?;
                let shards = record
                    .shards_for_node(node_index)
                    .into_iter()
                    .map(|shard| {
                        let progress = progress.get(&shard);
                        ShardFact {
                            shard,
                            current: progress
                                .and_then(|progress| progress.current_operational_state)
                                .unwrap_or(ShardOperationalState::Unknown),
                            target,
                            status: progress
                                .and_then(|progress| progress.maintenance_status)
                                .unwrap_or_default(),
                            last_updated_at: progress
                                .and_then(|progress| progress.last_updated_at),
                        }
                    })
                    .collect();
                storage_nodes.push(NodeShards {
                    node,
                    target,
                    shards,
                });
            }
        }

        let mut sequencers = Vec::new();
        if let Some(target) = record.sequencer_target_state {
            let mut node_indexes = record.sequencer_nodes.clone();
            node_indexes.sort_unstable();
            node_indexes.dedup();
            for node_index in node_indexes {
                let node = snapshot.node_view(node_index)?;
                let progress = record.sequencer_progress_for(node_index);
                let current = progress
                    .and_then(|progress| progress.current_state)
                    .or(node.sequencer_state)
                    .unwrap_or_default();
                sequencers.push(SequencerFact {
                    node,
                    target,
                    current,
                    status: record.sequencer_maintenance_status(node_index),
                    last_updated_at: record.sequencer_last_updated_at(node_index),
                });
            }
        }

        Ok(Self {
            record,
            storage_nodes,
            sequencers,
        })
    }

    /// Shards of every affected storage node, in node then shard order.
    pub fn flattened_shards(&self) -> Vec<ShardId> {
        self.storage_nodes
            .iter()
            .flat_map(|node| node.shards.iter().map(|fact| fact.shard))
            .collect()
    }
}
