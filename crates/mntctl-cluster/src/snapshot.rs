use std::collections::{BTreeSet, HashSet};

use mntctl_common::error::{MntError, Result};
use serde::{Deserialize, Serialize};

use crate::record::MaintenanceRecord;
use crate::shard::{NodeIndex, ShardId};
use crate::types::NodeView;

/// Immutable view of the cluster topology joined with every maintenance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    #[serde(default)]
    nodes: Vec<NodeView>,
    #[serde(default)]
    maintenances: Vec<MaintenanceRecord>,
}

impl ClusterSnapshot {
    /// Sorts the topology, validates it, and normalizes every record: whole-node
    /// ids become that node's shards, and duplicate shards or sequencers collapse.
    pub fn new(mut nodes: Vec<NodeView>, mut maintenances: Vec<MaintenanceRecord>) -> Result<Self> {
        nodes.sort_by_key(|node| node.node_index);
        let mut snapshot = Self {
            nodes,
            maintenances: Vec::new(),
        };
        for record in &mut maintenances {
            record.shards = snapshot.record_shards(record)?;
            record.sequencer_nodes.sort_unstable();
            record.sequencer_nodes.dedup();
        }
        snapshot.maintenances = maintenances;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn from_json(payload: &str) -> Result<Self> {
        let parsed: Self = serde_json::from_str(payload)
            .map_err(|err| MntError::InvalidSnapshot(format!("failed to parse snapshot: {err}")))?;
        Self::new(parsed.nodes, parsed.maintenances)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|err| {
            MntError::InvalidSnapshot(format!("failed to serialize snapshot: {err}"))
        })
    }

    pub fn nodes(&self) -> &[NodeView] {
        &self.nodes
    }

    pub fn node_view(&self, node_index: NodeIndex) -> Result<&NodeView> {
        self.nodes
            .binary_search_by_key(&node_index, |node| node.node_index)
            .map(|position| &self.nodes[position])
            .map_err(|_| MntError::NodeNotFound(format!("N{node_index}")))
    }

    pub fn node_view_by_name(&self, node_name: &str) -> Result<&NodeView> {
        self.nodes
            .iter()
            .find(|node| node.node_name == node_name)
            .ok_or_else(|| MntError::NodeNotFound(node_name.to_string()))
    }

    pub fn node_index(&self, node_name: &str) -> Result<NodeIndex> {
        self.node_view_by_name(node_name)
            .map(|node| node.node_index)
    }

    /// Resolves parsed shard ids against the topology.
    ///
    /// Whole-node ids become every shard of that node; concrete ids must name
    /// an existing shard.
    pub fn expand_shards(&self, shards: &[ShardId]) -> Result<BTreeSet<ShardId>> {
        let mut expanded = BTreeSet::new();
        for shard in shards {
            let node = self.node_view(shard.node_index)?;
            if shard.is_whole_node() {
                expanded.extend(node.shard_ids());
                continue;
            }
            let in_range =
                u32::try_from(shard.shard_index).is_ok_and(|index| index < node.num_shards);
            if !in_range {
                return Err(MntError::invalid_value("shards", shard.to_string()));
            }
            expanded.insert(*shard);
        }
        Ok(expanded)
    }

    pub fn all_maintenances(&self) -> &[MaintenanceRecord] {
        &self.maintenances
    }

    pub fn maintenance_by_id(&self, id: &str) -> Option<&MaintenanceRecord> {
        self.maintenances.iter().find(|record| record.id == id)
    }

    /// Concrete ids on unknown nodes are kept so that rendering reports the
    /// missing node. A whole-node id there cannot be expanded.
    fn record_shards(&self, record: &MaintenanceRecord) -> Result<Vec<ShardId>> {
        let mut shards = BTreeSet::new();
        for shard in &record.shards {
            if !shard.is_whole_node() {
                shards.insert(*shard);
                continue;
            }
            let node = self.node_view(shard.node_index).map_err(|_| {
                MntError::InvalidSnapshot(format!(
                    "maintenance {} targets every shard of unknown node N{}",
                    record.id, shard.node_index
                ))
            })?;
            shards.extend(node.shard_ids());
        }
        Ok(shards.into_iter().collect())
    }

    fn validate(&self) -> Result<()> {
        let mut indexes = HashSet::new();
        let mut names = HashSet::new();
        for node in &self.nodes {
            if !indexes.insert(node.node_index) {
                return Err(MntError::InvalidSnapshot(format!(
                    "duplicate node index: N{}",
                    node.node_index
                )));
            }
            if !names.insert(node.node_name.as_str()) {
                return Err(MntError::InvalidSnapshot(format!(
                    "duplicate node name: {}",
                    node.node_name
                )));
            }
        }

        let mut ids = HashSet::new();
        for record in &self.maintenances {
            if record.id.trim().is_empty() {
                return Err(MntError::InvalidSnapshot(
                    "maintenance without an id".to_string(),
                ));
            }
            if !ids.insert(record.id.as_str()) {
                return Err(MntError::InvalidSnapshot(format!(
                    "duplicate maintenance id: {}",
                    record.id
                )));
            }
            if !record.shards.is_empty() && record.shard_target_state.is_none() {
                return Err(MntError::InvalidSnapshot(format!(
                    "maintenance {} lists shards without a shard target state",
                    record.id
                )));
            }
            if !record.sequencer_nodes.is_empty() && record.sequencer_target_state.is_none() {
                return Err(MntError::InvalidSnapshot(format!(
                    "maintenance {} lists sequencers without a sequencer target state",
                    record.id
                )));
            }
        }

        Ok(())
    }
}
