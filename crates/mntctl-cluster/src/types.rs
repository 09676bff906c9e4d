use mntctl_common::types::SequencingState;
use serde::{Deserialize, Serialize};

use crate::shard::{NodeIndex, ShardId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeView {
    pub node_index: NodeIndex,
    pub node_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Zero for nodes without the storage role.
    #[serde(default)]
    pub num_shards: u32,
    /// Present only for nodes with the sequencer role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequencer_state: Option<SequencingState>,
}

impl NodeView {
    pub fn is_storage(&self) -> bool {
        self.num_shards > 0
    }

    pub fn is_sequencer(&self) -> bool {
        self.sequencer_state.is_some()
    }

    pub fn location_or_dash(&self) -> &str {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or("-")
    }

    pub fn shard_ids(&self) -> impl Iterator<Item = ShardId> + '_ {
        (0..self.num_shards).map(|index| ShardId::new(self.node_index, index as i32))
    }
}
