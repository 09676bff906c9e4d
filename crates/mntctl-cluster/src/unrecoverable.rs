use serde::{Deserialize, Serialize};

use crate::shard::ShardId;

/// Admin service answer to marking every UNAVAILABLE shard unrecoverable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkUnrecoverableResponse {
    #[serde(default)]
    pub shards_succeeded: Vec<ShardId>,
    #[serde(default)]
    pub shards_failed: Vec<ShardId>,
}

impl MarkUnrecoverableResponse {
    pub fn is_empty(&self) -> bool {
        self.shards_succeeded.is_empty() && self.shards_failed.is_empty()
    }
}
