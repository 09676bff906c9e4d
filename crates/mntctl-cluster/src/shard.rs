use std::fmt;
use std::str::FromStr;

use mntctl_common::error::{MntError, Result};
use serde::{Deserialize, Serialize};

pub type NodeIndex = i32;

/// Shard index meaning "every shard of the node".
pub const ALL_SHARDS: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShardId {
    pub node_index: NodeIndex,
    pub shard_index: i32,
}

impl ShardId {
    pub fn new(node_index: NodeIndex, shard_index: i32) -> Self {
        Self {
            node_index,
            shard_index,
        }
    }

    pub fn all_of(node_index: NodeIndex) -> Self {
        Self::new(node_index, ALL_SHARDS)
    }

    pub fn is_whole_node(&self) -> bool {
        self.shard_index == ALL_SHARDS
    }
}

impl fmt::Display for ShardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_whole_node() {
            write!(f, "N{}", self.node_index)
        } else {
            write!(f, "N{}:S{}", self.node_index, self.shard_index)
        }
    }
}

impl FromStr for ShardId {
    type Err = MntError;

    fn from_str(value: &str) -> Result<Self> {
        let malformed = || MntError::MalformedShardNotation(value.to_string());
        let trimmed = value.trim();
        let (node_part, shard_part) = match trimmed.split_once(':') {
            Some((node, shard)) => (node, Some(shard)),
            None => (trimmed, None),
        };

        let node_index = parse_component(node_part, 'N').ok_or_else(malformed)?;
        let shard_index = match shard_part {
            Some(shard) => parse_component(shard, 'S').ok_or_else(malformed)?,
            None => ALL_SHARDS,
        };

        Ok(Self::new(node_index, shard_index))
    }
}

/// Parses notation like `N1:S2`, `N3` or `4:5` into shard ids.
pub fn parse_shards<S: AsRef<str>>(values: &[S]) -> Result<Vec<ShardId>> {
    values.iter().map(|value| value.as_ref().parse()).collect()
}

fn parse_component(raw: &str, prefix: char) -> Option<i32> {
    let raw = raw.trim();
    let digits = raw
        .strip_prefix(prefix)
        .or_else(|| raw.strip_prefix(prefix.to_ascii_lowercase()))
        .unwrap_or(raw);

    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
