use clap::Args;
use mntctl_cluster::{ApplyRequest, NodeIndex};
use mntctl_common::error::Result;
use mntctl_common::types::MaintenancePriority;
use mntctl_render::FilterCriteria;

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Maintenance ids
    #[arg(long, value_delimiter = ',')]
    pub ids: Vec<String>,

    /// Users that created the maintenances
    #[arg(long, value_delimiter = ',')]
    pub users: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub node_indexes: Vec<NodeIndex>,

    #[arg(long, value_delimiter = ',')]
    pub node_names: Vec<String>,

    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub blocked: Option<bool>,

    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub completed: Option<bool>,

    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub in_progress: Option<bool>,

    /// imminent, high, medium or low
    #[arg(long)]
    pub priority: Option<String>,
}

impl FilterArgs {
    pub fn into_criteria(self, include_internal: Option<bool>) -> Result<FilterCriteria> {
        let priority = self
            .priority
            .as_deref()
            .map(str::parse::<MaintenancePriority>)
            .transpose()?;
        Ok(FilterCriteria {
            ids: non_empty(self.ids),
            users: non_empty(self.users),
            node_indexes: non_empty(self.node_indexes),
            node_names: non_empty(self.node_names),
            priority,
            blocked: self.blocked,
            completed: self.completed,
            in_progress: self.in_progress,
            include_internal,
        })
    }
}

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    #[arg(long, value_delimiter = ',')]
    pub node_indexes: Vec<NodeIndex>,

    #[arg(long, value_delimiter = ',')]
    pub node_names: Vec<String>,

    /// Shards as N<node>:S<shard>, <node>:<shard> or N<node>
    #[arg(long, value_delimiter = ',')]
    pub shards: Vec<String>,

    /// may-disappear or drained
    #[arg(long)]
    pub shard_target_state: Option<String>,

    #[arg(long, value_delimiter = ',')]
    pub sequencer_node_indexes: Vec<NodeIndex>,

    #[arg(long, value_delimiter = ',')]
    pub sequencer_node_names: Vec<String>,

    #[arg(long, env = "USER", default_value = "")]
    pub user: String,

    #[arg(long)]
    pub reason: String,

    /// Submit every target as a single maintenance group
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub group: bool,

    #[arg(long)]
    pub skip_safety_checks: bool,

    #[arg(long)]
    pub skip_capacity_checks: bool,

    #[arg(long, default_value_t = 0)]
    pub ttl: u64,

    #[arg(long)]
    pub allow_passive_drains: bool,

    #[arg(long)]
    pub force_restore_rebuilding: bool,

    #[arg(long)]
    pub priority: Option<String>,
}

impl From<PlanArgs> for ApplyRequest {
    fn from(args: PlanArgs) -> Self {
        Self {
            node_indexes: args.node_indexes,
            node_names: args.node_names,
            shards: args.shards,
            shard_target_state: args.shard_target_state,
            sequencer_node_indexes: args.sequencer_node_indexes,
            sequencer_node_names: args.sequencer_node_names,
            user: args.user,
            reason: args.reason,
            group: args.group,
            skip_safety_checks: args.skip_safety_checks,
            skip_capacity_checks: args.skip_capacity_checks,
            ttl_seconds: args.ttl,
            allow_passive_drains: args.allow_passive_drains,
            force_restore_rebuilding: args.force_restore_rebuilding,
            priority: args.priority,
        }
    }
}

fn non_empty<T>(values: Vec<T>) -> Option<Vec<T>> {
    if values.is_empty() { None } else { Some(values) }
}
