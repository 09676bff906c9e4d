use std::collections::{BTreeSet, HashSet};

use mntctl_cluster::{ClusterSnapshot, MaintenanceRecord, NodeIndex};
use mntctl_common::error::Result;
use mntctl_common::types::MaintenancePriority;
use tracing::debug;

/// Independent, optional narrowing conditions. `None` never filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub ids: Option<Vec<String>>,
    pub users: Option<Vec<String>>,
    pub node_indexes: Option<Vec<NodeIndex>>,
    pub node_names: Option<Vec<String>>,
    pub priority: Option<MaintenancePriority>,
    pub blocked: Option<bool>,
    pub completed: Option<bool>,
    pub in_progress: Option<bool>,
    /// Only an explicit `false` hides internal maintenances.
    pub include_internal: Option<bool>,
}

type Predicate = Box<dyn Fn(&MaintenanceRecord) -> bool>;

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Node names are resolved here so that an unknown name fails before any
    /// record is looked at.
    fn predicates(&self, snapshot: &ClusterSnapshot) -> Result<Vec<Predicate>> {
        let mut predicates: Vec<Predicate> = Vec::new();

        if self.include_internal == Some(false) {
            predicates.push(Box::new(|record: &MaintenanceRecord| !record.is_internal));
        }

        if let Some(ids) = &self.ids {
            let ids: HashSet<String> = ids.iter().cloned().collect();
            predicates.push(Box::new(move |record: &MaintenanceRecord| {
                ids.contains(&record.id)
            }));
        }

        if let Some(users) = &self.users {
            let users: HashSet<String> = users.iter().cloned().collect();
            predicates.push(Box::new(move |record: &MaintenanceRecord| {
                users.contains(&record.user)
            }));
        }

        if let Some(node_indexes) = &self.node_indexes {
            let wanted: BTreeSet<NodeIndex> = node_indexes.iter().copied().collect();
            predicates.push(Box::new(move |record: &MaintenanceRecord| {
                touches_any(record, &wanted)
            }));
        }

        if let Some(node_names) = &self.node_names {
            let wanted = node_names
                .iter()
                .map(|name| snapshot.node_index(name))
                .collect::<Result<BTreeSet<NodeIndex>>>()?;
            predicates.push(Box::new(move |record: &MaintenanceRecord| {
                touches_any(record, &wanted)
            }));
        }

        if let Some(priority) = self.priority {
            predicates.push(Box::new(move |record: &MaintenanceRecord| {
                record.effective_priority() == priority
            }));
        }

        if let Some(blocked) = self.blocked {
            predicates.push(Box::new(move |record: &MaintenanceRecord| {
                record.is_blocked() == blocked
            }));
        }

        if let Some(completed) = self.completed {
            predicates.push(Box::new(move |record: &MaintenanceRecord| {
                record.is_completed() == completed
            }));
        }

        if let Some(in_progress) = self.in_progress {
            predicates.push(Box::new(move |record: &MaintenanceRecord| {
                record.is_in_progress() == in_progress
            }));
        }

        Ok(predicates)
    }
}

/// Single pass over `records`, keeping those accepted by every criterion.
/// Input order is preserved.
pub fn filter_maintenances<'r, I>(
    records: I,
    snapshot: &ClusterSnapshot,
    criteria: &FilterCriteria,
) -> Result<Vec<&'r MaintenanceRecord>>
where
    I: IntoIterator<Item = &'r MaintenanceRecord>,
{
    let predicates = criteria.predicates(snapshot)?;
    let mut considered = 0_usize;
    let selected: Vec<&MaintenanceRecord> = records
        .into_iter()
        .inspect(|_| considered += 1)
        .filter(|record| {
            predicates
                .iter()
                .fold(true, |keep, predicate| predicate(*record) & keep)
        })
        .collect();

    debug!(
        considered,
        selected = selected.len(),
        predicates = predicates.len(),
        "filtered maintenances"
    );
    Ok(selected)
}

fn touches_any(record: &MaintenanceRecord, wanted: &BTreeSet<NodeIndex>) -> bool {
    record
        .affected_node_indexes()
        .intersection(wanted)
        .next()
        .is_some()
}

#[cfg(test)]
mod tests {
    use mntctl_cluster::{ClusterSnapshot, MaintenanceRecord, NodeView, ShardId};
    use mntctl_common::types::{
        MaintenancePriority, MaintenanceProgress, SequencingState, ShardTargetState,
    };

    use super::{FilterCriteria, filter_maintenances};

    fn record(id: &str, user: &str, node: i32, status: MaintenanceProgress) -> MaintenanceRecord {
        MaintenanceRecord {
            id: id.to_string(),
            user: user.to_string(),
            shards: vec![ShardId::new(node, 0)],
            shard_target_state: Some(ShardTargetState::MayDisappear),
            overall_status: status,
            ..MaintenanceRecord::default()
        }
    }

    fn snapshot() -> ClusterSnapshot {
        let nodes = (0..4)
            .map(|index| NodeView {
                node_index: index,
                node_name: format!("node{index}"),
                location: None,
                num_shards: 1,
                sequencer_state: Some(SequencingState::Enabled),
            })
            .collect();
        let mut internal = record("internal", "system", 3, MaintenanceProgress::InProgress);
        internal.is_internal = true;
        let mut high = record("high", "bob", 2, MaintenanceProgress::BlockedUntilSafe);
        high.priority = Some(MaintenancePriority::High);
        let records = vec![
            record("a", "alice", 1, MaintenanceProgress::InProgress),
            internal,
            high,
            record("b", "alice", 3, MaintenanceProgress::Completed),
        ];
        ClusterSnapshot::new(nodes, records).unwrap()
    }

    fn ids(records: &[&MaintenanceRecord]) -> Vec<String> {
        records.iter().map(|record| record.id.clone()).collect()
    }

    #[test]
    fn empty_criteria_is_identity() {
        let snapshot = snapshot();
        let criteria = FilterCriteria::default();
        assert!(criteria.is_empty());

        let selected =
            filter_maintenances(snapshot.all_maintenances(), &snapshot, &criteria).unwrap();
        assert_eq!(ids(&selected), vec!["a", "internal", "high", "b"]);
    }

    #[test]
    fn internal_hidden_only_when_explicitly_excluded() {
        let snapshot = snapshot();
        let hidden = FilterCriteria {
            include_internal: Some(false),
            ..FilterCriteria::default()
        };
        let shown = FilterCriteria {
            include_internal: Some(true),
            ..FilterCriteria::default()
        };

        let selected =
            filter_maintenances(snapshot.all_maintenances(), &snapshot, &hidden).unwrap();
        assert_eq!(ids(&selected), vec!["a", "high", "b"]);
        let selected =
            filter_maintenances(snapshot.all_maintenances(), &snapshot, &shown).unwrap();
        assert_eq!(selected.len(), 4);
    }

    #[test]
    fn criteria_compose_conjunctively() {
        let snapshot = snapshot();
        let criteria = FilterCriteria {
            users: Some(vec!["alice".to_string()]),
            node_names: Some(vec!["node3".to_string()]),
            ..FilterCriteria::default()
        };

        let selected =
            filter_maintenances(snapshot.all_maintenances(), &snapshot, &criteria).unwrap();
        assert_eq!(ids(&selected), vec!["b"]);
    }

    #[test]
    fn status_and_priority_filters() {
        let snapshot = snapshot();
        let blocked = FilterCriteria {
            blocked: Some(true),
            ..FilterCriteria::default()
        };
        let in_progress = FilterCriteria {
            in_progress: Some(true),
            ..FilterCriteria::default()
        };
        let medium = FilterCriteria {
            priority: Some(MaintenancePriority::Medium),
            completed: Some(false),
            ..FilterCriteria::default()
        };

        let all = snapshot.all_maintenances();
        assert_eq!(
            ids(&filter_maintenances(all, &snapshot, &blocked).unwrap()),
            vec!["high"]
        );
        assert_eq!(
            ids(&filter_maintenances(all, &snapshot, &in_progress).unwrap()),
            vec!["a", "internal", "high"]
        );
        assert_eq!(
            ids(&filter_maintenances(all, &snapshot, &medium).unwrap()),
            vec!["a", "internal"]
        );
    }

    #[test]
    fn unknown_node_name_is_reported() {
        let snapshot = snapshot();
        let criteria = FilterCriteria {
            node_names: Some(vec!["node9".to_string()]),
            ..FilterCriteria::default()
        };

        let err =
            filter_maintenances(snapshot.all_maintenances(), &snapshot, &criteria).unwrap_err();
        assert_eq!(err.error_code(), "NodeNotFound");
    }
}
