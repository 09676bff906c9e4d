use std::collections::BTreeSet;

use mntctl_cluster::{ImpactResult, LogImpact, ShardId};
use mntctl_common::types::{OperationImpact, ShardTargetState};

use crate::table::PlainTable;

/// Turns a safety-check outcome into the text of the safety-impact block.
pub trait ImpactFormatter: Send + Sync {
    fn impacts_to_string(&self, impacts: &[OperationImpact]) -> String;

    fn check_impact_string(
        &self,
        result: &ImpactResult,
        shards: &[ShardId],
        target: Option<ShardTargetState>,
    ) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainImpactFormatter;

impl PlainImpactFormatter {
    fn storage_set_cell(log: &LogImpact, under_maintenance: &BTreeSet<ShardId>) -> String {
        log.storage_set
            .iter()
            .map(|shard| {
                if under_maintenance.contains(shard) {
                    format!("*{shard}")
                } else {
                    shard.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl ImpactFormatter for PlainImpactFormatter {
    fn impacts_to_string(&self, impacts: &[OperationImpact]) -> String {
        if impacts.is_empty() {
            return "NONE".to_string();
        }
        impacts
            .iter()
            .map(OperationImpact::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn check_impact_string(
        &self,
        result: &ImpactResult,
        shards: &[ShardId],
        target: Option<ShardTargetState>,
    ) -> String {
        let target = target.map_or("-", |target| target.as_str());
        let mut lines = vec![
            format!(
                "CANNOT take {} shards to {target}: {}",
                shards.len(),
                self.impacts_to_string(&result.impact)
            ),
            format!("Internal logs affected: {}", result.internal_logs_affected),
        ];

        if result.logs_affected.is_empty() {
            lines.push("No logs reported as affected.".to_string());
            return lines.join("\n");
        }

        let under_maintenance: BTreeSet<ShardId> = shards.iter().copied().collect();
        let mut table =
            PlainTable::with_headers(&["LOG ID", "EPOCH", "REPLICATION", "IMPACT", "STORAGE SET"]);
        for log in &result.logs_affected {
            let log_id = if log.is_metadata_log {
                format!("{} (metadata)", log.log_id)
            } else {
                log.log_id.to_string()
            };
            table.push_row(vec![
                log_id,
                log.epoch.to_string(),
                log.replication.clone(),
                self.impacts_to_string(&log.impact),
                Self::storage_set_cell(log, &under_maintenance),
            ]);
        }

        lines.push(String::new());
        lines.push(table.render());
        lines.push(String::new());
        lines.push("Shards marked with * are part of this maintenance.".to_string());
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use mntctl_cluster::{ImpactResult, LogImpact, ShardId};
    use mntctl_common::types::{OperationImpact, ShardTargetState};

    use super::{ImpactFormatter, PlainImpactFormatter};

    #[test]
    fn impacts_join_or_none() {
        let formatter = PlainImpactFormatter;
        assert_eq!(formatter.impacts_to_string(&[]), "NONE");
        assert_eq!(
            formatter.impacts_to_string(&[
                OperationImpact::WriteAvailabilityLoss,
                OperationImpact::RebuildingStall
            ]),
            "WRITE_AVAILABILITY_LOSS, REBUILDING_STALL"
        );
    }

    #[test]
    fn marks_shards_under_maintenance() {
        let result = ImpactResult {
            impact: vec![OperationImpact::ReadAvailabilityLoss],
            internal_logs_affected: false,
            logs_affected: vec![LogImpact {
                log_id: 42,
                epoch: 7,
                impact: vec![OperationImpact::ReadAvailabilityLoss],
                replication: "node: 2".to_string(),
                storage_set: vec![ShardId::new(1, 0), ShardId::new(2, 0)],
                is_metadata_log: true,
            }],
        };

        let text = PlainImpactFormatter.check_impact_string(
            &result,
            &[ShardId::new(1, 0)],
            Some(ShardTargetState::Drained),
        );

        assert!(text.starts_with("CANNOT take 1 shards to DRAINED: READ_AVAILABILITY_LOSS\n"));
        assert!(text.contains("Internal logs affected: false"));
        assert!(text.contains("42 (metadata)"));
        assert!(text.contains("*N1:S0,N2:S0"));
    }

    #[test]
    fn reports_when_no_logs_listed() {
        let text = PlainImpactFormatter.check_impact_string(&ImpactResult::default(), &[], None);
        assert_eq!(
            text,
            "CANNOT take 0 shards to -: NONE\nInternal logs affected: false\n\
             No logs reported as affected."
        );
    }
}
