use chrono::{DateTime, Utc};
use mntctl_cluster::{ClusterSnapshot, MaintenanceRecord};
use mntctl_common::error::Result;
use mntctl_common::time::{format_timestamp, format_with_relative, naturaltime};
use mntctl_common::types::{MaintenanceProgress, MaintenanceStatus};
use tracing::debug;

use crate::aggregate::{MaintenanceAggregation, NodeShards, StateCount};
use crate::impact::ImpactFormatter;
use crate::severity::{
    Painter, Severity, StatusKind, maintenance_status_severity, shard_state_severity,
};
use crate::table::{PlainTable, indent, shorten};

pub const NO_MATCHING_MAINTENANCES: &str = "No maintenances matching given criteria";

const RECORD_SEPARATOR: &str = "\n\n---\n";
const SECTION_SEPARATOR: &str = "\n\n";
const AFFECTED_WIDTH: usize = 30;
const REASON_WIDTH: usize = 40;
const PLACEHOLDER: &str = "...";
const DASH: &str = "-";
const NEVER: &str = "NEVER";

const COMPACT_HEADERS: [&str; 10] = [
    "MNT. ID",
    "AFFECTED",
    "STATUS",
    "SHARDS",
    "SEQUENCERS",
    "PRIORITY",
    "CREATED BY",
    "REASON",
    "CREATED AT",
    "EXPIRES IN",
];

const NODE_HEADERS: [&str; 7] = [
    "NODE INDEX",
    "NODE NAME",
    "LOCATION",
    "TARGET STATE",
    "CURRENT STATE",
    "MAINTENANCE STATUS",
    "LAST UPDATED",
];

const SHARD_HEADERS: [&str; 5] = [
    "SHARD INDEX",
    "CURRENT STATE",
    "TARGET STATE",
    "MAINTENANCE STATUS",
    "LAST UPDATED",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderMode {
    Compact,
    Expanded,
    ExpandedWithShards,
    ExpandedWithSafetyChecks,
}

impl RenderMode {
    /// Safety-check detail takes precedence over the per-shard drill-down.
    pub fn select(expanded: bool, expand_shards: bool, show_safety_checks: bool) -> Self {
        match (expanded, show_safety_checks, expand_shards) {
            (false, _, _) => Self::Compact,
            (true, true, _) => Self::ExpandedWithSafetyChecks,
            (true, false, true) => Self::ExpandedWithShards,
            (true, false, false) => Self::Expanded,
        }
    }

    pub fn expands_shards(&self) -> bool {
        matches!(self, Self::ExpandedWithShards)
    }

    pub fn shows_safety_checks(&self) -> bool {
        matches!(self, Self::ExpandedWithSafetyChecks)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub color: bool,
    pub now: DateTime<Utc>,
}

impl RenderOptions {
    /// `now` anchors every relative time in the output.
    pub fn new(color: bool, now: DateTime<Utc>) -> Self {
        Self { color, now }
    }
}

/// Formats maintenance records against one snapshot. Holds no state between
/// calls, so the same inputs always produce the same text.
pub struct Renderer<'a> {
    snapshot: &'a ClusterSnapshot,
    impact_formatter: &'a dyn ImpactFormatter,
    painter: Painter,
    now: DateTime<Utc>,
}

impl<'a> Renderer<'a> {
    pub fn new(
        snapshot: &'a ClusterSnapshot,
        impact_formatter: &'a dyn ImpactFormatter,
        options: RenderOptions,
    ) -> Self {
        Self {
            snapshot,
            impact_formatter,
            painter: Painter::new(options.color),
            now: options.now,
        }
    }

    pub fn painter(&self) -> Painter {
        self.painter
    }

    pub fn render(&self, records: &[&MaintenanceRecord], mode: RenderMode) -> Result<String> {
        debug!(?mode, records = records.len(), "rendering maintenances");
        if records.is_empty() {
            return Ok(self.painter.paint(NO_MATCHING_MAINTENANCES, Severity::Danger));
        }

        match mode {
            RenderMode::Compact => Ok(self.compact(records)),
            _ => {
                let blocks = records
                    .iter()
                    .map(|record| self.expanded(record, mode))
                    .collect::<Result<Vec<_>>>()?;
                Ok(blocks.join(RECORD_SEPARATOR))
            }
        }
    }

    fn compact(&self, records: &[&MaintenanceRecord]) -> String {
        let mut table = PlainTable::with_headers(&COMPACT_HEADERS);
        for record in records {
            table.push_row(self.compact_row(record));
        }
        table.render()
    }

    fn compact_row(&self, record: &MaintenanceRecord) -> Vec<String> {
        let affected = record
            .affected_node_indexes()
            .iter()
            .map(|node_index| format!("N{node_index}"))
            .collect::<Vec<_>>()
            .join(",");

        let shard_progress = match record.shard_target_state {
            Some(target) if record.affects_shards() => {
                let severity = if record.is_blocked() {
                    Severity::Danger
                } else if !record.are_all_shards_done() {
                    Severity::Warn
                } else {
                    Severity::Ok
                };
                self.painter.paint(
                    format!(
                        "{target}({}/{})",
                        record.num_shards_done(),
                        record.num_shards_total()
                    ),
                    severity,
                )
            }
            _ => DASH.to_string(),
        };

        // Sequencers never go red, even for a blocked maintenance.
        let sequencer_progress = match record.sequencer_target_state {
            Some(target) if record.affects_sequencers() => {
                let severity = if record.are_all_sequencers_done() {
                    Severity::Ok
                } else {
                    Severity::Warn
                };
                self.painter.paint(
                    format!(
                        "{target}({}/{})",
                        record.num_sequencers_done(),
                        record.num_sequencers_total()
                    ),
                    severity,
                )
            }
            _ => DASH.to_string(),
        };

        let reason = match record.reason.as_deref() {
            Some(reason) if !reason.is_empty() => shorten(reason, REASON_WIDTH, PLACEHOLDER),
            _ => DASH.to_string(),
        };

        vec![
            record.id.clone(),
            shorten(&affected, AFFECTED_WIDTH, PLACEHOLDER),
            self.painter
                .status(StatusKind::Overall(record.overall_status)),
            shard_progress,
            sequencer_progress,
            self.painter
                .status(StatusKind::Priority(record.effective_priority())),
            record.user.clone(),
            reason,
            record
                .created_on
                .as_ref()
                .map_or_else(|| DASH.to_string(), format_timestamp),
            record
                .expires_on
                .as_ref()
                .map_or_else(|| DASH.to_string(), |at| naturaltime(at, &self.now)),
        ]
    }

    fn expanded(&self, record: &MaintenanceRecord, mode: RenderMode) -> Result<String> {
        let aggregation = MaintenanceAggregation::build(record, self.snapshot)?;

        let sections = [
            Some(self.overview(&aggregation)),
            self.shards_section(&aggregation, mode),
            self.sequencers_section(&aggregation),
            self.impact_section(&aggregation, mode),
        ];
        Ok(sections
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(SECTION_SEPARATOR))
    }

    fn overview(&self, aggregation: &MaintenanceAggregation<'_>) -> String {
        let record = aggregation.record;
        let mut rows: Vec<(&str, String)> = vec![
            ("Maintenance ID", record.id.clone()),
            (
                "Priority",
                self.painter
                    .status(StatusKind::Priority(record.effective_priority())),
            ),
            (
                "Affected",
                format!(
                    "{} shards on {} nodes, {} sequencers",
                    record.num_shards_total(),
                    aggregation.storage_nodes.len(),
                    record.num_sequencers_total()
                ),
            ),
            (
                "Status",
                self.painter
                    .status(StatusKind::Overall(record.overall_status)),
            ),
        ];

        if matches!(
            record.overall_status,
            MaintenanceProgress::BlockedUntilSafe | MaintenanceProgress::Unknown
        ) && let Some(impact) = &record.last_check_impact_result
        {
            rows.push((
                "Impact Result",
                self.painter.paint(
                    self.impact_formatter.impacts_to_string(&impact.impact),
                    Severity::Danger,
                ),
            ));
        }

        rows.push(("Created By", record.user.clone()));
        rows.push((
            "Reason",
            record
                .reason
                .clone()
                .filter(|reason| !reason.is_empty())
                .unwrap_or_else(|| DASH.to_string()),
        ));
        let extras = if record.extras.is_empty() {
            DASH.to_string()
        } else {
            record
                .extras
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect::<Vec<_>>()
                .join("\n")
        };
        rows.push(("Extras", extras));
        rows.push(("Created On", self.timestamp_or(record.created_on, DASH)));
        rows.push(("Expires On", self.timestamp_or(record.expires_on, DASH)));
        rows.push((
            "Skip Safety Checks",
            self.flag(record.skip_safety_checks, true),
        ));
        rows.push((
            "Skip Capacity Checks",
            self.flag(record.skip_capacity_checks, true),
        ));
        rows.push((
            "Allow Passive Drains",
            self.flag(record.allow_passive_drains, false),
        ));
        rows.push((
            "RESTORE rebuilding enforced",
            self.flag(record.force_restore_rebuilding, false),
        ));

        let mut table = PlainTable::new();
        for (key, value) in rows {
            table.push_row(vec![format!("{key}:"), value]);
        }
        table.render()
    }

    fn shards_section(
        &self,
        aggregation: &MaintenanceAggregation<'_>,
        mode: RenderMode,
    ) -> Option<String> {
        if !aggregation.record.affects_shards() || aggregation.storage_nodes.is_empty() {
            return None;
        }
        let body = if mode.expands_shards() {
            self.shards_per_node(aggregation)
        } else {
            self.shards_aggregated(aggregation)
        };
        Some(format!("Shard Maintenances:\n{}", indent(&body, "  ")))
    }

    fn shards_aggregated(&self, aggregation: &MaintenanceAggregation<'_>) -> String {
        let mut table = PlainTable::with_headers(&NODE_HEADERS);
        for node in &aggregation.storage_nodes {
            table.push_row(vec![
                node.node.node_index.to_string(),
                node.node.node_name.clone(),
                node.node.location_or_dash().to_string(),
                format!("{}({})", node.target, node.shards.len()),
                self.current_state_chips(node),
                self.status_chips(node.status_groups()),
                self.timestamp_or(node.earliest_update(), NEVER),
            ]);
        }
        table.render()
    }

    fn current_state_chips(&self, node: &NodeShards<'_>) -> String {
        node.current_state_groups()
            .iter()
            .map(|group| {
                self.painter.paint(
                    format!("{}({})", group.value, group.count),
                    shard_state_severity(group.value, node.target),
                )
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    fn status_chips(&self, groups: Vec<StateCount<MaintenanceStatus>>) -> String {
        groups
            .iter()
            .map(|group| {
                self.painter.paint(
                    format!("{}({})", group.value, group.count),
                    maintenance_status_severity(group.value),
                )
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    fn shards_per_node(&self, aggregation: &MaintenanceAggregation<'_>) -> String {
        aggregation
            .storage_nodes
            .iter()
            .map(|node| {
                let mut table = PlainTable::with_headers(&SHARD_HEADERS);
                for fact in &node.shards {
                    table.push_row(vec![
                        fact.shard.shard_index.to_string(),
                        self.painter
                            .paint(fact.current, shard_state_severity(fact.current, fact.target)),
                        fact.target.to_string(),
                        self.painter.status(StatusKind::Maintenance(fact.status)),
                        self.timestamp_or(fact.last_updated_at, DASH),
                    ]);
                }
                format!(
                    "N{} ({}):\n{}",
                    node.node.node_index,
                    node.node.node_name,
                    indent(&table.render(), "  ")
                )
            })
            .collect::<Vec<_>>()
            .join(SECTION_SEPARATOR)
    }

    fn sequencers_section(&self, aggregation: &MaintenanceAggregation<'_>) -> Option<String> {
        if !aggregation.record.affects_sequencers() || aggregation.sequencers.is_empty() {
            return None;
        }
        let mut table = PlainTable::with_headers(&NODE_HEADERS);
        for fact in &aggregation.sequencers {
            table.push_row(vec![
                fact.node.node_index.to_string(),
                fact.node.node_name.clone(),
                fact.node.location_or_dash().to_string(),
                fact.target.to_string(),
                self.painter
                    .paint(fact.current, maintenance_status_severity(fact.status)),
                self.painter.status(StatusKind::Maintenance(fact.status)),
                self.timestamp_or(fact.last_updated_at, DASH),
            ]);
        }
        Some(format!(
            "Sequencer Maintenances:\n{}",
            indent(&table.render(), "  ")
        ))
    }

    fn impact_section(
        &self,
        aggregation: &MaintenanceAggregation<'_>,
        mode: RenderMode,
    ) -> Option<String> {
        let record = aggregation.record;
        if !mode.shows_safety_checks() || !record.is_blocked() {
            return None;
        }
        let impact = record.last_check_impact_result.as_ref()?;
        let text = self.impact_formatter.check_impact_string(
            impact,
            &aggregation.flattened_shards(),
            record.shard_target_state,
        );
        Some(format!("Safety Check Impact:\n\n{text}"))
    }

    fn timestamp_or(&self, at: Option<DateTime<Utc>>, missing: &str) -> String {
        at.map_or_else(
            || missing.to_string(),
            |at| format_with_relative(&at, &self.now),
        )
    }

    fn flag(&self, value: bool, danger_when_set: bool) -> String {
        if value && danger_when_set {
            self.painter.paint(value, Severity::Danger)
        } else {
            value.to_string()
        }
    }
}
