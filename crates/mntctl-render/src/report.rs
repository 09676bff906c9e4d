use mntctl_cluster::{MaintenanceRecord, MarkUnrecoverableResponse, ShardId};
use mntctl_common::error::Result;

use crate::render::{NO_MATCHING_MAINTENANCES, RenderMode, Renderer};
use crate::severity::{Painter, Severity};

const REMOVAL_HEADER: &str = "You are going to remove following maintenances:\n";

const INTERNAL_HINT: &str = "did you mean to target internal maintenances?\n\
     Use `include-internal-maintenances` for this.";

const INTERNAL_EXCLUDED_NOTE: &str = "NOTE: Your query might have matched internal maintenances.\n\
     We have excluded them from your remove request for safety. If you really need to \
     remove internal maintenances, set `include-internal-maintenances` to true.";

const INTERNAL_INCLUDED_WARNING: &str = "WARNING: You might be deleting internal maintenances.\n\
     This is a DANGEROUS operation. Only proceed if you are absolutely sure.";

/// Text shown before removing `records`. The records are expected to be
/// filtered already with the same `include_internal` choice.
pub fn render_removal_preview(
    renderer: &Renderer<'_>,
    records: &[&MaintenanceRecord],
    include_internal: bool,
) -> Result<String> {
    let painter = renderer.painter();
    if records.is_empty() {
        let message = if include_internal {
            NO_MATCHING_MAINTENANCES.to_string()
        } else {
            format!("{NO_MATCHING_MAINTENANCES}, {INTERNAL_HINT}")
        };
        return Ok(painter.paint(message, Severity::Neutral));
    }

    let body = renderer.render(records, RenderMode::Expanded)?;
    let banner = if include_internal {
        painter.paint(INTERNAL_INCLUDED_WARNING, Severity::Danger)
    } else {
        painter.paint(INTERNAL_EXCLUDED_NOTE, Severity::Warn)
    };
    Ok(format!("{REMOVAL_HEADER}\n{body}\n\n{banner}"))
}

pub fn render_unrecoverable_report(
    painter: Painter,
    response: &MarkUnrecoverableResponse,
) -> String {
    if response.is_empty() {
        return painter.paint("No UNAVAILABLE shards to mark unrecoverable!", Severity::Warn);
    }

    let mut lines = Vec::new();
    if !response.shards_succeeded.is_empty() {
        let shards = join_shards(&response.shards_succeeded);
        lines.push(painter.paint(format!("Succeeded: {shards}"), Severity::Ok));
    }
    if !response.shards_failed.is_empty() {
        let shards = join_shards(&response.shards_failed);
        lines.push(painter.paint(format!("Failed: {shards}"), Severity::Danger));
    }
    lines.join("\n")
}

fn join_shards(shards: &[ShardId]) -> String {
    shards
        .iter()
        .map(ShardId::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use mntctl_cluster::{
        ClusterSnapshot, MaintenanceRecord, MarkUnrecoverableResponse, NodeView, ShardId,
    };
    use mntctl_common::types::{SequencingState, ShardTargetState};

    use super::{render_removal_preview, render_unrecoverable_report};
    use crate::impact::PlainImpactFormatter;
    use crate::render::{RenderOptions, Renderer};
    use crate::severity::Painter;

    fn snapshot() -> ClusterSnapshot {
        let node = NodeView {
            node_index: 0,
            node_name: "host0".to_string(),
            location: None,
            num_shards: 2,
            sequencer_state: Some(SequencingState::Enabled),
        };
        let record = MaintenanceRecord {
            id: "m1".to_string(),
            user: "alice".to_string(),
            shards: vec![ShardId::new(0, 0)],
            shard_target_state: Some(ShardTargetState::MayDisappear),
            ..MaintenanceRecord::default()
        };
        ClusterSnapshot::new(vec![node], vec![record]).unwrap()
    }

    fn options() -> RenderOptions {
        RenderOptions {
            color: false,
            now: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn preview_banner_depends_on_internal_choice() {
        let snapshot = snapshot();
        let formatter = PlainImpactFormatter;
        let renderer = Renderer::new(&snapshot, &formatter, options());
        let records: Vec<&MaintenanceRecord> = snapshot.all_maintenances().iter().collect();

        let excluded = render_removal_preview(&renderer, &records, false).unwrap();
        assert!(excluded.starts_with("You are going to remove following maintenances:\n\n"));
        assert!(excluded.contains("Maintenance ID:"));
        assert!(excluded.contains("NOTE: Your query might have matched internal maintenances."));

        let included = render_removal_preview(&renderer, &records, true).unwrap();
        assert!(included.contains("WARNING: You might be deleting internal maintenances."));
        assert!(!included.contains("NOTE:"));
    }

    #[test]
    fn empty_preview_hints_at_internal_maintenances() {
        let snapshot = snapshot();
        let formatter = PlainImpactFormatter;
        let renderer = Renderer::new(&snapshot, &formatter, options());

        assert_eq!(
            render_removal_preview(&renderer, &[], false).unwrap(),
            "No maintenances matching given criteria, did you mean to target internal \
             maintenances?\nUse `include-internal-maintenances` for this."
        );
        assert_eq!(
            render_removal_preview(&renderer, &[], true).unwrap(),
            "No maintenances matching given criteria"
        );
    }

    #[test]
    fn unrecoverable_report_lines() {
        let painter = Painter::plain();
        let response = MarkUnrecoverableResponse {
            shards_succeeded: vec![ShardId::new(1, 0), ShardId::new(1, 1)],
            shards_failed: vec![ShardId::new(4, 2)],
        };

        assert_eq!(
            render_unrecoverable_report(painter, &response),
            "Succeeded: N1:S0, N1:S1\nFailed: N4:S2"
        );
        assert_eq!(
            render_unrecoverable_report(painter, &MarkUnrecoverableResponse::default()),
            "No UNAVAILABLE shards to mark unrecoverable!"
        );
    }
}
