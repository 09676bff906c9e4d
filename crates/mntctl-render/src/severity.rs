use console::Style;
use mntctl_common::state::satisfies;
use mntctl_common::types::{
    MaintenancePriority, MaintenanceProgress, MaintenanceStatus, ShardOperationalState,
    ShardTargetState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Ok,
    Warn,
    Danger,
    Critical,
    Muted,
    Neutral,
}

impl Severity {
    pub fn style(&self) -> Style {
        match self {
            Self::Ok => Style::new().green(),
            Self::Warn => Style::new().yellow(),
            Self::Danger => Style::new().red(),
            Self::Critical => Style::new().magenta(),
            Self::Muted => Style::new().blue(),
            Self::Neutral => Style::new().white(),
        }
    }
}

/// Every value that gets a severity chip in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Overall(MaintenanceProgress),
    Maintenance(MaintenanceStatus),
    Priority(MaintenancePriority),
}

pub fn classify(kind: StatusKind) -> Severity {
    match kind {
        StatusKind::Overall(progress) => overall_severity(progress),
        StatusKind::Maintenance(status) => maintenance_status_severity(status),
        StatusKind::Priority(priority) => priority_severity(priority),
    }
}

pub fn maintenance_status_severity(status: MaintenanceStatus) -> Severity {
    match status {
        MaintenanceStatus::BlockedUntilSafe | MaintenanceStatus::RebuildingIsBlocked => {
            Severity::Danger
        }
        MaintenanceStatus::Completed => Severity::Ok,
        _ => Severity::Warn,
    }
}

pub fn overall_severity(progress: MaintenanceProgress) -> Severity {
    match progress {
        MaintenanceProgress::Completed => Severity::Ok,
        MaintenanceProgress::BlockedUntilSafe | MaintenanceProgress::Unknown => Severity::Danger,
        MaintenanceProgress::InProgress => Severity::Warn,
        _ => Severity::Neutral,
    }
}

/// Display hue only; does not rank urgency.
pub fn priority_severity(priority: MaintenancePriority) -> Severity {
    match priority {
        MaintenancePriority::Imminent => Severity::Critical,
        MaintenancePriority::High => Severity::Danger,
        MaintenancePriority::Low => Severity::Muted,
        _ => Severity::Neutral,
    }
}

/// Never danger: blocking shows up on the maintenance status, not the shard state.
pub fn shard_state_severity(current: ShardOperationalState, target: ShardTargetState) -> Severity {
    if satisfies(current, target) {
        Severity::Ok
    } else {
        Severity::Warn
    }
}

/// Applies severity colors, or passes text through untouched when color is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Painter {
    color: bool,
}

impl Painter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn color_enabled(&self) -> bool {
        self.color
    }

    pub fn paint(&self, text: impl std::fmt::Display, severity: Severity) -> String {
        if !self.color {
            return text.to_string();
        }
        severity
            .style()
            .force_styling(true)
            .apply_to(text)
            .to_string()
    }

    pub fn status(&self, kind: StatusKind) -> String {
        let text = match kind {
            StatusKind::Overall(progress) => progress.as_str(),
            StatusKind::Maintenance(status) => status.as_str(),
            StatusKind::Priority(priority) => priority.as_str(),
        };
        self.paint(text, classify(kind))
    }
}
