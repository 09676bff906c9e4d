mod args;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mntctl_cluster::{
    ApplyRequest, ClusterSnapshot, FileSnapshotProvider, MarkUnrecoverableResponse,
    SnapshotProvider, plan_maintenance,
};
use mntctl_common::error::{MntError, Result};
use mntctl_common::time;
use mntctl_render::{
    FilterCriteria, Painter, PlainImpactFormatter, RenderMode, RenderOptions, Renderer, Severity,
    filter_maintenances, render_removal_preview, render_unrecoverable_report,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::args::{FilterArgs, PlanArgs};
use crate::config::{CliConfig, ColorMode};

#[derive(Parser)]
#[command(name = "mntctl", about = "Inspect cluster maintenances from a snapshot")]
struct Cli {
    /// Cluster snapshot JSON file
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    #[arg(long, global = true, value_enum)]
    color: Option<ColorMode>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// One line per maintenance
    List {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Detailed view of each maintenance
    Show {
        #[command(flatten)]
        filters: FilterArgs,

        #[arg(long)]
        expand_shards: bool,

        #[arg(long)]
        show_safety_check_results: bool,
    },
    /// Resolve targets into a maintenance definition without submitting it
    Plan(PlanArgs),
    /// Show what a remove request would affect
    RemovePreview {
        #[command(flatten)]
        filters: FilterArgs,

        #[arg(long)]
        include_internal_maintenances: bool,
    },
    /// Summarize a mark-unrecoverable response
    ReportUnrecoverable {
        #[arg(long)]
        response: PathBuf,
    },
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::from_default_env().add_directive("mntctl=info".parse()?);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = CliConfig::from_env()?.with_overrides(cli.snapshot, cli.color);
    let options = RenderOptions::new(config.color.enabled(), time::now());

    match run(cli.command, &config, options).await {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(err) => {
            error!(code = err.error_code(), "command failed");
            let painter = Painter::new(options.color);
            eprintln!("{}", painter.paint(&err, Severity::Danger));
            std::process::exit(1);
        }
    }
}

async fn run(command: Command, config: &CliConfig, options: RenderOptions) -> Result<String> {
    match command {
        Command::List { filters } => {
            let snapshot = load_snapshot(config).await?;
            let criteria = filters.into_criteria(None)?;
            render_selection(&snapshot, &criteria, RenderMode::Compact, options)
        }
        Command::Show {
            filters,
            expand_shards,
            show_safety_check_results,
        } => {
            let snapshot = load_snapshot(config).await?;
            let criteria = filters.into_criteria(None)?;
            let mode = RenderMode::select(true, expand_shards, show_safety_check_results);
            render_selection(&snapshot, &criteria, mode, options)
        }
        Command::Plan(args) => {
            let snapshot = load_snapshot(config).await?;
            let definition = plan_maintenance(&snapshot, &ApplyRequest::from(args))?;
            info!(
                shards = definition.shards.len(),
                sequencers = definition.sequencer_nodes.len(),
                "planned maintenance"
            );
            serde_json::to_string_pretty(&definition)
                .map_err(|err| MntError::malformed_payload("plan", err))
        }
        Command::RemovePreview {
            filters,
            include_internal_maintenances,
        } => {
            let snapshot = load_snapshot(config).await?;
            let criteria = filters.into_criteria(Some(include_internal_maintenances))?;
            let records = filter_maintenances(snapshot.all_maintenances(), &snapshot, &criteria)?;
            let formatter = PlainImpactFormatter;
            let renderer = Renderer::new(&snapshot, &formatter, options);
            render_removal_preview(&renderer, &records, include_internal_maintenances)
        }
        Command::ReportUnrecoverable { response } => {
            let payload = tokio::fs::read_to_string(&response).await?;
            let response = parse_unrecoverable_response(&payload)?;
            Ok(render_unrecoverable_report(
                Painter::new(options.color),
                &response,
            ))
        }
    }
}

async fn load_snapshot(config: &CliConfig) -> Result<ClusterSnapshot> {
    let provider = FileSnapshotProvider::new(config.snapshot_path()?);
    let snapshot = provider.cluster_snapshot().await?;
    info!(
        snapshot = %provider.path().display(),
        maintenances = snapshot.all_maintenances().len(),
        "snapshot loaded"
    );
    Ok(snapshot)
}

fn parse_unrecoverable_response(payload: &str) -> Result<MarkUnrecoverableResponse> {
    serde_json::from_str(payload).map_err(|err| MntError::malformed_payload("response", err))
}

fn render_selection(
    snapshot: &ClusterSnapshot,
    criteria: &FilterCriteria,
    mode: RenderMode,
    options: RenderOptions,
) -> Result<String> {
    let records = filter_maintenances(snapshot.all_maintenances(), snapshot, criteria)?;
    let formatter = PlainImpactFormatter;
    Renderer::new(snapshot, &formatter, options).render(&records, mode)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Command, parse_unrecoverable_response};
    use crate::config::ColorMode;

    #[test]
    fn bad_response_json_is_a_malformed_payload() {
        let err = parse_unrecoverable_response("{\"shards_failed\": 3}").unwrap_err();
        assert_eq!(err.error_code(), "MalformedPayload");
        assert!(err.to_string().starts_with("malformed response payload:"));

        let response = parse_unrecoverable_response("{}").unwrap();
        assert!(response.is_empty());
    }

    #[test]
    fn parses_show_with_global_flags() {
        let cli = Cli::try_parse_from([
            "mntctl",
            "show",
            "--snapshot",
            "snap.json",
            "--color",
            "never",
            "--users",
            "alice,bob",
            "--blocked",
            "--expand-shards",
        ])
        .unwrap();

        assert_eq!(cli.color, Some(ColorMode::Never));
        assert_eq!(cli.snapshot.unwrap().to_str(), Some("snap.json"));
        let Command::Show {
            filters,
            expand_shards,
            show_safety_check_results,
        } = cli.command
        else {
            panic!("expected show");
        };
        assert_eq!(filters.users, vec!["alice", "bob"]);
        assert_eq!(filters.blocked, Some(true));
        assert!(expand_shards);
        assert!(!show_safety_check_results);
    }

    #[test]
    fn remove_preview_excludes_internal_by_default() {
        let cli = Cli::try_parse_from(["mntctl", "remove-preview", "--ids", "a"]).unwrap();
        let Command::RemovePreview {
            filters,
            include_internal_maintenances,
        } = cli.command
        else {
            panic!("expected remove-preview");
        };
        assert_eq!(filters.ids, vec!["a"]);
        assert!(!include_internal_maintenances);
    }

    #[test]
    fn plan_requires_reason() {
        assert!(Cli::try_parse_from(["mntctl", "plan", "--node-indexes", "1"]).is_err());
        let cli = Cli::try_parse_from([
            "mntctl",
            "plan",
            "--reason",
            "disk swap",
            "--user",
            "ops",
            "--shards",
            "N1:S2,N3",
            "--ttl",
            "3600",
        ])
        .unwrap();
        let Command::Plan(args) = cli.command else {
            panic!("expected plan");
        };
        assert_eq!(args.shards, vec!["N1:S2", "N3"]);
        assert_eq!(args.ttl, 3600);
        assert!(args.group);
    }
}
