//! `run` command implementation.

use anyhow::{Context, Result};
use demux_engine::{RecoveryDriver, RunOutcome};
use ingestion::FileSource;
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::commands::load_layout;
use crate::error::CliError;
use crate::report::print_run_report;

/// Execute the `run` command
pub fn run_demux(args: &RunArgs) -> Result<()> {
    if !args.input.exists() {
        return Err(CliError::input_not_found(args.input.display().to_string()).into());
    }

    let layout = load_layout(&args.layout)?;
    let table = layout.to_route_table()?;

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)
            .context("Failed to start metrics endpoint")?;
    }

    info!(
        input = %args.input.display(),
        output = %args.output.display(),
        routes = table.route_count(),
        terminal_kind = table.terminal_kind(),
        checkpoint_kind = table.checkpoint_kind(),
        "Demultiplexing stream"
    );

    let mut source = FileSource::new(&args.input);
    let driver = RecoveryDriver::new(&table, &layout.stream, &args.output);
    let report = driver
        .run(&mut source)
        .with_context(|| format!("Failed to demultiplex {}", args.input.display()))?;

    if report.outcome == RunOutcome::RecoveredSuccess {
        warn!(
            stop_sequence = ?report.final_pass().stop_sequence,
            "Stream was incomplete; output recovered up to the last checkpoint"
        );
    }

    if args.json {
        let json =
            serde_json::to_string_pretty(&report).context("Failed to serialize run report")?;
        println!("{}", json);
    } else {
        print_run_report(&report, &args.output, &layout.stream.status_file);
    }

    Ok(())
}
