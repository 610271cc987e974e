//! `scan` command implementation.

use anyhow::{Context, Result};
use ingestion::FileSource;
use tracing::info;

use crate::cli::ScanArgs;
use crate::commands::load_layout;
use crate::error::CliError;
use crate::report::print_scan_report;

/// Execute the `scan` command
pub fn run_scan(args: &ScanArgs) -> Result<()> {
    if !args.input.exists() {
        return Err(CliError::input_not_found(args.input.display().to_string()).into());
    }

    let layout = load_layout(&args.layout)?;
    let table = layout.to_route_table()?;

    info!(input = %args.input.display(), "Scanning stream");
    let mut source = FileSource::new(&args.input);
    let report = demux_engine::scan(&table, layout.stream.staging_capacity, &mut source)
        .with_context(|| format!("Failed to scan {}", args.input.display()))?;

    if args.json {
        let json =
            serde_json::to_string_pretty(&report).context("Failed to serialize scan report")?;
        println!("{}", json);
    } else {
        print_scan_report(&report, &args.input);
    }

    Ok(())
}
