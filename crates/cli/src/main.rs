//! # Stream Demux CLI
//!
//! 命令行接口入口点。
//!
//! 提供：
//! - 布局加载与验证
//! - 解复用与自动恢复
//! - 按错误类别返回退出码

mod cli;
mod commands;
mod error;
mod report;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_demux, run_info, run_scan, run_validate};

fn main() -> ExitCode {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli) {
        eprintln!("error: {e:#}");
        return ExitCode::from(error::EXIT_FAILURE);
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Stream Demux CLI starting"
    );

    let result = match &cli.command {
        Commands::Run(args) => run_demux(args),
        Commands::Scan(args) => run_scan(args),
        Commands::Validate(args) => run_validate(args),
        Commands::Info(args) => run_info(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = error::exit_code_for(&e);
            tracing::error!(error = %format!("{e:#}"), exit_code = code, "Command failed");
            eprintln!("error: {e:#}");
            ExitCode::from(code)
        }
    }
}

/// Initialize logging based on CLI options
fn init_logging(cli: &Cli) -> Result<()> {
    observability::init_with_config(ObservabilityConfig::from_verbosity(
        cli.log_format.into(),
        cli.verbose,
        cli.quiet,
    ))
}
