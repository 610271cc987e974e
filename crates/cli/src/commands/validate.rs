//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{StreamLayout, WriteDiscipline};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;
use crate::error::CliError;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    layout_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<LayoutSummary>,
}

#[derive(Serialize)]
struct LayoutSummary {
    version: String,
    route_count: usize,
    append_targets: usize,
    overwrite_targets: usize,
    terminal_kind: u32,
    checkpoint_kind: u32,
    staging_capacity: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(layout = %args.layout.display(), "Validating layout");

    let (result, error) = validate_layout(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    match error {
        None => Ok(()),
        Some(err) => Err(err.context("Layout validation failed")),
    }
}

fn validate_layout(args: &ValidateArgs) -> (ValidationResult, Option<anyhow::Error>) {
    let layout_path = args.layout.display().to_string();

    if !args.layout.exists() {
        let err = CliError::layout_not_found(layout_path.clone());
        return (
            ValidationResult {
                valid: false,
                layout_path,
                error: Some(err.to_string()),
                warnings: None,
                summary: None,
            },
            Some(err.into()),
        );
    }

    match config_loader::ConfigLoader::load_from_path(&args.layout) {
        Ok(layout) => {
            let warnings = collect_warnings(&layout);
            let count = |d: WriteDiscipline| {
                layout.routes.iter().filter(|r| r.discipline == d).count()
            };

            (
                ValidationResult {
                    valid: true,
                    layout_path,
                    error: None,
                    warnings: if warnings.is_empty() {
                        None
                    } else {
                        Some(warnings)
                    },
                    summary: Some(LayoutSummary {
                        version: format!("{:?}", layout.version),
                        route_count: layout.routes.len(),
                        append_targets: count(WriteDiscipline::Append),
                        overwrite_targets: count(WriteDiscipline::Overwrite),
                        terminal_kind: layout.stream.terminal_kind,
                        checkpoint_kind: layout.stream.checkpoint_kind,
                        staging_capacity: layout.stream.staging_capacity,
                    }),
                },
                None,
            )
        }
        Err(e) => (
            ValidationResult {
                valid: false,
                layout_path,
                error: Some(e.to_string()),
                warnings: None,
                summary: None,
            },
            Some(e.into()),
        ),
    }
}

/// Collect layout warnings (non-fatal issues)
fn collect_warnings(layout: &StreamLayout) -> Vec<String> {
    let mut warnings = Vec::new();

    let stream = &layout.stream;
    let overwrite = |kind: u32| {
        layout
            .routes
            .iter()
            .any(|r| r.kind == kind && r.discipline == WriteDiscipline::Overwrite)
    };

    if overwrite(stream.terminal_kind) {
        warnings.push(format!(
            "terminal kind {} uses overwrite; only the last sentinel payload is kept",
            stream.terminal_kind
        ));
    }
    if !layout
        .routes
        .iter()
        .any(|r| r.discipline == WriteDiscipline::Append)
    {
        warnings.push("no append targets configured".to_string());
    }
    if stream.staging_capacity < 4096 {
        warnings.push(format!(
            "staging_capacity {} is small; most payloads will reallocate",
            stream.staging_capacity
        ));
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Layout is valid: {}", result.layout_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Routes: {}", summary.route_count);
            println!(
                "  Targets: {} append, {} overwrite",
                summary.append_targets, summary.overwrite_targets
            );
            println!("  Terminal kind: {}", summary.terminal_kind);
            println!("  Checkpoint kind: {}", summary.checkpoint_kind);
            println!("  Staging capacity: {} bytes", summary.staging_capacity);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Layout is invalid: {}", result.layout_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn preset_has_no_warnings() {
        assert!(collect_warnings(&StreamLayout::pipeline()).is_empty());
    }

    #[test]
    fn small_staging_warns() {
        let mut layout = StreamLayout::legacy();
        layout.stream.staging_capacity = 16;
        let warnings = collect_warnings(&layout);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("staging_capacity"));
    }

    #[test]
    fn validates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        let json = config_loader::ConfigLoader::to_json(&StreamLayout::legacy()).unwrap();
        std::fs::write(&path, json).unwrap();

        let (result, error) = validate_layout(&ValidateArgs {
            layout: path,
            json: true,
        });
        assert!(result.valid);
        assert!(error.is_none());
        assert_eq!(result.summary.unwrap().route_count, 13);
    }

    #[test]
    fn missing_file() {
        let (result, error) = validate_layout(&ValidateArgs {
            layout: PathBuf::from("/nonexistent/layout.toml"),
            json: false,
        });
        assert!(!result.valid);
        assert!(error.is_some());
    }
}
