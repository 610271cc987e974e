//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::{StreamLayout, WriteDiscipline};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;
use crate::commands::load_layout;

/// Layout info for JSON output
#[derive(Serialize)]
struct LayoutInfo {
    version: String,
    stream: StreamInfo,
    routes: Vec<RouteInfo>,
}

#[derive(Serialize)]
struct StreamInfo {
    terminal_kind: u32,
    checkpoint_kind: u32,
    staging_capacity: usize,
    status_file: String,
}

#[derive(Serialize)]
struct RouteInfo {
    kind: u32,
    target: String,
    discipline: WriteDiscipline,
    #[serde(skip_serializing_if = "Option::is_none")]
    marker: Option<&'static str>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    let layout = load_layout(&args.layout)?;
    info!(routes = layout.routes.len(), "Loaded layout");

    if args.json {
        let info = build_layout_info(&layout);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize layout info")?;
        println!("{}", json);
    } else if args.toml {
        print!("{}", config_loader::ConfigLoader::to_toml(&layout)?);
    } else {
        print_layout_info(&layout);
    }

    Ok(())
}

fn marker(layout: &StreamLayout, kind: u32) -> Option<&'static str> {
    if kind == layout.stream.terminal_kind {
        Some("terminal")
    } else if kind == layout.stream.checkpoint_kind {
        Some("checkpoint")
    } else {
        None
    }
}

fn build_layout_info(layout: &StreamLayout) -> LayoutInfo {
    let mut routes: Vec<RouteInfo> = layout
        .routes
        .iter()
        .map(|r| RouteInfo {
            kind: r.kind,
            target: r.target.clone().unwrap_or_else(|| "<discard>".to_string()),
            discipline: r.discipline,
            marker: marker(layout, r.kind),
        })
        .collect();
    routes.sort_by_key(|r| r.kind);

    LayoutInfo {
        version: format!("{:?}", layout.version),
        stream: StreamInfo {
            terminal_kind: layout.stream.terminal_kind,
            checkpoint_kind: layout.stream.checkpoint_kind,
            staging_capacity: layout.stream.staging_capacity,
            status_file: layout.stream.status_file.clone(),
        },
        routes,
    }
}

fn print_layout_info(layout: &StreamLayout) {
    let info = build_layout_info(layout);

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                   Stream Demux Layout                        ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("⚙️  Stream");
    println!("   ├─ Version: {}", info.version);
    println!("   ├─ Terminal kind: {}", info.stream.terminal_kind);
    println!("   ├─ Checkpoint kind: {}", info.stream.checkpoint_kind);
    println!("   ├─ Staging capacity: {} bytes", info.stream.staging_capacity);
    println!("   └─ Status file: {}", info.stream.status_file);

    println!("\n📤 Routes ({})", info.routes.len());
    for (i, route) in info.routes.iter().enumerate() {
        let prefix = if i == info.routes.len() - 1 { "└─" } else { "├─" };
        let marker = route
            .marker
            .map(|m| format!("  [{m}]"))
            .unwrap_or_default();
        println!(
            "   {} {:>3} → {} ({:?}){}",
            prefix, route.kind, route.target, route.discipline, marker
        );
    }

    println!();
}
