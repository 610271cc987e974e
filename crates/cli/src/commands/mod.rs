//! Command implementations.

mod info;
mod run;
mod scan;
mod validate;

pub use info::run_info;
pub use run::run_demux;
pub use scan::run_scan;
pub use validate::run_validate;

use anyhow::Result;
use contracts::StreamLayout;
use tracing::info;

use crate::cli::{LayoutArgs, Preset};
use crate::error::CliError;

/// Load the layout file or preset named by the arguments, with overrides applied
pub(crate) fn load_layout(args: &LayoutArgs) -> Result<StreamLayout> {
    let mut layout = match &args.layout {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::layout_not_found(path.display().to_string()).into());
            }
            info!(layout = %path.display(), "Loading layout");
            config_loader::ConfigLoader::load_from_path(path)?
        }
        None => {
            info!(preset = ?args.preset, "Using built-in layout");
            match args.preset {
                Preset::Pipeline => StreamLayout::pipeline(),
                Preset::Legacy => StreamLayout::legacy(),
            }
        }
    };

    if let Some(capacity) = args.staging_capacity {
        info!(capacity, "Overriding staging capacity from CLI");
        layout.stream.staging_capacity = capacity;
    }
    config_loader::ConfigLoader::validate(&layout)?;
    Ok(layout)
}
