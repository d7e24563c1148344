use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};

const DEFAULT_FILTER: &str = "info";

/// Sends log output to `path`; the terminal belongs to the UI.
pub fn init_file_logger(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .context("logger already initialised")?;
    log::info!("logging to {}", path.display());
    Ok(())
}
