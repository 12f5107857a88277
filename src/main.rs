use respimage::{config, logging, output, pipeline::Pipeline};
use std::path::PathBuf;

/// Settings file used when `RESPIMAGE_CONFIG` is not set.
const DEFAULT_CONFIG: &str = "respimage.toml";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var_os("RESPIMAGE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));

    let settings = config::load_settings(&config_path)?;
    // Flushes the log file on drop
    let _guard = logging::init(&settings.logging)?;

    let source = settings.pipeline.source.clone();
    let report = Pipeline::new(settings.pipeline).execute();
    output::print_run_report(&report, &source);

    Ok(())
}
