//! SEER stage recode batch binary.

use stage_cli::{run, RunConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = RunConfig::from_env()?;
    tracing::info!(
        tables = %config.tables_path.display(),
        input = %config.input_path.display(),
        output = %config.output_path.display(),
        cs_version = config.engine.cs_version,
        "starting stage recode run"
    );

    run(&config)?;
    Ok(())
}
