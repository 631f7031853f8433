use anyhow::Context;
use clap::Parser;
use clay_print::{init_logging, PrintJob, PrintProgram, RosBridgeClient, SettingsManager};
use std::path::PathBuf;

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")");

/// Stream a layered clay print to the robot
#[derive(Parser, Debug)]
#[command(name = "clay-print")]
#[command(version = LONG_VERSION, about, long_about = None)]
struct Cli {
    /// JSON file with the print frames and extrusion factors
    input: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging()?;
    tracing::info!("clay-print {}", LONG_VERSION);

    let settings = SettingsManager::new();
    let config = settings.load().context("Failed to load configuration")?;

    let job = PrintJob::load_from_file(&cli.input)
        .with_context(|| format!("Failed to load print job {}", cli.input.display()))?;

    let mut client = RosBridgeClient::connect(config.connection_params())
        .await
        .context("Failed to connect to the robot")?;

    let stats = PrintProgram::new(&config)
        .execute(&mut client, &job)
        .await?;
    tracing::info!(
        "Print complete: {} commands sent, {} completion waits",
        stats.sent,
        stats.waits
    );

    Ok(())
}
