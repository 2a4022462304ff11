use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use gemcut::{
    default_output_name, estimate, format_hms, generate_from_config, init_logging, save_csv,
    CutConfiguration, Replay,
};

/// Generate a laser cutlist from a JSON cut configuration
#[derive(Parser, Debug)]
#[command(name = "gemcut", version)]
struct Args {
    /// Cut configuration with `block`, `desired_cut` and `laser_cut_config`
    input: PathBuf,

    /// Output CSV file; defaults to a timestamped name in the current directory
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Also print the cutlist as a JSON array of records on stdout
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    init_logging()?;
    let args = Args::parse();

    let config = CutConfiguration::load_from_file(&args.input)
        .with_context(|| format!("load configuration: {}", args.input.display()))?;
    let cutlist = generate_from_config(&config)
        .with_context(|| format!("generate {} cut", config.process()))?;

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(default_output_name(chrono::Local::now())));
    save_csv(&cutlist, &output).with_context(|| format!("write: {}", output.display()))?;

    let replay = Replay::new(&cutlist);
    let time = estimate(&cutlist, &config.laser).context("estimate cut time")?;
    info!(
        "Wrote {} instructions ({} cuts) to {}",
        cutlist.len(),
        replay.cut_count(),
        output.display()
    );
    info!("Estimated time: {}", format_hms(time));

    if args.json {
        println!("{}", cutlist.to_json()?);
    }

    Ok(())
}
