//! # gemcut
//!
//! Laser toolpath generator for multi-axis gem cutting machines.
//!
//! A JSON cut configuration (block, desired cut, laser constants) goes in; an
//! ordered program of jump, mark, axis and trigger instructions comes out.
//!
//! ## Architecture
//!
//! gemcut is organized as a workspace with multiple crates:
//!
//! 1. **gemcut-core** - Configuration, instruction model, axis state, errors
//! 2. **gemcut-toolpath** - Cut generators and the process dispatcher
//! 3. **gemcut-visualizer** - Replay into block coordinates, time estimation
//! 4. **gemcut** - CSV export and the command line binary

pub mod export;

pub use gemcut_core::{
    AxisState, BlockGeometry, ConfigError, CutConfiguration, CutError, CutList, CutProcess,
    CutSpecification, LaserParameters, MachineInstruction, Precision, Trigger4,
};
pub use gemcut_toolpath::{
    generate_cutlist, generate_from_config, generate_json, CutGenerator, PrecisionProfile,
};
pub use gemcut_visualizer::{estimate, format_hms, Replay};

pub use export::{load_csv, read_csv, save_csv, write_csv, ExportError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default output file name for a run started at `now`, e.g. `03-14_09_26.csv`
pub fn default_output_name(now: chrono::DateTime<chrono::Local>) -> String {
    format!("{}.csv", now.format("%m-%d_%H_%M"))
}

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Formatted output on stderr, keeping stdout free for program output
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::INFO.to_string()));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
