//! Cut process dispatch
//!
//! Maps a validated [`CutConfiguration`] onto the generator for its
//! `cut_process` and returns the bracketed program. No cutting logic lives
//! here beyond selection, the line-cut overshoot and serialization.

use crate::cross::CrossGenerator;
use crate::generator::CutGenerator;
use crate::line_cut::LineCutGenerator;
use crate::oss_stacked::OssStackedGenerator;
use crate::simple_core::SimpleCoreGenerator;
use crate::vertical_core::VerticalCoreGenerator;
use crate::z_focus::ZFocusGenerator;
use gemcut_core::{
    BlockGeometry, ConfigError, CutConfiguration, CutList, CutResult, CutSpecification,
    LaserParameters, Precision,
};
use tracing::info;

/// Coordinate precision used by each generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrecisionProfile {
    pub line: Precision,
    pub z_focus: Precision,
    pub simple_core: Precision,
    pub vertical_core: Precision,
    pub oss_stacked: Precision,
    pub cross: Precision,
}

impl Default for PrecisionProfile {
    fn default() -> Self {
        Self {
            line: Precision::SEGMENT,
            z_focus: Precision::SEGMENT,
            simple_core: Precision::Full,
            vertical_core: Precision::SEGMENT,
            oss_stacked: Precision::SEGMENT,
            cross: Precision::Full,
        }
    }
}

impl PrecisionProfile {
    /// Same precision for every generator
    pub fn uniform(precision: Precision) -> Self {
        Self {
            line: precision,
            z_focus: precision,
            simple_core: precision,
            vertical_core: precision,
            oss_stacked: precision,
            cross: precision,
        }
    }
}

/// Build the generator for a cut
pub fn generator_for(
    cut: &CutSpecification,
    block: Option<&BlockGeometry>,
    laser: &LaserParameters,
    precision: &PrecisionProfile,
) -> CutResult<Box<dyn CutGenerator>> {
    let need_block = || -> CutResult<BlockGeometry> {
        block
            .copied()
            .ok_or_else(|| ConfigError::MissingGroup("block".to_string()).into())
    };
    let laser = *laser;

    let generator: Box<dyn CutGenerator> = match cut {
        CutSpecification::Line(line) => {
            Box::new(LineCutGenerator::from_cut(line, laser).with_precision(precision.line))
        }
        CutSpecification::SimpleCore(core) => Box::new(
            SimpleCoreGenerator::new(need_block()?, *core, laser)
                .with_precision(precision.simple_core),
        ),
        CutSpecification::VerticalCore(core) => Box::new(
            VerticalCoreGenerator::new(need_block()?, *core, laser)
                .with_precision(precision.vertical_core),
        ),
        CutSpecification::OssStacked(seeds) => Box::new(
            OssStackedGenerator::new(need_block()?, *seeds, laser)
                .with_precision(precision.oss_stacked),
        ),
        CutSpecification::ZFocus(focus) => {
            Box::new(ZFocusGenerator::new(*focus, laser).with_precision(precision.z_focus))
        }
        CutSpecification::Cross => {
            Box::new(CrossGenerator::new(laser.trigger).with_precision(precision.cross))
        }
    };
    Ok(generator)
}

/// Generate the bracketed program for one cut
pub fn generate_cutlist(
    cut: &CutSpecification,
    block: Option<&BlockGeometry>,
    laser: &LaserParameters,
    precision: &PrecisionProfile,
) -> CutResult<CutList> {
    let generator = generator_for(cut, block, laser, precision)?;
    let cutlist = generator.generate()?;
    info!(
        "Generated {} cut: {} instructions",
        generator.process(),
        cutlist.len()
    );
    Ok(cutlist)
}

/// Generate the program for a loaded configuration with default precision
pub fn generate_from_config(config: &CutConfiguration) -> CutResult<CutList> {
    generate_cutlist(
        &config.desired_cut,
        config.block.as_ref(),
        &config.laser,
        &PrecisionProfile::default(),
    )
}

/// JSON configuration in, JSON array of instruction records out
pub fn generate_json(configuration: &str) -> CutResult<String> {
    let config = CutConfiguration::from_json_str(configuration)?;
    let cutlist = generate_from_config(&config)?;
    Ok(cutlist.to_json()?)
}
