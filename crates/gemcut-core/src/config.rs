//! Cut configuration
//!
//! The input document has three groups:
//! - `block`: the physical block mounted on the machine
//! - `desired_cut`: the target shape, selected by `cut_process`
//! - `laser_cut_config`: laser and machine constants
//!
//! Loosely-typed JSON is validated once here and turned into typed structs.
//! Each `cut_process` has its own set of required fields; anything missing or
//! unrecognised is rejected with a [`ConfigError`] before generation starts.

use crate::error::{ConfigError, ConfigResult};
use crate::instruction::Trigger4;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

fn default_refraction() -> f64 {
    1.0
}

/// Physical laser and machine constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaserParameters {
    /// Travel speed with the beam off
    pub jump_speed: f64,
    /// Travel speed with the beam on
    pub mark_speed: f64,
    /// Full cone angle of the kerf in degrees
    pub kerf_angle: f64,
    /// Spacing between raster passes within a layer
    pub xy_spacing: f64,
    /// Depth of one layer
    pub z_spacing: f64,
    /// Extra depth added to through-cuts
    pub z_final_overshoot: f64,
    /// Refractive index applied to pyramid face depths
    #[serde(default = "default_refraction")]
    pub refraction: f64,
    /// Arguments of the `set_trigger4` command opening each program
    #[serde(default)]
    pub trigger: Trigger4,
}

impl LaserParameters {
    /// Half of the kerf angle, in radians
    pub fn half_kerf_angle(&self) -> f64 {
        (self.kerf_angle / 2.0).to_radians()
    }

    /// Lateral kerf widening over one layer
    pub fn layer_taper(&self) -> f64 {
        self.half_kerf_angle().tan() * self.z_spacing
    }

    /// Whole layers that fit in `depth`; zero for non-positive depths
    pub fn layer_count(&self, depth: f64) -> usize {
        let ratio = depth / self.z_spacing;
        if ratio.is_finite() && ratio > 0.0 {
            ratio.floor() as usize
        } else {
            0
        }
    }

    /// Check only the travel speeds
    pub fn validate_speeds(&self) -> ConfigResult<()> {
        positive("jump_speed", self.jump_speed)?;
        positive("mark_speed", self.mark_speed)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.validate_speeds()?;
        positive("xy_spacing", self.xy_spacing)?;
        positive("z_spacing", self.z_spacing)?;
        positive("refraction", self.refraction)?;
        non_negative("z_final_overshoot", self.z_final_overshoot)?;
        non_negative("kerf_angle", self.kerf_angle)?;
        if self.kerf_angle >= 90.0 {
            return Err(ConfigError::invalid(
                "kerf_angle",
                format!("{} must be below 90 degrees", self.kerf_angle),
            ));
        }
        Ok(())
    }
}

/// Physical block mounted on the machine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockGeometry {
    pub thickness: f64,
    pub width: f64,
    pub length: f64,
    /// Offset of the block centre from the machine origin
    pub origin_x: f64,
    pub origin_y: f64,
    /// Spin of the block on its mount, in degrees
    pub physical_rotation: f64,
}

impl BlockGeometry {
    pub fn validate(&self) -> ConfigResult<()> {
        positive("thickness", self.thickness)?;
        non_negative("width", self.width)?;
        non_negative("length", self.length)?;
        finite("origin_x", self.origin_x)?;
        finite("origin_y", self.origin_y)?;
        finite("physical_rotation", self.physical_rotation)
    }
}

/// Recognised cut processes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CutProcess {
    Line,
    SimpleCore,
    VerticalCore,
    OssStacked,
    ZFocus,
    Cross,
}

impl CutProcess {
    pub const ALL: [CutProcess; 6] = [
        CutProcess::Line,
        CutProcess::SimpleCore,
        CutProcess::VerticalCore,
        CutProcess::OssStacked,
        CutProcess::ZFocus,
        CutProcess::Cross,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::SimpleCore => "simple_core",
            Self::VerticalCore => "vertical_core",
            Self::OssStacked => "oss_stacked",
            Self::ZFocus => "z_focus",
            Self::Cross => "cross",
        }
    }

    /// Whether the process needs the `block` group
    pub fn requires_block(&self) -> bool {
        matches!(
            self,
            Self::SimpleCore | Self::VerticalCore | Self::OssStacked
        )
    }
}

impl fmt::Display for CutProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CutProcess {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownCutProcess(s.to_string()))
    }
}

/// Which side of the block keeps the leftover material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Excess {
    /// Seeds are stacked from the bottom; leftover stays on top
    Top,
    /// Seeds are stacked from the top; leftover stays at the bottom
    Bottom,
}

/// A count that is either explicit or "as many as fit"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawCount")]
pub enum Count {
    Max,
    Exactly(u32),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCount {
    Number(u32),
    Text(String),
}

impl TryFrom<RawCount> for Count {
    type Error = String;

    fn try_from(raw: RawCount) -> Result<Self, Self::Error> {
        match raw {
            RawCount::Number(n) => Ok(Count::Exactly(n)),
            RawCount::Text(text) if text == "max" => Ok(Count::Max),
            RawCount::Text(text) => Err(format!("expected an integer or \"max\", got {text:?}")),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bool(bool),
    Text(String),
}

impl RawFlag {
    fn into_bool(self) -> ConfigResult<bool> {
        match self {
            RawFlag::Bool(b) => Ok(b),
            RawFlag::Text(text) => match text.as_str() {
                "yes" | "true" => Ok(true),
                "no" | "false" => Ok(false),
                other => Err(ConfigError::invalid(
                    "core",
                    format!("expected yes/no, got {other:?}"),
                )),
            },
        }
    }
}

/// Straight raster cut between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineCut {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    /// Requested depth before overshoot
    pub final_dimension_z: f64,
}

/// Square core of the given dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoreCut {
    pub final_dimension_x: f64,
    pub final_dimension_y: f64,
}

/// Focus calibration ladder
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusCut {
    pub final_dimension_y: f64,
    pub final_dimension_z: f64,
}

/// Stack of pyramid-topped seeds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackedSeedCut {
    pub final_dimension_x: f64,
    pub final_dimension_y: f64,
    pub pyramid_height: f64,
    pub base_height: f64,
    pub gap_size: f64,
    /// Run a vertical core before slicing
    pub core: bool,
    pub excess: Excess,
    pub num_of_seeds: Count,
    pub layers: Count,
}

impl StackedSeedCut {
    /// Footprint used by the optional coring pass
    pub fn core_dimensions(&self) -> CoreCut {
        CoreCut {
            final_dimension_x: self.final_dimension_x,
            final_dimension_y: self.final_dimension_y,
        }
    }
}

/// Validated target shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CutSpecification {
    Line(LineCut),
    SimpleCore(CoreCut),
    VerticalCore(CoreCut),
    OssStacked(StackedSeedCut),
    ZFocus(FocusCut),
    /// Fixed test pattern
    Cross,
}

impl CutSpecification {
    pub fn process(&self) -> CutProcess {
        match self {
            Self::Line(_) => CutProcess::Line,
            Self::SimpleCore(_) => CutProcess::SimpleCore,
            Self::VerticalCore(_) => CutProcess::VerticalCore,
            Self::OssStacked(_) => CutProcess::OssStacked,
            Self::ZFocus(_) => CutProcess::ZFocus,
            Self::Cross => CutProcess::Cross,
        }
    }

    /// Build from the loosely-typed `desired_cut` group
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        let raw: RawCutSpecification =
            serde_json::from_value(value).map_err(|source| ConfigError::MalformedGroup {
                group: "desired_cut".to_string(),
                source,
            })?;
        raw.into_specification()
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawCutSpecification {
    cut_process: Option<String>,
    final_dimension_x: Option<f64>,
    final_dimension_y: Option<f64>,
    final_dimension_z: Option<f64>,
    pyramid_height: Option<f64>,
    base_height: Option<f64>,
    gap_size: Option<f64>,
    core: Option<RawFlag>,
    excess: Option<Excess>,
    num_of_seeds: Option<Count>,
    layers: Option<Count>,
    x1: Option<f64>,
    y1: Option<f64>,
    x2: Option<f64>,
    y2: Option<f64>,
}

impl RawCutSpecification {
    fn into_specification(self) -> ConfigResult<CutSpecification> {
        let name = self
            .cut_process
            .as_deref()
            .ok_or_else(|| ConfigError::invalid("cut_process", "not specified"))?;
        let process: CutProcess = name.parse()?;

        fn need<T>(process: CutProcess, field: &str, value: Option<T>) -> ConfigResult<T> {
            value.ok_or_else(|| ConfigError::missing(process.as_str(), field))
        }

        let spec = match process {
            CutProcess::Line => CutSpecification::Line(LineCut {
                x1: need(process, "x1", self.x1)?,
                y1: need(process, "y1", self.y1)?,
                x2: need(process, "x2", self.x2)?,
                y2: need(process, "y2", self.y2)?,
                final_dimension_z: need(process, "final_dimension_z", self.final_dimension_z)?,
            }),
            CutProcess::SimpleCore | CutProcess::VerticalCore => {
                let core = CoreCut {
                    final_dimension_x: need(process, "final_dimension_x", self.final_dimension_x)?,
                    final_dimension_y: need(process, "final_dimension_y", self.final_dimension_y)?,
                };
                positive("final_dimension_x", core.final_dimension_x)?;
                positive("final_dimension_y", core.final_dimension_y)?;
                if process == CutProcess::SimpleCore {
                    CutSpecification::SimpleCore(core)
                } else {
                    CutSpecification::VerticalCore(core)
                }
            }
            CutProcess::OssStacked => {
                let cut = StackedSeedCut {
                    final_dimension_x: need(process, "final_dimension_x", self.final_dimension_x)?,
                    final_dimension_y: need(process, "final_dimension_y", self.final_dimension_y)?,
                    pyramid_height: need(process, "pyramid_height", self.pyramid_height)?,
                    base_height: need(process, "base_height", self.base_height)?,
                    gap_size: need(process, "gap_size", self.gap_size)?,
                    core: match self.core {
                        Some(flag) => flag.into_bool()?,
                        None => false,
                    },
                    excess: need(process, "excess", self.excess)?,
                    num_of_seeds: need(process, "num_of_seeds", self.num_of_seeds)?,
                    layers: need(process, "layers", self.layers)?,
                };
                positive("final_dimension_x", cut.final_dimension_x)?;
                positive("final_dimension_y", cut.final_dimension_y)?;
                positive("pyramid_height", cut.pyramid_height)?;
                non_negative("base_height", cut.base_height)?;
                non_negative("gap_size", cut.gap_size)?;
                CutSpecification::OssStacked(cut)
            }
            CutProcess::ZFocus => CutSpecification::ZFocus(FocusCut {
                final_dimension_y: need(process, "final_dimension_y", self.final_dimension_y)?,
                final_dimension_z: need(process, "final_dimension_z", self.final_dimension_z)?,
            }),
            CutProcess::Cross => CutSpecification::Cross,
        };
        Ok(spec)
    }
}

/// Complete, validated input of one generation run
#[derive(Debug, Clone, PartialEq)]
pub struct CutConfiguration {
    /// Only required by processes that cut relative to the block
    pub block: Option<BlockGeometry>,
    pub desired_cut: CutSpecification,
    pub laser: LaserParameters,
}

impl CutConfiguration {
    /// Validate a parsed JSON document
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        let Value::Object(mut groups) = value else {
            return Err(ConfigError::invalid(
                "configuration",
                "expected a JSON object",
            ));
        };

        let desired_cut = groups
            .remove("desired_cut")
            .ok_or_else(|| ConfigError::MissingGroup("desired_cut".to_string()))?;
        let laser = groups
            .remove("laser_cut_config")
            .ok_or_else(|| ConfigError::MissingGroup("laser_cut_config".to_string()))?;

        let desired_cut = CutSpecification::from_value(desired_cut)?;
        let laser: LaserParameters =
            serde_json::from_value(laser).map_err(|source| ConfigError::MalformedGroup {
                group: "laser_cut_config".to_string(),
                source,
            })?;
        laser.validate()?;

        let block = match groups.remove("block") {
            Some(Value::Null) | None => None,
            Some(value) => {
                let block: BlockGeometry =
                    serde_json::from_value(value).map_err(|source| {
                        ConfigError::MalformedGroup {
                            group: "block".to_string(),
                            source,
                        }
                    })?;
                block.validate()?;
                Some(block)
            }
        };

        let process = desired_cut.process();
        if process.requires_block() && block.is_none() {
            return Err(ConfigError::MissingGroup("block".to_string()));
        }

        debug!("Loaded configuration for cut process {}", process);
        Ok(Self {
            block,
            desired_cut,
            laser,
        })
    }

    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_reader<R: Read>(reader: R) -> ConfigResult<Self> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_value(value)
    }

    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn process(&self) -> CutProcess {
        self.desired_cut.process()
    }
}

fn finite(field: &str, value: f64) -> ConfigResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, "must be a finite number"))
    }
}

fn positive(field: &str, value: f64) -> ConfigResult<()> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("{value} must be positive"),
        ))
    }
}

fn non_negative(field: &str, value: f64) -> ConfigResult<()> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("{value} must not be negative"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn laser() -> Value {
        json!({
            "jump_speed": 400, "mark_speed": 100, "kerf_angle": 3,
            "xy_spacing": 0.01, "z_spacing": 0.1, "z_final_overshoot": 0.25
        })
    }

    fn block() -> Value {
        json!({
            "thickness": 5.0, "width": 10.0, "length": 10.0,
            "origin_x": 0.0, "origin_y": 0.0, "physical_rotation": 0
        })
    }

    #[test]
    fn test_line_configuration_without_block() {
        let config = CutConfiguration::from_value(json!({
            "desired_cut": {"cut_process": "line", "x1": 0, "y1": 0, "x2": 10, "y2": 0, "final_dimension_z": 1.0},
            "laser_cut_config": laser(),
        }))
        .unwrap();
        assert_eq!(config.process(), CutProcess::Line);
        assert!(config.block.is_none());
        assert_eq!(config.laser.refraction, 1.0);
        assert_eq!(config.laser.trigger, Trigger4::default());
    }

    #[test]
    fn test_unknown_cut_process() {
        let err = CutConfiguration::from_value(json!({
            "block": block(),
            "desired_cut": {"cut_process": "unsupported"},
            "laser_cut_config": laser(),
        }))
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownCutProcess(ref p) if p == "unsupported"));
    }

    #[test]
    fn test_missing_groups() {
        let err = CutConfiguration::from_value(json!({
            "desired_cut": {"cut_process": "cross"},
        }))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingGroup(ref g) if g == "laser_cut_config"));

        let err = CutConfiguration::from_value(json!({
            "desired_cut": {"cut_process": "simple_core", "final_dimension_x": 4, "final_dimension_y": 4},
            "laser_cut_config": laser(),
        }))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingGroup(ref g) if g == "block"));
    }

    #[test]
    fn test_missing_required_field() {
        let err = CutConfiguration::from_value(json!({
            "block": block(),
            "desired_cut": {
                "cut_process": "oss_stacked", "final_dimension_x": 4, "final_dimension_y": 4,
                "pyramid_height": 1, "base_height": 1, "gap_size": 0.2,
                "excess": "top", "num_of_seeds": "max"
            },
            "laser_cut_config": laser(),
        }))
        .unwrap_err();
        assert!(
            matches!(err, ConfigError::MissingField { ref field, .. } if field == "layers"),
            "{err}"
        );
    }

    #[test]
    fn test_stacked_seed_fields() {
        let spec = CutSpecification::from_value(json!({
            "cut_process": "oss_stacked", "final_dimension_x": 4, "final_dimension_y": 3,
            "pyramid_height": 1, "base_height": 1, "gap_size": 0.2, "core": "yes",
            "excess": "bottom", "num_of_seeds": 2, "layers": "max"
        }))
        .unwrap();
        let CutSpecification::OssStacked(cut) = spec else {
            panic!("expected oss_stacked, got {spec:?}");
        };
        assert!(cut.core);
        assert_eq!(cut.excess, Excess::Bottom);
        assert_eq!(cut.num_of_seeds, Count::Exactly(2));
        assert_eq!(cut.layers, Count::Max);
    }

    #[test]
    fn test_bad_count_is_malformed() {
        let err = CutSpecification::from_value(json!({
            "cut_process": "oss_stacked", "final_dimension_x": 4, "final_dimension_y": 3,
            "pyramid_height": 1, "base_height": 1, "gap_size": 0.2,
            "excess": "top", "num_of_seeds": "all", "layers": "max"
        }))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MalformedGroup { .. }));
    }

    #[test]
    fn test_laser_validation() {
        let mut params: LaserParameters = serde_json::from_value(laser()).unwrap();
        assert!(params.validate().is_ok());

        params.z_spacing = 0.0;
        assert!(matches!(
            params.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "z_spacing"
        ));
    }

    #[test]
    fn test_layer_count_floors() {
        let params: LaserParameters = serde_json::from_value(json!({
            "jump_speed": 1, "mark_speed": 1, "kerf_angle": 0,
            "xy_spacing": 1, "z_spacing": 0.5, "z_final_overshoot": 0
        }))
        .unwrap();
        assert_eq!(params.layer_count(1.0), 2);
        assert_eq!(params.layer_count(1.2), 2);
        assert_eq!(params.layer_count(-3.0), 0);
        assert_eq!(params.layer_taper(), 0.0);
    }
}
