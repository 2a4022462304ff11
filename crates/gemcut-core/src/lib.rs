//! # gemcut Core
//!
//! Core types shared by the gemcut crates:
//! - validated cut configuration (`block`, `desired_cut`, `laser_cut_config`)
//! - the machine instruction model and its wire format
//! - explicit machine axis state
//! - error types

pub mod axis;
pub mod config;
pub mod error;
pub mod instruction;

pub use axis::AxisState;
pub use config::{
    BlockGeometry, CoreCut, Count, CutConfiguration, CutProcess, CutSpecification, Excess,
    FocusCut, LaserParameters, LineCut, StackedSeedCut,
};
pub use error::{
    ConfigError, ConfigResult, CutError, CutResult, WireError, WireResult,
};
pub use instruction::{Coordinate, CutList, MachineInstruction, Precision, Trigger4};
