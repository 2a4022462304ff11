//! Error handling for gemcut
//!
//! Provides the error types shared by every layer of the toolpath generator:
//! - Cut errors (returned by generators and the dispatcher)
//! - Configuration errors (input validation at the boundary)
//! - Wire errors (parsing stringified instruction records)
//!
//! All error types use `thiserror` for ergonomic error handling.

use std::io;
use thiserror::Error;

/// Cut generation error type
///
/// Every variant is unrecoverable at generation time: no generator returns a
/// partial cutlist alongside an error.
#[derive(Error, Debug)]
pub enum CutError {
    /// Required input is absent, malformed, or names an unknown process
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// A degenerate segment was handed to the offset primitive
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// The requested seed shape cannot be produced with this laser
    #[error(
        "Infeasible cut: pyramid angle too small ({pyramid_angle_deg:.3}° < kerf half-angle {kerf_half_angle_deg:.3}°)"
    )]
    InfeasibleCut {
        /// The computed pyramid face angle in degrees.
        pyramid_angle_deg: f64,
        /// Half of the configured kerf angle in degrees.
        kerf_half_angle_deg: f64,
    },

    /// The estimated run time does not fit in a `Duration`
    #[error("Estimated travel time of {seconds} s is not representable")]
    TimeOverflow {
        /// The computed travel time in seconds.
        seconds: f64,
    },

    /// The generated program could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CutError {
    /// Create an invalid geometry error from a message
    pub fn invalid_geometry(msg: impl Into<String>) -> Self {
        CutError::InvalidGeometry(msg.into())
    }

    /// Check if this is a configuration error
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, CutError::Configuration(_))
    }

    /// Check if this is an infeasible cut error
    pub fn is_infeasible(&self) -> bool {
        matches!(self, CutError::InfeasibleCut { .. })
    }
}

/// Errors related to the cut configuration supplied by the caller.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// One of `block`, `desired_cut` or `laser_cut_config` is absent.
    #[error("Missing configuration group: {0}")]
    MissingGroup(String),

    /// A field required by the selected cut process is absent.
    #[error("Missing required field '{field}' for cut process {process}")]
    MissingField {
        /// The cut process that requires the field.
        process: String,
        /// The name of the missing field.
        field: String,
    },

    /// The `cut_process` value is not one of the recognised processes.
    #[error("No such cut exists: {0}")]
    UnknownCutProcess(String),

    /// A field has a value the generators cannot work with.
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue {
        /// The field name.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A configuration group did not match its expected shape.
    #[error("Malformed '{group}' group: {source}")]
    MalformedGroup {
        /// The group name.
        group: String,
        /// The underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },

    /// The configuration document is not valid JSON.
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ConfigError {
    /// Shorthand for an [`ConfigError::InvalidValue`].
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`ConfigError::MissingField`].
    pub fn missing(process: impl Into<String>, field: impl Into<String>) -> Self {
        ConfigError::MissingField {
            process: process.into(),
            field: field.into(),
        }
    }
}

/// Errors raised while decoding stringified instruction records.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WireError {
    /// The record has no tag.
    #[error("Empty instruction record")]
    Empty,

    /// The tag does not name a known instruction.
    #[error("Unknown instruction tag: {0}")]
    UnknownTag(String),

    /// The record carries the wrong number of arguments.
    #[error("Instruction '{tag}' expects {expected} argument(s), found {found}")]
    ArgumentCount {
        /// The instruction tag.
        tag: String,
        /// Expected argument count.
        expected: usize,
        /// Actual argument count.
        found: usize,
    },

    /// An argument is not a valid number.
    #[error("Instruction '{tag}' has a non-numeric argument: {value}")]
    InvalidNumber {
        /// The instruction tag.
        tag: String,
        /// The offending argument.
        value: String,
    },
}

/// Result type alias for cut generation.
pub type CutResult<T> = Result<T, CutError>;

/// Result type alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for wire decoding.
pub type WireResult<T> = Result<T, WireError>;
