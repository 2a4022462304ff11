//! # gemcut Visualizer
//!
//! Read-only consumers of a finished cutlist:
//! - replay of the program into block coordinates
//! - run time estimation

pub mod estimator;
pub mod replay;

pub use estimator::{estimate, estimate_records, format_hms, TravelSummary};
pub use replay::{block_rotation, Motion, Replay, ReplayPoint};
