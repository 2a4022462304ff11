//! # gemcut Toolpath
//!
//! Generators that turn a cut configuration into a laser program.
//!
//! ## Generators
//!
//! - **Line Cut**: Layered raster along a straight segment
//! - **Focus Ladder**: Calibration lines at stepped z
//! - **Simple Core**: Racetrack contours around a rectangular core
//! - **Vertical Core**: Four tilted faces cut with the line raster
//! - **Stacked Seeds**: Pyramid-topped seeds sliced from four sides
//! - **Cross**: Scanner and spindle alignment pattern
//!
//! ## Supporting Infrastructure
//!
//! - **Geometry**: Segment offsets
//! - **Pyramid Slice**: Quarter-slice primitive used by the stacked generator
//! - **Dispatcher**: Selection by `cut_process` and JSON output

pub mod cross;
pub mod dispatcher;
pub mod generator;
pub mod geometry;
pub mod line_cut;
pub mod oss_stacked;
pub mod pyramid_slice;
pub mod simple_core;
pub mod vertical_core;
pub mod z_focus;

pub use cross::CrossGenerator;
pub use dispatcher::{
    generate_cutlist, generate_from_config, generate_json, generator_for, PrecisionProfile,
};
pub use generator::CutGenerator;
pub use geometry::{orthogonal_offset, Segment, Vec2};
pub use line_cut::LineCutGenerator;
pub use oss_stacked::{OssStackedGenerator, SliceGeometry};
pub use pyramid_slice::PyramidSlice;
pub use simple_core::SimpleCoreGenerator;
pub use vertical_core::{FaceGeometry, VerticalCoreGenerator};
pub use z_focus::ZFocusGenerator;
