//! Stacked multi-seed generator
//!
//! Cuts a stack of pyramid-topped seeds out of one block. The block is
//! tilted past horizontal so the beam reaches the side faces, then every
//! seed is sliced from four sides with the pyramid-slice primitive. After
//! each seed the working position moves one seed height along the block.
//!
//! Non-square seeds get an independent slice geometry per axis.

use crate::generator::CutGenerator;
use crate::pyramid_slice::PyramidSlice;
use crate::vertical_core::VerticalCoreGenerator;
use gemcut_core::{
    BlockGeometry, Count, CutError, CutList, CutProcess, CutResult, Excess, LaserParameters,
    MachineInstruction, Precision, StackedSeedCut, Trigger4,
};
use tracing::{debug, warn};

/// Slice geometry along one axis of the seed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceGeometry {
    /// Angle of the pyramid face against the base, in radians
    pub pyramid_angle: f64,
    /// Height consumed by the pyramid and the gap above it
    pub gap: f64,
    /// Height of one seed including its gap
    pub unit: f64,
    /// Seeds that fit in the block thickness
    pub max_slices: usize,
    /// Start of the slice window in tilted coordinates
    pub x0: f64,
    /// End of the slice window in tilted coordinates
    pub x1: f64,
    /// z of the first slice
    pub z0: f64,
    pub taper_x: f64,
    pub taper_y: f64,
    pub layers: usize,
}

pub struct OssStackedGenerator {
    block: BlockGeometry,
    cut: StackedSeedCut,
    laser: LaserParameters,
    precision: Precision,
}

impl OssStackedGenerator {
    pub fn new(block: BlockGeometry, cut: StackedSeedCut, laser: LaserParameters) -> Self {
        Self {
            block,
            cut,
            laser,
            precision: Precision::SEGMENT,
        }
    }

    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Geometry of a face whose pyramid slope spans `half_extent`
    ///
    /// Pass shortening is spread over the layers of this face but always
    /// starts from half of `final_dimension_x`, for both axes.
    pub fn slice_geometry(&self, half_extent: f64) -> SliceGeometry {
        let cut = &self.cut;
        let angle = self.laser.half_kerf_angle();
        let h = half_extent;

        let pyramid_angle = (cut.pyramid_height / h).atan();
        let gap = pyramid_angle.tan() * h + cut.gap_size;
        let unit = gap + cut.base_height;
        let max_slices = whole(self.block.thickness / unit);

        let side = match cut.excess {
            Excess::Top => unit * max_slices as f64 - cut.pyramid_height,
            Excess::Bottom => self.block.thickness - cut.pyramid_height,
        };
        let diagonal = side.hypot(h);
        let theta = (side / h).atan();
        let z0 = (theta + angle).cos() * diagonal;
        let x1 = (theta + angle).sin() * diagonal;
        let x0 = x1 + gap / angle.cos();

        let max_depth =
            cut.pyramid_height / pyramid_angle.sin() * angle.cos() * self.laser.refraction;
        let max_layers = (max_depth / self.laser.z_spacing).ceil().max(1.0) as usize;
        let layers = match cut.layers {
            Count::Max => max_layers + 1,
            Count::Exactly(n) => n as usize,
        };

        let refracted = (pyramid_angle.tan() / self.laser.refraction).atan();
        SliceGeometry {
            pyramid_angle,
            gap,
            unit,
            max_slices,
            x0,
            x1,
            z0,
            taper_x: cut.final_dimension_x / 2.0 / max_layers as f64,
            taper_y: (refracted - angle).tan() * self.laser.z_spacing,
            layers,
        }
    }

    /// Geometry for the faces cut across y and across x
    pub fn axis_geometries(&self) -> (SliceGeometry, SliceGeometry) {
        let half_x = self.cut.final_dimension_x / 2.0;
        let half_y = self.cut.final_dimension_y / 2.0;
        (
            self.slice_geometry(half_x),
            self.slice_geometry(half_y),
        )
    }

    /// Reject seeds whose pyramid is steeper than the beam can follow
    pub fn check_feasible(&self) -> CutResult<()> {
        let angle = self.laser.half_kerf_angle();
        let (gx, gy) = self.axis_geometries();
        for geometry in [gx, gy] {
            if geometry.pyramid_angle < angle {
                return Err(CutError::InfeasibleCut {
                    pyramid_angle_deg: geometry.pyramid_angle.to_degrees(),
                    kerf_half_angle_deg: angle.to_degrees(),
                });
            }
        }
        Ok(())
    }

    pub fn slice_count(&self) -> usize {
        let (gx, _) = self.axis_geometries();
        match self.cut.num_of_seeds {
            Count::Max => gx.max_slices,
            Count::Exactly(n) => n as usize + 1,
        }
    }

    fn face(&self, x1: f64, y1: f64, x2: f64, y2: f64, geometry: &SliceGeometry) -> PyramidSlice {
        PyramidSlice {
            x1,
            y1,
            x2,
            y2,
            spacing: self.laser.xy_spacing,
            z_step: self.laser.z_spacing,
            taper_x: geometry.taper_x,
            taper_y: geometry.taper_y,
            taper_straight: self.laser.layer_taper(),
            layers: geometry.layers,
            precision: self.precision,
        }
    }
}

impl CutGenerator for OssStackedGenerator {
    fn process(&self) -> CutProcess {
        CutProcess::OssStacked
    }

    fn trigger(&self) -> Trigger4 {
        self.laser.trigger
    }

    fn body(&self) -> CutResult<CutList> {
        self.laser.validate()?;
        self.block.validate()?;
        self.check_feasible()?;

        let angle = self.laser.half_kerf_angle();
        let (sin, cos) = angle.sin_cos();
        let (mut gx, mut gy) = self.axis_geometries();
        let slices = self.slice_count();
        if slices == 0 {
            warn!(
                "Block thickness {} holds no seed of height {:.4}",
                self.block.thickness, gx.unit
            );
        }
        debug!(
            "Stacked seeds: {} slices, layers {}/{}, pyramid angles {:.3}/{:.3} deg",
            slices,
            gx.layers,
            gy.layers,
            gx.pyramid_angle.to_degrees(),
            gy.pyramid_angle.to_degrees()
        );

        let mut cutlist = if self.cut.core {
            VerticalCoreGenerator::new(self.block, self.cut.core_dimensions(), self.laser)
                .with_precision(self.precision)
                .body()?
        } else {
            CutList::new()
        };

        let b = &self.block;
        let rotation = b.physical_rotation;
        let half_x = self.cut.final_dimension_x / 2.0;
        let half_y = self.cut.final_dimension_y / 2.0;
        let x_delta = sin * b.origin_x;
        let y_delta = sin * b.origin_y;
        let z1_delta = cos * b.origin_x;
        let z2_delta = cos * b.origin_y;
        let z_shift = gx.unit * sin;
        let x_shift = gx.unit * cos;

        cutlist.push(MachineInstruction::AAbs(-(90.0 + angle.to_degrees())));
        cutlist.push(MachineInstruction::CAbs(rotation));
        cutlist.push(MachineInstruction::ZAbs(gx.z0 + z2_delta));

        for _ in 0..slices {
            let faces = [
                self.face(
                    half_y - b.origin_x,
                    gx.x0 + y_delta,
                    -half_y - b.origin_x,
                    gx.x1 + y_delta,
                    &gx,
                ),
                self.face(
                    half_x + b.origin_y,
                    gy.x0 + x_delta,
                    -half_x + b.origin_y,
                    gy.x1 + x_delta,
                    &gy,
                ),
                self.face(
                    half_y + b.origin_x,
                    gx.x0 - y_delta,
                    -half_y + b.origin_x,
                    gx.x1 - y_delta,
                    &gx,
                ),
                self.face(
                    half_x - b.origin_y,
                    gy.x0 - x_delta,
                    -half_x - b.origin_y,
                    gy.x1 - x_delta,
                    &gy,
                ),
            ];
            let repositions = [
                gy.z0 + z1_delta,
                gx.z0 - z2_delta,
                gy.z0 - z1_delta,
            ];

            for (index, face) in faces.iter().enumerate() {
                if index > 0 {
                    cutlist.push(MachineInstruction::ZAbs(repositions[index - 1]));
                    cutlist.push(MachineInstruction::CAbs(rotation + 90.0 * index as f64));
                }
                cutlist.append(face.cutlist()?);
            }

            gx.z0 += z_shift;
            gy.z0 += z_shift;
            gx.x0 -= x_shift;
            gx.x1 -= x_shift;
            gy.x0 -= x_shift;
            gy.x1 -= x_shift;
            cutlist.push(MachineInstruction::CAbs(rotation));
            cutlist.push(MachineInstruction::ZAbs(gx.z0 + z2_delta));
        }

        Ok(cutlist)
    }
}

/// Floor of a ratio as a count; zero when the ratio is not a positive number
fn whole(ratio: f64) -> usize {
    if ratio.is_finite() && ratio > 0.0 {
        ratio.floor() as usize
    } else {
        0
    }
}
