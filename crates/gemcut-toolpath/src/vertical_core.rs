//! Vertical core generator
//!
//! Removes the material around a rectangular core one face at a time. The
//! block is tilted by the kerf half-angle so that the edge of the beam cone
//! runs parallel to the core wall, each face is cut with the line-cut
//! raster, and the block spins 90 degrees between faces.

use crate::generator::CutGenerator;
use crate::geometry::Segment;
use crate::line_cut::LineCutGenerator;
use gemcut_core::{
    BlockGeometry, CoreCut, CutList, CutProcess, CutResult, LaserParameters, MachineInstruction,
    Precision, Trigger4,
};
use tracing::debug;

/// Derived tilt geometry of the four faces
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceGeometry {
    /// Tilt angle in radians
    pub angle: f64,
    /// Starting z of each face, in cutting order
    pub z_start: [f64; 4],
    /// Raster start offset for faces across the length
    pub y_start_length: f64,
    /// Raster start offset for faces across the width
    pub y_start_width: f64,
    /// Compensated depth of every face cut
    pub depth: f64,
}

pub struct VerticalCoreGenerator {
    block: BlockGeometry,
    cut: CoreCut,
    laser: LaserParameters,
    precision: Precision,
}

impl VerticalCoreGenerator {
    pub fn new(block: BlockGeometry, cut: CoreCut, laser: LaserParameters) -> Self {
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

    pub fn geometry(&self) -> FaceGeometry {
        let b = &self.block;
        let half_x = self.cut.final_dimension_x / 2.0;
        let half_y = self.cut.final_dimension_y / 2.0;
        let angle = self.laser.half_kerf_angle();
        let (sin, cos) = angle.sin_cos();
        let through = b.thickness + self.laser.z_final_overshoot;
        let u = (2.0 * angle).tan() * through;

        let z_at = |extent: f64| b.thickness * cos + sin * (extent + u);
        let y_start = |half: f64| (u + half) * cos - b.thickness * sin - u / cos;

        FaceGeometry {
            angle,
            z_start: [
                z_at(half_y - b.origin_y),
                z_at(half_x + b.origin_x),
                z_at(half_y + b.origin_y),
                z_at(half_x - b.origin_x),
            ],
            y_start_length: y_start(half_y),
            y_start_width: y_start(half_x),
            depth: through * cos / (2.0 * angle).cos(),
        }
    }

    /// Raster segment of each face, in cutting order
    pub fn faces(&self, geometry: &FaceGeometry) -> [Segment; 4] {
        let b = &self.block;
        let (ox, oy) = (b.origin_x, b.origin_y);
        let half_w = b.width / 2.0;
        let half_l = b.length / 2.0;
        let ysl = geometry.y_start_length;
        let ysw = geometry.y_start_width;
        [
            Segment::new(half_w - ox, ysl - oy, -half_w - ox, ysl - oy),
            Segment::new(half_l + oy, ysw - ox, -half_l + oy, ysw - ox),
            Segment::new(half_w + ox, ysl + oy, -half_w + ox, ysl + oy),
            Segment::new(half_l - oy, ysw + ox, -half_l - oy, ysw + ox),
        ]
    }
}

impl CutGenerator for VerticalCoreGenerator {
    fn process(&self) -> CutProcess {
        CutProcess::VerticalCore
    }

    fn trigger(&self) -> Trigger4 {
        self.laser.trigger
    }

    fn body(&self) -> CutResult<CutList> {
        self.laser.validate()?;
        self.block.validate()?;

        let geometry = self.geometry();
        debug!(
            "Vertical core: tilt {:.4} deg, face depth {:.6}, z starts {:?}",
            geometry.angle.to_degrees(),
            geometry.depth,
            geometry.z_start
        );

        let mut cutlist = CutList::new();
        cutlist.push(MachineInstruction::AAbs(geometry.angle.to_degrees()));
        cutlist.push(MachineInstruction::CAbs(self.block.physical_rotation));

        for (index, (face, z_start)) in self
            .faces(&geometry)
            .into_iter()
            .zip(geometry.z_start)
            .enumerate()
        {
            if index > 0 {
                cutlist.push(MachineInstruction::CRel(90.0));
            }
            cutlist.push(MachineInstruction::ZAbs(z_start));
            let raster = LineCutGenerator::new(face, geometry.depth, self.laser)
                .with_precision(self.precision);
            cutlist.append(raster.body()?);
        }

        Ok(cutlist)
    }
}
