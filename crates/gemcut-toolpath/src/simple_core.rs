//! Simple core generator
//!
//! Frees a rectangular core by running closed racetrack contours around it,
//! all four sides per pass, before stepping down to the next layer. The core
//! drops out of the block once the last layer is through.

use crate::generator::CutGenerator;
use gemcut_core::{
    BlockGeometry, CoreCut, CutList, CutProcess, CutResult, LaserParameters, MachineInstruction,
    Precision, Trigger4,
};
use tracing::debug;

pub struct SimpleCoreGenerator {
    block: BlockGeometry,
    cut: CoreCut,
    laser: LaserParameters,
    precision: Precision,
}

impl SimpleCoreGenerator {
    pub fn new(block: BlockGeometry, cut: CoreCut, laser: LaserParameters) -> Self {
        Self {
            block,
            cut,
            laser,
            precision: Precision::Full,
        }
    }

    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    pub fn layers(&self) -> usize {
        self.laser.layer_count(self.block.thickness)
    }

    /// Outward growth allowed per layer, top to bottom
    pub fn layer_windows(&self) -> Vec<f64> {
        let taper = self.laser.layer_taper();
        let depth = self.block.thickness + self.laser.z_final_overshoot;
        let initial = 2.0 * self.laser.half_kerf_angle().tan() * depth;
        (0..self.layers())
            .map(|layer| initial - layer as f64 * taper)
            .collect()
    }

    fn contour(&self, cutlist: &mut CutList, half_x: f64, half_y: f64) {
        let ox = self.block.origin_x;
        let oy = self.block.origin_y;
        let p = self.precision;
        cutlist.push(MachineInstruction::jump(half_x + ox, half_y + oy, p));
        cutlist.push(MachineInstruction::mark(half_x + ox, -half_y + oy, p));
        cutlist.push(MachineInstruction::mark(-half_x + ox, -half_y + oy, p));
        cutlist.push(MachineInstruction::mark(-half_x + ox, half_y + oy, p));
        cutlist.push(MachineInstruction::mark(half_x + ox, half_y + oy, p));
    }
}

impl CutGenerator for SimpleCoreGenerator {
    fn process(&self) -> CutProcess {
        CutProcess::SimpleCore
    }

    fn trigger(&self) -> Trigger4 {
        self.laser.trigger
    }

    fn body(&self) -> CutResult<CutList> {
        self.laser.validate()?;
        self.block.validate()?;

        let taper = self.laser.layer_taper();
        let spacing = self.laser.xy_spacing;
        let windows = self.layer_windows();
        debug!(
            "Simple core {}x{}: {} layers, initial window {:.6}",
            self.cut.final_dimension_x,
            self.cut.final_dimension_y,
            windows.len(),
            windows.first().copied().unwrap_or_default()
        );

        let mut cutlist = CutList::new();
        cutlist.push(MachineInstruction::AAbs(0.0));
        cutlist.push(MachineInstruction::CAbs(self.block.physical_rotation));
        cutlist.push(MachineInstruction::ZAbs(self.block.thickness));

        for (layer, window) in windows.into_iter().enumerate() {
            let shift = layer as f64 * taper;
            let mut pass = 0usize;
            loop {
                let growth = shift + pass as f64 * spacing;
                if growth >= window {
                    break;
                }
                self.contour(
                    &mut cutlist,
                    self.cut.final_dimension_x / 2.0 + growth,
                    self.cut.final_dimension_y / 2.0 + growth,
                );
                pass += 1;
            }
            cutlist.push(MachineInstruction::ZStep(-self.laser.z_spacing));
        }

        Ok(cutlist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block() -> BlockGeometry {
        BlockGeometry {
            thickness: 1.0,
            width: 10.0,
            length: 10.0,
            origin_x: 1.0,
            origin_y: -2.0,
            physical_rotation: 15.0,
        }
    }

    fn laser() -> LaserParameters {
        LaserParameters {
            jump_speed: 100.0,
            mark_speed: 10.0,
            kerf_angle: 20.0,
            xy_spacing: 0.1,
            z_spacing: 0.25,
            z_final_overshoot: 0.25,
            refraction: 1.0,
            trigger: Trigger4::default(),
        }
    }

    fn core() -> CoreCut {
        CoreCut {
            final_dimension_x: 4.0,
            final_dimension_y: 2.0,
        }
    }

    #[test]
    fn test_setup_and_layers() {
        let cutlist = SimpleCoreGenerator::new(block(), core(), laser())
            .body()
            .unwrap();
        let head = &cutlist.instructions()[..3];
        assert_eq!(
            head,
            &[
                MachineInstruction::AAbs(0.0),
                MachineInstruction::CAbs(15.0),
                MachineInstruction::ZAbs(1.0),
            ]
        );
        assert_eq!(
            cutlist.count_where(|i| matches!(i, MachineInstruction::ZStep(_))),
            4
        );
        assert_eq!(cutlist.last(), Some(&MachineInstruction::ZStep(-0.25)));
    }

    #[test]
    fn test_contour_closes_around_origin() {
        let cutlist = SimpleCoreGenerator::new(block(), core(), laser())
            .body()
            .unwrap();
        let contour = &cutlist.instructions()[3..8];
        assert_eq!(contour[0], MachineInstruction::jump(3.0, -1.0, Precision::Full));
        assert_eq!(contour[1], MachineInstruction::mark(3.0, -3.0, Precision::Full));
        assert_eq!(contour[2], MachineInstruction::mark(-1.0, -3.0, Precision::Full));
        assert_eq!(contour[3], MachineInstruction::mark(-1.0, -1.0, Precision::Full));
        assert_eq!(contour[4], MachineInstruction::mark(3.0, -1.0, Precision::Full));
    }

    #[test]
    fn test_windows_non_increasing() {
        let windows = SimpleCoreGenerator::new(block(), core(), laser()).layer_windows();
        assert_eq!(windows.len(), 4);
        assert!(windows.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn test_zero_kerf_emits_only_steps() {
        let mut params = laser();
        params.kerf_angle = 0.0;
        let cutlist = SimpleCoreGenerator::new(block(), core(), params)
            .body()
            .unwrap();
        assert_eq!(cutlist.count_where(|i| i.is_motion()), 0);
        assert_eq!(cutlist.len(), 3 + 4);
    }
}
