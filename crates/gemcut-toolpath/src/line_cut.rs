//! Line cut generator
//!
//! Rasters a straight cut of a given depth. Every layer steps down by
//! `z_spacing` and fills a lateral window with parallel passes spaced by
//! `xy_spacing`. The window starts at twice the kerf widening over the full
//! depth and narrows by one layer of taper after every layer, while the
//! passes themselves drift sideways by the same taper.

use crate::generator::CutGenerator;
use crate::geometry::{Segment, Vec2};
use gemcut_core::{
    CutList, CutProcess, CutResult, LaserParameters, LineCut, MachineInstruction, Precision,
    Trigger4,
};
use tracing::debug;

pub struct LineCutGenerator {
    segment: Segment,
    depth: f64,
    laser: LaserParameters,
    precision: Precision,
}

impl LineCutGenerator {
    /// Cut of `depth` along `segment`
    pub fn new(segment: Segment, depth: f64, laser: LaserParameters) -> Self {
        Self {
            segment,
            depth,
            laser,
            precision: Precision::SEGMENT,
        }
    }

    /// Line cut as requested in a configuration, overshoot included
    pub fn from_cut(cut: &LineCut, laser: LaserParameters) -> Self {
        Self::new(
            Segment::new(cut.x1, cut.y1, cut.x2, cut.y2),
            cut.final_dimension_z + laser.z_final_overshoot,
            laser,
        )
    }

    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    pub fn depth(&self) -> f64 {
        self.depth
    }

    pub fn layers(&self) -> usize {
        self.laser.layer_count(self.depth)
    }

    /// Lateral window available to each layer, top to bottom
    pub fn layer_windows(&self) -> Vec<f64> {
        let taper = self.laser.layer_taper();
        let initial = 2.0 * self.laser.half_kerf_angle().tan() * self.depth;
        (0..self.layers())
            .map(|layer| initial - layer as f64 * taper)
            .collect()
    }
}

impl CutGenerator for LineCutGenerator {
    fn process(&self) -> CutProcess {
        CutProcess::Line
    }

    fn trigger(&self) -> Trigger4 {
        self.laser.trigger
    }

    fn body(&self) -> CutResult<CutList> {
        self.laser.validate()?;

        let taper = self.laser.layer_taper();
        let spacing = self.laser.xy_spacing;
        let taper_step = self.segment.offset(taper)?;
        let pass_step = self.segment.offset(spacing)?;
        let windows = self.layer_windows();

        debug!(
            "Line cut: {} layers over depth {:.4}, taper {:.6}",
            windows.len(),
            self.depth,
            taper
        );

        let mut cutlist = CutList::new();
        for (layer, window) in windows.into_iter().enumerate() {
            cutlist.push(MachineInstruction::ZStep(-self.laser.z_spacing));

            let shift = layer as f64 * taper;
            let layer_start = self.segment.translated(taper_step * layer as f64);
            let mut pass = 0usize;
            while shift + pass as f64 * spacing < window {
                let line = layer_start.translated(pass_step * pass as f64);
                let (from, to) = if pass % 2 == 0 {
                    (line.start, line.end)
                } else {
                    (line.end, line.start)
                };
                cutlist.push(self.jump(from));
                cutlist.push(self.mark(to));
                pass += 1;
            }
        }

        Ok(cutlist)
    }
}

impl LineCutGenerator {
    fn jump(&self, at: Vec2) -> MachineInstruction {
        MachineInstruction::jump(at.x, at.y, self.precision)
    }

    fn mark(&self, at: Vec2) -> MachineInstruction {
        MachineInstruction::mark(at.x, at.y, self.precision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn laser(kerf_angle: f64) -> LaserParameters {
        LaserParameters {
            jump_speed: 1.0,
            mark_speed: 1.0,
            kerf_angle,
            xy_spacing: 0.05,
            z_spacing: 0.5,
            z_final_overshoot: 0.0,
            refraction: 1.0,
            trigger: Trigger4::default(),
        }
    }

    #[test]
    fn test_first_pass_follows_segment() {
        let generator = LineCutGenerator::new(Segment::new(0.0, 0.0, 10.0, 0.0), 1.0, laser(10.0));
        let cutlist = generator.body().unwrap();
        let instructions = cutlist.instructions();
        assert_eq!(instructions[0], MachineInstruction::ZStep(-0.5));
        assert_eq!(
            instructions[1],
            MachineInstruction::jump(0.0, 0.0, Precision::SEGMENT)
        );
        assert_eq!(
            instructions[2],
            MachineInstruction::mark(10.0, 0.0, Precision::SEGMENT)
        );
        // Second pass runs backwards, one spacing below
        assert!(instructions[3].approx_eq(
            &MachineInstruction::jump(10.0, -0.05, Precision::SEGMENT),
            1e-12
        ));
        assert!(instructions[4].approx_eq(
            &MachineInstruction::mark(0.0, -0.05, Precision::SEGMENT),
            1e-12
        ));
    }

    #[test]
    fn test_passes_stay_inside_window() {
        let params = laser(10.0);
        let generator = LineCutGenerator::new(Segment::new(0.0, 0.0, 10.0, 0.0), 2.0, params);
        let windows = generator.layer_windows();
        let cutlist = generator.body().unwrap();

        let mut layer = None;
        for instruction in cutlist.iter() {
            match instruction {
                MachineInstruction::ZStep(_) => layer = Some(layer.map_or(0, |l| l + 1)),
                MachineInstruction::Jump(c) | MachineInstruction::Mark(c) => {
                    let layer = layer.unwrap();
                    assert!(-c.y < windows[layer] + 1e-9, "pass at {} exceeds layer {layer}", c.y);
                }
                _ => {}
            }
        }
    }

    #[test]
    fn test_windows_shrink_by_taper() {
        let params = laser(6.0);
        let generator = LineCutGenerator::new(Segment::new(0.0, 0.0, 0.0, 4.0), 3.0, params);
        let windows = generator.layer_windows();
        assert_eq!(windows.len(), 6);
        for pair in windows.windows(2) {
            assert!((pair[0] - pair[1] - params.layer_taper()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_overshoot_added_from_configuration() {
        let mut params = laser(0.0);
        params.z_final_overshoot = 0.5;
        let cut = LineCut {
            x1: 0.0,
            y1: 0.0,
            x2: 1.0,
            y2: 1.0,
            final_dimension_z: 1.0,
        };
        let generator = LineCutGenerator::from_cut(&cut, params);
        assert_eq!(generator.depth(), 1.5);
        assert_eq!(generator.layers(), 3);
    }

    #[test]
    fn test_degenerate_segment_fails() {
        let generator = LineCutGenerator::new(Segment::new(1.0, 1.0, 1.0, 1.0), 1.0, laser(3.0));
        assert!(generator.generate().is_err());
    }
}
