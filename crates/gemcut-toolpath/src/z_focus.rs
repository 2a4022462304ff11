//! Focus calibration ladder
//!
//! A row of short vertical lines, each burned one `z_spacing` lower than the
//! previous one. The sharpest line tells the operator where focus is.

use crate::generator::CutGenerator;
use gemcut_core::{
    CutList, CutProcess, CutResult, FocusCut, LaserParameters, MachineInstruction, Precision,
    Trigger4,
};
use tracing::debug;

pub struct ZFocusGenerator {
    cut: FocusCut,
    laser: LaserParameters,
    precision: Precision,
}

impl ZFocusGenerator {
    pub fn new(cut: FocusCut, laser: LaserParameters) -> Self {
        Self {
            cut,
            laser,
            precision: Precision::SEGMENT,
        }
    }

    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Number of lines in the ladder
    pub fn iterations(&self) -> usize {
        self.laser.layer_count(self.cut.final_dimension_z)
    }
}

impl CutGenerator for ZFocusGenerator {
    fn process(&self) -> CutProcess {
        CutProcess::ZFocus
    }

    fn trigger(&self) -> Trigger4 {
        self.laser.trigger
    }

    fn body(&self) -> CutResult<CutList> {
        self.laser.validate()?;

        let iterations = self.iterations();
        let half_y = self.cut.final_dimension_y / 2.0;
        debug!("Focus ladder: {} lines of length {}", iterations, self.cut.final_dimension_y);

        let mut cutlist = CutList::with_capacity(3 * iterations + 1);
        cutlist.push(MachineInstruction::ZAbs(0.0));
        for step in 0..iterations {
            let x = step as f64 * self.laser.xy_spacing;
            cutlist.push(MachineInstruction::jump(x, half_y, self.precision));
            cutlist.push(MachineInstruction::mark(x, -half_y, self.precision));
            cutlist.push(MachineInstruction::ZRel(-self.laser.z_spacing));
        }
        Ok(cutlist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn laser() -> LaserParameters {
        LaserParameters {
            jump_speed: 10.0,
            mark_speed: 5.0,
            kerf_angle: 2.0,
            xy_spacing: 0.25,
            z_spacing: 0.1,
            z_final_overshoot: 0.0,
            refraction: 1.0,
            trigger: Trigger4::default(),
        }
    }

    #[test]
    fn test_ladder_layout() {
        let cut = FocusCut {
            final_dimension_y: 2.0,
            final_dimension_z: 0.35,
        };
        let cutlist = ZFocusGenerator::new(cut, laser()).generate().unwrap();
        let records = cutlist.to_records();

        assert_eq!(records[1], vec!["z_abs", "0"]);
        assert_eq!(records[2], vec!["jump", "0.000000", "1.000000"]);
        assert_eq!(records[3], vec!["mark", "0.000000", "-1.000000"]);
        assert_eq!(records[4], vec!["z_rel", "-0.1"]);
        assert_eq!(records[5], vec!["jump", "0.250000", "1.000000"]);
        assert_eq!(
            cutlist.count_where(|i| matches!(i, MachineInstruction::ZRel(_))),
            3
        );
        assert!(cutlist.is_bracketed());
    }

    #[test]
    fn test_shallow_ladder_is_empty() {
        let cut = FocusCut {
            final_dimension_y: 2.0,
            final_dimension_z: 0.05,
        };
        let body = ZFocusGenerator::new(cut, laser()).body().unwrap();
        assert_eq!(body.instructions(), &[MachineInstruction::ZAbs(0.0)]);
    }
}
