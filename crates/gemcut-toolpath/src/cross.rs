//! Cross alignment pattern
//!
//! Four nested crosses of growing arm length, spun 90 degrees apart. Used to
//! check that the scanner and the c axis share a centre.

use crate::generator::CutGenerator;
use gemcut_core::{CutList, CutProcess, CutResult, MachineInstruction, Precision, Trigger4};

const ARMS: u32 = 4;

pub struct CrossGenerator {
    trigger: Trigger4,
    precision: Precision,
}

impl CrossGenerator {
    pub fn new(trigger: Trigger4) -> Self {
        Self {
            trigger,
            precision: Precision::Full,
        }
    }

    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }
}

impl Default for CrossGenerator {
    fn default() -> Self {
        Self::new(Trigger4::default())
    }
}

impl CutGenerator for CrossGenerator {
    fn process(&self) -> CutProcess {
        CutProcess::Cross
    }

    fn trigger(&self) -> Trigger4 {
        self.trigger
    }

    fn body(&self) -> CutResult<CutList> {
        let p = self.precision;
        let mut cutlist = CutList::with_capacity(5 * ARMS as usize);
        for i in 1..=ARMS {
            let arm = f64::from(i) / f64::from(ARMS);
            cutlist.push(MachineInstruction::jump(0.0, arm, p));
            cutlist.push(MachineInstruction::mark(0.0, -arm, p));
            cutlist.push(MachineInstruction::jump(arm, 0.0, p));
            cutlist.push(MachineInstruction::mark(-arm, 0.0, p));
            if i < ARMS {
                cutlist.push(MachineInstruction::CRel(90.0));
            }
        }
        Ok(cutlist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_records() {
        let cutlist = CrossGenerator::default().generate().unwrap();
        assert!(cutlist.is_bracketed());
        assert_eq!(cutlist.len(), 2 + 16 + 3);

        let records = cutlist.to_records();
        assert_eq!(records[1], vec!["jump", "0", "0.25"]);
        assert_eq!(records[2], vec!["mark", "0", "-0.25"]);
        assert_eq!(records[5], vec!["c_rel", "90"]);
        assert_eq!(records[19], vec!["mark", "-1", "0"]);
    }
}
