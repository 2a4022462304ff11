//! Machine axis state
//!
//! The rotational (a, c) and vertical (z) axes are never held in shared
//! mutable state. A program's effect on them is computed by folding
//! [`AxisState::apply`] over its instructions.

use crate::instruction::MachineInstruction;
use serde::{Deserialize, Serialize};

/// Position of the tilt (a), spin (c) and vertical (z) axes
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisState {
    /// Tilt in degrees
    pub a: f64,
    /// Spin in degrees
    pub c: f64,
    /// Vertical position
    pub z: f64,
}

impl AxisState {
    pub fn new(a: f64, c: f64, z: f64) -> Self {
        Self { a, c, z }
    }

    /// State after executing one instruction
    pub fn apply(self, instruction: &MachineInstruction) -> Self {
        match *instruction {
            MachineInstruction::ZAbs(z) => Self { z, ..self },
            MachineInstruction::ZRel(dz) | MachineInstruction::ZStep(dz) => Self {
                z: self.z + dz,
                ..self
            },
            MachineInstruction::CAbs(c) => Self { c, ..self },
            MachineInstruction::CRel(dc) => Self {
                c: self.c + dc,
                ..self
            },
            MachineInstruction::AAbs(a) => Self { a, ..self },
            MachineInstruction::ARel(da) => Self {
                a: self.a + da,
                ..self
            },
            MachineInstruction::Jump(_)
            | MachineInstruction::Mark(_)
            | MachineInstruction::SetTrigger4(_)
            | MachineInstruction::StopTrigger => self,
        }
    }

    /// True when either rotary axis is away from zero
    pub fn is_rotated(&self) -> bool {
        self.a != 0.0 || self.c != 0.0
    }
}
