//! Cutlist replay
//!
//! Reconstructs where each move lands on the block. The walk tracks the
//! a, c and z axes as an [`AxisState`] value. Every jump or mark target is
//! lifted to `(x, y, z)` and, when the block is tilted or spun, rotated back
//! into block coordinates: by `-a` about X, then by `-c` about Z.
//!
//! Each absolute z move starts a new cut, so separate faces of a composite
//! program can be told apart.

use gemcut_core::{AxisState, CutList, MachineInstruction};
use glam::{DMat3, DVec3};
use serde::Serialize;
use tracing::{debug, warn};

/// Beam state of a replayed move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Motion {
    Jump,
    Mark,
}

/// One jump or mark target in block coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReplayPoint {
    #[serde(serialize_with = "serialize_vec3")]
    pub position: DVec3,
    pub motion: Motion,
    /// Number of absolute z moves seen before this point
    pub cut_index: usize,
    /// Axis state the move was executed in
    pub axes: AxisState,
}

fn serialize_vec3<S: serde::Serializer>(v: &DVec3, serializer: S) -> Result<S::Ok, S::Error> {
    v.to_array().serialize(serializer)
}

/// Rotation from machine to block coordinates for the given axes
pub fn block_rotation(axes: &AxisState) -> DMat3 {
    let tilt = DMat3::from_rotation_x(-axes.a.to_radians());
    let spin = DMat3::from_rotation_z(-axes.c.to_radians());
    spin * tilt
}

/// Replayed program
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Replay {
    points: Vec<ReplayPoint>,
    cuts: usize,
    end: AxisState,
}

impl Replay {
    /// Walk a program from zeroed axes
    pub fn new(cutlist: &CutList) -> Self {
        Self::from_instructions(cutlist)
    }

    pub fn from_instructions<'a>(
        instructions: impl IntoIterator<Item = &'a MachineInstruction>,
    ) -> Self {
        let mut replay = Self::default();
        let mut axes = AxisState::default();
        for instruction in instructions {
            let motion = match instruction {
                MachineInstruction::Jump(_) => Some(Motion::Jump),
                MachineInstruction::Mark(_) => Some(Motion::Mark),
                MachineInstruction::ZAbs(_) => {
                    replay.cuts += 1;
                    None
                }
                _ => None,
            };

            if let (Some(motion), Some(c)) = (motion, instruction.coordinate()) {
                let mut position = DVec3::new(c.x, c.y, axes.z);
                if axes.is_rotated() {
                    position = block_rotation(&axes) * position;
                }
                replay.points.push(ReplayPoint {
                    position,
                    motion,
                    cut_index: replay.cuts,
                    axes,
                });
            }
            axes = axes.apply(instruction);
        }
        replay.end = axes;
        debug!(
            "Replayed {} points over {} cuts",
            replay.points.len(),
            replay.cuts
        );
        replay
    }

    /// Replay raw wire records, skipping any that do not decode
    pub fn from_records<R, S>(records: &[R]) -> Self
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let instructions: Vec<MachineInstruction> = records
            .iter()
            .enumerate()
            .filter_map(
                |(index, record)| match MachineInstruction::from_record(record.as_ref()) {
                    Ok(instruction) => Some(instruction),
                    Err(e) => {
                        warn!("Skipping record {}: {}", index, e);
                        None
                    }
                },
            )
            .collect();
        Self::from_instructions(&instructions)
    }

    pub fn points(&self) -> &[ReplayPoint] {
        &self.points
    }

    /// Points burned with the beam on
    pub fn marks(&self) -> impl Iterator<Item = &ReplayPoint> {
        self.points.iter().filter(|p| p.motion == Motion::Mark)
    }

    /// Number of cuts, counted by absolute z moves
    pub fn cut_count(&self) -> usize {
        self.cuts
    }

    /// Axis state after the last instruction
    pub fn final_axes(&self) -> AxisState {
        self.end
    }

    /// Axis-aligned bounds of every replayed point
    pub fn bounds(&self) -> Option<(DVec3, DVec3)> {
        let mut points = self.points.iter().map(|p| p.position);
        let first = points.next()?;
        Some(points.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }
}
