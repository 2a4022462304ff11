//! Machine instruction model and wire format
//!
//! A cutlist is an ordered sequence of [`MachineInstruction`]s. On the wire
//! every instruction is a record whose first element is the instruction tag
//! followed by stringified numeric arguments, e.g. `["jump", "1.000000", "-0.500000"]`.
//!
//! Jump and mark coordinates carry the [`Precision`] chosen by the generator
//! that emitted them. Axis, z and trigger arguments always use the shortest
//! representation that parses back to the same `f64`.

use crate::axis::AxisState;
use crate::error::{WireError, WireResult};
use serde::de::{self, Deserializer};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Formatting applied to jump/mark coordinates on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// Fixed number of decimal digits
    Fixed(usize),
    /// Shortest representation that round-trips exactly
    Full,
}

impl Precision {
    /// Six fixed decimals, used by segment-based generators
    pub const SEGMENT: Precision = Precision::Fixed(6);

    /// Render a value with this precision
    pub fn format(self, value: f64) -> String {
        match self {
            Precision::Fixed(digits) => format!("{:.*}", digits, value),
            Precision::Full => format!("{}", value),
        }
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::SEGMENT
    }
}

/// Planar target of a jump or mark move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub precision: Precision,
}

impl Coordinate {
    pub fn new(x: f64, y: f64, precision: Precision) -> Self {
        Self { x, y, precision }
    }

    /// Euclidean distance to another coordinate
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }
}

/// Arguments of the `set_trigger4` controller command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger4(pub [u32; 5]);

impl Default for Trigger4 {
    fn default() -> Self {
        Self([1, 0, 7, 8, 45])
    }
}

/// One motion or state command for the laser controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MachineInstruction {
    /// Move with the beam off
    Jump(Coordinate),
    /// Move with the beam on
    Mark(Coordinate),
    /// Absolute z position
    ZAbs(f64),
    /// Relative z move
    ZRel(f64),
    /// Relative z move between raster layers
    ZStep(f64),
    /// Absolute spin (c axis) in degrees
    CAbs(f64),
    /// Relative spin in degrees
    CRel(f64),
    /// Absolute tilt (a axis) in degrees
    AAbs(f64),
    /// Relative tilt in degrees
    ARel(f64),
    /// Arm the laser trigger
    SetTrigger4(Trigger4),
    /// Disarm the laser trigger
    StopTrigger,
}

impl MachineInstruction {
    pub fn jump(x: f64, y: f64, precision: Precision) -> Self {
        Self::Jump(Coordinate::new(x, y, precision))
    }

    pub fn mark(x: f64, y: f64, precision: Precision) -> Self {
        Self::Mark(Coordinate::new(x, y, precision))
    }

    /// Wire tag of this instruction
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Jump(_) => "jump",
            Self::Mark(_) => "mark",
            Self::ZAbs(_) => "z_abs",
            Self::ZRel(_) => "z_rel",
            Self::ZStep(_) => "z_step",
            Self::CAbs(_) => "c_abs",
            Self::CRel(_) => "c_rel",
            Self::AAbs(_) => "a_abs",
            Self::ARel(_) => "a_rel",
            Self::SetTrigger4(_) => "set_trigger4",
            Self::StopTrigger => "stop_trigger",
        }
    }

    /// Target coordinate for jump and mark moves
    pub fn coordinate(&self) -> Option<&Coordinate> {
        match self {
            Self::Jump(c) | Self::Mark(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_motion(&self) -> bool {
        matches!(self, Self::Jump(_) | Self::Mark(_))
    }

    /// Encode as a wire record
    pub fn to_record(&self) -> Vec<String> {
        let mut record = vec![self.tag().to_string()];
        match self {
            Self::Jump(c) | Self::Mark(c) => {
                record.push(c.precision.format(c.x));
                record.push(c.precision.format(c.y));
            }
            Self::ZAbs(v)
            | Self::ZRel(v)
            | Self::ZStep(v)
            | Self::CAbs(v)
            | Self::CRel(v)
            | Self::AAbs(v)
            | Self::ARel(v) => record.push(Precision::Full.format(*v)),
            Self::SetTrigger4(trigger) => {
                record.extend(trigger.0.iter().map(|v| v.to_string()));
            }
            Self::StopTrigger => {}
        }
        record
    }

    /// Decode a wire record
    ///
    /// Coordinates decoded from the wire carry [`Precision::Full`] since the
    /// text already holds every digit that survived encoding.
    pub fn from_record<S: AsRef<str>>(record: &[S]) -> WireResult<Self> {
        let (tag, args) = record.split_first().ok_or(WireError::Empty)?;
        let tag = tag.as_ref().trim();

        let expect = |expected: usize| -> WireResult<()> {
            if args.len() == expected {
                Ok(())
            } else {
                Err(WireError::ArgumentCount {
                    tag: tag.to_string(),
                    expected,
                    found: args.len(),
                })
            }
        };
        let number = |index: usize| -> WireResult<f64> {
            let raw = args[index].as_ref().trim();
            raw.parse::<f64>().map_err(|_| WireError::InvalidNumber {
                tag: tag.to_string(),
                value: raw.to_string(),
            })
        };

        let instruction = match tag {
            "jump" | "mark" => {
                expect(2)?;
                let c = Coordinate::new(number(0)?, number(1)?, Precision::Full);
                if tag == "jump" {
                    Self::Jump(c)
                } else {
                    Self::Mark(c)
                }
            }
            "z_abs" => {
                expect(1)?;
                Self::ZAbs(number(0)?)
            }
            "z_rel" => {
                expect(1)?;
                Self::ZRel(number(0)?)
            }
            "z_step" => {
                expect(1)?;
                Self::ZStep(number(0)?)
            }
            "c_abs" => {
                expect(1)?;
                Self::CAbs(number(0)?)
            }
            "c_rel" => {
                expect(1)?;
                Self::CRel(number(0)?)
            }
            "a_abs" => {
                expect(1)?;
                Self::AAbs(number(0)?)
            }
            "a_rel" => {
                expect(1)?;
                Self::ARel(number(0)?)
            }
            "set_trigger4" => {
                expect(5)?;
                let mut values = [0u32; 5];
                for (slot, raw) in values.iter_mut().zip(args) {
                    let raw = raw.as_ref().trim();
                    *slot = raw.parse::<u32>().map_err(|_| WireError::InvalidNumber {
                        tag: tag.to_string(),
                        value: raw.to_string(),
                    })?;
                }
                Self::SetTrigger4(Trigger4(values))
            }
            "stop_trigger" => {
                expect(0)?;
                Self::StopTrigger
            }
            other => return Err(WireError::UnknownTag(other.to_string())),
        };
        Ok(instruction)
    }

    /// Compare two instructions allowing `tolerance` on every numeric argument
    ///
    /// Coordinate precision is ignored.
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        let close = |a: f64, b: f64| (a - b).abs() <= tolerance;
        match (self, other) {
            (Self::Jump(a), Self::Jump(b)) | (Self::Mark(a), Self::Mark(b)) => {
                close(a.x, b.x) && close(a.y, b.y)
            }
            (Self::ZAbs(a), Self::ZAbs(b))
            | (Self::ZRel(a), Self::ZRel(b))
            | (Self::ZStep(a), Self::ZStep(b))
            | (Self::CAbs(a), Self::CAbs(b))
            | (Self::CRel(a), Self::CRel(b))
            | (Self::AAbs(a), Self::AAbs(b))
            | (Self::ARel(a), Self::ARel(b)) => close(*a, *b),
            (Self::SetTrigger4(a), Self::SetTrigger4(b)) => a == b,
            (Self::StopTrigger, Self::StopTrigger) => true,
            _ => false,
        }
    }
}

impl fmt::Display for MachineInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_record().join(" "))
    }
}

impl Serialize for MachineInstruction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let record = self.to_record();
        let mut seq = serializer.serialize_seq(Some(record.len()))?;
        for field in &record {
            seq.serialize_element(field)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for MachineInstruction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = Vec::<String>::deserialize(deserializer)?;
        MachineInstruction::from_record(&record).map_err(de::Error::custom)
    }
}

/// Ordered machine program
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CutList {
    instructions: Vec<MachineInstruction>,
}

impl CutList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instructions: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, instruction: MachineInstruction) {
        self.instructions.push(instruction);
    }

    /// Append another program after this one
    pub fn append(&mut self, mut other: CutList) {
        self.instructions.append(&mut other.instructions);
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn instructions(&self) -> &[MachineInstruction] {
        &self.instructions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MachineInstruction> {
        self.instructions.iter()
    }

    pub fn first(&self) -> Option<&MachineInstruction> {
        self.instructions.first()
    }

    pub fn last(&self) -> Option<&MachineInstruction> {
        self.instructions.last()
    }

    pub fn into_inner(self) -> Vec<MachineInstruction> {
        self.instructions
    }

    /// Count instructions matching a predicate
    pub fn count_where(&self, predicate: impl Fn(&MachineInstruction) -> bool) -> usize {
        self.instructions.iter().filter(|i| predicate(i)).count()
    }

    /// Wrap the program in a trigger bracket
    pub fn bracketed(self, trigger: Trigger4) -> Self {
        let mut instructions = Vec::with_capacity(self.instructions.len() + 2);
        instructions.push(MachineInstruction::SetTrigger4(trigger));
        instructions.extend(self.instructions);
        instructions.push(MachineInstruction::StopTrigger);
        Self { instructions }
    }

    /// True when the program opens with `set_trigger4`, closes with
    /// `stop_trigger` and contains neither anywhere else
    pub fn is_bracketed(&self) -> bool {
        let opens = matches!(self.first(), Some(MachineInstruction::SetTrigger4(_)));
        let closes = matches!(self.last(), Some(MachineInstruction::StopTrigger));
        let starts = self.count_where(|i| matches!(i, MachineInstruction::SetTrigger4(_)));
        let stops = self.count_where(|i| matches!(i, MachineInstruction::StopTrigger));
        opens && closes && starts == 1 && stops == 1
    }

    /// Axis state after running the whole program from `entry`
    pub fn final_state(&self, entry: AxisState) -> AxisState {
        self.instructions
            .iter()
            .fold(entry, |state, instruction| state.apply(instruction))
    }

    /// Encode every instruction as a wire record
    pub fn to_records(&self) -> Vec<Vec<String>> {
        self.instructions.iter().map(|i| i.to_record()).collect()
    }

    /// Decode wire records, failing on the first bad record
    pub fn from_records<R, S>(records: &[R]) -> WireResult<Self>
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        records
            .iter()
            .map(|record| MachineInstruction::from_record(record.as_ref()))
            .collect()
    }

    /// Serialize to the JSON array-of-arrays wire form
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse the JSON array-of-arrays wire form
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl From<Vec<MachineInstruction>> for CutList {
    fn from(instructions: Vec<MachineInstruction>) -> Self {
        Self { instructions }
    }
}

impl FromIterator<MachineInstruction> for CutList {
    fn from_iter<I: IntoIterator<Item = MachineInstruction>>(iter: I) -> Self {
        Self {
            instructions: iter.into_iter().collect(),
        }
    }
}

impl Extend<MachineInstruction> for CutList {
    fn extend<I: IntoIterator<Item = MachineInstruction>>(&mut self, iter: I) {
        self.instructions.extend(iter);
    }
}

impl<'a> IntoIterator for &'a CutList {
    type Item = &'a MachineInstruction;
    type IntoIter = std::slice::Iter<'a, MachineInstruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}

impl IntoIterator for CutList {
    type Item = MachineInstruction;
    type IntoIter = std::vec::IntoIter<MachineInstruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.into_iter()
    }
}
