//! Cut time estimation
//!
//! Travel time is the planar distance between consecutive jump/mark targets
//! divided by the matching speed. The walk starts at the origin. Rotary and
//! z moves are not timed, so the estimate is a lower bound for programs that
//! tilt or spin the block.

use gemcut_core::{CutError, CutList, CutResult, LaserParameters, MachineInstruction};
use serde::Serialize;
use std::time::Duration;
use tracing::warn;

/// Distances travelled by a program
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TravelSummary {
    /// Distance covered with the beam off
    pub jump_distance: f64,
    /// Distance covered with the beam on
    pub mark_distance: f64,
    pub jumps: usize,
    pub marks: usize,
}

impl TravelSummary {
    /// Accumulate the travel of a sequence of instructions
    pub fn from_instructions<'a>(
        instructions: impl IntoIterator<Item = &'a MachineInstruction>,
    ) -> Self {
        let mut summary = Self::default();
        let (mut x, mut y) = (0.0f64, 0.0f64);
        for instruction in instructions {
            match instruction {
                MachineInstruction::Jump(c) => {
                    summary.jump_distance += (c.x - x).hypot(c.y - y);
                    summary.jumps += 1;
                    (x, y) = (c.x, c.y);
                }
                MachineInstruction::Mark(c) => {
                    summary.mark_distance += (c.x - x).hypot(c.y - y);
                    summary.marks += 1;
                    (x, y) = (c.x, c.y);
                }
                _ => {}
            }
        }
        summary
    }

    /// Time needed at the given speeds
    pub fn duration(&self, laser: &LaserParameters) -> CutResult<Duration> {
        laser.validate_speeds()?;
        let seconds =
            self.jump_distance / laser.jump_speed + self.mark_distance / laser.mark_speed;
        Duration::try_from_secs_f64(seconds).map_err(|_| CutError::TimeOverflow { seconds })
    }
}

/// Estimated run time of a program
pub fn estimate(cutlist: &CutList, laser: &LaserParameters) -> CutResult<Duration> {
    TravelSummary::from_instructions(cutlist).duration(laser)
}

/// Estimate from raw wire records, skipping any that do not decode
pub fn estimate_records<R, S>(records: &[R], laser: &LaserParameters) -> CutResult<Duration>
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
    TravelSummary::from_instructions(&instructions).duration(laser)
}

/// Render whole seconds as `H:MM:SS`
pub fn format_hms(duration: Duration) -> String {
    let total = duration.as_secs();
    format!(
        "{}:{:02}:{:02}",
        total / 3600,
        (total / 60) % 60,
        total % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemcut_core::{Precision, Trigger4};

    fn laser() -> LaserParameters {
        LaserParameters {
            jump_speed: 10.0,
            mark_speed: 2.0,
            kerf_angle: 0.0,
            xy_spacing: 1.0,
            z_spacing: 1.0,
            z_final_overshoot: 0.0,
            refraction: 1.0,
            trigger: Trigger4::default(),
        }
    }

    #[test]
    fn test_jump_and_mark_speeds() {
        let cutlist: CutList = vec![
            MachineInstruction::jump(3.0, 4.0, Precision::Full),
            MachineInstruction::mark(3.0, 0.0, Precision::Full),
            MachineInstruction::CRel(90.0),
            MachineInstruction::ZStep(-5.0),
        ]
        .into();
        let time = estimate(&cutlist, &laser()).unwrap();
        // 5 / 10 + 4 / 2
        assert_eq!(time, Duration::from_millis(2500));
    }

    #[test]
    fn test_records_skip_unknown() {
        let records = vec![
            vec!["jump", "0", "10"],
            vec!["laser_fire", "1"],
            vec!["mark", "0", "oops"],
            vec!["mark", "0", "0"],
        ];
        let time = estimate_records(&records, &laser()).unwrap();
        assert_eq!(time, Duration::from_secs(6));
    }

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(Duration::from_secs(0)), "0:00:00");
        assert_eq!(format_hms(Duration::from_secs_f64(59.9)), "0:00:59");
        assert_eq!(format_hms(Duration::from_secs(3723)), "1:02:03");
        assert_eq!(format_hms(Duration::from_secs(100 * 3600)), "100:00:00");
    }

    #[test]
    fn test_invalid_speed_rejected() {
        let mut params = laser();
        params.mark_speed = 0.0;
        assert!(estimate(&CutList::new(), &params).is_err());
    }

    #[test]
    fn test_unused_laser_fields_not_checked() {
        let mut params = laser();
        params.kerf_angle = 120.0;
        params.xy_spacing = 0.0;
        params.refraction = -1.0;
        let cutlist: CutList = vec![MachineInstruction::jump(0.0, 20.0, Precision::Full)].into();
        assert_eq!(estimate(&cutlist, &params).unwrap(), Duration::from_secs(2));
    }

    #[test]
    fn test_unrepresentable_time_overflows() {
        let cutlist: CutList = vec![MachineInstruction::mark(1e300, 0.0, Precision::Full)].into();
        let err = estimate(&cutlist, &laser()).unwrap_err();
        assert!(matches!(err, CutError::TimeOverflow { .. }), "{err}");
    }
}
