//! Pyramid slice primitive
//!
//! One quarter of the slicing that leaves a pyramid-topped seed with a flat
//! base. Passes run parallel to the x axis and march down in y; from layer to
//! layer the pass shortens by `taper_x` at both ends while the sweep window
//! shrinks by the straight and pyramid tapers together.
//!
//! The primitive is never bracketed and never sets z itself. The caller
//! positions z with an absolute move before splicing a slice in.

use gemcut_core::{CutError, CutList, CutResult, MachineInstruction, Precision};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PyramidSlice {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    /// Distance between passes within a layer
    pub spacing: f64,
    /// Depth of one layer
    pub z_step: f64,
    /// Per-layer shortening of each pass end
    pub taper_x: f64,
    /// Per-layer narrowing caused by the pyramid face
    pub taper_y: f64,
    /// Per-layer drift of the first pass caused by the kerf
    pub taper_straight: f64,
    pub layers: usize,
    pub precision: Precision,
}

impl PyramidSlice {
    /// Sweep window of each layer
    pub fn layer_windows(&self) -> Vec<f64> {
        let initial = (self.y1 - self.y2).abs();
        let shrink = self.taper_straight + self.taper_y;
        (0..self.layers)
            .map(|layer| initial - layer as f64 * shrink)
            .collect()
    }

    pub fn cutlist(&self) -> CutResult<CutList> {
        if !(self.spacing.is_finite() && self.spacing > 0.0) {
            return Err(CutError::invalid_geometry(format!(
                "pass spacing {} must be positive",
                self.spacing
            )));
        }

        let mut cutlist = CutList::new();
        let last = self.layers.saturating_sub(1);
        for (layer, window) in self.layer_windows().into_iter().enumerate() {
            let a = layer as f64;
            let row = self.y1 - a * self.taper_straight;
            let left = self.x1 - a * self.taper_x;
            let right = self.x2 + a * self.taper_x;

            if self.x1 > 0.0 {
                let mut pass = 0usize;
                while (pass as f64 * self.spacing) < window {
                    let y = row - pass as f64 * self.spacing;
                    let (from, to) = if pass % 2 == 0 {
                        (left, right)
                    } else {
                        (right, left)
                    };
                    cutlist.push(MachineInstruction::jump(from, y, self.precision));
                    cutlist.push(MachineInstruction::mark(to, y, self.precision));
                    pass += 1;
                }
            }

            if layer < last {
                cutlist.push(MachineInstruction::ZStep(-self.z_step));
            }
        }
        Ok(cutlist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slice() -> PyramidSlice {
        PyramidSlice {
            x1: 2.0,
            y1: 3.0,
            x2: -2.0,
            y2: 2.0,
            spacing: 0.25,
            z_step: 0.1,
            taper_x: 0.5,
            taper_y: 0.1,
            taper_straight: 0.05,
            layers: 3,
            precision: Precision::SEGMENT,
        }
    }

    #[test]
    fn test_first_layer_passes() {
        let cutlist = slice().cutlist().unwrap();
        let first: Vec<_> = cutlist.iter().take(4).copied().collect();
        assert_eq!(first[0], MachineInstruction::jump(2.0, 3.0, Precision::SEGMENT));
        assert_eq!(first[1], MachineInstruction::mark(-2.0, 3.0, Precision::SEGMENT));
        assert_eq!(first[2], MachineInstruction::jump(-2.0, 2.75, Precision::SEGMENT));
        assert_eq!(first[3], MachineInstruction::mark(2.0, 2.75, Precision::SEGMENT));
        // Window of 1.0 fits passes at 0, 0.25, 0.5 and 0.75
        assert_eq!(cutlist.instructions()[8], MachineInstruction::ZStep(-0.1));
    }

    #[test]
    fn test_no_step_after_last_layer() {
        let cutlist = slice().cutlist().unwrap();
        assert_eq!(
            cutlist.count_where(|i| matches!(i, MachineInstruction::ZStep(_))),
            2
        );
        assert!(cutlist.last().is_some_and(|i| i.is_motion()));
    }

    #[test]
    fn test_later_layers_shorten_and_drift() {
        let cutlist = slice().cutlist().unwrap();
        let after_step = cutlist
            .iter()
            .position(|i| matches!(i, MachineInstruction::ZStep(_)))
            .unwrap();
        let c = cutlist.instructions()[after_step + 1].coordinate().copied().unwrap();
        assert!((c.x - 1.5).abs() < 1e-12);
        assert!((c.y - 2.95).abs() < 1e-12);
        let end = cutlist.instructions()[after_step + 2].coordinate().copied().unwrap();
        assert!((end.x + 1.5).abs() < 1e-12);
        assert!((c.x - end.x) < 4.0);
    }

    #[test]
    fn test_negative_start_emits_only_steps() {
        let mut s = slice();
        s.x1 = -1.0;
        let cutlist = s.cutlist().unwrap();
        assert_eq!(cutlist.len(), 2);
    }

    #[test]
    fn test_zero_spacing_rejected() {
        let mut s = slice();
        s.spacing = 0.0;
        assert!(s.cutlist().is_err());
    }
}
