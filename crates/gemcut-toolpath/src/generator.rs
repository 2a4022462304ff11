//! Common interface of the cut generators

use gemcut_core::{CutList, CutProcess, CutResult, Trigger4};

/// A pure function from cut parameters to a machine program
///
/// [`CutGenerator::body`] yields the unbracketed program that composite
/// generators splice into their own output. [`CutGenerator::generate`] is the
/// standalone form, wrapped in exactly one trigger bracket.
pub trait CutGenerator {
    /// Process this generator implements
    fn process(&self) -> CutProcess;

    /// Arguments of the opening `set_trigger4`
    fn trigger(&self) -> Trigger4;

    /// Program without the trigger bracket
    fn body(&self) -> CutResult<CutList>;

    /// Standalone program, bracketed by `set_trigger4`/`stop_trigger`
    fn generate(&self) -> CutResult<CutList> {
        Ok(self.body()?.bracketed(self.trigger()))
    }
}
