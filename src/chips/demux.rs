use crate::error::SimError;
use crate::gate::{BuiltInChip, OutputBuffer};
use crate::pin::PinSpec;
use crate::types::Word;

const DMUX_INPUTS: &[PinSpec] = &[PinSpec::bit("in"), PinSpec::bit("sel")];
const DMUX_OUTPUTS: &[PinSpec] = &[PinSpec::bit("a"), PinSpec::bit("b")];

const DMUX4WAY_INPUTS: &[PinSpec] = &[PinSpec::bit("in"), PinSpec::new("sel", 2)];
const DMUX4WAY_OUTPUTS: &[PinSpec] = &[
    PinSpec::bit("a"),
    PinSpec::bit("b"),
    PinSpec::bit("c"),
    PinSpec::bit("d"),
];

const DMUX8WAY_INPUTS: &[PinSpec] = &[PinSpec::bit("in"), PinSpec::new("sel", 3)];
const DMUX8WAY_OUTPUTS: &[PinSpec] = &[
    PinSpec::bit("a"),
    PinSpec::bit("b"),
    PinSpec::bit("c"),
    PinSpec::bit("d"),
    PinSpec::bit("e"),
    PinSpec::bit("f"),
    PinSpec::bit("g"),
    PinSpec::bit("h"),
];

/// Routes `input` to output `sel` and drives every other output low.
///
/// `sel` arrives already wrapped to its pin width, so it is always a valid
/// index when the output count is `2^width`.
fn route(input: Word, sel: Word, outputs: &mut OutputBuffer) {
    for index in 0..outputs.len() {
        let value = if index as Word == sel { input } else { 0 };
        outputs.set(index, value);
    }
}

/// 1-bit demultiplexer: `sel` picks `a` (0) or `b` (1).
pub struct DMux;

impl BuiltInChip for DMux {
    fn name(&self) -> &'static str {
        "DMux"
    }

    fn inputs(&self) -> &'static [PinSpec] {
        DMUX_INPUTS
    }

    fn outputs(&self) -> &'static [PinSpec] {
        DMUX_OUTPUTS
    }

    fn evaluate(&self, inputs: &[Word], outputs: &mut OutputBuffer) -> Result<(), SimError> {
        route(inputs[0], inputs[1], outputs);
        Ok(())
    }
}

/// 1-bit 4-way demultiplexer over a 2-bit selector (0->a .. 3->d).
pub struct DMux4Way;

impl BuiltInChip for DMux4Way {
    fn name(&self) -> &'static str {
        "DMux4Way"
    }

    fn inputs(&self) -> &'static [PinSpec] {
        DMUX4WAY_INPUTS
    }

    fn outputs(&self) -> &'static [PinSpec] {
        DMUX4WAY_OUTPUTS
    }

    fn evaluate(&self, inputs: &[Word], outputs: &mut OutputBuffer) -> Result<(), SimError> {
        route(inputs[0], inputs[1], outputs);
        Ok(())
    }
}

/// 1-bit 8-way demultiplexer.
/// The 3-bit `sel` chooses which output receives `in` (0->a .. 7->h);
/// the other outputs are set to 0.
pub struct DMux8Way;

impl BuiltInChip for DMux8Way {
    fn name(&self) -> &'static str {
        "DMux8Way"
    }

    fn inputs(&self) -> &'static [PinSpec] {
        DMUX8WAY_INPUTS
    }

    fn outputs(&self) -> &'static [PinSpec] {
        DMUX8WAY_OUTPUTS
    }

    fn evaluate(&self, inputs: &[Word], outputs: &mut OutputBuffer) -> Result<(), SimError> {
        route(inputs[0], inputs[1], outputs);
        Ok(())
    }
}
