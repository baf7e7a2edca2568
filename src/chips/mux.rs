use crate::error::SimError;
use crate::gate::{BuiltInChip, OutputBuffer};
use crate::pin::PinSpec;
use crate::types::Word;

const MUX_INPUTS: &[PinSpec] = &[PinSpec::bit("a"), PinSpec::bit("b"), PinSpec::bit("sel")];
const MUX_OUTPUTS: &[PinSpec] = &[PinSpec::bit("out")];

const MUX16_INPUTS: &[PinSpec] = &[
    PinSpec::new("a", 16),
    PinSpec::new("b", 16),
    PinSpec::bit("sel"),
];
const MUX16_OUTPUTS: &[PinSpec] = &[PinSpec::new("out", 16)];

/// 1-bit multiplexer: `out = sel ? b : a`.
pub struct Mux;

impl BuiltInChip for Mux {
    fn name(&self) -> &'static str {
        "Mux"
    }

    fn inputs(&self) -> &'static [PinSpec] {
        MUX_INPUTS
    }

    fn outputs(&self) -> &'static [PinSpec] {
        MUX_OUTPUTS
    }

    fn evaluate(&self, inputs: &[Word], outputs: &mut OutputBuffer) -> Result<(), SimError> {
        outputs.set(0, if inputs[2] == 0 { inputs[0] } else { inputs[1] });
        Ok(())
    }
}

/// 16-bit multiplexer.
pub struct Mux16;

impl BuiltInChip for Mux16 {
    fn name(&self) -> &'static str {
        "Mux16"
    }

    fn inputs(&self) -> &'static [PinSpec] {
        MUX16_INPUTS
    }

    fn outputs(&self) -> &'static [PinSpec] {
        MUX16_OUTPUTS
    }

    fn evaluate(&self, inputs: &[Word], outputs: &mut OutputBuffer) -> Result<(), SimError> {
        outputs.set(0, if inputs[2] == 0 { inputs[0] } else { inputs[1] });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::{BuiltInGate, Gate};

    #[test]
    fn test_mux16_selects_word() {
        let mut gate = BuiltInGate::new(Box::new(Mux16)).unwrap();
        gate.input_pin("a").unwrap().write(1234);
        gate.input_pin("b").unwrap().write(-42);
        gate.recompute().unwrap();
        assert_eq!(gate.output_pin("out").unwrap().read(), 1234);

        gate.input_pin("sel").unwrap().write(1);
        gate.recompute().unwrap();
        assert_eq!(gate.output_pin("out").unwrap().read(), -42);
    }

    #[test]
    fn test_mux_bit() {
        let mut outputs = OutputBuffer::new(1);
        Mux.evaluate(&[1, 0, 0], &mut outputs).unwrap();
        assert_eq!(outputs.get(0), Some(1));
        Mux.evaluate(&[1, 0, 1], &mut outputs).unwrap();
        assert_eq!(outputs.get(0), Some(0));
    }
}
