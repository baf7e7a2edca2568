use crate::error::SimError;
use crate::gate::{BuiltInChip, OutputBuffer};
use crate::pin::PinSpec;
use crate::types::Word;

const BINARY_INPUTS: &[PinSpec] = &[PinSpec::bit("a"), PinSpec::bit("b")];
const SINGLE_OUTPUT: &[PinSpec] = &[PinSpec::bit("out")];
const UNARY_INPUT: &[PinSpec] = &[PinSpec::bit("in")];
const WORD_INPUT: &[PinSpec] = &[PinSpec::new("in", 16)];
const WORD_OUTPUT: &[PinSpec] = &[PinSpec::new("out", 16)];

macro_rules! binary_gate {
    ($(#[$doc:meta])* $chip:ident, |$a:ident, $b:ident| $body:expr) => {
        $(#[$doc])*
        pub struct $chip;

        impl BuiltInChip for $chip {
            fn name(&self) -> &'static str {
                stringify!($chip)
            }

            fn inputs(&self) -> &'static [PinSpec] {
                BINARY_INPUTS
            }

            fn outputs(&self) -> &'static [PinSpec] {
                SINGLE_OUTPUT
            }

            fn evaluate(
                &self,
                inputs: &[Word],
                outputs: &mut OutputBuffer,
            ) -> Result<(), SimError> {
                let ($a, $b) = (inputs[0] & 1, inputs[1] & 1);
                outputs.set(0, $body);
                Ok(())
            }
        }
    };
}

binary_gate!(
    /// The primitive every other chip can be built from.
    Nand,
    |a, b| !(a & b) & 1
);
binary_gate!(And, |a, b| a & b);
binary_gate!(Or, |a, b| a | b);
binary_gate!(Xor, |a, b| a ^ b);

pub struct Not;

impl BuiltInChip for Not {
    fn name(&self) -> &'static str {
        "Not"
    }

    fn inputs(&self) -> &'static [PinSpec] {
        UNARY_INPUT
    }

    fn outputs(&self) -> &'static [PinSpec] {
        SINGLE_OUTPUT
    }

    fn evaluate(&self, inputs: &[Word], outputs: &mut OutputBuffer) -> Result<(), SimError> {
        outputs.set(0, !inputs[0] & 1);
        Ok(())
    }
}

/// Bitwise negation of a 16-bit word.
pub struct Not16;

impl BuiltInChip for Not16 {
    fn name(&self) -> &'static str {
        "Not16"
    }

    fn inputs(&self) -> &'static [PinSpec] {
        WORD_INPUT
    }

    fn outputs(&self) -> &'static [PinSpec] {
        WORD_OUTPUT
    }

    fn evaluate(&self, inputs: &[Word], outputs: &mut OutputBuffer) -> Result<(), SimError> {
        outputs.set(0, !inputs[0]);
        Ok(())
    }
}
