//! # Gate Evaluation
//!
//! A gate maps the current values of its input pins to values on its output
//! pins. Two kinds implement [`Gate`]:
//!
//! - [`BuiltInGate`]: closed-form logic supplied by a [`BuiltInChip`]
//! - [`crate::composite::CompositeGate`]: sub-gates sharing internal pins
//!
//! Built-in evaluation is combinational. Inputs are snapshotted before the
//! chip runs and outputs are written only after it returns, so a gate never
//! observes its own partial results.

use std::sync::Arc;

use tracing::trace;

use crate::error::SimError;
use crate::pin::{Pin, PinSpec};
use crate::types::Word;

pub trait Gate: Send {
    fn name(&self) -> &str;
    fn input_pins(&self) -> &[Arc<Pin>];
    fn output_pins(&self) -> &[Arc<Pin>];
    fn recompute(&mut self) -> Result<(), SimError>;

    fn input_pin(&self, name: &str) -> Option<Arc<Pin>> {
        self.input_pins().iter().find(|p| p.name() == name).cloned()
    }

    fn output_pin(&self, name: &str) -> Option<Arc<Pin>> {
        self.output_pins().iter().find(|p| p.name() == name).cloned()
    }
}

/// Closed-form logic of a primitive chip.
pub trait BuiltInChip: Send + Sync {
    fn name(&self) -> &'static str;
    fn inputs(&self) -> &'static [PinSpec];
    fn outputs(&self) -> &'static [PinSpec];

    /// `inputs` holds one value per declared input, in declaration order.
    /// Every output slot must be assigned before returning `Ok`.
    fn evaluate(&self, inputs: &[Word], outputs: &mut OutputBuffer) -> Result<(), SimError>;
}

/// Staging area for one evaluation's outputs.
#[derive(Debug, Clone)]
pub struct OutputBuffer {
    slots: Vec<Option<Word>>,
}

impl OutputBuffer {
    pub fn new(len: usize) -> Self {
        OutputBuffer {
            slots: vec![None; len],
        }
    }

    /// Panics if `index` is outside the declared outputs; that is a bug in
    /// the chip, not a runtime condition.
    pub fn set(&mut self, index: usize, value: Word) {
        self.slots[index] = Some(value);
    }

    pub fn get(&self, index: usize) -> Option<Word> {
        self.slots.get(index).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn first_unassigned(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }
}

pub struct BuiltInGate {
    chip: Box<dyn BuiltInChip>,
    input_pins: Vec<Arc<Pin>>,
    output_pins: Vec<Arc<Pin>>,
    input_snapshot: Vec<Word>,
}

impl BuiltInGate {
    /// Builds the gate with fresh pins taken from the chip's interface.
    pub fn new(chip: Box<dyn BuiltInChip>) -> Result<Self, SimError> {
        let inputs = chip
            .inputs()
            .iter()
            .map(Pin::from_spec)
            .collect::<Result<Vec<_>, _>>()?;
        let outputs = chip
            .outputs()
            .iter()
            .map(Pin::from_spec)
            .collect::<Result<Vec<_>, _>>()?;
        Self::with_pins(chip, inputs, outputs)
    }

    /// Builds the gate over existing pins, e.g. nets owned by a composite.
    /// Pins are matched to the chip interface by position.
    pub fn with_pins(
        chip: Box<dyn BuiltInChip>,
        inputs: Vec<Arc<Pin>>,
        outputs: Vec<Arc<Pin>>,
    ) -> Result<Self, SimError> {
        check_interface(chip.name(), "input", chip.inputs(), &inputs)?;
        check_interface(chip.name(), "output", chip.outputs(), &outputs)?;

        Ok(BuiltInGate {
            input_snapshot: Vec::with_capacity(inputs.len()),
            chip,
            input_pins: inputs,
            output_pins: outputs,
        })
    }

    pub fn chip(&self) -> &dyn BuiltInChip {
        self.chip.as_ref()
    }
}

fn check_interface(
    chip: &str,
    direction: &'static str,
    specs: &[PinSpec],
    pins: &[Arc<Pin>],
) -> Result<(), SimError> {
    if specs.len() != pins.len() {
        return Err(SimError::PinCountMismatch {
            chip: chip.to_string(),
            direction,
            expected: specs.len(),
            actual: pins.len(),
        });
    }
    for (spec, pin) in specs.iter().zip(pins) {
        if spec.width != pin.width() {
            return Err(SimError::WidthMismatch {
                pin: format!("{}.{}", chip, spec.name),
                expected: spec.width,
                actual: pin.width(),
            });
        }
    }
    Ok(())
}

impl Gate for BuiltInGate {
    fn name(&self) -> &str {
        self.chip.name()
    }

    fn input_pins(&self) -> &[Arc<Pin>] {
        &self.input_pins
    }

    fn output_pins(&self) -> &[Arc<Pin>] {
        &self.output_pins
    }

    fn recompute(&mut self) -> Result<(), SimError> {
        self.input_snapshot.clear();
        self.input_snapshot
            .extend(self.input_pins.iter().map(|pin| pin.read()));

        let mut outputs = OutputBuffer::new(self.output_pins.len());
        self.chip.evaluate(&self.input_snapshot, &mut outputs)?;

        if let Some(index) = outputs.first_unassigned() {
            return Err(SimError::UnassignedOutput {
                gate: self.chip.name().to_string(),
                pin: self.output_pins[index].name().to_string(),
            });
        }

        for (index, pin) in self.output_pins.iter().enumerate() {
            if let Some(value) = outputs.get(index) {
                pin.write(value as i32);
            }
        }

        trace!(
            gate = self.chip.name(),
            inputs = ?self.input_snapshot,
            "recomputed built-in gate"
        );
        Ok(())
    }
}
