//! # Composite Chips
//!
//! A composite gate is a set of sub-gates wired through shared nets. Each
//! net is a single `Arc<Pin>`: the composite's interface pins and its
//! internal pins are handed directly to the sub-gates, so a value written by
//! one sub-gate is read by every other gate on that net.
//!
//! ```rust
//! use rusty_gates::chips::ChipRegistry;
//! use rusty_gates::composite::CompositeBuilder;
//! use rusty_gates::gate::Gate;
//!
//! let registry = ChipRegistry::new();
//! let mut and = CompositeBuilder::new("And")
//!     .input("a", 1)
//!     .input("b", 1)
//!     .output("out", 1)
//!     .internal("nand", 1)
//!     .part("Nand", &[("a", "a"), ("b", "b"), ("out", "nand")])
//!     .part("Not", &[("in", "nand"), ("out", "out")])
//!     .build(&registry)
//!     .expect("valid wiring");
//!
//! and.input_pin("a").unwrap().write(1);
//! and.input_pin("b").unwrap().write(1);
//! and.recompute().unwrap();
//! assert_eq!(and.output_pin("out").unwrap().read(), 1);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::chips::ChipRegistry;
use crate::error::SimError;
use crate::gate::{BuiltInGate, Gate};
use crate::pin::Pin;
use crate::types::Word;

pub struct CompositeGate {
    name: String,
    input_pins: Vec<Arc<Pin>>,
    output_pins: Vec<Arc<Pin>>,
    internal_pins: Vec<Arc<Pin>>,
    parts: Vec<Box<dyn Gate>>,
}

impl CompositeGate {
    pub fn internal_pin(&self, name: &str) -> Option<Arc<Pin>> {
        self.internal_pins.iter().find(|p| p.name() == name).cloned()
    }

    pub fn parts(&self) -> &[Box<dyn Gate>] {
        &self.parts
    }
}

impl Gate for CompositeGate {
    fn name(&self) -> &str {
        &self.name
    }

    fn input_pins(&self) -> &[Arc<Pin>] {
        &self.input_pins
    }

    fn output_pins(&self) -> &[Arc<Pin>] {
        &self.output_pins
    }

    /// Evaluates sub-gates in the order they were added. The builder's
    /// caller is responsible for a dependency-respecting order.
    ///
    /// On a sub-gate fault every output and internal net is restored to
    /// its value before the step, so a failed step writes nothing.
    fn recompute(&mut self) -> Result<(), SimError> {
        let snapshot: Vec<(Arc<Pin>, Word)> = self
            .output_pins
            .iter()
            .chain(&self.internal_pins)
            .map(|pin| (pin.clone(), pin.read()))
            .collect();

        for part in self.parts.iter_mut() {
            if let Err(e) = part.recompute() {
                warn!(chip = %self.name, part = part.name(), error = %e, "sub-gate fault");
                for (pin, value) in &snapshot {
                    pin.write(*value as i32);
                }
                return Err(e);
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct NetDecl {
    name: String,
    width: u8,
}

#[derive(Debug, Clone)]
struct PartDecl {
    chip: String,
    connections: Vec<(String, String)>,
}

/// Declares a composite's nets and parts, then resolves the wiring.
#[derive(Debug, Clone)]
pub struct CompositeBuilder {
    name: String,
    inputs: Vec<NetDecl>,
    outputs: Vec<NetDecl>,
    internals: Vec<NetDecl>,
    parts: Vec<PartDecl>,
}

impl CompositeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        CompositeBuilder {
            name: name.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            internals: Vec::new(),
            parts: Vec::new(),
        }
    }

    pub fn input(mut self, name: &str, width: u8) -> Self {
        self.inputs.push(NetDecl {
            name: name.to_string(),
            width,
        });
        self
    }

    pub fn output(mut self, name: &str, width: u8) -> Self {
        self.outputs.push(NetDecl {
            name: name.to_string(),
            width,
        });
        self
    }

    pub fn internal(mut self, name: &str, width: u8) -> Self {
        self.internals.push(NetDecl {
            name: name.to_string(),
            width,
        });
        self
    }

    /// Adds a built-in part. `connections` maps each of the chip's pin names
    /// to a declared net.
    pub fn part(mut self, chip: &str, connections: &[(&str, &str)]) -> Self {
        self.parts.push(PartDecl {
            chip: chip.to_string(),
            connections: connections
                .iter()
                .map(|(pin, net)| (pin.to_string(), net.to_string()))
                .collect(),
        });
        self
    }

    pub fn build(self, registry: &ChipRegistry) -> Result<CompositeGate, SimError> {
        // Inputs, outputs and internals share one namespace.
        let mut nets: HashMap<String, Arc<Pin>> = HashMap::new();
        let mut declare = |decls: &[NetDecl]| -> Result<Vec<Arc<Pin>>, SimError> {
            decls
                .iter()
                .map(|decl| -> Result<Arc<Pin>, SimError> {
                    let pin = Arc::new(Pin::new(decl.name.as_str(), decl.width)?);
                    if nets.insert(decl.name.clone(), pin.clone()).is_some() {
                        return Err(SimError::DuplicatePin {
                            part: self.name.clone(),
                            pin: decl.name.clone(),
                        });
                    }
                    Ok(pin)
                })
                .collect()
        };
        let input_pins = declare(&self.inputs)?;
        let output_pins = declare(&self.outputs)?;
        let internal_pins = declare(&self.internals)?;

        let mut parts: Vec<Box<dyn Gate>> = Vec::with_capacity(self.parts.len());
        for decl in &self.parts {
            let chip = registry.create(&decl.chip)?;
            let resolve = |spec_name: &str| -> Result<Arc<Pin>, SimError> {
                let net = decl
                    .connections
                    .iter()
                    .find(|(pin, _)| pin == spec_name)
                    .map(|(_, net)| net)
                    .ok_or_else(|| SimError::UnknownPin {
                        part: decl.chip.clone(),
                        pin: spec_name.to_string(),
                    })?;
                nets.get(net).cloned().ok_or_else(|| SimError::UnknownPin {
                    part: self.name.clone(),
                    pin: net.clone(),
                })
            };

            for (index, (pin, _)) in decl.connections.iter().enumerate() {
                if decl.connections[..index].iter().any(|(seen, _)| seen == pin) {
                    return Err(SimError::DuplicatePin {
                        part: decl.chip.clone(),
                        pin: pin.clone(),
                    });
                }
                let declared = chip
                    .inputs()
                    .iter()
                    .chain(chip.outputs())
                    .any(|spec| spec.name == pin);
                if !declared {
                    return Err(SimError::UnknownPin {
                        part: decl.chip.clone(),
                        pin: pin.clone(),
                    });
                }
            }

            let inputs = chip
                .inputs()
                .iter()
                .map(|spec| resolve(spec.name))
                .collect::<Result<Vec<_>, _>>()?;
            let outputs = chip
                .outputs()
                .iter()
                .map(|spec| resolve(spec.name))
                .collect::<Result<Vec<_>, _>>()?;
            parts.push(Box::new(BuiltInGate::with_pins(chip, inputs, outputs)?));
        }

        debug!(chip = %self.name, parts = parts.len(), "built composite chip");
        Ok(CompositeGate {
            name: self.name,
            input_pins,
            output_pins,
            internal_pins,
            parts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::{BuiltInChip, OutputBuffer};
    use crate::pin::PinSpec;

    fn xor_from_nands() -> CompositeGate {
        CompositeBuilder::new("Xor")
            .input("a", 1)
            .input("b", 1)
            .output("out", 1)
            .internal("n1", 1)
            .internal("n2", 1)
            .internal("n3", 1)
            .part("Nand", &[("a", "a"), ("b", "b"), ("out", "n1")])
            .part("Nand", &[("a", "a"), ("b", "n1"), ("out", "n2")])
            .part("Nand", &[("a", "n1"), ("b", "b"), ("out", "n3")])
            .part("Nand", &[("a", "n2"), ("b", "n3"), ("out", "out")])
            .build(&ChipRegistry::new())
            .unwrap()
    }

    #[test]
    fn test_xor_built_from_nands() {
        let mut xor = xor_from_nands();
        assert_eq!(xor.parts().len(), 4);
        for (a, b, expected) in [(0, 0, 0), (0, 1, 1), (1, 0, 1), (1, 1, 0)] {
            xor.input_pin("a").unwrap().write(a);
            xor.input_pin("b").unwrap().write(b);
            xor.recompute().unwrap();
            assert_eq!(xor.output_pin("out").unwrap().read(), expected, "{a} xor {b}");
        }
    }

    #[test]
    fn test_internal_nets_are_shared_with_parts() {
        let mut xor = xor_from_nands();
        xor.input_pin("a").unwrap().write(1);
        xor.input_pin("b").unwrap().write(1);
        xor.recompute().unwrap();

        let n1 = xor.internal_pin("n1").unwrap();
        assert_eq!(n1.read(), 0);
        assert!(Arc::ptr_eq(&n1, &xor.parts()[0].output_pins()[0]));
    }

    #[test]
    fn test_unknown_net_is_rejected() {
        let result = CompositeBuilder::new("Broken")
            .input("in", 1)
            .part("Not", &[("in", "in"), ("out", "nowhere")])
            .build(&ChipRegistry::new());
        assert_eq!(
            result.err(),
            Some(SimError::UnknownPin {
                part: "Broken".to_string(),
                pin: "nowhere".to_string()
            })
        );
    }

    #[test]
    fn test_unknown_chip_pin_is_rejected() {
        let result = CompositeBuilder::new("Broken")
            .input("in", 1)
            .output("out", 1)
            .part("Not", &[("in", "in"), ("out", "out"), ("carry", "out")])
            .build(&ChipRegistry::new());
        assert!(matches!(result, Err(SimError::UnknownPin { pin, .. }) if pin == "carry"));
    }

    #[test]
    fn test_net_declared_twice_is_rejected() {
        let result = CompositeBuilder::new("Shadowed")
            .input("x", 1)
            .output("out", 1)
            .internal("x", 1)
            .part("Not", &[("in", "x"), ("out", "out")])
            .build(&ChipRegistry::new());
        assert_eq!(
            result.err(),
            Some(SimError::DuplicatePin {
                part: "Shadowed".to_string(),
                pin: "x".to_string()
            })
        );

        let result = CompositeBuilder::new("TwoOuts")
            .input("in", 1)
            .output("out", 1)
            .output("out", 1)
            .part("Not", &[("in", "in"), ("out", "out")])
            .build(&ChipRegistry::new());
        assert!(matches!(result, Err(SimError::DuplicatePin { pin, .. }) if pin == "out"));
    }

    #[test]
    fn test_chip_pin_connected_twice_is_rejected() {
        let result = CompositeBuilder::new("Ambiguous")
            .input("a", 1)
            .input("b", 1)
            .output("out", 1)
            .part("Not", &[("in", "a"), ("in", "b"), ("out", "out")])
            .build(&ChipRegistry::new());
        assert_eq!(
            result.err(),
            Some(SimError::DuplicatePin {
                part: "Not".to_string(),
                pin: "in".to_string()
            })
        );
    }

    /// Always faults after its upstream part has already written.
    struct Refuse;

    impl BuiltInChip for Refuse {
        fn name(&self) -> &'static str {
            "Refuse"
        }
        fn inputs(&self) -> &'static [PinSpec] {
            const INPUTS: &[PinSpec] = &[PinSpec::bit("in")];
            INPUTS
        }
        fn outputs(&self) -> &'static [PinSpec] {
            const OUTPUTS: &[PinSpec] = &[PinSpec::bit("out")];
            OUTPUTS
        }
        fn evaluate(&self, inputs: &[Word], _outputs: &mut OutputBuffer) -> Result<(), SimError> {
            Err(SimError::evaluation("Refuse", format!("input {}", inputs[0])))
        }
    }

    #[test]
    fn test_fault_restores_internal_and_output_nets() {
        let mut registry = ChipRegistry::new();
        registry.register("Refuse", || Box::new(Refuse));
        let mut gate = CompositeBuilder::new("Stuck")
            .input("a", 1)
            .output("out", 1)
            .internal("n", 1)
            .part("Not", &[("in", "a"), ("out", "n")])
            .part("Refuse", &[("in", "n"), ("out", "out")])
            .build(&registry)
            .unwrap();
        let n = gate.internal_pin("n").unwrap();
        gate.output_pin("out").unwrap().write(1);

        // Not drives `n` high from `a = 0` before Refuse faults.
        let err = gate.recompute().unwrap_err();
        assert_eq!(err, SimError::evaluation("Refuse", "input 1"));
        assert_eq!(n.read(), 0);
        assert_eq!(gate.output_pin("out").unwrap().read(), 1);
    }

    #[test]
    fn test_width_mismatch_is_rejected() {
        let result = CompositeBuilder::new("Wide")
            .input("in", 16)
            .output("out", 1)
            .part("Not", &[("in", "in"), ("out", "out")])
            .build(&ChipRegistry::new());
        assert!(matches!(
            result,
            Err(SimError::WidthMismatch { expected: 1, actual: 16, .. })
        ));
    }
}
