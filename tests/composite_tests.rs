//! Composite chips driven through parts, plus log output checks.


use mocks::*;
use rusty_gates::composite::CompositeBuilder;
use rusty_gates::gate::{BuiltInChip, OutputBuffer};
use rusty_gates::pin::PinSpec;
use rusty_gates::{ChipRegistry, ComputerPart, GatePart, InteractiveComputerPart, SimError, Word};
use tracing_test::traced_test;

/// A 1-bit 8-way demultiplexer assembled from smaller demultiplexers.
fn dmux8_from_parts() -> GatePart {
    let gate = CompositeBuilder::new("DMux8WayComposite")
        .input("in", 1)
        .input("sel_hi", 1)
        .input("sel_lo", 2)
        .output("a", 1)
        .output("b", 1)
        .output("c", 1)
        .output("d", 1)
        .output("e", 1)
        .output("f", 1)
        .output("g", 1)
        .output("h", 1)
        .internal("low", 1)
        .internal("high", 1)
        .part("DMux", &[("in", "in"), ("sel", "sel_hi"), ("a", "low"), ("b", "high")])
        .part(
            "DMux4Way",
            &[("in", "low"), ("sel", "sel_lo"), ("a", "a"), ("b", "b"), ("c", "c"), ("d", "d")],
        )
        .part(
            "DMux4Way",
            &[("in", "high"), ("sel", "sel_lo"), ("a", "e"), ("b", "f"), ("c", "g"), ("d", "h")],
        )
        .build(&ChipRegistry::new())
        .unwrap();
    GatePart::new(Box::new(gate), false)
}

#[cfg(test)]
mod composite_part_tests {
    use super::*;

    #[test]
    fn test_composite_matches_builtin_dmux8way() {
        let mut composite = dmux8_from_parts();
        let mut builtin = GatePart::new(
            Box::new(ChipRegistry::new().create_gate("DMux8Way").unwrap()),
            false,
        );

        for sel in 0..8 {
            composite.set_input("in", 1).unwrap();
            composite.set_input("sel_hi", sel >> 2).unwrap();
            composite.set_input("sel_lo", sel & 3).unwrap();
            composite.recompute().unwrap();

            builtin.set_input("in", 1).unwrap();
            builtin.set_input("sel", sel).unwrap();
            builtin.recompute().unwrap();

            assert_eq!(composite.outputs(), builtin.outputs(), "sel = {}", sel);
        }
    }

    #[test]
    fn test_composite_part_reports_range_faults() {
        let composite = dmux8_from_parts();
        let log = new_log();
        let listener = RecordingListener::new("L1", &log);
        composite.add_error_listener(&listener);

        composite.set_input("sel_lo", 4).unwrap();
        assert_eq!(composite.input("sel_lo").unwrap(), 0);
        assert_eq!(delivery_order(&log), vec!["L1"]);
    }
}

#[cfg(test)]
mod rollback_tests {
    use super::*;

    /// ORs its inputs, but refuses to evaluate when both are high.
    struct Guard;

    const GUARD_INPUTS: &[PinSpec] = &[PinSpec::bit("a"), PinSpec::bit("b")];
    const GUARD_OUTPUTS: &[PinSpec] = &[PinSpec::bit("out")];

    impl BuiltInChip for Guard {
        fn name(&self) -> &'static str {
            "Guard"
        }
        fn inputs(&self) -> &'static [PinSpec] {
            GUARD_INPUTS
        }
        fn outputs(&self) -> &'static [PinSpec] {
            GUARD_OUTPUTS
        }
        fn evaluate(&self, inputs: &[Word], outputs: &mut OutputBuffer) -> Result<(), SimError> {
            if inputs[0] == 1 && inputs[1] == 1 {
                return Err(SimError::evaluation("Guard", "both inputs high"));
            }
            outputs.set(0, inputs[0] | inputs[1]);
            Ok(())
        }
    }

    /// `inv = !a` is written before `Guard` runs on `(a, !b)`.
    fn guarded_part() -> GatePart {
        let mut registry = ChipRegistry::new();
        registry.register("Guard", || Box::new(Guard));
        let gate = CompositeBuilder::new("Guarded")
            .input("a", 1)
            .input("b", 1)
            .output("inv", 1)
            .output("guarded", 1)
            .internal("not_b", 1)
            .part("Not", &[("in", "a"), ("out", "inv")])
            .part("Not", &[("in", "b"), ("out", "not_b")])
            .part("Guard", &[("a", "a"), ("b", "not_b"), ("out", "guarded")])
            .build(&registry)
            .unwrap();
        GatePart::new(Box::new(gate), false)
    }

    #[test]
    fn test_sub_gate_fault_rolls_back_earlier_writes() {
        let mut part = guarded_part();
        let log = new_log();
        let listener = RecordingListener::new("L1", &log);
        part.add_error_listener(&listener);

        part.recompute().unwrap();
        assert_eq!(part.outputs(), vec![1, 1]);

        // The first Not would drive `inv` low before Guard faults.
        part.set_input("a", 1).unwrap();
        let err = part.recompute().unwrap_err();
        assert_eq!(err, SimError::evaluation("Guard", "both inputs high"));
        assert_eq!(part.outputs(), vec![1, 1]);

        {
            let log = log.lock().unwrap();
            assert_eq!(log.len(), 1);
            assert_eq!(
                log[0].1.message(),
                Some("Evaluation fault in 'Guard': both inputs high")
            );
            assert_eq!(log[0].1.source(), part.id());
        }

        part.set_input("b", 1).unwrap();
        part.recompute().unwrap();
        assert_eq!(part.outputs(), vec![0, 1]);
        assert_eq!(log.lock().unwrap().len(), 1);
    }
}

#[cfg(test)]
mod logging_tests {
    use super::*;

    #[traced_test]
    #[test]
    fn test_range_fault_is_logged() {
        let part = dmux8_from_parts();
        part.set_input("sel_hi", 3).unwrap();
        assert!(logs_contain("does not fit in 1-bit pin 'sel_hi'"));
    }

    #[traced_test]
    #[test]
    fn test_listener_panic_is_logged() {
        let part = dmux8_from_parts();
        let broken: std::sync::Arc<dyn rusty_gates::ErrorListener> =
            std::sync::Arc::new(PanickingListener);
        part.add_error_listener(&broken);
        part.notify_error_listeners("x");
        assert!(logs_contain("error listener panicked"));
    }
}
