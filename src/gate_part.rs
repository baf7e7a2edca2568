use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::SimError;
use crate::events::PartId;
use crate::gate::Gate;
use crate::interactive::{ErrorReporter, InteractiveComputerPart};
use crate::part::{ComputerPart, PartCore, PartState, PartView, PinValues};
use crate::pin::Pin;
use crate::types::Word;

/// An interactive part driving a single gate (built-in or composite).
pub struct GatePart {
    core: PartCore,
    gate: Box<dyn Gate>,
    reporter: Arc<ErrorReporter>,
}

impl GatePart {
    pub fn new(gate: Box<dyn Gate>, has_display: bool) -> Self {
        let core = PartCore::new(gate.name(), has_display);
        let reporter = Arc::new(ErrorReporter::new(core.id(), core.name()));
        GatePart {
            core,
            gate,
            reporter,
        }
    }

    pub fn gate(&self) -> &dyn Gate {
        self.gate.as_ref()
    }

    /// Attaches a (non-owned) view and lets it report faults back through
    /// this part's listeners.
    pub fn attach_view(&mut self, view: &Arc<dyn PartView>) {
        self.core.set_view(view);
        let weak = Arc::downgrade(&self.reporter);
        view.set_error_listener(weak);
    }

    fn find_input(&self, name: &str) -> Result<Arc<Pin>, SimError> {
        self.gate.input_pin(name).ok_or_else(|| SimError::UnknownPin {
            part: self.core.name().to_string(),
            pin: name.to_string(),
        })
    }

    fn find_output(&self, name: &str) -> Result<Arc<Pin>, SimError> {
        self.gate.output_pin(name).ok_or_else(|| SimError::UnknownPin {
            part: self.core.name().to_string(),
            pin: name.to_string(),
        })
    }

    /// Writes an input pin. A value outside the pin's width is reported to
    /// the listeners as a fault, then stored wrapped like any other write.
    pub fn set_input(&self, name: &str, value: i32) -> Result<(), SimError> {
        let pin = self.find_input(name)?;
        if !pin.fits(value) {
            let message = format!(
                "Value {} does not fit in {}-bit pin '{}'",
                value,
                pin.width(),
                name
            );
            warn!(part = %self.core.name(), "{}", message);
            self.reporter.notify_error_listeners(Some(&message));
        }
        pin.write(value);
        Ok(())
    }

    pub fn input(&self, name: &str) -> Result<Word, SimError> {
        Ok(self.find_input(name)?.read())
    }

    pub fn output(&self, name: &str) -> Result<Word, SimError> {
        Ok(self.find_output(name)?.read())
    }

    pub fn outputs(&self) -> Vec<Word> {
        self.gate.output_pins().iter().map(|pin| pin.read()).collect()
    }
}

impl ComputerPart for GatePart {
    fn id(&self) -> PartId {
        self.core.id()
    }

    fn name(&self) -> &str {
        self.core.name()
    }

    fn has_display(&self) -> bool {
        self.core.has_display()
    }

    fn state(&self) -> PartState {
        self.core.state()
    }

    /// Evaluation faults are reported to the listeners and returned; the
    /// part stays steppable either way.
    fn recompute(&mut self) -> Result<(), SimError> {
        self.core.mark_running();

        if let Err(e) = self.gate.recompute() {
            warn!(part = %self.core.name(), error = %e, "evaluation fault");
            self.reporter.notify_error_listeners(Some(&e.to_string()));
            return Err(e);
        }

        if let Some(view) = self.core.view() {
            let values = PinValues::capture(self.gate.input_pins(), self.gate.output_pins());
            view.show_values(&values);
        }

        debug!(part = %self.core.name(), id = %self.core.id(), "recomputed");
        Ok(())
    }
}

impl InteractiveComputerPart for GatePart {
    fn reporter(&self) -> &Arc<ErrorReporter> {
        &self.reporter
    }
}

impl std::fmt::Debug for GatePart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatePart")
            .field("id", &self.core.id())
            .field("name", &self.core.name())
            .field("has_display", &self.core.has_display())
            .field("state", &self.core.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chips::ChipRegistry;

    fn dmux8(has_display: bool) -> GatePart {
        let gate = ChipRegistry::new().create_gate("DMux8Way").unwrap();
        GatePart::new(Box::new(gate), has_display)
    }

    #[test]
    fn test_first_recompute_starts_running() {
        let mut part = dmux8(false);
        assert_eq!(part.state(), PartState::Constructed);
        part.recompute().unwrap();
        assert_eq!(part.state(), PartState::Running);
    }

    #[test]
    fn test_set_input_and_read_outputs() {
        let mut part = dmux8(false);
        part.set_input("in", 1).unwrap();
        part.set_input("sel", 3).unwrap();
        part.recompute().unwrap();
        assert_eq!(part.outputs(), vec![0, 0, 0, 1, 0, 0, 0, 0]);
        assert_eq!(part.output("d").unwrap(), 1);
        assert_eq!(part.input("sel").unwrap(), 3);
    }

    #[test]
    fn test_unknown_pins() {
        let part = dmux8(false);
        assert!(matches!(
            part.set_input("z", 1),
            Err(SimError::UnknownPin { .. })
        ));
        assert!(part.output("in").is_err());
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut part = dmux8(true);
        part.set_input("in", 1).unwrap();
        part.set_input("sel", 6).unwrap();
        part.recompute().unwrap();
        let first = part.outputs();
        part.recompute().unwrap();
        assert_eq!(part.outputs(), first);
    }
}
