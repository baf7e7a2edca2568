use std::sync::{Arc, Weak};

use crate::error::SimError;
use crate::events::{ErrorListener, PartId};
use crate::pin::Pin;
use crate::types::Word;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartState {
    Constructed,
    Running,
}

/// Snapshot of a part's pins pushed to its view after each recompute.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PinValues {
    pub inputs: Vec<(String, Word)>,
    pub outputs: Vec<(String, Word)>,
}

impl PinValues {
    pub fn capture(inputs: &[Arc<Pin>], outputs: &[Arc<Pin>]) -> Self {
        let snapshot = |pins: &[Arc<Pin>]| -> Vec<(String, Word)> {
            pins.iter()
                .map(|pin| (pin.name().to_string(), pin.read()))
                .collect()
        };
        PinValues {
            inputs: snapshot(inputs),
            outputs: snapshot(outputs),
        }
    }
}

/// Presentation surface a part may push its values to.
pub trait PartView: Send + Sync {
    fn show_values(&self, values: &PinValues);

    /// Gives the view a handle for reporting faults it detects (e.g. a
    /// malformed value typed by the user) back to the part.
    fn set_error_listener(&self, _listener: Weak<dyn ErrorListener>) {}
}

/// State shared by every computer part: identity, display mode, the
/// optional attached view and the lifecycle state.
///
/// The view is held weakly; the part never keeps it alive.
pub struct PartCore {
    id: PartId,
    name: String,
    has_display: bool,
    view: Option<Weak<dyn PartView>>,
    state: PartState,
}

impl PartCore {
    pub fn new(name: impl Into<String>, has_display: bool) -> Self {
        PartCore {
            id: PartId::next(),
            name: name.into(),
            has_display,
            view: None,
            state: PartState::Constructed,
        }
    }

    pub fn id(&self) -> PartId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_display(&self) -> bool {
        self.has_display
    }

    pub fn state(&self) -> PartState {
        self.state
    }

    pub fn mark_running(&mut self) {
        self.state = PartState::Running;
    }

    pub fn set_view(&mut self, view: &Arc<dyn PartView>) {
        self.view = Some(Arc::downgrade(view));
    }

    /// The attached view, if the part displays and the view is still alive.
    pub fn view(&self) -> Option<Arc<dyn PartView>> {
        if !self.has_display {
            return None;
        }
        self.view.as_ref().and_then(Weak::upgrade)
    }
}

/// A simulated unit driven once per tick by the controller.
pub trait ComputerPart {
    fn id(&self) -> PartId;
    fn name(&self) -> &str;
    fn has_display(&self) -> bool;
    fn state(&self) -> PartState;

    /// Reads inputs, evaluates, writes outputs and, when displaying, pushes
    /// the new values to the attached view.
    fn recompute(&mut self) -> Result<(), SimError>;
}
