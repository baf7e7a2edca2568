//! # Fault Reporting
//!
//! Interactive parts report faults (invalid values, evaluation errors,
//! errors detected by their view) to an ordered list of listeners.
//!
//! The capability lives in [`ErrorReporter`], which a part holds by
//! composition. The reporter is itself an [`ErrorListener`], so it can be
//! registered with the part's view, or with another part, and re-emit
//! whatever it receives under its own part's identity:
//!
//! ```text
//! view --error_occurred--> reporter --notify--> listener 1, listener 2, ...
//! ```
//!
//! Listeners are held weakly. Delivery is sequential in registration order,
//! and a panicking listener is logged and skipped so later listeners still
//! receive the event.
//!
//! Chains may form cycles (part A forwards to B, B forwards to A). A
//! reporter that receives an event while it is still re-emitting an earlier
//! one drops the nested event with a warning, so a cycle delivers each event
//! once around the loop and then stops.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use tracing::{debug, warn};

use crate::events::{ErrorEvent, ErrorListener, PartId};
use crate::part::ComputerPart;

pub struct ErrorReporter {
    source: PartId,
    source_name: String,
    listeners: Mutex<Vec<Weak<dyn ErrorListener>>>,
    reemitting: AtomicBool,
}

impl ErrorReporter {
    pub fn new(source: PartId, source_name: impl Into<String>) -> Self {
        ErrorReporter {
            source,
            source_name: source_name.into(),
            listeners: Mutex::new(Vec::new()),
            reemitting: AtomicBool::new(false),
        }
    }

    pub fn source(&self) -> PartId {
        self.source
    }

    /// Appends `listener`. Registering the same listener twice delivers
    /// every event to it twice.
    pub fn add_error_listener(&self, listener: &Arc<dyn ErrorListener>) {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        listeners.retain(|l| l.strong_count() > 0);
        listeners.push(Arc::downgrade(listener));
    }

    /// Removes the first registration of `listener`; unknown listeners are
    /// ignored.
    pub fn remove_error_listener(&self, listener: &Arc<dyn ErrorListener>) {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let target = Arc::as_ptr(listener);
        if let Some(index) = listeners
            .iter()
            .position(|l| std::ptr::addr_eq(l.as_ptr(), target))
        {
            listeners.remove(index);
        }
    }

    /// Number of registered listeners that are still alive.
    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|l| l.strong_count() > 0)
            .count()
    }

    pub fn notify_error_listeners(&self, message: Option<&str>) {
        let event = ErrorEvent::new(
            self.source,
            self.source_name.as_str(),
            message.map(str::to_string),
        );
        self.deliver(&event);
    }

    /// Tells every listener to drop any error shown for this part.
    pub fn clear_error_listeners(&self) {
        self.notify_error_listeners(None);
    }

    fn deliver(&self, event: &ErrorEvent) {
        // Snapshot so listeners may (un)register while being notified.
        let listeners: Vec<Weak<dyn ErrorListener>> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        debug!(
            part = %self.source_name,
            listeners = listeners.len(),
            clear = event.is_clear(),
            "delivering error event"
        );

        for listener in listeners.iter().filter_map(Weak::upgrade) {
            let delivered =
                panic::catch_unwind(AssertUnwindSafe(|| listener.error_occurred(event)));
            if delivered.is_err() {
                warn!(part = %self.source_name, "error listener panicked; continuing");
            }
        }
    }
}

impl ErrorListener for ErrorReporter {
    /// Re-emits an event received from a view (or another part) as this
    /// part's own error.
    fn error_occurred(&self, event: &ErrorEvent) {
        if self.reemitting.swap(true, Ordering::AcqRel) {
            warn!(
                part = %self.source_name,
                from = %event.source_name(),
                "error event looped back to its reporter; dropping"
            );
            return;
        }
        let _reset = ReemitGuard(&self.reemitting);
        self.notify_error_listeners(event.message());
    }
}

/// Clears the re-emission flag on every exit path.
struct ReemitGuard<'a>(&'a AtomicBool);

impl Drop for ReemitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl std::fmt::Debug for ErrorReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorReporter")
            .field("source", &self.source)
            .field("source_name", &self.source_name)
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// A computer part that reports faults to registered listeners.
pub trait InteractiveComputerPart: ComputerPart {
    fn reporter(&self) -> &Arc<ErrorReporter>;

    fn add_error_listener(&self, listener: &Arc<dyn ErrorListener>) {
        self.reporter().add_error_listener(listener);
    }

    fn remove_error_listener(&self, listener: &Arc<dyn ErrorListener>) {
        self.reporter().remove_error_listener(listener);
    }

    fn notify_error_listeners(&self, message: &str) {
        self.reporter().notify_error_listeners(Some(message));
    }

    fn clear_error_listeners(&self) {
        self.reporter().clear_error_listeners();
    }

    /// Entry point for errors raised by the part's view.
    fn error_occurred(&self, event: &ErrorEvent) {
        ErrorListener::error_occurred(&**self.reporter(), event);
    }

    /// This part's reporter as a listener handle, for chaining parts.
    fn as_error_listener(&self) -> Arc<dyn ErrorListener> {
        self.reporter().clone()
    }
}
