use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_PART_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a computer part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartId(u64);

impl PartId {
    pub fn next() -> Self {
        PartId(NEXT_PART_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An error raised by (or on behalf of) a part.
///
/// A `None` message means "clear": listeners should drop whatever error
/// they are currently showing for `source`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEvent {
    source: PartId,
    source_name: String,
    message: Option<String>,
}

impl ErrorEvent {
    pub fn new(source: PartId, source_name: impl Into<String>, message: Option<String>) -> Self {
        ErrorEvent {
            source,
            source_name: source_name.into(),
            message,
        }
    }

    pub fn source(&self) -> PartId {
        self.source
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_clear(&self) -> bool {
        self.message.is_none()
    }
}

impl fmt::Display for ErrorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{} {}: {}", self.source_name, self.source, message),
            None => write!(f, "{} {}: cleared", self.source_name, self.source),
        }
    }
}

/// Receives error events from parts it has been registered with.
pub trait ErrorListener: Send + Sync {
    fn error_occurred(&self, event: &ErrorEvent);
}
