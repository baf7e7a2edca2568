use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("Invalid pin width {width} for '{pin}' (expected 1..=16)")]
    InvalidWidth { pin: String, width: u8 },

    #[error("Unknown pin '{pin}' on '{part}'")]
    UnknownPin { part: String, pin: String },

    #[error("Duplicate pin '{pin}' on '{part}'")]
    DuplicatePin { part: String, pin: String },

    #[error("Unknown chip type: {0}")]
    UnknownChip(String),

    #[error("Chip '{chip}' expects {expected} {direction} pins, got {actual}")]
    PinCountMismatch {
        chip: String,
        direction: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Width mismatch on '{pin}': expected {expected}, got {actual}")]
    WidthMismatch { pin: String, expected: u8, actual: u8 },

    #[error("Evaluation fault in '{gate}': {message}")]
    Evaluation { gate: String, message: String },

    #[error("Chip '{gate}' left output '{pin}' unassigned")]
    UnassignedOutput { gate: String, pin: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SimError {
    pub fn evaluation(gate: impl Into<String>, message: impl Into<String>) -> Self {
        SimError::Evaluation {
            gate: gate.into(),
            message: message.into(),
        }
    }
}
