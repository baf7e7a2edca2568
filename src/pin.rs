use std::sync::{Arc, RwLock};

use crate::error::SimError;
use crate::types::{fit_to_width, fits_width, is_valid_width, Word};

/// Static description of one pin in a chip interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinSpec {
    pub name: &'static str,
    pub width: u8,
}

impl PinSpec {
    pub const fn new(name: &'static str, width: u8) -> Self {
        PinSpec { name, width }
    }

    pub const fn bit(name: &'static str) -> Self {
        PinSpec { name, width: 1 }
    }
}

/// A named, fixed-width signal slot.
///
/// Pins are shared as `Arc<Pin>`: every gate wired to a pin holds the same
/// storage, so all readers observe the value its single driver last wrote.
#[derive(Debug)]
pub struct Pin {
    name: String,
    width: u8,
    value: RwLock<Word>,
}

impl Pin {
    pub fn new(name: impl Into<String>, width: u8) -> Result<Self, SimError> {
        let name = name.into();
        if !is_valid_width(width) {
            return Err(SimError::InvalidWidth { pin: name, width });
        }
        Ok(Pin {
            name,
            width,
            value: RwLock::new(0),
        })
    }

    pub fn from_spec(spec: &PinSpec) -> Result<Arc<Self>, SimError> {
        Pin::new(spec.name, spec.width).map(Arc::new)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn read(&self) -> Word {
        match self.value.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Stores `value` wrapped to the pin width (see [`fit_to_width`]).
    pub fn write(&self, value: i32) {
        let fitted = fit_to_width(value, self.width);
        match self.value.write() {
            Ok(mut guard) => *guard = fitted,
            Err(poisoned) => *poisoned.into_inner() = fitted,
        }
    }

    pub fn fits(&self, value: i32) -> bool {
        fits_width(value, self.width)
    }
}

impl std::fmt::Display for Pin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.name, self.width, self.read())
    }
}
