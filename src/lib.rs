//! # Rusty Gates
//!
//! A digital-logic simulation kernel written in Rust.
//!
//! This library provides:
//! - Fixed-width pins shared between gates, with a single wrap-on-write policy
//! - A gate evaluation contract for built-in primitives and composite chips
//! - A library of built-in chips (Nand .. DMux8Way) behind a name registry
//! - Computer parts with an optional, weakly held display view
//! - Ordered, panic-isolated error fan-out from parts to their listeners
//! - JSON configuration and `tracing`-based logging

pub mod chips;
pub mod composite;
pub mod config;
pub mod error;
pub mod events;
pub mod gate;
pub mod gate_part;
pub mod interactive;
pub mod logging;
pub mod part;
pub mod pin;
pub mod types;

// Re-export commonly used items for easier importing
pub use chips::ChipRegistry;
pub use composite::{CompositeBuilder, CompositeGate};
pub use error::SimError;
pub use events::{ErrorEvent, ErrorListener, PartId};
pub use gate::{BuiltInChip, BuiltInGate, Gate, OutputBuffer};
pub use gate_part::GatePart;
pub use interactive::{ErrorReporter, InteractiveComputerPart};
pub use part::{ComputerPart, PartState, PartView, PinValues};
pub use pin::{Pin, PinSpec};
pub use types::Word;
