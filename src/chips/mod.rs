// Built-in primitive chips
pub mod demux;
pub mod logic;
pub mod mux;
pub mod registry;

// Re-export the chip types
pub use demux::{DMux, DMux4Way, DMux8Way};
pub use logic::{And, Nand, Not, Not16, Or, Xor};
pub use mux::{Mux, Mux16};
pub use registry::ChipRegistry;
