use std::collections::HashMap;

use crate::error::SimError;
use crate::gate::{BuiltInChip, BuiltInGate};

use super::{And, DMux, DMux4Way, DMux8Way, Mux, Mux16, Nand, Not, Not16, Or, Xor};

pub type ChipConstructor = fn() -> Box<dyn BuiltInChip>;

/// Name -> constructor table for built-in chips.
#[derive(Debug, Clone)]
pub struct ChipRegistry {
    constructors: HashMap<String, ChipConstructor>,
}

impl ChipRegistry {
    pub fn new() -> Self {
        let mut registry = ChipRegistry {
            constructors: HashMap::new(),
        };
        registry.register_default_chips();
        registry
    }

    /// A registry with nothing registered.
    pub fn empty() -> Self {
        ChipRegistry {
            constructors: HashMap::new(),
        }
    }

    fn register_default_chips(&mut self) {
        self.register("Nand", || Box::new(Nand));
        self.register("Not", || Box::new(Not));
        self.register("And", || Box::new(And));
        self.register("Or", || Box::new(Or));
        self.register("Xor", || Box::new(Xor));
        self.register("Not16", || Box::new(Not16));
        self.register("Mux", || Box::new(Mux));
        self.register("Mux16", || Box::new(Mux16));
        self.register("DMux", || Box::new(DMux));
        self.register("DMux4Way", || Box::new(DMux4Way));
        self.register("DMux8Way", || Box::new(DMux8Way));
    }

    /// Registers (or replaces) a chip constructor.
    pub fn register(&mut self, name: &str, constructor: ChipConstructor) {
        self.constructors.insert(name.to_string(), constructor);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    pub fn create(&self, name: &str) -> Result<Box<dyn BuiltInChip>, SimError> {
        self.constructors
            .get(name)
            .map(|constructor| constructor())
            .ok_or_else(|| SimError::UnknownChip(name.to_string()))
    }

    /// Creates the chip wrapped in a gate with its own fresh pins.
    pub fn create_gate(&self, name: &str) -> Result<BuiltInGate, SimError> {
        BuiltInGate::new(self.create(name)?)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ChipRegistry {
    fn default() -> Self {
        Self::new()
    }
}
