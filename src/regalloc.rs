//! The register allocation interface consumed when lowering IR back to dex.

use crate::dex::error::DexError;
use crate::dex::U4BIT_MAX;
use crate::ir::{IrCode, Value, ValueId};
use std::collections::HashMap;

/// Maps SSA values to dex registers at a given instruction number.
pub trait RegisterAllocation {
    /// Total number of registers the lowered method uses.
    fn registers_size(&self) -> u16;

    /// Register holding `value` at instruction `number`.
    fn register_of(&self, value: &Value, number: u32) -> Result<u16, DexError>;

    /// Register holding `value` when passed to a ranged invoke at instruction `number`.
    fn register_for_ranged_argument(&self, value: &Value, number: u32) -> Result<u16, DexError> {
        self.register_of(value, number)
    }

    /// Whether any register unit of `value` is above v15 at instruction `number`.
    fn uses_high_register(&self, value: &Value, number: u32) -> bool {
        match self.register_of(value, number) {
            Ok(register) => register as u32 + value.required_registers() - 1 > U4BIT_MAX,
            Err(_) => true,
        }
    }
}

/// An allocation that keeps every value in one register for its whole lifetime.
///
/// [`SlotAllocation::from_code`] reuses the dex registers recorded while building the IR, which
/// reproduces the input register assignment.
#[derive(Debug, Clone, Default)]
pub struct SlotAllocation {
    registers: HashMap<ValueId, u16>,
    registers_size: u16,
}

impl SlotAllocation {
    pub fn new(registers_size: u16) -> Self {
        SlotAllocation { registers: HashMap::new(), registers_size }
    }

    pub fn from_code(code: &IrCode) -> Self {
        let registers = code
            .values()
            .filter_map(|v| v.register.map(|r| (v.id, r)))
            .collect();
        SlotAllocation { registers, registers_size: code.registers_size }
    }

    /// Places `value` in `register`, growing the frame when needed.
    pub fn assign(&mut self, value: ValueId, register: u16, required_registers: u32) {
        self.registers.insert(value, register);
        let end = register as u32 + required_registers;
        if end > self.registers_size as u32 {
            self.registers_size = end.min(u16::MAX as u32) as u16;
        }
    }
}

impl RegisterAllocation for SlotAllocation {
    fn registers_size(&self) -> u16 {
        self.registers_size
    }

    fn register_of(&self, value: &Value, _number: u32) -> Result<u16, DexError> {
        match self.registers.get(&value.id) {
            Some(register) => Ok(*register),
            None => fail!("Value v{} has no register", value.id.0),
        }
    }
}
