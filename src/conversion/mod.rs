//! Conversion between dex code and the IR, in both directions.

pub mod dex_builder;
pub mod ir_builder;

use crate::items::DexMethod;

/// The code item of one method, as found in a dex file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCode {
    pub method: DexMethod,
    pub is_static: bool,
    pub registers_size: u16,
    pub ins_size: u16,
    pub insns: Vec<u16>,
}

impl MethodCode {
    /// Register units taken by the incoming arguments, receiver included.
    pub fn argument_registers(&self) -> u32 {
        self.method.proto.parameter_registers() + if self.is_static { 0 } else { 1 }
    }
}
