mod format_tests;
mod ir_tests;
mod lowering_tests;
mod resolution_tests;

use crate::conversion::dex_builder::DexCode;
use crate::conversion::ir_builder::IrBuilder;
use crate::conversion::MethodCode;
use crate::dex::error::DexError;
use crate::dex::instructions::{encode_method, DexInstruction};
use crate::dex::opcode_format::Operands;
use crate::dex::opcodes::find_opcode_by_name;
use crate::hierarchy::ClassHierarchy;
use crate::ir::IrCode;
use crate::items::{ConstantPool, DexMethod};
use crate::options::CompilerOptions;
use crate::processor::MethodProcessor;

pub(crate) fn insn(name: &str, operands: Operands) -> DexInstruction {
    DexInstruction::new(find_opcode_by_name(name).unwrap(), operands).unwrap()
}

/// A method body with `ins_size` derived from the signature.
pub(crate) fn method_code(signature: &str, is_static: bool, registers_size: u16, body: &[DexInstruction]) -> MethodCode {
    let method = DexMethod::parse(signature).unwrap();
    let ins_size = method.proto.parameter_registers() as u16 + if is_static { 0 } else { 1 };
    MethodCode { method, is_static, registers_size, ins_size, insns: encode_method(body) }
}

pub(crate) fn build_ir(pool: &ConstantPool, method: &MethodCode) -> Result<IrCode, DexError> {
    IrBuilder::build(method, pool, &CompilerOptions::with_min_api_level(28))
}

pub(crate) fn process(pool: &ConstantPool, method: &MethodCode) -> Result<DexCode, DexError> {
    let hierarchy = ClassHierarchy::new(vec![]);
    let options = CompilerOptions::with_min_api_level(28);
    MethodProcessor::new(pool, pool, &hierarchy, &options).process(method)
}

pub(crate) fn names(code: &DexCode) -> Vec<&'static str> {
    code.instructions.iter().map(|i| i.name()).collect()
}
