//! Lowers IR back to dex instructions, using the registers chosen by a [`RegisterAllocation`].
//!
//! Every node gets the most compact format its registers and literal allow. Branches are laid
//! out once all instructions are known: goto sizes are grown until offsets stop moving, and
//! switch and array payloads go after the code.

use crate::dex::error::DexError;
use crate::dex::instructions::{encode_method, DexInstruction};
use crate::dex::opcode_format::{Opcode, Operands};
use crate::dex::opcodes::opcode;
use crate::dex::{MAX_NON_RANGED_ARGUMENT_REGISTERS, U4BIT_MAX, U8BIT_MAX};
use crate::ir::invoke::Invoke;
use crate::ir::{
    BinopKind, BlockId, CmpBias, Instruction, InstructionKind, IrCode, MonitorType, ValueId, ValueType,
};
use crate::items::IndexResolver;
use crate::regalloc::RegisterAllocation;
use log::{debug, trace};
use num_traits::ToPrimitive;
use std::collections::HashMap;

/// The lowered body of one method.
#[derive(Debug, Clone, PartialEq)]
pub struct DexCode {
    pub registers_size: u16,
    pub ins_size: u16,
    pub outs_size: u16,
    pub instructions: Vec<DexInstruction>,
}

impl DexCode {
    pub fn encode(&self) -> Vec<u16> {
        encode_method(&self.instructions)
    }
}

enum Item {
    Fixed(DexInstruction),
    Goto(BlockId),
    If { opcode: &'static Opcode, registers: Vec<u16>, target: BlockId },
    /// A 31t instruction pointing at `payloads[payload]`.
    PayloadRef { opcode: &'static Opcode, register: u16, payload: usize },
}

enum Payload {
    Switch { packed: bool, keys: Vec<i32>, targets: Vec<BlockId>, owner: usize },
    Array { element_width: u16, size: u32, data: Vec<u8> },
}

impl Payload {
    fn opcode(&self) -> Result<&'static Opcode, DexError> {
        match self {
            Payload::Switch { packed: true, .. } => opcode("packed-switch-payload"),
            Payload::Switch { packed: false, .. } => opcode("sparse-switch-payload"),
            Payload::Array { .. } => opcode("array-payload"),
        }
    }

    fn operands(&self, relative_targets: Vec<i32>) -> Operands {
        match self {
            Payload::Switch { packed: true, keys, .. } => Operands::PackedSwitchPayload {
                first_key: keys.first().copied().unwrap_or(0),
                targets: relative_targets,
            },
            Payload::Switch { packed: false, keys, .. } => Operands::SparseSwitchPayload {
                keys: keys.clone(),
                targets: relative_targets,
            },
            Payload::Array { element_width, size, data } => Operands::ArrayPayload {
                element_width: *element_width,
                size: *size,
                data: data.clone(),
            },
        }
    }

    fn size(&self) -> usize {
        let targets = match self {
            Payload::Switch { targets, .. } => targets.len(),
            Payload::Array { .. } => 0,
        };
        self.operands(vec![0; targets]).units()
    }
}

pub struct DexBuilder<'a> {
    code: &'a IrCode,
    allocation: &'a dyn RegisterAllocation,
    indices: &'a dyn IndexResolver,
    items: Vec<Item>,
    payloads: Vec<Payload>,
    /// Index of the first item of each block.
    block_starts: Vec<usize>,
    outs_size: u32,
}

fn fits_i4(v: i64) -> bool {
    (-8..=7).contains(&v)
}

fn fits_i8(v: i64) -> bool {
    v.to_i8().is_some()
}

fn fits_i16(v: i64) -> bool {
    v.to_i16().is_some()
}

fn fits_i32(v: i64) -> bool {
    v.to_i32().is_some()
}

fn is_u4(register: u16) -> bool {
    register as u32 <= U4BIT_MAX
}

fn is_u8(register: u16) -> bool {
    register as u32 <= U8BIT_MAX
}

impl<'a> DexBuilder<'a> {
    pub fn new(code: &'a IrCode, allocation: &'a dyn RegisterAllocation, indices: &'a dyn IndexResolver) -> Self {
        DexBuilder {
            code,
            allocation,
            indices,
            items: Vec::new(),
            payloads: Vec::new(),
            block_starts: Vec::new(),
            outs_size: 0,
        }
    }

    pub fn build(mut self) -> Result<DexCode, DexError> {
        self.check_phis()?;
        let code = self.code;
        let blocks = code.blocks();
        for (index, block) in blocks.iter().enumerate() {
            self.block_starts.push(self.items.len());
            let next = blocks.get(index + 1).map(|b| b.id);
            for id in &block.instructions {
                let instruction = code.instruction(*id);
                self.lower(instruction, next)?;
            }
        }
        let instructions = self.layout()?;
        let outs_size = match self.outs_size.to_u16() {
            Some(outs) => outs,
            None => fail!("{} outgoing argument registers", self.outs_size),
        };
        debug!("Lowered {} to {} instructions", self.code.method, instructions.len());
        Ok(DexCode {
            registers_size: self.allocation.registers_size(),
            ins_size: self.code.ins_size,
            outs_size,
            instructions,
        })
    }

    /// Phi operands have to arrive in the phi's own register.
    fn check_phis(&self) -> Result<(), DexError> {
        for block in self.code.blocks() {
            let entry = block.instructions.first().map_or(0, |i| self.code.instruction(*i).number);
            for phi in &block.phis {
                let register = self.allocation.register_of(self.code.value(*phi), entry)?;
                for (operand, predecessor) in self.code.phi_operands(*phi).iter().zip(&block.predecessors) {
                    let exit = self
                        .code
                        .block(*predecessor)
                        .instructions
                        .last()
                        .map_or(0, |i| self.code.instruction(*i).number);
                    let operand_register = self.allocation.register_of(self.code.value(*operand), exit)?;
                    if operand_register != register {
                        fail!(
                            "Phi v{} is in register v{} but its operand v{} is in v{}",
                            phi.0,
                            register,
                            operand.0,
                            operand_register
                        );
                    }
                }
            }
        }
        Ok(())
    }

    fn register(&self, value: ValueId, number: u32) -> Result<u16, DexError> {
        self.allocation.register_of(self.code.value(value), number)
    }

    fn in_register(&self, instruction: &Instruction, index: usize) -> Result<u16, DexError> {
        match instruction.in_values.get(index) {
            Some(value) => self.register(*value, instruction.number),
            None => fail!("{} has no operand {}", instruction.kind.name(), index),
        }
    }

    fn out_register(&self, instruction: &Instruction) -> Result<u16, DexError> {
        match instruction.out_value {
            Some(value) => self.register(value, instruction.number),
            None => fail!("{} has no out value", instruction.kind.name()),
        }
    }

    fn out_type(&self, instruction: &Instruction) -> Result<ValueType, DexError> {
        match instruction.out_value {
            Some(value) => Ok(self.code.value(value).ty),
            None => fail!("{} has no out value", instruction.kind.name()),
        }
    }

    fn emit(&mut self, name: &str, operands: Operands) -> Result<(), DexError> {
        let insn = DexInstruction::new(opcode(name)?, operands)?;
        self.items.push(Item::Fixed(insn));
        Ok(())
    }

    fn index<T: std::fmt::Display>(&self, kind: &str, item: &T, index: Option<u32>) -> Result<u32, DexError> {
        match index {
            Some(index) => Ok(index),
            None => fail!("No {} index for {}", kind, item),
        }
    }

    fn lower(&mut self, instruction: &Instruction, next_block: Option<BlockId>) -> Result<(), DexError> {
        let number = instruction.number;
        match &instruction.kind {
            InstructionKind::Argument => {}
            InstructionKind::ConstNumber(literal) => {
                let dest = self.out_register(instruction)?;
                self.lower_const(self.out_type(instruction)?, dest, *literal)?;
            }
            InstructionKind::ConstString(string) => {
                let index = self.index("string", string, self.indices.string_index(string))?;
                let a = self.out_register(instruction)?;
                if index > 0xffff {
                    self.emit("const-string/jumbo", Operands::F31c { a, index })?;
                } else {
                    self.emit("const-string", Operands::F21c { a, index })?;
                }
            }
            InstructionKind::ConstClass(class) => {
                let index = self.index("type", class, self.indices.type_index(class))?;
                let a = self.out_register(instruction)?;
                self.emit("const-class", Operands::F21c { a, index })?;
            }
            InstructionKind::ConstMethodHandle(handle) => {
                let index = self.index("method handle", handle, self.indices.method_handle_index(handle))?;
                let a = self.out_register(instruction)?;
                self.emit("const-method-handle", Operands::F21c { a, index })?;
            }
            InstructionKind::ConstMethodType(proto) => {
                let index = self.index("proto", proto, self.indices.proto_index(proto))?;
                let a = self.out_register(instruction)?;
                self.emit("const-method-type", Operands::F21c { a, index })?;
            }
            InstructionKind::Move => {
                let dest = self.out_register(instruction)?;
                let src = self.in_register(instruction, 0)?;
                self.lower_move(self.out_type(instruction)?, dest, src)?;
            }
            InstructionKind::MoveException => {
                let a = self.out_register(instruction)?;
                self.emit("move-exception", Operands::F11x { a })?;
            }
            InstructionKind::Return => match instruction.in_values.first() {
                None => self.emit("return-void", Operands::F10x)?,
                Some(value) => {
                    // Null constants are untyped in the IR; the declared return type decides.
                    let name = match self.code.method.proto.return_type.value_type() {
                        Some(ValueType::Single) => "return",
                        Some(ValueType::Wide) => "return-wide",
                        Some(ValueType::Object) => "return-object",
                        None => fail!("{} returns a value from a void method", self.code.method),
                    };
                    let a = self.register(*value, number)?;
                    self.emit(name, Operands::F11x { a })?;
                }
            },
            InstructionKind::Throw => {
                let a = self.in_register(instruction, 0)?;
                self.emit("throw", Operands::F11x { a })?;
            }
            InstructionKind::Monitor(kind) => {
                let name = match kind {
                    MonitorType::Enter => "monitor-enter",
                    MonitorType::Exit => "monitor-exit",
                };
                let a = self.in_register(instruction, 0)?;
                self.emit(name, Operands::F11x { a })?;
            }
            InstructionKind::CheckCast(class) => {
                let index = self.index("type", class, self.indices.type_index(class))?;
                let object = self.in_register(instruction, 0)?;
                let a = self.out_register(instruction)?;
                if object != a {
                    self.lower_move(ValueType::Object, a, object)?;
                }
                self.emit("check-cast", Operands::F21c { a, index })?;
            }
            InstructionKind::InstanceOf(class) => {
                let index = self.index("type", class, self.indices.type_index(class))?;
                let a = self.out_register(instruction)?;
                let b = self.in_register(instruction, 0)?;
                self.emit("instance-of", Operands::F22c { a, b, index })?;
            }
            InstructionKind::ArrayLength => {
                let a = self.out_register(instruction)?;
                let b = self.in_register(instruction, 0)?;
                self.emit("array-length", Operands::F12x { a, b })?;
            }
            InstructionKind::NewInstance(class) => {
                let index = self.index("type", class, self.indices.type_index(class))?;
                let a = self.out_register(instruction)?;
                self.emit("new-instance", Operands::F21c { a, index })?;
            }
            InstructionKind::NewArrayEmpty(array_type) => {
                let index = self.index("type", array_type, self.indices.type_index(array_type))?;
                let a = self.out_register(instruction)?;
                let b = self.in_register(instruction, 0)?;
                self.emit("new-array", Operands::F22c { a, b, index })?;
            }
            InstructionKind::NewArrayFilledData { element_width, size, data } => {
                let register = self.in_register(instruction, 0)?;
                self.payloads.push(Payload::Array { element_width: *element_width, size: *size, data: data.clone() });
                let payload = self.payloads.len() - 1;
                self.items.push(Item::PayloadRef { opcode: opcode("fill-array-data")?, register, payload });
            }
            InstructionKind::ArrayGet(ty) => {
                let a = self.out_register(instruction)?;
                let b = self.in_register(instruction, 0)?;
                let c = self.in_register(instruction, 1)?;
                self.emit(&format!("aget{}", ty.suffix()), Operands::F23x { a, b, c })?;
            }
            InstructionKind::ArrayPut(ty) => {
                let a = self.in_register(instruction, 0)?;
                let b = self.in_register(instruction, 1)?;
                let c = self.in_register(instruction, 2)?;
                self.emit(&format!("aput{}", ty.suffix()), Operands::F23x { a, b, c })?;
            }
            InstructionKind::InstanceGet(ty, field) => {
                let index = self.index("field", field, self.indices.field_index(field))?;
                let a = self.out_register(instruction)?;
                let b = self.in_register(instruction, 0)?;
                self.emit(&format!("iget{}", ty.suffix()), Operands::F22c { a, b, index })?;
            }
            InstructionKind::InstancePut(ty, field) => {
                let index = self.index("field", field, self.indices.field_index(field))?;
                let a = self.in_register(instruction, 0)?;
                let b = self.in_register(instruction, 1)?;
                self.emit(&format!("iput{}", ty.suffix()), Operands::F22c { a, b, index })?;
            }
            InstructionKind::StaticGet(ty, field) => {
                let index = self.index("field", field, self.indices.field_index(field))?;
                let a = self.out_register(instruction)?;
                self.emit(&format!("sget{}", ty.suffix()), Operands::F21c { a, index })?;
            }
            InstructionKind::StaticPut(ty, field) => {
                let index = self.index("field", field, self.indices.field_index(field))?;
                let a = self.in_register(instruction, 0)?;
                self.emit(&format!("sput{}", ty.suffix()), Operands::F21c { a, index })?;
            }
            InstructionKind::Goto(target) => {
                if Some(*target) != next_block {
                    self.items.push(Item::Goto(*target));
                }
            }
            InstructionKind::If { kind, target } => {
                let mut registers = Vec::with_capacity(instruction.in_values.len());
                for index in 0..instruction.in_values.len() {
                    registers.push(self.in_register(instruction, index)?);
                }
                let name = match registers.len() {
                    1 => format!("if-{}z", kind.mnemonic()),
                    _ => format!("if-{}", kind.mnemonic()),
                };
                self.items.push(Item::If { opcode: opcode(&name)?, registers, target: *target });
                self.fallthrough(instruction.block, next_block);
            }
            InstructionKind::Switch { keys, targets } => {
                let register = self.in_register(instruction, 0)?;
                let packed = !keys.is_empty()
                    && keys.windows(2).all(|w| w[0].checked_add(1) == Some(w[1]));
                let (keys, targets) = if packed {
                    (keys.clone(), targets.clone())
                } else {
                    let mut pairs: Vec<(i32, BlockId)> = keys.iter().copied().zip(targets.iter().copied()).collect();
                    pairs.sort_by_key(|(key, _)| *key);
                    pairs.into_iter().unzip()
                };
                let name = if packed { "packed-switch" } else { "sparse-switch" };
                self.payloads.push(Payload::Switch { packed, keys, targets, owner: self.items.len() });
                let payload = self.payloads.len() - 1;
                self.items.push(Item::PayloadRef { opcode: opcode(name)?, register, payload });
                self.fallthrough(instruction.block, next_block);
            }
            InstructionKind::Cmp { ty, bias } => {
                let prefix = match bias {
                    CmpBias::None => "cmp",
                    CmpBias::Lt => "cmpl",
                    CmpBias::Gt => "cmpg",
                };
                let a = self.out_register(instruction)?;
                let b = self.in_register(instruction, 0)?;
                let c = self.in_register(instruction, 1)?;
                self.emit(&format!("{}-{}", prefix, ty.name()), Operands::F23x { a, b, c })?;
            }
            InstructionKind::Neg(ty) | InstructionKind::Not(ty) => {
                let prefix = if matches!(instruction.kind, InstructionKind::Neg(_)) { "neg" } else { "not" };
                let a = self.out_register(instruction)?;
                let b = self.in_register(instruction, 0)?;
                self.emit(&format!("{}-{}", prefix, ty.name()), Operands::F12x { a, b })?;
            }
            InstructionKind::NumberConversion { from, to } => {
                let a = self.out_register(instruction)?;
                let b = self.in_register(instruction, 0)?;
                self.emit(&format!("{}-to-{}", from.name(), to.name()), Operands::F12x { a, b })?;
            }
            InstructionKind::Binop { op, ty, literal, reversed } => {
                let a = self.out_register(instruction)?;
                let b = self.in_register(instruction, 0)?;
                match literal {
                    Some(literal) => self.lower_binop_literal(*op, *reversed, a, b, *literal as i64)?,
                    None => {
                        let c = self.in_register(instruction, 1)?;
                        let name = format!("{}-{}", op.mnemonic(), ty.name());
                        if a == b && is_u4(a) && is_u4(c) {
                            self.emit(&format!("{}/2addr", name), Operands::F12x { a, b: c })?;
                        } else {
                            self.emit(&name, Operands::F23x { a, b, c })?;
                        }
                    }
                }
            }
            InstructionKind::Invoke(invoke) => self.lower_invoke(instruction, invoke)?,
        }
        Ok(())
    }

    /// Keeps the fallthrough of a conditional branch reachable when it is not laid out next.
    fn fallthrough(&mut self, block: BlockId, next_block: Option<BlockId>) {
        if let Some(fallthrough) = self.code.block(block).successors.first() {
            if Some(*fallthrough) != next_block {
                self.items.push(Item::Goto(*fallthrough));
            }
        }
    }

    fn lower_const(&mut self, ty: ValueType, a: u16, literal: i64) -> Result<(), DexError> {
        if ty == ValueType::Wide {
            if fits_i16(literal) {
                self.emit("const-wide/16", Operands::F21s { a, literal })
            } else if fits_i32(literal) {
                self.emit("const-wide/32", Operands::F31i { a, literal })
            } else if literal & 0xffff_ffff_ffff == 0 {
                self.emit("const-wide/high16", Operands::F21h { a, high: literal >> 48 })
            } else {
                self.emit("const-wide", Operands::F51l { a, literal })
            }
        } else if is_u4(a) && fits_i4(literal) {
            self.emit("const/4", Operands::F11n { a, literal })
        } else if fits_i16(literal) {
            self.emit("const/16", Operands::F21s { a, literal })
        } else if literal & 0xffff == 0 && fits_i32(literal) {
            self.emit("const/high16", Operands::F21h { a, high: literal >> 16 })
        } else {
            self.emit("const", Operands::F31i { a, literal })
        }
    }

    fn lower_move(&mut self, ty: ValueType, a: u16, b: u16) -> Result<(), DexError> {
        let name = match ty {
            ValueType::Single => "move",
            ValueType::Wide => "move-wide",
            ValueType::Object => "move-object",
        };
        if is_u4(a) && is_u4(b) {
            self.emit(name, Operands::F12x { a, b })
        } else if is_u8(a) {
            self.emit(&format!("{}/from16", name), Operands::F22x { a, b })
        } else {
            self.emit(&format!("{}/16", name), Operands::F32x { a, b })
        }
    }

    fn lower_binop_literal(&mut self, op: BinopKind, reversed: bool, a: u16, b: u16, literal: i64) -> Result<(), DexError> {
        let name = if reversed {
            "rsub-int".to_string()
        } else {
            format!("{}-int", op.mnemonic())
        };
        if fits_i8(literal) {
            self.emit(&format!("{}/lit8", name), Operands::F22b { a, b, literal })
        } else if reversed {
            self.emit(&name, Operands::F22s { a, b, literal })
        } else {
            self.emit(&format!("{}/lit16", name), Operands::F22s { a, b, literal })
        }
    }

    fn lower_invoke(&mut self, instruction: &Instruction, invoke: &Invoke) -> Result<(), DexError> {
        let number = instruction.number;
        let units = self.code.required_argument_registers(instruction.id);
        let high = instruction
            .in_values
            .iter()
            .any(|v| self.allocation.uses_high_register(self.code.value(*v), number));
        let ranged = units > MAX_NON_RANGED_ARGUMENT_REGISTERS || high;

        let index = match invoke {
            Invoke::NewArray(array_type) => self.index("type", array_type, self.indices.type_index(array_type))?,
            Invoke::Custom(call_site) => self.index("call site", call_site, self.indices.call_site_index(call_site))?,
            _ => match invoke.method() {
                Some(method) => self.index("method", method, self.indices.method_index(method))?,
                None => fail!("{} has no method", invoke),
            },
        };
        let proto = match invoke {
            Invoke::Polymorphic { proto, .. } => Some(self.index("proto", proto, self.indices.proto_index(proto))?),
            _ => None,
        };

        let operands = if ranged {
            let mut first = None;
            let mut expected = 0u32;
            for value in &instruction.in_values {
                let value = self.code.value(*value);
                let register = self.allocation.register_for_ranged_argument(value, number)? as u32;
                let start = *first.get_or_insert(register);
                if register != start + expected {
                    fail!("Arguments of ranged {} are not in contiguous registers", invoke);
                }
                expected += value.required_registers();
            }
            let first = first.unwrap_or(0) as u16;
            let count = units as u16;
            match proto {
                Some(proto) => Operands::F4rcc { first, count, index, proto },
                None => Operands::F3rc { first, count, index },
            }
        } else {
            let mut registers = Vec::with_capacity(units as usize);
            for value in &instruction.in_values {
                let value = self.code.value(*value);
                let register = self.allocation.register_of(value, number)?;
                registers.push(register);
                if value.ty == ValueType::Wide {
                    registers.push(register + 1);
                }
            }
            match proto {
                Some(proto) => Operands::F45cc { registers, index, proto },
                None => Operands::F35c { registers, index },
            }
        };
        trace!("{} needs {} argument registers, ranged: {}", invoke, units, ranged);
        self.emit(invoke.opcode_name(ranged), operands)?;
        if !matches!(invoke, Invoke::NewArray(_)) {
            self.outs_size = self.outs_size.max(units);
        }

        if let Some(result) = instruction.out_value {
            let value = self.code.value(result);
            if value.is_used() {
                let name = match value.ty {
                    ValueType::Single => "move-result",
                    ValueType::Wide => "move-result-wide",
                    ValueType::Object => "move-result-object",
                };
                let a = self.register(result, number)?;
                self.emit(name, Operands::F11x { a })?;
            }
        }
        Ok(())
    }

    // Layout

    fn item_size(item: &Item, goto_size: usize) -> usize {
        match item {
            Item::Fixed(insn) => insn.size(),
            Item::Goto(_) => goto_size,
            Item::If { .. } => 2,
            Item::PayloadRef { .. } => 3,
        }
    }

    fn layout(&mut self) -> Result<Vec<DexInstruction>, DexError> {
        let mut goto_sizes: HashMap<usize, usize> = HashMap::new();
        let offsets = loop {
            let mut offsets = Vec::with_capacity(self.items.len() + 1);
            let mut offset = 0usize;
            for (index, item) in self.items.iter().enumerate() {
                offsets.push(offset);
                offset += Self::item_size(item, goto_sizes.get(&index).copied().unwrap_or(1));
            }
            offsets.push(offset);

            let mut changed = false;
            for (index, item) in self.items.iter().enumerate() {
                if let Item::Goto(target) = item {
                    let relative = offsets[self.block_starts[target.index()]] as i64 - offsets[index] as i64;
                    let needed = if relative == 0 {
                        3
                    } else if fits_i8(relative) {
                        1
                    } else if fits_i16(relative) {
                        2
                    } else {
                        3
                    };
                    let current = goto_sizes.entry(index).or_insert(1);
                    if needed > *current {
                        *current = needed;
                        changed = true;
                    }
                }
            }
            if !changed {
                break offsets;
            }
        };

        let code_end = offsets[self.items.len()];
        let mut payload_offsets = Vec::with_capacity(self.payloads.len());
        let mut offset = code_end;
        for payload in &self.payloads {
            offset += offset % 2;
            payload_offsets.push(offset);
            offset += payload.size();
        }

        let block_offset = |block: BlockId| offsets[self.block_starts[block.index()]] as i64;
        let relative = |from: usize, to: i64| -> Result<i32, DexError> {
            match (to - from as i64).to_i32() {
                Some(relative) => Ok(relative),
                None => fail!("Branch offset {} out of range", to - from as i64),
            }
        };

        let mut instructions = Vec::with_capacity(self.items.len() + self.payloads.len());
        for (index, item) in self.items.iter().enumerate() {
            let insn = match item {
                Item::Fixed(insn) => insn.clone(),
                Item::Goto(target) => {
                    let offset = relative(offsets[index], block_offset(*target))?;
                    match goto_sizes.get(&index).copied().unwrap_or(1) {
                        1 => DexInstruction::new(opcode("goto")?, Operands::F10t { offset })?,
                        2 => DexInstruction::new(opcode("goto/16")?, Operands::F20t { offset })?,
                        _ => DexInstruction::new(opcode("goto/32")?, Operands::F30t { offset })?,
                    }
                }
                Item::If { opcode, registers, target } => {
                    let offset = relative(offsets[index], block_offset(*target))?;
                    let operands = match registers.as_slice() {
                        [a] => Operands::F21t { a: *a, offset },
                        [a, b] => Operands::F22t { a: *a, b: *b, offset },
                        _ => fail!("{} with {} operands", opcode.name, registers.len()),
                    };
                    DexInstruction::new(*opcode, operands)?
                }
                Item::PayloadRef { opcode, register, payload } => {
                    let offset = relative(offsets[index], payload_offsets[*payload] as i64)?;
                    DexInstruction::new(*opcode, Operands::F31t { a: *register, offset })?
                }
            };
            instructions.push(insn);
        }

        let nop = opcode("nop")?;
        let mut offset = code_end;
        for payload in &self.payloads {
            if offset % 2 == 1 {
                instructions.push(DexInstruction::new(nop, Operands::F10x)?);
                offset += 1;
            }
            let relative_targets = match payload {
                Payload::Switch { targets, owner, .. } => {
                    let mut relative_targets = Vec::with_capacity(targets.len());
                    for target in targets {
                        relative_targets.push(relative(offsets[*owner], block_offset(*target))?);
                    }
                    relative_targets
                }
                Payload::Array { .. } => Vec::new(),
            };
            let insn = DexInstruction::new(payload.opcode()?, payload.operands(relative_targets))?;
            offset += insn.size();
            instructions.push(insn);
        }
        Ok(instructions)
    }
}
