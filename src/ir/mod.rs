//! SSA intermediate representation.
//!
//! An [`IrCode`] owns arenas of blocks, instructions and values; everything else refers to them
//! through the copyable ids [`BlockId`], [`InstructionId`] and [`ValueId`]. Every value is defined
//! exactly once, either by an instruction or by a phi at the head of a block, and keeps track of
//! its users so that uses can be rewritten in place.

pub mod inliner;
pub mod invoke;

use crate::dex::error::DexError;
use crate::hierarchy::TypeHierarchy;
use crate::items::{DexField, DexMethod, DexMethodHandle, DexProto, DexType};
use invoke::Invoke;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstructionId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

impl ValueId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl InstructionId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl BlockId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Register category of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    Single,
    Wide,
    Object,
}

impl ValueType {
    /// Number of consecutive registers a value of this type occupies.
    pub fn required_registers(self) -> u32 {
        match self {
            ValueType::Wide => 2,
            ValueType::Single | ValueType::Object => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericType {
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl NumericType {
    pub fn value_type(self) -> ValueType {
        match self {
            NumericType::Long | NumericType::Double => ValueType::Wide,
            _ => ValueType::Single,
        }
    }

    pub fn is_integral(self) -> bool {
        !matches!(self, NumericType::Float | NumericType::Double)
    }

    pub fn name(self) -> &'static str {
        match self {
            NumericType::Byte => "byte",
            NumericType::Char => "char",
            NumericType::Short => "short",
            NumericType::Int => "int",
            NumericType::Long => "long",
            NumericType::Float => "float",
            NumericType::Double => "double",
        }
    }
}

/// Type of the value moved by an array or field access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberType {
    Object,
    Boolean,
    Byte,
    Char,
    Short,
    Single,
    Wide,
}

impl MemberType {
    pub fn value_type(self) -> ValueType {
        match self {
            MemberType::Object => ValueType::Object,
            MemberType::Wide => ValueType::Wide,
            _ => ValueType::Single,
        }
    }

    /// Opcode suffix, `aget` + `-wide`.
    pub fn suffix(self) -> &'static str {
        match self {
            MemberType::Single => "",
            MemberType::Wide => "-wide",
            MemberType::Object => "-object",
            MemberType::Boolean => "-boolean",
            MemberType::Byte => "-byte",
            MemberType::Char => "-char",
            MemberType::Short => "-short",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IfType {
    Eq,
    Ne,
    Lt,
    Ge,
    Gt,
    Le,
}

impl IfType {
    pub fn mnemonic(self) -> &'static str {
        match self {
            IfType::Eq => "eq",
            IfType::Ne => "ne",
            IfType::Lt => "lt",
            IfType::Ge => "ge",
            IfType::Gt => "gt",
            IfType::Le => "le",
        }
    }
}

/// NaN bias of a floating point comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CmpBias {
    None,
    Gt,
    Lt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonitorType {
    Enter,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinopKind {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    Ushr,
}

impl BinopKind {
    pub fn mnemonic(self) -> &'static str {
        match self {
            BinopKind::Add => "add",
            BinopKind::Sub => "sub",
            BinopKind::Mul => "mul",
            BinopKind::Div => "div",
            BinopKind::Rem => "rem",
            BinopKind::And => "and",
            BinopKind::Or => "or",
            BinopKind::Xor => "xor",
            BinopKind::Shl => "shl",
            BinopKind::Shr => "shr",
            BinopKind::Ushr => "ushr",
        }
    }
}

/// What an instruction does. Operands live in [`Instruction::in_values`]; their order per kind
/// is documented on the variant.
#[derive(Debug, Clone, PartialEq)]
pub enum InstructionKind {
    /// Incoming parameter, only in the entry block.
    Argument,
    ConstNumber(i64),
    ConstString(String),
    ConstClass(DexType),
    ConstMethodHandle(DexMethodHandle),
    ConstMethodType(DexProto),
    /// `[source]`
    Move,
    MoveException,
    /// `[]` or `[value]`
    Return,
    /// `[exception]`
    Throw,
    /// `[object]`
    Monitor(MonitorType),
    /// `[object]`, defines a new value of the cast type.
    CheckCast(DexType),
    /// `[object]`
    InstanceOf(DexType),
    /// `[array]`
    ArrayLength,
    NewInstance(DexType),
    /// `[size]`
    NewArrayEmpty(DexType),
    /// `[array]`
    NewArrayFilledData { element_width: u16, size: u32, data: Vec<u8> },
    /// `[array, index]`
    ArrayGet(MemberType),
    /// `[value, array, index]`
    ArrayPut(MemberType),
    /// `[object]`
    InstanceGet(MemberType, DexField),
    /// `[value, object]`
    InstancePut(MemberType, DexField),
    StaticGet(MemberType, DexField),
    /// `[value]`
    StaticPut(MemberType, DexField),
    Goto(BlockId),
    /// `[left]` against zero or `[left, right]`. Falls through to the block's first successor.
    If { kind: IfType, target: BlockId },
    /// `[key]`. Falls through to the block's first successor.
    Switch { keys: Vec<i32>, targets: Vec<BlockId> },
    /// `[left, right]`
    Cmp { ty: NumericType, bias: CmpBias },
    /// `[source]`
    Neg(NumericType),
    /// `[source]`
    Not(NumericType),
    /// `[source]`
    NumberConversion { from: NumericType, to: NumericType },
    /// `[left, right]`, or `[left]` with a literal right operand. `reversed` computes
    /// `literal - left`.
    Binop { op: BinopKind, ty: NumericType, literal: Option<i32>, reversed: bool },
    /// Call arguments, receiver first.
    Invoke(Invoke),
}

impl InstructionKind {
    pub fn name(&self) -> String {
        match self {
            InstructionKind::Argument => "Argument".to_string(),
            InstructionKind::ConstNumber(v) => format!("ConstNumber {}", v),
            InstructionKind::ConstString(s) => format!("ConstString \"{}\"", s),
            InstructionKind::ConstClass(t) => format!("ConstClass {}", t),
            InstructionKind::ConstMethodHandle(h) => format!("ConstMethodHandle {}", h),
            InstructionKind::ConstMethodType(p) => format!("ConstMethodType {}", p),
            InstructionKind::Move => "Move".to_string(),
            InstructionKind::MoveException => "MoveException".to_string(),
            InstructionKind::Return => "Return".to_string(),
            InstructionKind::Throw => "Throw".to_string(),
            InstructionKind::Monitor(kind) => format!("Monitor {:?}", kind),
            InstructionKind::CheckCast(t) => format!("CheckCast {}", t),
            InstructionKind::InstanceOf(t) => format!("InstanceOf {}", t),
            InstructionKind::ArrayLength => "ArrayLength".to_string(),
            InstructionKind::NewInstance(t) => format!("NewInstance {}", t),
            InstructionKind::NewArrayEmpty(t) => format!("NewArrayEmpty {}", t),
            InstructionKind::NewArrayFilledData { element_width, size, .. } => {
                format!("NewArrayFilledData {}x{}", size, element_width)
            }
            InstructionKind::ArrayGet(t) => format!("ArrayGet{}", t.suffix()),
            InstructionKind::ArrayPut(t) => format!("ArrayPut{}", t.suffix()),
            InstructionKind::InstanceGet(_, f) => format!("InstanceGet {}", f),
            InstructionKind::InstancePut(_, f) => format!("InstancePut {}", f),
            InstructionKind::StaticGet(_, f) => format!("StaticGet {}", f),
            InstructionKind::StaticPut(_, f) => format!("StaticPut {}", f),
            InstructionKind::Goto(b) => format!("Goto block {}", b.0),
            InstructionKind::If { kind, target } => format!("If{} block {}", kind.mnemonic(), target.0),
            InstructionKind::Switch { keys, .. } => format!("Switch {:?}", keys),
            InstructionKind::Cmp { ty, bias } => format!("Cmp {} {:?}", ty.name(), bias),
            InstructionKind::Neg(t) => format!("Neg {}", t.name()),
            InstructionKind::Not(t) => format!("Not {}", t.name()),
            InstructionKind::NumberConversion { from, to } => format!("{}-to-{}", from.name(), to.name()),
            InstructionKind::Binop { op, ty, literal, reversed } => match (literal, reversed) {
                (Some(lit), true) => format!("{} {} #{} - x", op.mnemonic(), ty.name(), lit),
                (Some(lit), false) => format!("{} {} x, #{}", op.mnemonic(), ty.name(), lit),
                (None, _) => format!("{} {}", op.mnemonic(), ty.name()),
            },
            InstructionKind::Invoke(invoke) => invoke.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    Instruction(InstructionId),
    Phi { block: BlockId, operands: Vec<ValueId> },
    /// A phi that was found trivial and replaced.
    Removed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum User {
    Instruction(InstructionId),
    Phi(ValueId),
}

#[derive(Debug, Clone)]
pub struct Value {
    pub id: ValueId,
    pub ty: ValueType,
    pub definition: Definition,
    /// Dex register the value was read from or written to, when it came from dex code.
    pub register: Option<u16>,
    /// Class the runtime value is known to be an instance of, from new-instance or check-cast.
    pub known_class: Option<DexType>,
    users: Vec<User>,
}

impl Value {
    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn is_used(&self) -> bool {
        !self.users.is_empty()
    }

    pub fn is_phi(&self) -> bool {
        matches!(self.definition, Definition::Phi { .. })
    }

    pub fn required_registers(&self) -> u32 {
        self.ty.required_registers()
    }
}

#[derive(Debug, Clone)]
pub struct Instruction {
    pub id: InstructionId,
    /// Position in the linear order, spaced by [`INSTRUCTION_NUMBER_DELTA`].
    pub number: u32,
    pub block: BlockId,
    pub out_value: Option<ValueId>,
    pub in_values: Vec<ValueId>,
    pub kind: InstructionKind,
    /// Offset of the dex instruction this was built from.
    pub position: Option<u32>,
}

/// Gap between consecutive instruction numbers, leaving room for moves the allocator inserts.
pub const INSTRUCTION_NUMBER_DELTA: u32 = 2;

impl Instruction {
    pub fn can_throw(&self) -> bool {
        match &self.kind {
            InstructionKind::Argument
            | InstructionKind::ConstNumber(_)
            | InstructionKind::Move
            | InstructionKind::MoveException
            | InstructionKind::Return
            | InstructionKind::Goto(_)
            | InstructionKind::If { .. }
            | InstructionKind::Switch { .. }
            | InstructionKind::Cmp { .. }
            | InstructionKind::Neg(_)
            | InstructionKind::Not(_)
            | InstructionKind::NumberConversion { .. } => false,
            InstructionKind::Binop { op, ty, .. } => {
                matches!(op, BinopKind::Div | BinopKind::Rem) && ty.is_integral()
            }
            _ => true,
        }
    }

    pub fn as_invoke(&self) -> Option<&Invoke> {
        match &self.kind {
            InstructionKind::Invoke(invoke) => Some(invoke),
            _ => None,
        }
    }

    /// Builds a copy of the invoke `template` with new operands, going through the same factory
    /// as fresh invokes so the call kind and target are preserved.
    pub fn from_template(
        template: &Instruction,
        out_value: Option<ValueId>,
        in_values: Vec<ValueId>,
    ) -> Result<Instruction, DexError> {
        let invoke = match &template.kind {
            InstructionKind::Invoke(Invoke::Custom(call_site)) => Invoke::custom(call_site.clone()),
            InstructionKind::Invoke(invoke) => {
                Invoke::create(invoke.invoke_type(), invoke.target_item(), invoke.call_site_proto().cloned())?
            }
            other => fail!("{} is not an invoke", other.name()),
        };
        Ok(Instruction {
            id: template.id,
            number: template.number,
            block: template.block,
            out_value,
            in_values,
            kind: InstructionKind::Invoke(invoke),
            position: template.position,
        })
    }
}

#[derive(Debug, Clone)]
pub struct BasicBlock {
    pub id: BlockId,
    /// Offset of the first dex instruction of the block.
    pub offset: u32,
    pub phis: Vec<ValueId>,
    pub instructions: Vec<InstructionId>,
    pub predecessors: Vec<BlockId>,
    /// For `If` and `Switch` blocks the first successor is the fallthrough.
    pub successors: Vec<BlockId>,
}

/// The IR of one method.
#[derive(Debug, Clone)]
pub struct IrCode {
    pub method: DexMethod,
    pub is_static: bool,
    pub registers_size: u16,
    pub ins_size: u16,
    blocks: Vec<BasicBlock>,
    instructions: Vec<Instruction>,
    values: Vec<Value>,
}

impl IrCode {
    pub fn new(method: DexMethod, is_static: bool, registers_size: u16, ins_size: u16) -> Self {
        IrCode {
            method,
            is_static,
            registers_size,
            ins_size,
            blocks: Vec::new(),
            instructions: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Blocks in layout order.
    pub fn blocks(&self) -> &[BasicBlock] {
        &self.blocks
    }

    pub fn block(&self, id: BlockId) -> &BasicBlock {
        &self.blocks[id.index()]
    }

    pub fn instruction(&self, id: InstructionId) -> &Instruction {
        &self.instructions[id.index()]
    }

    pub fn value(&self, id: ValueId) -> &Value {
        &self.values[id.index()]
    }

    /// Instructions in layout order.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> + '_ {
        self.blocks
            .iter()
            .flat_map(move |b| b.instructions.iter().map(move |i| &self.instructions[i.index()]))
    }

    /// Live values, removed phis excluded.
    pub fn values(&self) -> impl Iterator<Item = &Value> + '_ {
        self.values.iter().filter(|v| v.definition != Definition::Removed)
    }

    pub fn invokes(&self) -> Vec<InstructionId> {
        self.instructions()
            .filter(|i| matches!(i.kind, InstructionKind::Invoke(_)))
            .map(|i| i.id)
            .collect()
    }

    /// Number of instructions, arguments excluded.
    pub fn instruction_count(&self) -> usize {
        self.instructions()
            .filter(|i| !matches!(i.kind, InstructionKind::Argument))
            .count()
    }

    pub(crate) fn add_block(&mut self, offset: u32) -> BlockId {
        let id = BlockId(self.blocks.len() as u32);
        self.blocks.push(BasicBlock {
            id,
            offset,
            phis: Vec::new(),
            instructions: Vec::new(),
            predecessors: Vec::new(),
            successors: Vec::new(),
        });
        id
    }

    pub(crate) fn add_edge(&mut self, from: BlockId, to: BlockId) {
        self.blocks[from.index()].successors.push(to);
        self.blocks[to.index()].predecessors.push(from);
    }

    pub(crate) fn new_value(&mut self, ty: ValueType, register: Option<u16>) -> ValueId {
        let id = ValueId(self.values.len() as u32);
        self.values.push(Value {
            id,
            ty,
            definition: Definition::Removed,
            register,
            known_class: None,
            users: Vec::new(),
        });
        id
    }

    pub(crate) fn set_known_class(&mut self, value: ValueId, class: DexType) {
        self.values[value.index()].known_class = Some(class);
    }

    /// Appends an instruction to `block`, wiring its operands' users and its out value's definition.
    pub(crate) fn append(
        &mut self,
        block: BlockId,
        kind: InstructionKind,
        out_value: Option<ValueId>,
        in_values: Vec<ValueId>,
        position: Option<u32>,
    ) -> InstructionId {
        let id = InstructionId(self.instructions.len() as u32);
        for v in &in_values {
            self.values[v.index()].users.push(User::Instruction(id));
        }
        if let Some(out) = out_value {
            self.values[out.index()].definition = Definition::Instruction(id);
        }
        self.instructions.push(Instruction { id, number: 0, block, out_value, in_values, kind, position });
        self.blocks[block.index()].instructions.push(id);
        id
    }

    /// Gives an existing instruction an out value, e.g. when a move-result follows an invoke.
    pub(crate) fn set_out_value(&mut self, instruction: InstructionId, value: ValueId) {
        self.instructions[instruction.index()].out_value = Some(value);
        self.values[value.index()].definition = Definition::Instruction(instruction);
    }

    pub(crate) fn add_phi(&mut self, block: BlockId, ty: ValueType, register: u16) -> ValueId {
        let phi = self.new_value(ty, Some(register));
        self.values[phi.index()].definition = Definition::Phi { block, operands: Vec::new() };
        self.blocks[block.index()].phis.push(phi);
        phi
    }

    pub(crate) fn add_phi_operand(&mut self, phi: ValueId, operand: ValueId) {
        if let Definition::Phi { operands, .. } = &mut self.values[phi.index()].definition {
            operands.push(operand);
            self.values[operand.index()].users.push(User::Phi(phi));
        }
    }

    pub fn phi_operands(&self, phi: ValueId) -> &[ValueId] {
        match &self.values[phi.index()].definition {
            Definition::Phi { operands, .. } => operands,
            _ => &[],
        }
    }

    pub(crate) fn set_value_type(&mut self, value: ValueId, ty: ValueType) {
        self.values[value.index()].ty = ty;
    }

    /// Rewrites every use of `old` into a use of `new`.
    pub(crate) fn replace_value(&mut self, old: ValueId, new: ValueId) {
        let users = std::mem::take(&mut self.values[old.index()].users);
        for user in &users {
            match user {
                User::Instruction(id) => {
                    for v in self.instructions[id.index()].in_values.iter_mut() {
                        if *v == old {
                            *v = new;
                        }
                    }
                }
                User::Phi(phi) => {
                    if let Definition::Phi { operands, .. } = &mut self.values[phi.index()].definition {
                        for v in operands.iter_mut() {
                            if *v == old {
                                *v = new;
                            }
                        }
                    }
                }
            }
        }
        self.values[new.index()].users.extend(users);
    }

    /// Drops a phi that has no remaining users of its own.
    pub(crate) fn remove_phi(&mut self, phi: ValueId) {
        let operands = match std::mem::replace(&mut self.values[phi.index()].definition, Definition::Removed) {
            Definition::Phi { block, operands } => {
                self.blocks[block.index()].phis.retain(|p| *p != phi);
                operands
            }
            _ => return,
        };
        for operand in operands {
            self.values[operand.index()].users.retain(|u| *u != User::Phi(phi));
        }
    }

    /// Swaps in `replacement` for the instruction with the same id, keeping use lists current.
    pub fn replace_instruction(&mut self, replacement: Instruction) -> Result<(), DexError> {
        let id = replacement.id;
        let old = match self.instructions.get(id.index()) {
            Some(old) => old.clone(),
            None => fail!("No instruction {:?} to replace", id),
        };
        for v in &old.in_values {
            let users = &mut self.values[v.index()].users;
            if let Some(pos) = users.iter().position(|u| *u == User::Instruction(id)) {
                users.remove(pos);
            }
        }
        for v in &replacement.in_values {
            self.values[v.index()].users.push(User::Instruction(id));
        }
        if let Some(out) = replacement.out_value {
            self.values[out.index()].definition = Definition::Instruction(id);
        }
        self.instructions[id.index()] = replacement;
        Ok(())
    }

    /// Assigns linear instruction numbers in layout order.
    pub fn number_instructions(&mut self) {
        let mut number = 0;
        for block in &self.blocks {
            for id in &block.instructions {
                self.instructions[id.index()].number = number;
                number += INSTRUCTION_NUMBER_DELTA;
            }
        }
    }

    /// Register units needed to pass the operands of `instruction`.
    pub fn required_argument_registers(&self, instruction: InstructionId) -> u32 {
        self.instructions[instruction.index()]
            .in_values
            .iter()
            .map(|v| self.values[v.index()].required_registers())
            .sum()
    }

    /// The unique method `instruction` (an invoke) can reach, if it can be proved.
    pub fn compute_single_target(
        &self,
        instruction: InstructionId,
        hierarchy: &dyn TypeHierarchy,
    ) -> Option<DexMethod> {
        let instruction = &self.instructions[instruction.index()];
        let invoke = instruction.as_invoke()?;
        let receiver = if invoke.has_receiver() {
            instruction
                .in_values
                .first()
                .and_then(|v| self.values[v.index()].known_class.as_ref())
        } else {
            None
        };
        invoke.compute_single_target(hierarchy, receiver)
    }
}

impl fmt::Display for IrCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.method)?;
        for block in &self.blocks {
            let preds: Vec<u32> = block.predecessors.iter().map(|b| b.0).collect();
            writeln!(f, "block {} @{} preds {:?}:", block.id.0, block.offset, preds)?;
            for phi in &block.phis {
                let operands: Vec<String> = self.phi_operands(*phi).iter().map(|v| format!("v{}", v.0)).collect();
                writeln!(f, "      v{} <- phi({})", phi.0, operands.join(", "))?;
            }
            for id in &block.instructions {
                let insn = &self.instructions[id.index()];
                let ins: Vec<String> = insn.in_values.iter().map(|v| format!("v{}", v.0)).collect();
                match insn.out_value {
                    Some(out) => writeln!(f, "  {:>3}: v{} <- {} {}", insn.number, out.0, insn.kind.name(), ins.join(", "))?,
                    None => writeln!(f, "  {:>3}: {} {}", insn.number, insn.kind.name(), ins.join(", "))?,
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method() -> DexMethod {
        DexMethod::parse("LFoo;->bar(I)I").unwrap()
    }

    #[test]
    fn replace_value_moves_users() {
        let mut code = IrCode::new(method(), true, 2, 1);
        let b0 = code.add_block(0);
        let arg = code.new_value(ValueType::Single, Some(1));
        code.append(b0, InstructionKind::Argument, Some(arg), vec![], None);
        let c = code.new_value(ValueType::Single, Some(0));
        code.append(b0, InstructionKind::ConstNumber(3), Some(c), vec![], Some(0));
        let sum = code.new_value(ValueType::Single, Some(0));
        let binop = InstructionKind::Binop { op: BinopKind::Add, ty: NumericType::Int, literal: None, reversed: false };
        let add = code.append(b0, binop, Some(sum), vec![c, c], Some(1));
        code.append(b0, InstructionKind::Return, None, vec![sum], Some(3));

        assert_eq!(code.value(c).users().len(), 2);
        code.replace_value(c, arg);
        assert!(!code.value(c).is_used());
        assert_eq!(code.instruction(add).in_values, vec![arg, arg]);
        assert_eq!(code.value(arg).users().len(), 2);
        assert_eq!(code.required_argument_registers(add), 2);
    }

    #[test]
    fn numbering_is_spaced() {
        let mut code = IrCode::new(method(), true, 1, 1);
        let b0 = code.add_block(0);
        let b1 = code.add_block(1);
        code.add_edge(b0, b1);
        code.append(b0, InstructionKind::Goto(b1), None, vec![], Some(0));
        let arg = code.new_value(ValueType::Single, Some(0));
        code.append(b0, InstructionKind::Argument, Some(arg), vec![], None);
        code.append(b1, InstructionKind::Return, None, vec![arg], Some(1));
        code.number_instructions();
        let numbers: Vec<u32> = code.instructions().map(|i| i.number).collect();
        assert_eq!(numbers, vec![0, 2, 4]);
        assert_eq!(code.block(b1).predecessors, vec![b0]);
    }

    #[test]
    fn division_throws_only_for_integers() {
        let mut code = IrCode::new(method(), true, 3, 0);
        let b0 = code.add_block(0);
        let rem_int = InstructionKind::Binop { op: BinopKind::Rem, ty: NumericType::Int, literal: None, reversed: false };
        let rem_float = InstructionKind::Binop { op: BinopKind::Rem, ty: NumericType::Float, literal: None, reversed: false };
        let i = code.append(b0, rem_int, None, vec![], None);
        let f = code.append(b0, rem_float, None, vec![], None);
        assert!(code.instruction(i).can_throw());
        assert!(!code.instruction(f).can_throw());
    }
}
