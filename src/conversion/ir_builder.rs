//! Builds SSA IR from decoded dex instructions.
//!
//! The stream is split into basic blocks first, then every instruction is handed to the `build_ir`
//! function of its catalogue entry, which calls back into one of the `add_*` methods below.
//! Register reads are resolved per block and across blocks with phis, the way Braun et al.
//! construct SSA: a block is sealed once all its predecessors are filled, reads in unsealed blocks
//! create incomplete phis that get their operands on sealing, and trivial phis are removed at the
//! end.

use crate::conversion::MethodCode;
use crate::dex::error::{DexError, ResultExt};
use crate::dex::instructions::{decode_method, DexInstruction};
use crate::dex::opcode_format::Operands;
use crate::ir::invoke::{Invoke, InvokeType};
use crate::ir::{
    BinopKind, BlockId, CmpBias, IfType, InstructionId, InstructionKind, IrCode, MemberType, MonitorType,
    NumericType, ValueId, ValueType,
};
use crate::items::{DexCallSite, DexField, DexItem, DexMethod, DexMethodHandle, DexProto, DexType, ItemResolver};
use crate::options::CompilerOptions;
use log::{debug, trace};
use num_traits::ToPrimitive;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Basic block boundaries computed before any IR exists.
struct BlockLayout {
    /// Instruction index range (inclusive) of each block, `None` for the synthetic entry block.
    ranges: Vec<Option<(usize, usize)>>,
    block_at: HashMap<u32, BlockId>,
}

pub struct IrBuilder<'a> {
    resolver: &'a dyn ItemResolver,
    code: IrCode,
    instructions: Vec<(u32, DexInstruction)>,
    index_of_offset: HashMap<u32, usize>,
    layout: BlockLayout,
    current_defs: Vec<HashMap<u16, Option<ValueId>>>,
    incomplete_phis: Vec<Vec<(u16, ValueId)>>,
    sealed: Vec<bool>,
    filled: Vec<bool>,
    current_block: BlockId,
    current_offset: u32,
    /// Invoke or filled-new-array emitted by the previous instruction.
    last_result: Option<InstructionId>,
    pending_result: Option<InstructionId>,
}

impl<'a> IrBuilder<'a> {
    /// Decodes `method_code` and builds its IR.
    pub fn build(
        method_code: &MethodCode,
        resolver: &'a dyn ItemResolver,
        options: &CompilerOptions,
    ) -> Result<IrCode, DexError> {
        let method = &method_code.method;
        let instructions = decode_method(&method_code.insns, options.min_api_level).context(|| method.to_string())?;
        let mut builder = IrBuilder {
            resolver,
            code: IrCode::new(
                method.clone(),
                method_code.is_static,
                method_code.registers_size,
                method_code.ins_size,
            ),
            index_of_offset: instructions.iter().enumerate().map(|(i, (o, _))| (*o, i)).collect(),
            instructions,
            layout: BlockLayout { ranges: Vec::new(), block_at: HashMap::new() },
            current_defs: Vec::new(),
            incomplete_phis: Vec::new(),
            sealed: Vec::new(),
            filled: Vec::new(),
            current_block: BlockId(0),
            current_offset: 0,
            last_result: None,
            pending_result: None,
        };
        builder.compute_blocks().context(|| method.to_string())?;
        builder.build_blocks(method_code).context(|| method.to_string())?;
        builder.remove_trivial_phis();
        builder.code.number_instructions();
        debug!("Built IR for {} with {} blocks", method, builder.code.blocks().len());
        trace!("{}", builder.code);
        Ok(builder.code)
    }

    // Block structure

    fn index_at(&self, offset: u32) -> Result<usize, DexError> {
        match self.index_of_offset.get(&offset) {
            Some(index) => Ok(*index),
            None => fail!(malformed self.current_offset as usize, "Offset {} is not an instruction boundary", offset),
        }
    }

    fn target(&self, offset: u32, relative: i32) -> Result<u32, DexError> {
        let target = offset as i64 + relative as i64;
        match target.to_u32() {
            Some(target) if self.index_of_offset.contains_key(&target) => Ok(target),
            _ => fail!(malformed offset as usize, "Branch target {} is not an instruction", target),
        }
    }

    fn payload(&self, offset: u32, relative: i32) -> Result<&Operands, DexError> {
        let at = self.target(offset, relative)?;
        let (_, payload) = &self.instructions[self.index_at(at)?];
        if !payload.opcode.is_payload() {
            fail!(malformed offset as usize, "No payload at offset {}", at);
        }
        Ok(&payload.operands)
    }

    /// Keys and absolute targets of the switch at `offset`.
    fn switch_payload(&self, offset: u32, relative: i32) -> Result<(Vec<i32>, Vec<u32>), DexError> {
        let (keys, relative_targets) = match self.payload(offset, relative)? {
            Operands::PackedSwitchPayload { first_key, targets } => {
                let keys = (0..targets.len() as i32).map(|i| first_key.wrapping_add(i)).collect();
                (keys, targets.clone())
            }
            Operands::SparseSwitchPayload { keys, targets } => (keys.clone(), targets.clone()),
            _ => fail!(malformed offset as usize, "Switch payload of the wrong kind"),
        };
        let mut targets = Vec::with_capacity(relative_targets.len());
        for t in relative_targets {
            targets.push(self.target(offset, t)?);
        }
        Ok((keys, targets))
    }

    fn compute_blocks(&mut self) -> Result<(), DexError> {
        let end = match self.instructions.last() {
            Some((offset, insn)) => offset + insn.size() as u32,
            None => fail!(malformed 0, "Empty method body"),
        };

        let mut starts = BTreeSet::from([0u32]);
        let mut jumps: HashMap<usize, Vec<u32>> = HashMap::new();
        for (index, (offset, insn)) in self.instructions.iter().enumerate() {
            let next = offset + insn.size() as u32;
            let opcode = insn.opcode;
            if opcode.is_payload() {
                starts.insert(*offset);
                starts.insert(next);
                continue;
            }
            let targets = if opcode.is_branch() {
                vec![self.target(*offset, insn.offset()?)?]
            } else if opcode.is_switch() {
                self.switch_payload(*offset, insn.offset()?)?.1
            } else {
                Vec::new()
            };
            if opcode.is_branch() || opcode.is_switch() || !opcode.can_continue() {
                starts.insert(next);
            }
            starts.extend(targets.iter().copied());
            if !targets.is_empty() {
                jumps.insert(index, targets);
            }
        }

        let starts: Vec<u32> = starts.into_iter().filter(|s| *s < end).collect();
        let mut raw: BTreeMap<u32, (usize, usize, Vec<u32>)> = BTreeMap::new();
        for (k, start) in starts.iter().enumerate() {
            let first = self.index_at(*start)?;
            let last = match starts.get(k + 1) {
                Some(next_start) => self.index_at(*next_start)? - 1,
                None => self.instructions.len() - 1,
            };
            let (last_offset, insn) = &self.instructions[last];
            let opcode = insn.opcode;
            let mut successors = Vec::new();
            if !opcode.is_payload() {
                if opcode.can_continue() {
                    let next = last_offset + insn.size() as u32;
                    if next >= end {
                        fail!(malformed *last_offset as usize, "Execution falls off the end of the method");
                    }
                    successors.push(next);
                }
                if let Some(targets) = jumps.get(&last) {
                    successors.extend(targets.iter().copied());
                }
            }
            raw.insert(*start, (first, last, successors));
        }

        let mut reachable = BTreeSet::new();
        let mut work = vec![0u32];
        while let Some(start) = work.pop() {
            if reachable.insert(start) {
                if let Some((_, _, successors)) = raw.get(&start) {
                    work.extend(successors.iter().copied());
                }
            }
        }

        let entry_is_target = reachable
            .iter()
            .filter_map(|s| raw.get(s))
            .any(|(_, _, successors)| successors.contains(&0));
        if entry_is_target {
            // Arguments need a block nothing jumps back into.
            self.code.add_block(0);
            self.layout.ranges.push(None);
        }
        for start in &reachable {
            if let Some((first, last, _)) = raw.get(start) {
                let id = self.code.add_block(*start);
                self.layout.block_at.insert(*start, id);
                self.layout.ranges.push(Some((*first, *last)));
            }
        }
        if entry_is_target {
            self.code.add_edge(BlockId(0), BlockId(1));
        }
        for start in &reachable {
            if let Some((_, _, successors)) = raw.get(start) {
                let from = self.block_at(*start)?;
                for s in successors {
                    let to = self.block_at(*s)?;
                    self.code.add_edge(from, to);
                }
            }
        }

        let blocks = self.code.blocks().len();
        self.current_defs = vec![HashMap::new(); blocks];
        self.incomplete_phis = vec![Vec::new(); blocks];
        self.sealed = vec![false; blocks];
        self.filled = vec![false; blocks];
        Ok(())
    }

    fn block_at(&self, offset: u32) -> Result<BlockId, DexError> {
        match self.layout.block_at.get(&offset) {
            Some(block) => Ok(*block),
            None => fail!(malformed offset as usize, "No block starts at offset {}", offset),
        }
    }

    fn build_blocks(&mut self, method_code: &MethodCode) -> Result<(), DexError> {
        let entry = BlockId(0);
        self.current_block = entry;
        self.seal_block(entry)?;
        self.add_arguments(method_code)?;

        for index in 0..self.layout.ranges.len() {
            let block = BlockId(index as u32);
            self.current_block = block;
            self.last_result = None;
            self.pending_result = None;
            if !self.sealed[index] && self.all_predecessors_filled(block) {
                self.seal_block(block)?;
            }
            match self.layout.ranges[index] {
                Some((first, last)) => {
                    for i in first..=last {
                        let (offset, insn) = self.instructions[i].clone();
                        self.current_offset = offset;
                        self.last_result = self.pending_result.take();
                        (insn.opcode.build_ir)(self, &insn)
                            .context(|| insn.name().to_string())?;
                    }
                    let opcode = self.instructions[last].1.opcode;
                    if opcode.can_continue() && !opcode.is_branch() && !opcode.is_switch() {
                        let fallthrough = self.code.block(block).successors[0];
                        self.code.append(block, InstructionKind::Goto(fallthrough), None, vec![], None);
                    }
                }
                None => {
                    let first = self.code.block(block).successors[0];
                    self.code.append(block, InstructionKind::Goto(first), None, vec![], None);
                }
            }
            self.filled[index] = true;
            for successor in self.code.block(block).successors.clone() {
                if !self.sealed[successor.index()] && self.all_predecessors_filled(successor) {
                    self.seal_block(successor)?;
                }
            }
        }

        for index in 0..self.sealed.len() {
            if !self.sealed[index] {
                self.seal_block(BlockId(index as u32))?;
            }
        }
        Ok(())
    }

    fn all_predecessors_filled(&self, block: BlockId) -> bool {
        self.code.block(block).predecessors.iter().all(|p| self.filled[p.index()])
    }

    fn add_arguments(&mut self, method_code: &MethodCode) -> Result<(), DexError> {
        if method_code.ins_size > method_code.registers_size
            || method_code.argument_registers() != method_code.ins_size as u32
        {
            fail!(
                malformed 0,
                "ins size {} does not match {} argument registers in a frame of {}",
                method_code.ins_size,
                method_code.argument_registers(),
                method_code.registers_size
            );
        }
        let mut register = method_code.registers_size - method_code.ins_size;
        let mut types = Vec::new();
        if !method_code.is_static {
            types.push(ValueType::Object);
        }
        for parameter in &method_code.method.proto.parameters {
            match parameter.value_type() {
                Some(ty) => types.push(ty),
                None => fail!(malformed 0, "Parameter of type {}", parameter),
            }
        }
        for ty in types {
            let value = self.code.new_value(ty, Some(register));
            self.code.append(BlockId(0), InstructionKind::Argument, Some(value), vec![], None);
            self.write_register(register, value, ty);
            register += ty.required_registers() as u16;
        }
        Ok(())
    }

    // SSA construction

    fn seal_block(&mut self, block: BlockId) -> Result<(), DexError> {
        let incomplete = std::mem::take(&mut self.incomplete_phis[block.index()]);
        for (register, phi) in incomplete {
            let ty = self.code.value(phi).ty;
            self.add_phi_operands(block, phi, register, ty)?;
        }
        self.sealed[block.index()] = true;
        Ok(())
    }

    fn add_phi_operands(&mut self, block: BlockId, phi: ValueId, register: u16, ty: ValueType) -> Result<(), DexError> {
        for predecessor in self.code.block(block).predecessors.clone() {
            let operand = self.read_register_in(predecessor, register, ty)?;
            self.code.add_phi_operand(phi, operand);
        }
        // A null constant reads as a single; any object or wide operand wins over it.
        let known = self
            .code
            .phi_operands(phi)
            .iter()
            .map(|o| self.code.value(*o))
            .filter(|v| !v.is_phi())
            .map(|v| v.ty)
            .max_by_key(|ty| *ty != ValueType::Single);
        if let Some(ty) = known {
            self.code.set_value_type(phi, ty);
        }
        Ok(())
    }

    fn read_register_in(&mut self, block: BlockId, register: u16, ty: ValueType) -> Result<ValueId, DexError> {
        match self.current_defs[block.index()].get(&register) {
            Some(Some(value)) => return Ok(*value),
            Some(None) => fail!(
                malformed self.current_offset as usize,
                "Register v{} is read after its wide pair was overwritten",
                register
            ),
            None => {}
        }
        let value = if !self.sealed[block.index()] {
            let phi = self.code.add_phi(block, ty, register);
            self.incomplete_phis[block.index()].push((register, phi));
            phi
        } else {
            let predecessors = self.code.block(block).predecessors.clone();
            match predecessors.as_slice() {
                [] => fail!(malformed self.current_offset as usize, "Register v{} is read before it is defined", register),
                [single] => self.read_register_in(*single, register, ty)?,
                _ => {
                    let phi = self.code.add_phi(block, ty, register);
                    self.current_defs[block.index()].insert(register, Some(phi));
                    self.add_phi_operands(block, phi, register, ty)?;
                    phi
                }
            }
        };
        self.current_defs[block.index()].insert(register, Some(value));
        Ok(value)
    }

    fn read_register(&mut self, register: u16, ty: ValueType) -> Result<ValueId, DexError> {
        self.read_register_in(self.current_block, register, ty)
    }

    fn write_register(&mut self, register: u16, value: ValueId, ty: ValueType) {
        let defs = &mut self.current_defs[self.current_block.index()];
        let is_wide = |v: &Option<ValueId>| matches!(v, Some(v) if self.code.value(*v).ty == ValueType::Wide);
        // Overwriting either half of a wide pair invalidates the other half.
        if let Some(below) = register.checked_sub(1) {
            if defs.get(&below).map_or(false, is_wide) {
                defs.insert(below, None);
            }
        }
        defs.insert(register, Some(value));
        if ty == ValueType::Wide {
            if let Some(above) = register.checked_add(1) {
                if defs.get(&above).map_or(false, is_wide) {
                    if let Some(next) = above.checked_add(1) {
                        defs.insert(next, None);
                    }
                }
                defs.insert(above, None);
            }
        }
    }

    fn remove_trivial_phis(&mut self) {
        loop {
            let mut changed = false;
            let phis: Vec<ValueId> = self.code.blocks().iter().flat_map(|b| b.phis.clone()).collect();
            for phi in phis {
                if !self.code.value(phi).is_phi() {
                    continue;
                }
                let mut same = None;
                let mut trivial = true;
                for operand in self.code.phi_operands(phi) {
                    if *operand == phi || Some(*operand) == same {
                        continue;
                    }
                    if same.is_some() {
                        trivial = false;
                        break;
                    }
                    same = Some(*operand);
                }
                if let (true, Some(replacement)) = (trivial, same) {
                    self.code.replace_value(phi, replacement);
                    self.code.remove_phi(phi);
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
    }

    fn add(
        &mut self,
        kind: InstructionKind,
        out: Option<(u16, ValueType)>,
        in_values: Vec<ValueId>,
    ) -> Result<InstructionId, DexError> {
        let out_value = out.map(|(register, ty)| (register, ty, self.code.new_value(ty, Some(register))));
        let id = self.code.append(
            self.current_block,
            kind,
            out_value.map(|(_, _, v)| v),
            in_values,
            Some(self.current_offset),
        );
        if let Some((register, ty, value)) = out_value {
            self.write_register(register, value, ty);
        }
        Ok(id)
    }

    fn out_value(&self, instruction: InstructionId) -> Option<ValueId> {
        self.code.instruction(instruction).out_value
    }

    // Item resolution

    fn malformed_reference(&self, kind: &str, index: u32) -> DexError {
        err!(malformed self.current_offset as usize, "Unknown {} index {}", kind, index)
    }

    fn string(&self, index: u32) -> Result<String, DexError> {
        self.resolver.string(index).ok_or_else(|| self.malformed_reference("string", index))
    }

    fn type_item(&self, index: u32) -> Result<DexType, DexError> {
        self.resolver.type_item(index).ok_or_else(|| self.malformed_reference("type", index))
    }

    fn field(&self, index: u32) -> Result<DexField, DexError> {
        self.resolver.field(index).ok_or_else(|| self.malformed_reference("field", index))
    }

    fn method(&self, index: u32) -> Result<DexMethod, DexError> {
        self.resolver.method(index).ok_or_else(|| self.malformed_reference("method", index))
    }

    fn proto(&self, index: u32) -> Result<DexProto, DexError> {
        self.resolver.proto(index).ok_or_else(|| self.malformed_reference("proto", index))
    }

    fn call_site(&self, index: u32) -> Result<DexCallSite, DexError> {
        self.resolver.call_site(index).ok_or_else(|| self.malformed_reference("call site", index))
    }

    fn method_handle(&self, index: u32) -> Result<DexMethodHandle, DexError> {
        self.resolver.method_handle(index).ok_or_else(|| self.malformed_reference("method handle", index))
    }

    // Instruction contributions, one per dex instruction family

    pub fn add_move(&mut self, ty: ValueType, dest: u16, src: u16) -> Result<(), DexError> {
        let source = self.read_register(src, ty)?;
        let known_class = self.code.value(source).known_class.clone();
        let id = self.add(InstructionKind::Move, Some((dest, ty)), vec![source])?;
        if let (Some(out), Some(class)) = (self.out_value(id), known_class) {
            self.code.set_known_class(out, class);
        }
        Ok(())
    }

    pub fn add_move_result(&mut self, ty: ValueType, dest: u16) -> Result<(), DexError> {
        let source = match self.last_result.take() {
            Some(source) => source,
            None => fail!(
                malformed self.current_offset as usize,
                "move-result is not preceded by an invoke or filled-new-array"
            ),
        };
        let returns_value = match self.code.instruction(source).as_invoke() {
            Some(invoke) => !invoke.return_type().is_void(),
            None => false,
        };
        if !returns_value {
            fail!(malformed self.current_offset as usize, "move-result of a call without a result");
        }
        let value = self.code.new_value(ty, Some(dest));
        self.code.set_out_value(source, value);
        self.write_register(dest, value, ty);
        Ok(())
    }

    pub fn add_move_exception(&mut self, dest: u16) -> Result<(), DexError> {
        self.add(InstructionKind::MoveException, Some((dest, ValueType::Object)), vec![])?;
        Ok(())
    }

    pub fn add_return_void(&mut self) -> Result<(), DexError> {
        self.add(InstructionKind::Return, None, vec![])?;
        Ok(())
    }

    pub fn add_return(&mut self, ty: ValueType, src: u16) -> Result<(), DexError> {
        let value = self.read_register(src, ty)?;
        self.add(InstructionKind::Return, None, vec![value])?;
        Ok(())
    }

    pub fn add_const(&mut self, ty: ValueType, dest: u16, literal: i64) -> Result<(), DexError> {
        self.add(InstructionKind::ConstNumber(literal), Some((dest, ty)), vec![])?;
        Ok(())
    }

    pub fn add_const_string(&mut self, dest: u16, index: u32) -> Result<(), DexError> {
        let string = self.string(index)?;
        self.add(InstructionKind::ConstString(string), Some((dest, ValueType::Object)), vec![])?;
        Ok(())
    }

    pub fn add_const_class(&mut self, dest: u16, index: u32) -> Result<(), DexError> {
        let class = self.type_item(index)?;
        self.add(InstructionKind::ConstClass(class), Some((dest, ValueType::Object)), vec![])?;
        Ok(())
    }

    pub fn add_const_method_handle(&mut self, dest: u16, index: u32) -> Result<(), DexError> {
        let handle = self.method_handle(index)?;
        self.add(InstructionKind::ConstMethodHandle(handle), Some((dest, ValueType::Object)), vec![])?;
        Ok(())
    }

    pub fn add_const_method_type(&mut self, dest: u16, index: u32) -> Result<(), DexError> {
        let proto = self.proto(index)?;
        self.add(InstructionKind::ConstMethodType(proto), Some((dest, ValueType::Object)), vec![])?;
        Ok(())
    }

    pub fn add_monitor(&mut self, kind: MonitorType, reg: u16) -> Result<(), DexError> {
        let object = self.read_register(reg, ValueType::Object)?;
        self.add(InstructionKind::Monitor(kind), None, vec![object])?;
        Ok(())
    }

    pub fn add_check_cast(&mut self, reg: u16, index: u32) -> Result<(), DexError> {
        let class = self.type_item(index)?;
        let object = self.read_register(reg, ValueType::Object)?;
        let id = self.add(InstructionKind::CheckCast(class.clone()), Some((reg, ValueType::Object)), vec![object])?;
        if let Some(out) = self.out_value(id) {
            self.code.set_known_class(out, class);
        }
        Ok(())
    }

    pub fn add_instance_of(&mut self, dest: u16, reg: u16, index: u32) -> Result<(), DexError> {
        let class = self.type_item(index)?;
        let object = self.read_register(reg, ValueType::Object)?;
        self.add(InstructionKind::InstanceOf(class), Some((dest, ValueType::Single)), vec![object])?;
        Ok(())
    }

    pub fn add_array_length(&mut self, dest: u16, array: u16) -> Result<(), DexError> {
        let array = self.read_register(array, ValueType::Object)?;
        self.add(InstructionKind::ArrayLength, Some((dest, ValueType::Single)), vec![array])?;
        Ok(())
    }

    pub fn add_new_instance(&mut self, dest: u16, index: u32) -> Result<(), DexError> {
        let class = self.type_item(index)?;
        let id = self.add(InstructionKind::NewInstance(class.clone()), Some((dest, ValueType::Object)), vec![])?;
        if let Some(out) = self.out_value(id) {
            self.code.set_known_class(out, class);
        }
        Ok(())
    }

    pub fn add_new_array_empty(&mut self, dest: u16, size: u16, index: u32) -> Result<(), DexError> {
        let array_type = self.type_item(index)?;
        let size = self.read_register(size, ValueType::Single)?;
        self.add(InstructionKind::NewArrayEmpty(array_type), Some((dest, ValueType::Object)), vec![size])?;
        Ok(())
    }

    pub fn add_invoke_new_array(&mut self, index: u32, registers: &[u16]) -> Result<(), DexError> {
        let array_type = self.type_item(index)?;
        let invoke = Invoke::create(InvokeType::NewArray, DexItem::Type(array_type), None)?;
        self.add_invoke_instruction(invoke, registers)
    }

    pub fn add_fill_array_data(&mut self, array: u16, relative: i32) -> Result<(), DexError> {
        let kind = match self.payload(self.current_offset, relative)? {
            Operands::ArrayPayload { element_width, size, data } => InstructionKind::NewArrayFilledData {
                element_width: *element_width,
                size: *size,
                data: data.clone(),
            },
            _ => fail!(malformed self.current_offset as usize, "fill-array-data without an array payload"),
        };
        let array = self.read_register(array, ValueType::Object)?;
        self.add(kind, None, vec![array])?;
        Ok(())
    }

    pub fn add_throw(&mut self, reg: u16) -> Result<(), DexError> {
        let exception = self.read_register(reg, ValueType::Object)?;
        self.add(InstructionKind::Throw, None, vec![exception])?;
        Ok(())
    }

    pub fn add_goto(&mut self, relative: i32) -> Result<(), DexError> {
        let target = self.block_at(self.target(self.current_offset, relative)?)?;
        self.add(InstructionKind::Goto(target), None, vec![])?;
        Ok(())
    }

    pub fn add_switch(&mut self, reg: u16, relative: i32) -> Result<(), DexError> {
        let (keys, offsets) = self.switch_payload(self.current_offset, relative)?;
        let mut targets = Vec::with_capacity(offsets.len());
        for offset in offsets {
            targets.push(self.block_at(offset)?);
        }
        let key = self.read_register(reg, ValueType::Single)?;
        self.add(InstructionKind::Switch { keys, targets }, None, vec![key])?;
        Ok(())
    }

    pub fn add_cmp(&mut self, ty: NumericType, bias: CmpBias, dest: u16, left: u16, right: u16) -> Result<(), DexError> {
        let left = self.read_register(left, ty.value_type())?;
        let right = self.read_register(right, ty.value_type())?;
        self.add(InstructionKind::Cmp { ty, bias }, Some((dest, ValueType::Single)), vec![left, right])?;
        Ok(())
    }

    pub fn add_if(&mut self, kind: IfType, left: u16, right: u16, relative: i32) -> Result<(), DexError> {
        let target = self.block_at(self.target(self.current_offset, relative)?)?;
        let left = self.read_register(left, ValueType::Single)?;
        let right = self.read_register(right, ValueType::Single)?;
        self.add(InstructionKind::If { kind, target }, None, vec![left, right])?;
        Ok(())
    }

    pub fn add_if_zero(&mut self, kind: IfType, reg: u16, relative: i32) -> Result<(), DexError> {
        let target = self.block_at(self.target(self.current_offset, relative)?)?;
        let value = self.read_register(reg, ValueType::Single)?;
        self.add(InstructionKind::If { kind, target }, None, vec![value])?;
        Ok(())
    }

    pub fn add_array_get(&mut self, ty: MemberType, dest: u16, array: u16, index: u16) -> Result<(), DexError> {
        let array = self.read_register(array, ValueType::Object)?;
        let index = self.read_register(index, ValueType::Single)?;
        self.add(InstructionKind::ArrayGet(ty), Some((dest, ty.value_type())), vec![array, index])?;
        Ok(())
    }

    pub fn add_array_put(&mut self, ty: MemberType, value: u16, array: u16, index: u16) -> Result<(), DexError> {
        let value = self.read_register(value, ty.value_type())?;
        let array = self.read_register(array, ValueType::Object)?;
        let index = self.read_register(index, ValueType::Single)?;
        self.add(InstructionKind::ArrayPut(ty), None, vec![value, array, index])?;
        Ok(())
    }

    pub fn add_instance_get(&mut self, ty: MemberType, dest: u16, object: u16, index: u32) -> Result<(), DexError> {
        let field = self.field(index)?;
        let object = self.read_register(object, ValueType::Object)?;
        self.add(InstructionKind::InstanceGet(ty, field), Some((dest, ty.value_type())), vec![object])?;
        Ok(())
    }

    pub fn add_instance_put(&mut self, ty: MemberType, value: u16, object: u16, index: u32) -> Result<(), DexError> {
        let field = self.field(index)?;
        let value = self.read_register(value, ty.value_type())?;
        let object = self.read_register(object, ValueType::Object)?;
        self.add(InstructionKind::InstancePut(ty, field), None, vec![value, object])?;
        Ok(())
    }

    pub fn add_static_get(&mut self, ty: MemberType, dest: u16, index: u32) -> Result<(), DexError> {
        let field = self.field(index)?;
        self.add(InstructionKind::StaticGet(ty, field), Some((dest, ty.value_type())), vec![])?;
        Ok(())
    }

    pub fn add_static_put(&mut self, ty: MemberType, value: u16, index: u32) -> Result<(), DexError> {
        let field = self.field(index)?;
        let value = self.read_register(value, ty.value_type())?;
        self.add(InstructionKind::StaticPut(ty, field), None, vec![value])?;
        Ok(())
    }

    pub fn add_invoke(&mut self, kind: InvokeType, index: u32, registers: &[u16]) -> Result<(), DexError> {
        let method = self.method(index)?;
        let invoke = Invoke::create(kind, DexItem::Method(method), None)?;
        self.add_invoke_instruction(invoke, registers)
    }

    pub fn add_invoke_polymorphic(&mut self, index: u32, proto: u32, registers: &[u16]) -> Result<(), DexError> {
        let method = self.method(index)?;
        let proto = self.proto(proto)?;
        let invoke = Invoke::create(InvokeType::Polymorphic, DexItem::Method(method), Some(proto))?;
        self.add_invoke_instruction(invoke, registers)
    }

    pub fn add_invoke_custom(&mut self, index: u32, registers: &[u16]) -> Result<(), DexError> {
        let call_site = self.call_site(index)?;
        self.add_invoke_instruction(Invoke::custom(call_site), registers)
    }

    fn add_invoke_instruction(&mut self, invoke: Invoke, registers: &[u16]) -> Result<(), DexError> {
        let types = invoke.argument_types(registers.len())?;
        let mut arguments = Vec::with_capacity(types.len());
        let mut unit = 0;
        for ty in types {
            let register = match registers.get(unit) {
                Some(register) => *register,
                None => fail!(malformed self.current_offset as usize, "Too few argument registers for {}", invoke),
            };
            if ty == ValueType::Wide && registers.get(unit + 1) != Some(&(register + 1)) {
                fail!(malformed self.current_offset as usize, "Wide argument v{} is not a register pair", register);
            }
            arguments.push(self.read_register(register, ty)?);
            unit += ty.required_registers() as usize;
        }
        if unit != registers.len() {
            fail!(malformed self.current_offset as usize, "Too many argument registers for {}", invoke);
        }
        let id = self.add(InstructionKind::Invoke(invoke), None, arguments)?;
        self.pending_result = Some(id);
        Ok(())
    }

    pub fn add_neg(&mut self, ty: NumericType, dest: u16, src: u16) -> Result<(), DexError> {
        let source = self.read_register(src, ty.value_type())?;
        self.add(InstructionKind::Neg(ty), Some((dest, ty.value_type())), vec![source])?;
        Ok(())
    }

    pub fn add_not(&mut self, ty: NumericType, dest: u16, src: u16) -> Result<(), DexError> {
        let source = self.read_register(src, ty.value_type())?;
        self.add(InstructionKind::Not(ty), Some((dest, ty.value_type())), vec![source])?;
        Ok(())
    }

    pub fn add_conversion(&mut self, from: NumericType, to: NumericType, dest: u16, src: u16) -> Result<(), DexError> {
        let source = self.read_register(src, from.value_type())?;
        self.add(InstructionKind::NumberConversion { from, to }, Some((dest, to.value_type())), vec![source])?;
        Ok(())
    }

    pub fn add_binop(&mut self, op: BinopKind, ty: NumericType, dest: u16, left: u16, right: u16) -> Result<(), DexError> {
        let right_type = match op {
            // The shift distance is always an int.
            BinopKind::Shl | BinopKind::Shr | BinopKind::Ushr => ValueType::Single,
            _ => ty.value_type(),
        };
        let left = self.read_register(left, ty.value_type())?;
        let right = self.read_register(right, right_type)?;
        let kind = InstructionKind::Binop { op, ty, literal: None, reversed: false };
        self.add(kind, Some((dest, ty.value_type())), vec![left, right])?;
        Ok(())
    }

    pub fn add_binop_literal(&mut self, op: BinopKind, dest: u16, src: u16, literal: i64) -> Result<(), DexError> {
        self.add_literal_binop(op, dest, src, literal, false)
    }

    /// `rsub-int`: `literal - src`.
    pub fn add_rsub_literal(&mut self, dest: u16, src: u16, literal: i64) -> Result<(), DexError> {
        self.add_literal_binop(BinopKind::Sub, dest, src, literal, true)
    }

    fn add_literal_binop(&mut self, op: BinopKind, dest: u16, src: u16, literal: i64, reversed: bool) -> Result<(), DexError> {
        let literal = match literal.to_i32() {
            Some(literal) => literal,
            None => fail!("Literal {} does not fit an int", literal),
        };
        let source = self.read_register(src, ValueType::Single)?;
        let kind = InstructionKind::Binop { op, ty: NumericType::Int, literal: Some(literal), reversed };
        self.add(kind, Some((dest, ValueType::Single)), vec![source])?;
        Ok(())
    }

    pub fn add_payload(&mut self) -> Result<(), DexError> {
        fail!(malformed self.current_offset as usize, "Execution reaches a payload")
    }
}
