use crate::conversion::ir_builder::IrBuilder;
use crate::dex::error::DexError;
use crate::dex::instructions::DexInstruction;
use crate::dex::opcodes::find_opcode_by_value;
use crate::dex::{check_signed, check_unsigned, read_u2, read_u4, read_u8, write_u2, write_u4, write_u8};
use crate::options::api_level_name;
use bitflags::bitflags;
use rangemap::RangeInclusiveMap;
use std::ops::RangeInclusive;

/// Represents different types of references used by opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceType {
    None,
    String,
    Type,
    Field,
    Method,
    CallSite,
    MethodProto,
    MethodHandle,
}

// Defines various flags that can be associated with an opcode.
bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpcodeFlags: u32 {
        const CAN_THROW = 0x1;
        const CAN_CONTINUE = 0x4;
        const SETS_RESULT = 0x8;
        const SETS_REGISTER = 0x10;
        const SETS_WIDE_REGISTER = 0x20;
        const BRANCH = 0x40;
        const SWITCH = 0x80;
        const PAYLOAD = 0x100;
    }
}

/// Contributes the IR for one decoded instruction.
pub type BuildIr = fn(&mut IrBuilder<'_>, &DexInstruction) -> Result<(), DexError>;

/// One entry of the opcode catalogue.
pub struct Opcode {
    pub value: u16,
    pub name: &'static str,
    pub display_name: String,
    pub reference_type: ReferenceType,
    pub format: Format,
    pub flags: OpcodeFlags,
    pub api_to_value_map: RangeInclusiveMap<i32, u16>,
    pub build_ir: BuildIr,
}

/// An API level range along with the opcode value used in that range.
pub struct VersionConstraint {
    pub api_range: RangeInclusive<i32>,
    pub opcode_value: u16,
}

impl Opcode {

    /// Creates a new Opcode instance.
    pub(crate) fn new(
        version_constraints: Vec<VersionConstraint>,
        name: &'static str,
        reference_type: ReferenceType,
        format: Format,
        flags: OpcodeFlags,
        build_ir: BuildIr,
    ) -> Self {
        let mut api_to_value_map = RangeInclusiveMap::new();
        let mut value = 0;

        for vc in version_constraints.iter() {
            if !vc.api_range.is_empty() {
                api_to_value_map.insert(vc.api_range.clone(), vc.opcode_value);
                value = vc.opcode_value;
            }
        }

        Opcode {
            value,
            name,
            display_name: display_name_of(name),
            reference_type,
            format,
            flags,
            api_to_value_map,
            build_ir,
        }
    }

    /// Available from `api` onwards.
    pub(crate) fn first_api(opcode_value: u16, api: i32) -> Vec<VersionConstraint> {
        vec![VersionConstraint {
            api_range: api..=i32::MAX,
            opcode_value,
        }]
    }

    /// Available on every API level.
    pub(crate) fn all_apis(opcode_value: u16) -> Vec<VersionConstraint> {
        vec![VersionConstraint {
            api_range: i32::MIN..=i32::MAX,
            opcode_value,
        }]
    }

    /// Determines if the opcode can throw an exception.
    pub fn can_throw(&self) -> bool {
        self.flags.contains(OpcodeFlags::CAN_THROW)
    }

    /// Determines if execution can continue to the next instruction.
    pub fn can_continue(&self) -> bool {
        self.flags.contains(OpcodeFlags::CAN_CONTINUE)
    }

    /// Determines if the opcode sets the "hidden" result register.
    pub fn sets_result(&self) -> bool {
        self.flags.contains(OpcodeFlags::SETS_RESULT)
    }

    /// Determines if the opcode sets the value of its first register.
    pub fn sets_register(&self) -> bool {
        self.flags.contains(OpcodeFlags::SETS_REGISTER)
    }

    /// Determines if the opcode sets the value of its first register to a wide type.
    pub fn sets_wide_register(&self) -> bool {
        self.flags.contains(OpcodeFlags::SETS_WIDE_REGISTER)
    }

    /// Goto and if-* instructions.
    pub fn is_branch(&self) -> bool {
        self.flags.contains(OpcodeFlags::BRANCH)
    }

    pub fn is_switch(&self) -> bool {
        self.flags.contains(OpcodeFlags::SWITCH)
    }

    pub fn is_payload(&self) -> bool {
        self.flags.contains(OpcodeFlags::PAYLOAD)
    }

    /// Retrieves the opcode value used at the given API level.
    pub fn get_opcode_value(&self, api: i32) -> Option<u16> {
        self.api_to_value_map.get(&api).copied()
    }

    /// Finds the catalogue entry for `value` and checks it is available at `api`.
    pub fn lookup(value: u16, api: i32) -> Result<&'static Opcode, DexError> {
        let opcode = match find_opcode_by_value(value) {
            Some(opcode) => opcode,
            None => fail!("Unknown opcode 0x{:02x}", value),
        };
        if opcode.get_opcode_value(api).is_none() {
            let required = opcode.min_api();
            return Err(DexError::unsupported(required, &api_level_name(required), opcode.name, None));
        }
        Ok(opcode)
    }

    /// Lowest API level this opcode exists on.
    pub fn min_api(&self) -> i32 {
        self.api_to_value_map
            .iter()
            .next()
            .map(|(range, _)| *range.start())
            .unwrap_or(i32::MAX)
    }
}

impl std::fmt::Debug for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(0x{:02x})", self.name, self.value)
    }
}

/// `rem-int/lit8` -> `RemIntLit8`
fn display_name_of(name: &str) -> String {
    name.split(|c| c == '-' || c == '/')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Format10t,
    Format10x,
    Format11n,
    Format11x,
    Format12x,
    Format20t,
    Format21c,
    Format21ih,
    Format21lh,
    Format21s,
    Format21t,
    Format22b,
    Format22c,
    Format22s,
    Format22t,
    Format22x,
    Format23x,
    Format30t,
    Format31c,
    Format31i,
    Format31t,
    Format32x,
    Format35c,
    Format3rc,
    Format45cc,
    Format4rcc,
    Format51l,
    ArrayPayload,
    PackedSwitchPayload,
    SparseSwitchPayload,
}

impl Format {
    /// Returns the size in code units, `None` for the variable sized payloads.
    pub const fn size(&self) -> Option<usize> {
        match self {
            Format::Format10t
            | Format::Format10x
            | Format::Format11n
            | Format::Format11x
            | Format::Format12x => Some(1),

            Format::Format20t
            | Format::Format21c
            | Format::Format21ih
            | Format::Format21lh
            | Format::Format21s
            | Format::Format21t
            | Format::Format22b
            | Format::Format22c
            | Format::Format22s
            | Format::Format22t
            | Format::Format22x
            | Format::Format23x => Some(2),

            Format::Format30t
            | Format::Format31c
            | Format::Format31i
            | Format::Format31t
            | Format::Format32x
            | Format::Format35c
            | Format::Format3rc => Some(3),

            Format::Format45cc | Format::Format4rcc => Some(4),

            Format::Format51l => Some(5),

            Format::ArrayPayload
            | Format::PackedSwitchPayload
            | Format::SparseSwitchPayload => None,
        }
    }

    /// Indicates whether the format is a payload format.
    pub const fn is_payload_format(&self) -> bool {
        matches!(
            self,
            Format::ArrayPayload | Format::PackedSwitchPayload | Format::SparseSwitchPayload
        )
    }
}

/// Operand values of one instruction, laid out as dictated by its [`Format`].
///
/// Register fields are `u16`, pool indices `u32`, branch offsets (in code units, relative to the
/// instruction) `i32` and literals `i64`; the format decides how many bits each may actually use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operands {
    F10x,
    F10t { offset: i32 },
    F11n { a: u16, literal: i64 },
    F11x { a: u16 },
    F12x { a: u16, b: u16 },
    F20t { offset: i32 },
    F21c { a: u16, index: u32 },
    /// `const/high16` and `const-wide/high16`: only the top 16 bits of the literal.
    F21h { a: u16, high: i64 },
    F21s { a: u16, literal: i64 },
    F21t { a: u16, offset: i32 },
    F22b { a: u16, b: u16, literal: i64 },
    F22c { a: u16, b: u16, index: u32 },
    F22s { a: u16, b: u16, literal: i64 },
    F22t { a: u16, b: u16, offset: i32 },
    F22x { a: u16, b: u16 },
    F23x { a: u16, b: u16, c: u16 },
    F30t { offset: i32 },
    F31c { a: u16, index: u32 },
    F31i { a: u16, literal: i64 },
    F31t { a: u16, offset: i32 },
    F32x { a: u16, b: u16 },
    F35c { registers: Vec<u16>, index: u32 },
    F3rc { first: u16, count: u16, index: u32 },
    F45cc { registers: Vec<u16>, index: u32, proto: u32 },
    F4rcc { first: u16, count: u16, index: u32, proto: u32 },
    F51l { a: u16, literal: i64 },
    PackedSwitchPayload { first_key: i32, targets: Vec<i32> },
    SparseSwitchPayload { keys: Vec<i32>, targets: Vec<i32> },
    ArrayPayload { element_width: u16, size: u32, data: Vec<u8> },
}

#[inline] fn a8(inst: u16) -> u16 { inst >> 8 }          // 11x AA, 21x AA, ...
#[inline] fn a4(inst: u16) -> u16 { (inst >> 8) & 0x0f } // 12x A (low nibble of high byte)
#[inline] fn b4(inst: u16) -> u16 { inst >> 12 }         // 12x B (high nibble of high byte)
#[inline] fn s4(x: u16) -> i64 { (((x as u8) << 4) as i8 >> 4) as i64 }

impl Operands {
    /// Decodes the operands of the instruction whose first code unit is at `pc`.
    /// Returns the operands and the instruction size in code units.
    pub fn decode(format: Format, code: &[u16], pc: usize) -> Result<(Operands, usize), DexError> {
        let inst = read_u2(code, pc, "opcode")?;
        let unit = |i: usize| read_u2(code, pc + i, "operand");
        let operands = match format {
            Format::Format10x => Operands::F10x,
            Format::Format10t => Operands::F10t { offset: (a8(inst) as u8 as i8) as i32 },
            Format::Format11n => Operands::F11n { a: a4(inst), literal: s4(b4(inst)) },
            Format::Format11x => Operands::F11x { a: a8(inst) },
            Format::Format12x => Operands::F12x { a: a4(inst), b: b4(inst) },
            Format::Format20t => Operands::F20t { offset: unit(1)? as i16 as i32 },
            Format::Format21c => Operands::F21c { a: a8(inst), index: unit(1)? as u32 },
            Format::Format21ih | Format::Format21lh => {
                Operands::F21h { a: a8(inst), high: unit(1)? as i16 as i64 }
            }
            Format::Format21s => Operands::F21s { a: a8(inst), literal: unit(1)? as i16 as i64 },
            Format::Format21t => Operands::F21t { a: a8(inst), offset: unit(1)? as i16 as i32 },
            Format::Format22b => {
                // AA | op, CC | BB
                let bc = unit(1)?;
                Operands::F22b { a: a8(inst), b: bc & 0xff, literal: (bc >> 8) as u8 as i8 as i64 }
            }
            Format::Format22c => Operands::F22c { a: a4(inst), b: b4(inst), index: unit(1)? as u32 },
            Format::Format22s => {
                Operands::F22s { a: a4(inst), b: b4(inst), literal: unit(1)? as i16 as i64 }
            }
            Format::Format22t => {
                Operands::F22t { a: a4(inst), b: b4(inst), offset: unit(1)? as i16 as i32 }
            }
            Format::Format22x => Operands::F22x { a: a8(inst), b: unit(1)? },
            Format::Format23x => {
                let bc = unit(1)?;
                Operands::F23x { a: a8(inst), b: bc & 0xff, c: bc >> 8 }
            }
            Format::Format30t => Operands::F30t { offset: read_u4(code, pc + 1, "offset")? as i32 },
            Format::Format31c => Operands::F31c { a: a8(inst), index: read_u4(code, pc + 1, "index")? },
            Format::Format31i => {
                Operands::F31i { a: a8(inst), literal: read_u4(code, pc + 1, "literal")? as i32 as i64 }
            }
            Format::Format31t => {
                Operands::F31t { a: a8(inst), offset: read_u4(code, pc + 1, "offset")? as i32 }
            }
            Format::Format32x => Operands::F32x { a: unit(1)?, b: unit(2)? },
            Format::Format35c | Format::Format45cc => {
                // A|G | op, BBBB, F|E|D|C (, HHHH)
                let count = b4(inst) as usize;
                if count > 5 {
                    fail!(malformed pc, "Invalid register count {} for non ranged instruction", count);
                }
                let index = unit(1)? as u32;
                let cdef = unit(2)?;
                let all = [cdef & 0xf, (cdef >> 4) & 0xf, (cdef >> 8) & 0xf, cdef >> 12, a4(inst)];
                let registers = all[..count].to_vec();
                if format == Format::Format35c {
                    Operands::F35c { registers, index }
                } else {
                    Operands::F45cc { registers, index, proto: unit(3)? as u32 }
                }
            }
            Format::Format3rc => {
                Operands::F3rc { count: a8(inst), index: unit(1)? as u32, first: unit(2)? }
            }
            Format::Format4rcc => Operands::F4rcc {
                count: a8(inst),
                index: unit(1)? as u32,
                first: unit(2)?,
                proto: unit(3)? as u32,
            },
            Format::Format51l => {
                Operands::F51l { a: a8(inst), literal: read_u8(code, pc + 1, "literal")? as i64 }
            }
            Format::PackedSwitchPayload => {
                // ident, size, first_key, size * target
                let size = unit(1)? as usize;
                let first_key = read_u4(code, pc + 2, "packed-switch key")? as i32;
                let mut targets = Vec::with_capacity(size);
                for i in 0..size {
                    targets.push(read_u4(code, pc + 4 + i * 2, "packed-switch target")? as i32);
                }
                Operands::PackedSwitchPayload { first_key, targets }
            }
            Format::SparseSwitchPayload => {
                // ident, size, size * key, size * target
                let size = unit(1)? as usize;
                let mut keys = Vec::with_capacity(size);
                let mut targets = Vec::with_capacity(size);
                for i in 0..size {
                    keys.push(read_u4(code, pc + 2 + i * 2, "sparse-switch key")? as i32);
                }
                for i in 0..size {
                    targets.push(read_u4(code, pc + 2 + size * 2 + i * 2, "sparse-switch target")? as i32);
                }
                Operands::SparseSwitchPayload { keys, targets }
            }
            Format::ArrayPayload => {
                // ident, element_width, size (u4), data
                let element_width = unit(1)?;
                let size = read_u4(code, pc + 2, "array-data size")?;
                let byte_len = match (element_width as usize).checked_mul(size as usize) {
                    Some(len) => len,
                    None => fail!(malformed pc, "array-data overflow"),
                };
                let mut data = Vec::with_capacity(byte_len);
                for i in 0..byte_len.div_ceil(2) {
                    let cu = read_u2(code, pc + 4 + i, "array-data element")?;
                    data.push(cu as u8);
                    if data.len() < byte_len {
                        data.push((cu >> 8) as u8);
                    }
                }
                Operands::ArrayPayload { element_width, size, data }
            }
        };
        let size = operands.units();
        Ok((operands, size))
    }

    /// Size in code units of an instruction carrying these operands.
    pub fn units(&self) -> usize {
        match self {
            Operands::F10x | Operands::F10t { .. } | Operands::F11n { .. } | Operands::F11x { .. }
            | Operands::F12x { .. } => 1,
            Operands::F20t { .. } | Operands::F21c { .. } | Operands::F21h { .. }
            | Operands::F21s { .. } | Operands::F21t { .. } | Operands::F22b { .. }
            | Operands::F22c { .. } | Operands::F22s { .. } | Operands::F22t { .. }
            | Operands::F22x { .. } | Operands::F23x { .. } => 2,
            Operands::F30t { .. } | Operands::F31c { .. } | Operands::F31i { .. }
            | Operands::F31t { .. } | Operands::F32x { .. } | Operands::F35c { .. }
            | Operands::F3rc { .. } => 3,
            Operands::F45cc { .. } | Operands::F4rcc { .. } => 4,
            Operands::F51l { .. } => 5,
            Operands::PackedSwitchPayload { targets, .. } => 4 + targets.len() * 2,
            Operands::SparseSwitchPayload { keys, .. } => 2 + keys.len() * 4,
            Operands::ArrayPayload { data, .. } => 4 + data.len().div_ceil(2),
        }
    }

    /// Checks that the operands belong to `format` and that every field fits its width.
    pub fn validate(&self, format: Format) -> Result<(), DexError> {
        match (format, self) {
            (Format::Format10x, Operands::F10x) => {}
            (Format::Format10t, Operands::F10t { offset }) => check_signed(*offset as i64, 8, "AA")?,
            (Format::Format11n, Operands::F11n { a, literal }) => {
                check_unsigned(*a as u32, 4, "A")?;
                check_signed(*literal, 4, "B")?;
            }
            (Format::Format11x, Operands::F11x { a }) => check_unsigned(*a as u32, 8, "AA")?,
            (Format::Format12x, Operands::F12x { a, b }) => {
                check_unsigned(*a as u32, 4, "A")?;
                check_unsigned(*b as u32, 4, "B")?;
            }
            (Format::Format20t, Operands::F20t { offset }) => check_signed(*offset as i64, 16, "AAAA")?,
            (Format::Format21c, Operands::F21c { a, index }) => {
                check_unsigned(*a as u32, 8, "AA")?;
                check_unsigned(*index, 16, "BBBB")?;
            }
            (Format::Format21ih | Format::Format21lh, Operands::F21h { a, high }) => {
                check_unsigned(*a as u32, 8, "AA")?;
                check_signed(*high, 16, "BBBB")?;
            }
            (Format::Format21s, Operands::F21s { a, literal }) => {
                check_unsigned(*a as u32, 8, "AA")?;
                check_signed(*literal, 16, "BBBB")?;
            }
            (Format::Format21t, Operands::F21t { a, offset }) => {
                check_unsigned(*a as u32, 8, "AA")?;
                check_signed(*offset as i64, 16, "BBBB")?;
            }
            (Format::Format22b, Operands::F22b { a, b, literal }) => {
                check_unsigned(*a as u32, 8, "AA")?;
                check_unsigned(*b as u32, 8, "BB")?;
                check_signed(*literal, 8, "CC")?;
            }
            (Format::Format22c, Operands::F22c { a, b, index }) => {
                check_unsigned(*a as u32, 4, "A")?;
                check_unsigned(*b as u32, 4, "B")?;
                check_unsigned(*index, 16, "CCCC")?;
            }
            (Format::Format22s, Operands::F22s { a, b, literal }) => {
                check_unsigned(*a as u32, 4, "A")?;
                check_unsigned(*b as u32, 4, "B")?;
                check_signed(*literal, 16, "CCCC")?;
            }
            (Format::Format22t, Operands::F22t { a, b, offset }) => {
                check_unsigned(*a as u32, 4, "A")?;
                check_unsigned(*b as u32, 4, "B")?;
                check_signed(*offset as i64, 16, "CCCC")?;
            }
            (Format::Format22x, Operands::F22x { a, .. }) => check_unsigned(*a as u32, 8, "AA")?,
            (Format::Format23x, Operands::F23x { a, b, c }) => {
                check_unsigned(*a as u32, 8, "AA")?;
                check_unsigned(*b as u32, 8, "BB")?;
                check_unsigned(*c as u32, 8, "CC")?;
            }
            (Format::Format30t, Operands::F30t { .. }) => {}
            (Format::Format31c, Operands::F31c { a, .. }) => check_unsigned(*a as u32, 8, "AA")?,
            (Format::Format31i, Operands::F31i { a, literal }) => {
                check_unsigned(*a as u32, 8, "AA")?;
                check_signed(*literal, 32, "BBBBBBBB")?;
            }
            (Format::Format31t, Operands::F31t { a, .. }) => check_unsigned(*a as u32, 8, "AA")?,
            (Format::Format32x, Operands::F32x { .. }) => {}
            (Format::Format35c, Operands::F35c { registers, index }) => {
                check_register_list(registers)?;
                check_unsigned(*index, 16, "BBBB")?;
            }
            (Format::Format45cc, Operands::F45cc { registers, index, proto }) => {
                check_register_list(registers)?;
                check_unsigned(*index, 16, "BBBB")?;
                check_unsigned(*proto, 16, "HHHH")?;
            }
            (Format::Format3rc, Operands::F3rc { first, count, index }) => {
                check_register_range(*first, *count)?;
                check_unsigned(*index, 16, "BBBB")?;
            }
            (Format::Format4rcc, Operands::F4rcc { first, count, index, proto }) => {
                check_register_range(*first, *count)?;
                check_unsigned(*index, 16, "BBBB")?;
                check_unsigned(*proto, 16, "HHHH")?;
            }
            (Format::Format51l, Operands::F51l { a, .. }) => check_unsigned(*a as u32, 8, "AA")?,
            (Format::PackedSwitchPayload, Operands::PackedSwitchPayload { targets, .. }) => {
                check_unsigned(targets.len() as u32, 16, "size")?;
            }
            (Format::SparseSwitchPayload, Operands::SparseSwitchPayload { keys, targets }) => {
                check_unsigned(keys.len() as u32, 16, "size")?;
                if keys.len() != targets.len() {
                    fail!("sparse-switch payload has {} keys but {} targets", keys.len(), targets.len());
                }
                if keys.windows(2).any(|w| w[0] >= w[1]) {
                    fail!("sparse-switch payload keys are not sorted");
                }
            }
            (Format::ArrayPayload, Operands::ArrayPayload { element_width, size, data }) => {
                if !matches!(element_width, 1 | 2 | 4 | 8) {
                    fail!("Unsupported array-data element width {}", element_width);
                }
                if *element_width as usize * *size as usize != data.len() {
                    fail!("array-data holds {} bytes, expected {} x {}", data.len(), size, element_width);
                }
            }
            (format, operands) => fail!("Operands {:?} do not match format {:?}", operands, format),
        }
        Ok(())
    }

    /// Encodes the instruction. `opcode` is the full first-unit opcode (payload idents included).
    /// The operands must already have been validated against the opcode's format.
    pub fn encode(&self, opcode: u16, out: &mut Vec<u16>) -> usize {
        let op = |high: u16| opcode | (high << 8);
        match self {
            Operands::F10x => write_u2(out, opcode),
            Operands::F10t { offset } => write_u2(out, op(*offset as i8 as u8 as u16)),
            Operands::F11n { a, literal } => write_u2(out, op(((*literal as u16 & 0xf) << 4) | a)),
            Operands::F11x { a } => write_u2(out, op(*a)),
            Operands::F12x { a, b } => write_u2(out, op((b << 4) | a)),
            Operands::F20t { offset } => write_u2(out, opcode) + write_u2(out, *offset as u16),
            Operands::F21c { a, index } => write_u2(out, op(*a)) + write_u2(out, *index as u16),
            Operands::F21h { a, high } => write_u2(out, op(*a)) + write_u2(out, *high as u16),
            Operands::F21s { a, literal } => write_u2(out, op(*a)) + write_u2(out, *literal as u16),
            Operands::F21t { a, offset } => write_u2(out, op(*a)) + write_u2(out, *offset as u16),
            Operands::F22b { a, b, literal } => {
                write_u2(out, op(*a)) + write_u2(out, ((*literal as u8 as u16) << 8) | b)
            }
            Operands::F22c { a, b, index } => write_u2(out, op((b << 4) | a)) + write_u2(out, *index as u16),
            Operands::F22s { a, b, literal } => {
                write_u2(out, op((b << 4) | a)) + write_u2(out, *literal as u16)
            }
            Operands::F22t { a, b, offset } => {
                write_u2(out, op((b << 4) | a)) + write_u2(out, *offset as u16)
            }
            Operands::F22x { a, b } => write_u2(out, op(*a)) + write_u2(out, *b),
            Operands::F23x { a, b, c } => write_u2(out, op(*a)) + write_u2(out, (c << 8) | b),
            Operands::F30t { offset } => write_u2(out, opcode) + write_u4(out, *offset as u32),
            Operands::F31c { a, index } => write_u2(out, op(*a)) + write_u4(out, *index),
            Operands::F31i { a, literal } => write_u2(out, op(*a)) + write_u4(out, *literal as u32),
            Operands::F31t { a, offset } => write_u2(out, op(*a)) + write_u4(out, *offset as u32),
            Operands::F32x { a, b } => write_u2(out, opcode) + write_u2(out, *a) + write_u2(out, *b),
            Operands::F35c { registers, index } => encode_register_list(opcode, registers, *index, out),
            Operands::F45cc { registers, index, proto } => {
                encode_register_list(opcode, registers, *index, out) + write_u2(out, *proto as u16)
            }
            Operands::F3rc { first, count, index } => {
                write_u2(out, op(*count)) + write_u2(out, *index as u16) + write_u2(out, *first)
            }
            Operands::F4rcc { first, count, index, proto } => {
                write_u2(out, op(*count))
                    + write_u2(out, *index as u16)
                    + write_u2(out, *first)
                    + write_u2(out, *proto as u16)
            }
            Operands::F51l { a, literal } => write_u2(out, op(*a)) + write_u8(out, *literal as u64),
            Operands::PackedSwitchPayload { first_key, targets } => {
                let mut n = write_u2(out, opcode) + write_u2(out, targets.len() as u16);
                n += write_u4(out, *first_key as u32);
                for t in targets {
                    n += write_u4(out, *t as u32);
                }
                n
            }
            Operands::SparseSwitchPayload { keys, targets } => {
                let mut n = write_u2(out, opcode) + write_u2(out, keys.len() as u16);
                for k in keys {
                    n += write_u4(out, *k as u32);
                }
                for t in targets {
                    n += write_u4(out, *t as u32);
                }
                n
            }
            Operands::ArrayPayload { element_width, size, data } => {
                let mut n = write_u2(out, opcode) + write_u2(out, *element_width) + write_u4(out, *size);
                for pair in data.chunks(2) {
                    let hi = pair.get(1).copied().unwrap_or(0) as u16;
                    n += write_u2(out, (hi << 8) | pair[0] as u16);
                }
                n
            }
        }
    }
}

fn check_register_list(registers: &[u16]) -> Result<(), DexError> {
    if registers.len() > 5 {
        fail!("{} registers do not fit a non ranged instruction", registers.len());
    }
    for r in registers {
        check_unsigned(*r as u32, 4, "register")?;
    }
    Ok(())
}

fn check_register_range(first: u16, count: u16) -> Result<(), DexError> {
    check_unsigned(count as u32, 8, "AA")?;
    if count > 0 && first as u32 + count as u32 - 1 > crate::dex::U16BIT_MAX {
        fail!("Register range v{} + {} exceeds v65535", first, count);
    }
    Ok(())
}

fn encode_register_list(opcode: u16, registers: &[u16], index: u32, out: &mut Vec<u16>) -> usize {
    let reg = |i: usize| registers.get(i).copied().unwrap_or(0);
    let count = registers.len() as u16;
    let first = opcode | (count << 12) | (reg(4) << 8);
    let cdef = reg(0) | (reg(1) << 4) | (reg(2) << 8) | (reg(3) << 12);
    write_u2(out, first) + write_u2(out, index as u16) + write_u2(out, cdef)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(format: Format, operands: Operands, opcode: u16) {
        operands.validate(format).unwrap();
        let mut out = vec![];
        let written = operands.encode(opcode, &mut out);
        assert_eq!(written, out.len());
        assert_eq!(written, operands.units());
        let (decoded, size) = Operands::decode(format, &out, 0).unwrap();
        assert_eq!(decoded, operands);
        assert_eq!(size, written);
    }

    #[test]
    fn display_names() {
        assert_eq!(display_name_of("rem-int"), "RemInt");
        assert_eq!(display_name_of("aget-wide"), "AgetWide");
        assert_eq!(display_name_of("rem-int/lit8"), "RemIntLit8");
        assert_eq!(display_name_of("move/from16"), "MoveFrom16");
    }

    #[test]
    fn layouts_round_trip() {
        round_trip(Format::Format23x, Operands::F23x { a: 0, b: 1, c: 2 }, 0x94);
        round_trip(Format::Format11n, Operands::F11n { a: 15, literal: -8 }, 0x12);
        round_trip(Format::Format22s, Operands::F22s { a: 3, b: 4, literal: -32768 }, 0xd1);
        round_trip(Format::Format22b, Operands::F22b { a: 200, b: 255, literal: -128 }, 0xdc);
        round_trip(Format::Format10t, Operands::F10t { offset: -3 }, 0x28);
        round_trip(Format::Format30t, Operands::F30t { offset: 0 }, 0x2a);
        round_trip(Format::Format21ih, Operands::F21h { a: 7, high: -1 }, 0x15);
        round_trip(Format::Format31i, Operands::F31i { a: 7, literal: i32::MIN as i64 }, 0x14);
        round_trip(Format::Format51l, Operands::F51l { a: 7, literal: i64::MIN + 3 }, 0x18);
        round_trip(Format::Format32x, Operands::F32x { a: 65535, b: 256 }, 0x03);
        round_trip(Format::Format35c, Operands::F35c { registers: vec![1, 2, 3, 4, 5], index: 9 }, 0x6e);
        round_trip(Format::Format35c, Operands::F35c { registers: vec![], index: 9 }, 0x71);
        round_trip(Format::Format3rc, Operands::F3rc { first: 300, count: 6, index: 65535 }, 0x78);
        round_trip(
            Format::Format45cc,
            Operands::F45cc { registers: vec![0, 1], index: 2, proto: 3 },
            0xfa,
        );
        round_trip(Format::Format4rcc, Operands::F4rcc { first: 16, count: 2, index: 2, proto: 3 }, 0xfb);
        round_trip(
            Format::PackedSwitchPayload,
            Operands::PackedSwitchPayload { first_key: -1, targets: vec![3, 5, 7] },
            0x100,
        );
        round_trip(
            Format::SparseSwitchPayload,
            Operands::SparseSwitchPayload { keys: vec![-5, 10, 1000], targets: vec![3, 5, 7] },
            0x200,
        );
        round_trip(
            Format::ArrayPayload,
            Operands::ArrayPayload { element_width: 1, size: 3, data: vec![1, 2, 3] },
            0x300,
        );
    }

    #[test]
    fn encoding_layout_matches_dalvik() {
        // rem-int v0, v1, v2 => 0x0094, 0x0201
        let mut out = vec![];
        Operands::F23x { a: 0, b: 1, c: 2 }.encode(0x94, &mut out);
        assert_eq!(out, vec![0x0094, 0x0201]);

        // invoke-virtual {v1, v2, v3}, method@4 => 0x306e, 0x0004, 0x0321
        let mut out = vec![];
        Operands::F35c { registers: vec![1, 2, 3], index: 4 }.encode(0x6e, &mut out);
        assert_eq!(out, vec![0x306e, 0x0004, 0x0321]);
    }

    #[test]
    fn width_violations_are_internal_errors() {
        let e = Operands::F12x { a: 16, b: 0 }.validate(Format::Format12x).unwrap_err();
        assert!(e.is_internal());
        assert!(Operands::F23x { a: 256, b: 0, c: 0 }.validate(Format::Format23x).is_err());
        assert!(Operands::F11n { a: 0, literal: 8 }.validate(Format::Format11n).is_err());
        assert!(Operands::F35c { registers: vec![0; 6], index: 0 }.validate(Format::Format35c).is_err());
        assert!(Operands::F35c { registers: vec![16], index: 0 }.validate(Format::Format35c).is_err());
        assert!(Operands::F3rc { first: 65535, count: 2, index: 0 }.validate(Format::Format3rc).is_err());
        assert!(Operands::F21c { a: 0, index: 65536 }.validate(Format::Format21c).is_err());
        assert!(Operands::F23x { a: 0, b: 0, c: 0 }.validate(Format::Format12x).is_err());
    }

    #[test]
    fn truncated_streams_are_malformed() {
        let e = Operands::decode(Format::Format23x, &[0x0094], 0).unwrap_err();
        assert_eq!(e.kind(), crate::dex::error::ErrorKind::Malformed { offset: 1 });
        let e = Operands::decode(Format::Format51l, &[0x0018, 0, 0, 0], 0).unwrap_err();
        assert!(e.is_malformed());
        // more than five registers in a 35c instruction
        let e = Operands::decode(Format::Format35c, &[0x606e, 0, 0], 0).unwrap_err();
        assert!(e.is_malformed());
    }
}
