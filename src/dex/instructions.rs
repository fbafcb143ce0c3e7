use crate::dex::error::{DexError, ResultExt};
use crate::dex::opcode_format::{Format, Opcode, Operands, ReferenceType};
use crate::dex::read_u2;
use std::fmt;

/// One decoded Dalvik instruction: a catalogue entry plus its operands.
#[derive(Debug, Clone, PartialEq)]
pub struct DexInstruction {
    pub opcode: &'static Opcode,
    pub operands: Operands,
}

impl PartialEq for Opcode {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl DexInstruction {
    /// Pairs an opcode with operands, checking the operands against the opcode's format.
    pub fn new(opcode: &'static Opcode, operands: Operands) -> Result<Self, DexError> {
        operands.validate(opcode.format).context(|| opcode.name.to_string())?;
        Ok(DexInstruction { opcode, operands })
    }

    pub fn name(&self) -> &'static str {
        self.opcode.name
    }

    pub fn format(&self) -> Format {
        self.opcode.format
    }

    /// Size in code units.
    pub fn size(&self) -> usize {
        self.operands.units()
    }

    pub fn can_throw(&self) -> bool {
        self.opcode.can_throw()
    }

    /// Appends the encoded instruction to `out`, returning the number of code units written.
    pub fn encode(&self, out: &mut Vec<u16>) -> usize {
        self.operands.encode(self.opcode.value, out)
    }

    /// First register operand (`A`, `AA` or `AAAA`).
    pub fn a(&self) -> Result<u16, DexError> {
        match &self.operands {
            Operands::F11n { a, .. }
            | Operands::F11x { a }
            | Operands::F12x { a, .. }
            | Operands::F21c { a, .. }
            | Operands::F21h { a, .. }
            | Operands::F21s { a, .. }
            | Operands::F21t { a, .. }
            | Operands::F22b { a, .. }
            | Operands::F22c { a, .. }
            | Operands::F22s { a, .. }
            | Operands::F22t { a, .. }
            | Operands::F22x { a, .. }
            | Operands::F23x { a, .. }
            | Operands::F31c { a, .. }
            | Operands::F31i { a, .. }
            | Operands::F31t { a, .. }
            | Operands::F32x { a, .. }
            | Operands::F51l { a, .. } => Ok(*a),
            _ => fail!("{} has no A operand", self.name()),
        }
    }

    /// Second register operand.
    pub fn b(&self) -> Result<u16, DexError> {
        match &self.operands {
            Operands::F12x { b, .. }
            | Operands::F22b { b, .. }
            | Operands::F22c { b, .. }
            | Operands::F22s { b, .. }
            | Operands::F22t { b, .. }
            | Operands::F22x { b, .. }
            | Operands::F23x { b, .. }
            | Operands::F32x { b, .. } => Ok(*b),
            _ => fail!("{} has no B operand", self.name()),
        }
    }

    pub fn c(&self) -> Result<u16, DexError> {
        match &self.operands {
            Operands::F23x { c, .. } => Ok(*c),
            _ => fail!("{} has no C operand", self.name()),
        }
    }

    /// The literal with its implicit shift applied (`const/high16` yields `high << 16`).
    pub fn literal(&self) -> Result<i64, DexError> {
        match (&self.operands, self.format()) {
            (Operands::F21h { high, .. }, Format::Format21ih) => Ok(high << 16),
            (Operands::F21h { high, .. }, _) => Ok(high << 48),
            (Operands::F11n { literal, .. }, _)
            | (Operands::F21s { literal, .. }, _)
            | (Operands::F22b { literal, .. }, _)
            | (Operands::F22s { literal, .. }, _)
            | (Operands::F31i { literal, .. }, _)
            | (Operands::F51l { literal, .. }, _) => Ok(*literal),
            _ => fail!("{} has no literal operand", self.name()),
        }
    }

    /// Constant pool index (string, type, field, method or call site).
    pub fn index(&self) -> Result<u32, DexError> {
        match &self.operands {
            Operands::F21c { index, .. }
            | Operands::F22c { index, .. }
            | Operands::F31c { index, .. }
            | Operands::F35c { index, .. }
            | Operands::F3rc { index, .. }
            | Operands::F45cc { index, .. }
            | Operands::F4rcc { index, .. } => Ok(*index),
            _ => fail!("{} has no index operand", self.name()),
        }
    }

    pub fn proto_index(&self) -> Result<u32, DexError> {
        match &self.operands {
            Operands::F45cc { proto, .. } | Operands::F4rcc { proto, .. } => Ok(*proto),
            _ => fail!("{} has no proto operand", self.name()),
        }
    }

    /// Branch offset in code units relative to this instruction.
    pub fn offset(&self) -> Result<i32, DexError> {
        match &self.operands {
            Operands::F10t { offset }
            | Operands::F20t { offset }
            | Operands::F30t { offset }
            | Operands::F21t { offset, .. }
            | Operands::F22t { offset, .. }
            | Operands::F31t { offset, .. } => Ok(*offset),
            _ => fail!("{} has no offset operand", self.name()),
        }
    }

    /// Argument registers of an invoke style instruction, ranges expanded.
    pub fn registers(&self) -> Result<Vec<u16>, DexError> {
        match &self.operands {
            Operands::F35c { registers, .. } | Operands::F45cc { registers, .. } => Ok(registers.clone()),
            Operands::F3rc { first, count, .. } | Operands::F4rcc { first, count, .. } => {
                Ok((0..*count).map(|i| first + i).collect())
            }
            _ => fail!("{} has no register list", self.name()),
        }
    }

    fn reference(&self, index: u32) -> String {
        let kind = match self.opcode.reference_type {
            ReferenceType::None => "",
            ReferenceType::String => "string",
            ReferenceType::Type => "type",
            ReferenceType::Field => "field",
            ReferenceType::Method => "method",
            ReferenceType::CallSite => "call_site",
            ReferenceType::MethodProto => "proto",
            ReferenceType::MethodHandle => "method_handle",
        };
        format!("{}@{}", kind, index)
    }
}

impl fmt::Display for DexInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name();
        match &self.operands {
            Operands::F10x => write!(f, "{}", name),
            Operands::F10t { offset } | Operands::F20t { offset } | Operands::F30t { offset } => {
                write!(f, "{} {:+}", name, offset)
            }
            Operands::F11x { a } => write!(f, "{} v{}", name, a),
            Operands::F12x { a, b } | Operands::F22x { a, b } | Operands::F32x { a, b } => {
                write!(f, "{} v{}, v{}", name, a, b)
            }
            Operands::F11n { a, .. }
            | Operands::F21s { a, .. }
            | Operands::F21h { a, .. }
            | Operands::F31i { a, .. }
            | Operands::F51l { a, .. } => {
                write!(f, "{} v{}, #{}", name, a, self.literal().map_err(|_| fmt::Error)?)
            }
            Operands::F21c { a, index } | Operands::F31c { a, index } => {
                write!(f, "{} v{}, {}", name, a, self.reference(*index))
            }
            Operands::F21t { a, offset } | Operands::F31t { a, offset } => {
                write!(f, "{} v{}, {:+}", name, a, offset)
            }
            Operands::F22b { a, b, literal } | Operands::F22s { a, b, literal } => {
                write!(f, "{} v{}, v{}, #{}", name, a, b, literal)
            }
            Operands::F22c { a, b, index } => write!(f, "{} v{}, v{}, {}", name, a, b, self.reference(*index)),
            Operands::F22t { a, b, offset } => write!(f, "{} v{}, v{}, {:+}", name, a, b, offset),
            Operands::F23x { a, b, c } => write!(f, "{} v{}, v{}, v{}", name, a, b, c),
            Operands::F35c { registers, index } | Operands::F45cc { registers, index, .. } => {
                let regs: Vec<String> = registers.iter().map(|r| format!("v{}", r)).collect();
                write!(f, "{} {{{}}}, {}", name, regs.join(", "), self.reference(*index))?;
                if let Operands::F45cc { proto, .. } = &self.operands {
                    write!(f, ", proto@{}", proto)?;
                }
                Ok(())
            }
            Operands::F3rc { first, count, index } | Operands::F4rcc { first, count, index, .. } => {
                if *count == 0 {
                    write!(f, "{} {{}}, {}", name, self.reference(*index))?;
                } else {
                    let last = first + (count - 1);
                    write!(f, "{} {{v{} .. v{}}}, {}", name, first, last, self.reference(*index))?;
                }
                if let Operands::F4rcc { proto, .. } = &self.operands {
                    write!(f, ", proto@{}", proto)?;
                }
                Ok(())
            }
            Operands::PackedSwitchPayload { first_key, targets } => {
                write!(f, "{} first_key={} targets={:?}", name, first_key, targets)
            }
            Operands::SparseSwitchPayload { keys, targets } => {
                write!(f, "{} keys={:?} targets={:?}", name, keys, targets)
            }
            Operands::ArrayPayload { element_width, size, .. } => {
                write!(f, "{} width={} size={}", name, element_width, size)
            }
        }
    }
}

/// Opcode value of the instruction starting at `pc`; payload idents keep their high byte.
fn opcode_value_at(code: &[u16], pc: usize) -> Result<u16, DexError> {
    let unit = read_u2(code, pc, "opcode")?;
    let low = unit & 0xff;
    Ok(if low == 0 && (1..=3).contains(&(unit >> 8)) { unit } else { low })
}

/// Decodes a whole method body into `(offset, instruction)` pairs.
///
/// Opcodes newer than `min_api` are rejected as unsupported.
pub fn decode_method(code: &[u16], min_api: i32) -> Result<Vec<(u32, DexInstruction)>, DexError> {
    let mut instructions = Vec::new();
    let mut pc = 0;
    while pc < code.len() {
        let value = opcode_value_at(code, pc)?;
        let opcode = match Opcode::lookup(value, min_api) {
            Ok(opcode) => opcode,
            Err(e) if e.is_internal() => fail!(malformed pc, "Unknown opcode 0x{:02x}", value),
            Err(e) => return Err(e),
        };
        let (operands, size) = Operands::decode(opcode.format, code, pc).context(|| opcode.name.to_string())?;
        if let Err(e) = operands.validate(opcode.format) {
            fail!(malformed pc, "{} in {}", e.message(), opcode.name);
        }
        log::trace!("0x{:04x}: {:?}", pc, operands);
        instructions.push((pc as u32, DexInstruction { opcode, operands }));
        pc += size;
    }
    Ok(instructions)
}

/// Encodes a sequence of instructions back into code units.
pub fn encode_method(instructions: &[DexInstruction]) -> Vec<u16> {
    let mut out = Vec::with_capacity(instructions.iter().map(|i| i.size()).sum());
    for instruction in instructions {
        instruction.encode(&mut out);
    }
    out
}
