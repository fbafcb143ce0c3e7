#[macro_use]
pub mod error;

pub mod instructions;
pub mod opcode_format;
pub mod opcodes;

use crate::dex::error::DexError;

pub const U4BIT_MAX: u32 = 0xf;
pub const U8BIT_MAX: u32 = 0xff;
pub const U16BIT_MAX: u32 = 0xffff;

/// Largest number of register units a non ranged invoke can address.
pub const MAX_NON_RANGED_ARGUMENT_REGISTERS: u32 = 5;

// Basic code unit reading and writing

pub(crate) fn read_u2(code: &[u16], pc: usize, what: &str) -> Result<u16, DexError>
{
    match code.get(pc)
    {
        Some(unit) => Ok(*unit),
        None => fail!(malformed pc, "Unexpected end of stream reading {}", what),
    }
}

pub(crate) fn read_u4(code: &[u16], pc: usize, what: &str) -> Result<u32, DexError>
{
    let lo = read_u2(code, pc, what)? as u32;
    let hi = read_u2(code, pc + 1, what)? as u32;
    Ok((hi << 16) | lo)
}

pub(crate) fn read_u8(code: &[u16], pc: usize, what: &str) -> Result<u64, DexError>
{
    let lo = read_u4(code, pc, what)? as u64;
    let hi = read_u4(code, pc + 2, what)? as u64;
    Ok((hi << 32) | lo)
}

pub(crate) fn write_u2(buffer: &mut Vec<u16>, val: u16) -> usize
{
    buffer.push(val);
    1
}

pub(crate) fn write_u4(buffer: &mut Vec<u16>, val: u32) -> usize
{
    buffer.push(val as u16);
    buffer.push((val >> 16) as u16);
    2
}

pub(crate) fn write_u8(buffer: &mut Vec<u16>, val: u64) -> usize
{
    for i in 0..4
    {
        buffer.push((val >> (i * 16)) as u16);
    }
    4
}

/// Fails when `value` needs more than `bits` unsigned bits.
pub(crate) fn check_unsigned(value: u32, bits: u32, field: &str) -> Result<(), DexError>
{
    if bits < 32 && value >> bits != 0
    {
        fail!("Operand {} = {} does not fit in {} unsigned bits", field, value, bits);
    }
    Ok(())
}

/// Fails when `value` needs more than `bits` bits in two's complement.
pub(crate) fn check_signed(value: i64, bits: u32, field: &str) -> Result<(), DexError>
{
    if bits < 64
    {
        let min = -(1i64 << (bits - 1));
        let max = (1i64 << (bits - 1)) - 1;
        if value < min || value > max
        {
            fail!("Operand {} = {} does not fit in {} signed bits", field, value, bits);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn width_checks()
    {
        assert!(check_unsigned(15, 4, "A").is_ok());
        assert!(check_unsigned(16, 4, "A").unwrap_err().is_internal());
        assert!(check_unsigned(255, 8, "AA").is_ok());
        assert!(check_unsigned(256, 8, "AA").is_err());
        assert!(check_signed(-8, 4, "B").is_ok());
        assert!(check_signed(7, 4, "B").is_ok());
        assert!(check_signed(8, 4, "B").is_err());
        assert!(check_signed(i64::MIN, 64, "BBBBBBBBBBBBBBBB").is_ok());
    }

    #[test]
    fn truncated_reads_report_offset()
    {
        let code = [0x1234u16];
        assert_eq!(read_u2(&code, 0, "opcode").unwrap(), 0x1234);
        let e = read_u4(&code, 0, "literal").unwrap_err();
        assert_eq!(e.kind(), error::ErrorKind::Malformed { offset: 1 });
    }

    #[test]
    fn little_endian_units()
    {
        let mut buffer = vec![];
        write_u4(&mut buffer, 0x1234_5678);
        write_u8(&mut buffer, 0x0102_0304_0506_0708);
        assert_eq!(buffer, vec![0x5678, 0x1234, 0x0708, 0x0506, 0x0304, 0x0102]);
        assert_eq!(read_u4(&buffer, 0, "x").unwrap(), 0x1234_5678);
        assert_eq!(read_u8(&buffer, 2, "x").unwrap(), 0x0102_0304_0506_0708);
        assert_eq!(write_u2(&mut buffer, 7), 1);
    }
}
