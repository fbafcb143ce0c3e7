use super::insn;
use crate::dex::error::ErrorKind;
use crate::dex::instructions::{decode_method, encode_method, DexInstruction};
use crate::dex::opcode_format::{Format, Operands};
use crate::dex::opcodes::OPCODES;

fn sample_operands(format: Format) -> Operands {
    match format {
        Format::Format10x => Operands::F10x,
        Format::Format10t => Operands::F10t { offset: -3 },
        Format::Format11n => Operands::F11n { a: 1, literal: -2 },
        Format::Format11x => Operands::F11x { a: 200 },
        Format::Format12x => Operands::F12x { a: 3, b: 14 },
        Format::Format20t => Operands::F20t { offset: -300 },
        Format::Format21c => Operands::F21c { a: 7, index: 0x1234 },
        Format::Format21ih | Format::Format21lh => Operands::F21h { a: 9, high: -2 },
        Format::Format21s => Operands::F21s { a: 8, literal: -1000 },
        Format::Format21t => Operands::F21t { a: 2, offset: 40 },
        Format::Format22b => Operands::F22b { a: 1, b: 255, literal: -128 },
        Format::Format22c => Operands::F22c { a: 2, b: 15, index: 77 },
        Format::Format22s => Operands::F22s { a: 3, b: 4, literal: 30000 },
        Format::Format22t => Operands::F22t { a: 5, b: 6, offset: -7 },
        Format::Format22x => Operands::F22x { a: 255, b: 65535 },
        Format::Format23x => Operands::F23x { a: 1, b: 2, c: 3 },
        Format::Format30t => Operands::F30t { offset: 100_000 },
        Format::Format31c => Operands::F31c { a: 4, index: 0x12345 },
        Format::Format31i => Operands::F31i { a: 6, literal: -123_456 },
        Format::Format31t => Operands::F31t { a: 1, offset: 8 },
        Format::Format32x => Operands::F32x { a: 1000, b: 2000 },
        Format::Format35c => Operands::F35c { registers: vec![1, 2, 3, 4, 5], index: 9 },
        Format::Format3rc => Operands::F3rc { first: 300, count: 7, index: 10 },
        Format::Format45cc => Operands::F45cc { registers: vec![1, 2], index: 3, proto: 4 },
        Format::Format4rcc => Operands::F4rcc { first: 20, count: 3, index: 5, proto: 6 },
        Format::Format51l => Operands::F51l { a: 2, literal: 0x1234_5678_9abc_def0 },
        Format::PackedSwitchPayload => Operands::PackedSwitchPayload { first_key: 10, targets: vec![3, -4] },
        Format::SparseSwitchPayload => Operands::SparseSwitchPayload { keys: vec![-5, 9], targets: vec![1, 2] },
        Format::ArrayPayload => Operands::ArrayPayload { element_width: 2, size: 3, data: vec![1, 2, 3, 4, 5, 6] },
    }
}

#[test]
fn every_opcode_survives_encode_and_decode() {
    for opcode in OPCODES.iter() {
        let instruction = DexInstruction::new(opcode, sample_operands(opcode.format)).unwrap();
        let code = encode_method(std::slice::from_ref(&instruction));
        assert_eq!(code.len(), instruction.size(), "{}", opcode.name);
        let decoded = decode_method(&code, 28).unwrap_or_else(|e| panic!("{}: {}", opcode.name, e));
        assert_eq!(decoded.len(), 1, "{}", opcode.name);
        assert_eq!(decoded[0].1, instruction, "{}", opcode.name);
    }
}

#[test]
fn payloads_decode_in_place() {
    let instructions = vec![
        insn("packed-switch", Operands::F31t { a: 0, offset: 4 }),
        insn("return-void", Operands::F10x),
        insn("packed-switch-payload", Operands::PackedSwitchPayload { first_key: 1, targets: vec![3] }),
    ];
    let code = encode_method(&instructions);
    assert_eq!(code[4], 0x0100);
    let decoded = decode_method(&code, 1).unwrap();
    let offsets: Vec<u32> = decoded.iter().map(|(o, _)| *o).collect();
    assert_eq!(offsets, vec![0, 3, 4]);
    assert!(decoded[2].1.opcode.is_payload());
}

#[test]
fn truncated_stream() {
    // const v0 needs three units
    let e = decode_method(&[0x0014, 0x0001], 1).unwrap_err();
    assert_eq!(e.kind(), ErrorKind::Malformed { offset: 2 });
    assert!(e.to_string().contains("for const"));
}

#[test]
fn method_handles_need_android_p() {
    let code = encode_method(&[insn("const-method-handle", Operands::F21c { a: 0, index: 0 })]);
    let e = decode_method(&code, 26).unwrap_err();
    assert_eq!(e.kind(), ErrorKind::Unsupported { min_api: 28 });
    assert_eq!(
        e.message(),
        "const-method-handle are only supported starting with Android P (--min-api 28)"
    );
    assert!(decode_method(&code, 28).is_ok());
}

#[test]
fn operands_are_never_truncated() {
    let e = DexInstruction::new(
        OPCODES.iter().find(|o| o.name == "const/4").unwrap(),
        Operands::F11n { a: 0, literal: 8 },
    )
    .unwrap_err();
    assert!(e.is_internal());
}

#[test]
fn malformed_payloads_fail_at_their_offset() {
    // fill-array-data v0, +4; return-void; array-payload with 3-byte elements
    let array = [0x0026, 0x0004, 0x0000, 0x000e, 0x0300, 0x0003, 0x0001, 0x0000, 0x0201, 0x0003];
    let e = decode_method(&array, 1).unwrap_err();
    assert_eq!(e.kind(), ErrorKind::Malformed { offset: 4 });
    assert!(e.message().contains("element width 3"), "{}", e);

    // sparse-switch v0, +4; return-void; payload keys [5, 5]
    let duplicate = [0x002c, 0x0004, 0x0000, 0x000e, 0x0200, 0x0002, 5, 0, 5, 0, 1, 0, 1, 0];
    let e = decode_method(&duplicate, 1).unwrap_err();
    assert_eq!(e.kind(), ErrorKind::Malformed { offset: 4 });
    assert!(e.message().contains("not sorted"), "{}", e);

    // keys [9, -1]
    let unsorted = [0x002c, 0x0004, 0x0000, 0x000e, 0x0200, 0x0002, 9, 0, 0xffff, 0xffff, 1, 0, 1, 0];
    assert_eq!(decode_method(&unsorted, 1).unwrap_err().kind(), ErrorKind::Malformed { offset: 4 });
}
