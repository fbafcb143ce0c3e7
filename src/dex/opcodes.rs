use crate::dex::opcode_format::{Format, Opcode, OpcodeFlags, ReferenceType};
use crate::ir::invoke::InvokeType;
use crate::ir::{BinopKind, CmpBias, IfType, MemberType, MonitorType, NumericType, ValueType};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// The Dalvik opcode catalogue: every opcode with its format, flags, availability and the way it
/// contributes to the IR.
pub static OPCODES: Lazy<Vec<Opcode>> = Lazy::new(|| {
    vec![
        // NOP
        Opcode::new(
            Opcode::all_apis(0x00),
            "nop",
            ReferenceType::None,
            Format::Format10x,
            OpcodeFlags::CAN_CONTINUE,
            |_, _| Ok(()),
        ),
        // MOVE
        Opcode::new(
            Opcode::all_apis(0x01),
            "move",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_move(ValueType::Single, i.a()?, i.b()?),
        ),
        // MOVE_FROM16
        Opcode::new(
            Opcode::all_apis(0x02),
            "move/from16",
            ReferenceType::None,
            Format::Format22x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_move(ValueType::Single, i.a()?, i.b()?),
        ),
        // MOVE_16
        Opcode::new(
            Opcode::all_apis(0x03),
            "move/16",
            ReferenceType::None,
            Format::Format32x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_move(ValueType::Single, i.a()?, i.b()?),
        ),
        // MOVE_WIDE
        Opcode::new(
            Opcode::all_apis(0x04),
            "move-wide",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_move(ValueType::Wide, i.a()?, i.b()?),
        ),
        // MOVE_WIDE_FROM16
        Opcode::new(
            Opcode::all_apis(0x05),
            "move-wide/from16",
            ReferenceType::None,
            Format::Format22x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_move(ValueType::Wide, i.a()?, i.b()?),
        ),
        // MOVE_WIDE_16
        Opcode::new(
            Opcode::all_apis(0x06),
            "move-wide/16",
            ReferenceType::None,
            Format::Format32x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_move(ValueType::Wide, i.a()?, i.b()?),
        ),
        // MOVE_OBJECT
        Opcode::new(
            Opcode::all_apis(0x07),
            "move-object",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_move(ValueType::Object, i.a()?, i.b()?),
        ),
        // MOVE_OBJECT_FROM16
        Opcode::new(
            Opcode::all_apis(0x08),
            "move-object/from16",
            ReferenceType::None,
            Format::Format22x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_move(ValueType::Object, i.a()?, i.b()?),
        ),
        // MOVE_OBJECT_16
        Opcode::new(
            Opcode::all_apis(0x09),
            "move-object/16",
            ReferenceType::None,
            Format::Format32x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_move(ValueType::Object, i.a()?, i.b()?),
        ),
        // MOVE_RESULT
        Opcode::new(
            Opcode::all_apis(0x0a),
            "move-result",
            ReferenceType::None,
            Format::Format11x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_move_result(ValueType::Single, i.a()?),
        ),
        // MOVE_RESULT_WIDE
        Opcode::new(
            Opcode::all_apis(0x0b),
            "move-result-wide",
            ReferenceType::None,
            Format::Format11x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_move_result(ValueType::Wide, i.a()?),
        ),
        // MOVE_RESULT_OBJECT
        Opcode::new(
            Opcode::all_apis(0x0c),
            "move-result-object",
            ReferenceType::None,
            Format::Format11x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_move_result(ValueType::Object, i.a()?),
        ),
        // MOVE_EXCEPTION
        Opcode::new(
            Opcode::all_apis(0x0d),
            "move-exception",
            ReferenceType::None,
            Format::Format11x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_move_exception(i.a()?),
        ),
        // RETURN_VOID
        Opcode::new(
            Opcode::all_apis(0x0e),
            "return-void",
            ReferenceType::None,
            Format::Format10x,
            OpcodeFlags::empty(),
            |b, _| b.add_return_void(),
        ),
        // RETURN
        Opcode::new(
            Opcode::all_apis(0x0f),
            "return",
            ReferenceType::None,
            Format::Format11x,
            OpcodeFlags::empty(),
            |b, i| b.add_return(ValueType::Single, i.a()?),
        ),
        // RETURN_WIDE
        Opcode::new(
            Opcode::all_apis(0x10),
            "return-wide",
            ReferenceType::None,
            Format::Format11x,
            OpcodeFlags::empty(),
            |b, i| b.add_return(ValueType::Wide, i.a()?),
        ),
        // RETURN_OBJECT
        Opcode::new(
            Opcode::all_apis(0x11),
            "return-object",
            ReferenceType::None,
            Format::Format11x,
            OpcodeFlags::empty(),
            |b, i| b.add_return(ValueType::Object, i.a()?),
        ),
        // CONST_4
        Opcode::new(
            Opcode::all_apis(0x12),
            "const/4",
            ReferenceType::None,
            Format::Format11n,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_const(ValueType::Single, i.a()?, i.literal()?),
        ),
        // CONST_16
        Opcode::new(
            Opcode::all_apis(0x13),
            "const/16",
            ReferenceType::None,
            Format::Format21s,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_const(ValueType::Single, i.a()?, i.literal()?),
        ),
        // CONST
        Opcode::new(
            Opcode::all_apis(0x14),
            "const",
            ReferenceType::None,
            Format::Format31i,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_const(ValueType::Single, i.a()?, i.literal()?),
        ),
        // CONST_HIGH16
        Opcode::new(
            Opcode::all_apis(0x15),
            "const/high16",
            ReferenceType::None,
            Format::Format21ih,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_const(ValueType::Single, i.a()?, i.literal()?),
        ),
        // CONST_WIDE_16
        Opcode::new(
            Opcode::all_apis(0x16),
            "const-wide/16",
            ReferenceType::None,
            Format::Format21s,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_const(ValueType::Wide, i.a()?, i.literal()?),
        ),
        // CONST_WIDE_32
        Opcode::new(
            Opcode::all_apis(0x17),
            "const-wide/32",
            ReferenceType::None,
            Format::Format31i,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_const(ValueType::Wide, i.a()?, i.literal()?),
        ),
        // CONST_WIDE
        Opcode::new(
            Opcode::all_apis(0x18),
            "const-wide",
            ReferenceType::None,
            Format::Format51l,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_const(ValueType::Wide, i.a()?, i.literal()?),
        ),
        // CONST_WIDE_HIGH16
        Opcode::new(
            Opcode::all_apis(0x19),
            "const-wide/high16",
            ReferenceType::None,
            Format::Format21lh,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_const(ValueType::Wide, i.a()?, i.literal()?),
        ),
        // CONST_STRING
        Opcode::new(
            Opcode::all_apis(0x1a),
            "const-string",
            ReferenceType::String,
            Format::Format21c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_const_string(i.a()?, i.index()?),
        ),
        // CONST_STRING_JUMBO
        Opcode::new(
            Opcode::all_apis(0x1b),
            "const-string/jumbo",
            ReferenceType::String,
            Format::Format31c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_const_string(i.a()?, i.index()?),
        ),
        // CONST_CLASS
        Opcode::new(
            Opcode::all_apis(0x1c),
            "const-class",
            ReferenceType::Type,
            Format::Format21c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_const_class(i.a()?, i.index()?),
        ),
        // MONITOR_ENTER
        Opcode::new(
            Opcode::all_apis(0x1d),
            "monitor-enter",
            ReferenceType::None,
            Format::Format11x,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE,
            |b, i| b.add_monitor(MonitorType::Enter, i.a()?),
        ),
        // MONITOR_EXIT
        Opcode::new(
            Opcode::all_apis(0x1e),
            "monitor-exit",
            ReferenceType::None,
            Format::Format11x,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE,
            |b, i| b.add_monitor(MonitorType::Exit, i.a()?),
        ),
        // CHECK_CAST
        Opcode::new(
            Opcode::all_apis(0x1f),
            "check-cast",
            ReferenceType::Type,
            Format::Format21c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_check_cast(i.a()?, i.index()?),
        ),
        // INSTANCE_OF
        Opcode::new(
            Opcode::all_apis(0x20),
            "instance-of",
            ReferenceType::Type,
            Format::Format22c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_instance_of(i.a()?, i.b()?, i.index()?),
        ),
        // ARRAY_LENGTH
        Opcode::new(
            Opcode::all_apis(0x21),
            "array-length",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_array_length(i.a()?, i.b()?),
        ),
        // NEW_INSTANCE
        Opcode::new(
            Opcode::all_apis(0x22),
            "new-instance",
            ReferenceType::Type,
            Format::Format21c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_new_instance(i.a()?, i.index()?),
        ),
        // NEW_ARRAY
        Opcode::new(
            Opcode::all_apis(0x23),
            "new-array",
            ReferenceType::Type,
            Format::Format22c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_new_array_empty(i.a()?, i.b()?, i.index()?),
        ),
        // FILLED_NEW_ARRAY
        Opcode::new(
            Opcode::all_apis(0x24),
            "filled-new-array",
            ReferenceType::Type,
            Format::Format35c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_RESULT,
            |b, i| b.add_invoke_new_array(i.index()?, &i.registers()?),
        ),
        // FILLED_NEW_ARRAY_RANGE
        Opcode::new(
            Opcode::all_apis(0x25),
            "filled-new-array/range",
            ReferenceType::Type,
            Format::Format3rc,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_RESULT,
            |b, i| b.add_invoke_new_array(i.index()?, &i.registers()?),
        ),
        // FILL_ARRAY_DATA
        Opcode::new(
            Opcode::all_apis(0x26),
            "fill-array-data",
            ReferenceType::None,
            Format::Format31t,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE,
            |b, i| b.add_fill_array_data(i.a()?, i.offset()?),
        ),
        // THROW
        Opcode::new(
            Opcode::all_apis(0x27),
            "throw",
            ReferenceType::None,
            Format::Format11x,
            OpcodeFlags::CAN_THROW,
            |b, i| b.add_throw(i.a()?),
        ),
        // GOTO
        Opcode::new(
            Opcode::all_apis(0x28),
            "goto",
            ReferenceType::None,
            Format::Format10t,
            OpcodeFlags::BRANCH,
            |b, i| b.add_goto(i.offset()?),
        ),
        // GOTO_16
        Opcode::new(
            Opcode::all_apis(0x29),
            "goto/16",
            ReferenceType::None,
            Format::Format20t,
            OpcodeFlags::BRANCH,
            |b, i| b.add_goto(i.offset()?),
        ),
        // GOTO_32
        Opcode::new(
            Opcode::all_apis(0x2a),
            "goto/32",
            ReferenceType::None,
            Format::Format30t,
            OpcodeFlags::BRANCH,
            |b, i| b.add_goto(i.offset()?),
        ),
        // PACKED_SWITCH
        Opcode::new(
            Opcode::all_apis(0x2b),
            "packed-switch",
            ReferenceType::None,
            Format::Format31t,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SWITCH,
            |b, i| b.add_switch(i.a()?, i.offset()?),
        ),
        // SPARSE_SWITCH
        Opcode::new(
            Opcode::all_apis(0x2c),
            "sparse-switch",
            ReferenceType::None,
            Format::Format31t,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SWITCH,
            |b, i| b.add_switch(i.a()?, i.offset()?),
        ),
        // CMPL_FLOAT
        Opcode::new(
            Opcode::all_apis(0x2d),
            "cmpl-float",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_cmp(NumericType::Float, CmpBias::Lt, i.a()?, i.b()?, i.c()?),
        ),
        // CMPG_FLOAT
        Opcode::new(
            Opcode::all_apis(0x2e),
            "cmpg-float",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_cmp(NumericType::Float, CmpBias::Gt, i.a()?, i.b()?, i.c()?),
        ),
        // CMPL_DOUBLE
        Opcode::new(
            Opcode::all_apis(0x2f),
            "cmpl-double",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_cmp(NumericType::Double, CmpBias::Lt, i.a()?, i.b()?, i.c()?),
        ),
        // CMPG_DOUBLE
        Opcode::new(
            Opcode::all_apis(0x30),
            "cmpg-double",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_cmp(NumericType::Double, CmpBias::Gt, i.a()?, i.b()?, i.c()?),
        ),
        // CMP_LONG
        Opcode::new(
            Opcode::all_apis(0x31),
            "cmp-long",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_cmp(NumericType::Long, CmpBias::None, i.a()?, i.b()?, i.c()?),
        ),
        // IF_EQ
        Opcode::new(
            Opcode::all_apis(0x32),
            "if-eq",
            ReferenceType::None,
            Format::Format22t,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::BRANCH,
            |b, i| b.add_if(IfType::Eq, i.a()?, i.b()?, i.offset()?),
        ),
        // IF_NE
        Opcode::new(
            Opcode::all_apis(0x33),
            "if-ne",
            ReferenceType::None,
            Format::Format22t,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::BRANCH,
            |b, i| b.add_if(IfType::Ne, i.a()?, i.b()?, i.offset()?),
        ),
        // IF_LT
        Opcode::new(
            Opcode::all_apis(0x34),
            "if-lt",
            ReferenceType::None,
            Format::Format22t,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::BRANCH,
            |b, i| b.add_if(IfType::Lt, i.a()?, i.b()?, i.offset()?),
        ),
        // IF_GE
        Opcode::new(
            Opcode::all_apis(0x35),
            "if-ge",
            ReferenceType::None,
            Format::Format22t,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::BRANCH,
            |b, i| b.add_if(IfType::Ge, i.a()?, i.b()?, i.offset()?),
        ),
        // IF_GT
        Opcode::new(
            Opcode::all_apis(0x36),
            "if-gt",
            ReferenceType::None,
            Format::Format22t,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::BRANCH,
            |b, i| b.add_if(IfType::Gt, i.a()?, i.b()?, i.offset()?),
        ),
        // IF_LE
        Opcode::new(
            Opcode::all_apis(0x37),
            "if-le",
            ReferenceType::None,
            Format::Format22t,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::BRANCH,
            |b, i| b.add_if(IfType::Le, i.a()?, i.b()?, i.offset()?),
        ),
        // IF_EQZ
        Opcode::new(
            Opcode::all_apis(0x38),
            "if-eqz",
            ReferenceType::None,
            Format::Format21t,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::BRANCH,
            |b, i| b.add_if_zero(IfType::Eq, i.a()?, i.offset()?),
        ),
        // IF_NEZ
        Opcode::new(
            Opcode::all_apis(0x39),
            "if-nez",
            ReferenceType::None,
            Format::Format21t,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::BRANCH,
            |b, i| b.add_if_zero(IfType::Ne, i.a()?, i.offset()?),
        ),
        // IF_LTZ
        Opcode::new(
            Opcode::all_apis(0x3a),
            "if-ltz",
            ReferenceType::None,
            Format::Format21t,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::BRANCH,
            |b, i| b.add_if_zero(IfType::Lt, i.a()?, i.offset()?),
        ),
        // IF_GEZ
        Opcode::new(
            Opcode::all_apis(0x3b),
            "if-gez",
            ReferenceType::None,
            Format::Format21t,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::BRANCH,
            |b, i| b.add_if_zero(IfType::Ge, i.a()?, i.offset()?),
        ),
        // IF_GTZ
        Opcode::new(
            Opcode::all_apis(0x3c),
            "if-gtz",
            ReferenceType::None,
            Format::Format21t,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::BRANCH,
            |b, i| b.add_if_zero(IfType::Gt, i.a()?, i.offset()?),
        ),
        // IF_LEZ
        Opcode::new(
            Opcode::all_apis(0x3d),
            "if-lez",
            ReferenceType::None,
            Format::Format21t,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::BRANCH,
            |b, i| b.add_if_zero(IfType::Le, i.a()?, i.offset()?),
        ),
        // AGET
        Opcode::new(
            Opcode::all_apis(0x44),
            "aget",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_array_get(MemberType::Single, i.a()?, i.b()?, i.c()?),
        ),
        // AGET_WIDE
        Opcode::new(
            Opcode::all_apis(0x45),
            "aget-wide",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_array_get(MemberType::Wide, i.a()?, i.b()?, i.c()?),
        ),
        // AGET_OBJECT
        Opcode::new(
            Opcode::all_apis(0x46),
            "aget-object",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_array_get(MemberType::Object, i.a()?, i.b()?, i.c()?),
        ),
        // AGET_BOOLEAN
        Opcode::new(
            Opcode::all_apis(0x47),
            "aget-boolean",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_array_get(MemberType::Boolean, i.a()?, i.b()?, i.c()?),
        ),
        // AGET_BYTE
        Opcode::new(
            Opcode::all_apis(0x48),
            "aget-byte",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_array_get(MemberType::Byte, i.a()?, i.b()?, i.c()?),
        ),
        // AGET_CHAR
        Opcode::new(
            Opcode::all_apis(0x49),
            "aget-char",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_array_get(MemberType::Char, i.a()?, i.b()?, i.c()?),
        ),
        // AGET_SHORT
        Opcode::new(
            Opcode::all_apis(0x4a),
            "aget-short",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_array_get(MemberType::Short, i.a()?, i.b()?, i.c()?),
        ),
        // APUT
        Opcode::new(
            Opcode::all_apis(0x4b),
            "aput",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE,
            |b, i| b.add_array_put(MemberType::Single, i.a()?, i.b()?, i.c()?),
        ),
        // APUT_WIDE
        Opcode::new(
            Opcode::all_apis(0x4c),
            "aput-wide",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE,
            |b, i| b.add_array_put(MemberType::Wide, i.a()?, i.b()?, i.c()?),
        ),
        // APUT_OBJECT
        Opcode::new(
            Opcode::all_apis(0x4d),
            "aput-object",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE,
            |b, i| b.add_array_put(MemberType::Object, i.a()?, i.b()?, i.c()?),
        ),
        // APUT_BOOLEAN
        Opcode::new(
            Opcode::all_apis(0x4e),
            "aput-boolean",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE,
            |b, i| b.add_array_put(MemberType::Boolean, i.a()?, i.b()?, i.c()?),
        ),
        // APUT_BYTE
        Opcode::new(
            Opcode::all_apis(0x4f),
            "aput-byte",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE,
            |b, i| b.add_array_put(MemberType::Byte, i.a()?, i.b()?, i.c()?),
        ),
        // APUT_CHAR
        Opcode::new(
            Opcode::all_apis(0x50),
            "aput-char",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE,
            |b, i| b.add_array_put(MemberType::Char, i.a()?, i.b()?, i.c()?),
        ),
        // APUT_SHORT
        Opcode::new(
            Opcode::all_apis(0x51),
            "aput-short",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE,
            |b, i| b.add_array_put(MemberType::Short, i.a()?, i.b()?, i.c()?),
        ),
        // IGET
        Opcode::new(
            Opcode::all_apis(0x52),
            "iget",
            ReferenceType::Field,
            Format::Format22c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_instance_get(MemberType::Single, i.a()?, i.b()?, i.index()?),
        ),
        // IGET_WIDE
        Opcode::new(
            Opcode::all_apis(0x53),
            "iget-wide",
            ReferenceType::Field,
            Format::Format22c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_instance_get(MemberType::Wide, i.a()?, i.b()?, i.index()?),
        ),
        // IGET_OBJECT
        Opcode::new(
            Opcode::all_apis(0x54),
            "iget-object",
            ReferenceType::Field,
            Format::Format22c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_instance_get(MemberType::Object, i.a()?, i.b()?, i.index()?),
        ),
        // IGET_BOOLEAN
        Opcode::new(
            Opcode::all_apis(0x55),
            "iget-boolean",
            ReferenceType::Field,
            Format::Format22c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_instance_get(MemberType::Boolean, i.a()?, i.b()?, i.index()?),
        ),
        // IGET_BYTE
        Opcode::new(
            Opcode::all_apis(0x56),
            "iget-byte",
            ReferenceType::Field,
            Format::Format22c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_instance_get(MemberType::Byte, i.a()?, i.b()?, i.index()?),
        ),
        // IGET_CHAR
        Opcode::new(
            Opcode::all_apis(0x57),
            "iget-char",
            ReferenceType::Field,
            Format::Format22c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_instance_get(MemberType::Char, i.a()?, i.b()?, i.index()?),
        ),
        // IGET_SHORT
        Opcode::new(
            Opcode::all_apis(0x58),
            "iget-short",
            ReferenceType::Field,
            Format::Format22c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_instance_get(MemberType::Short, i.a()?, i.b()?, i.index()?),
        ),
        // IPUT
        Opcode::new(
            Opcode::all_apis(0x59),
            "iput",
            ReferenceType::Field,
            Format::Format22c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE,
            |b, i| b.add_instance_put(MemberType::Single, i.a()?, i.b()?, i.index()?),
        ),
        // IPUT_WIDE
        Opcode::new(
            Opcode::all_apis(0x5a),
            "iput-wide",
            ReferenceType::Field,
            Format::Format22c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE,
            |b, i| b.add_instance_put(MemberType::Wide, i.a()?, i.b()?, i.index()?),
        ),
        // IPUT_OBJECT
        Opcode::new(
            Opcode::all_apis(0x5b),
            "iput-object",
            ReferenceType::Field,
            Format::Format22c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE,
            |b, i| b.add_instance_put(MemberType::Object, i.a()?, i.b()?, i.index()?),
        ),
        // IPUT_BOOLEAN
        Opcode::new(
            Opcode::all_apis(0x5c),
            "iput-boolean",
            ReferenceType::Field,
            Format::Format22c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE,
            |b, i| b.add_instance_put(MemberType::Boolean, i.a()?, i.b()?, i.index()?),
        ),
        // IPUT_BYTE
        Opcode::new(
            Opcode::all_apis(0x5d),
            "iput-byte",
            ReferenceType::Field,
            Format::Format22c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE,
            |b, i| b.add_instance_put(MemberType::Byte, i.a()?, i.b()?, i.index()?),
        ),
        // IPUT_CHAR
        Opcode::new(
            Opcode::all_apis(0x5e),
            "iput-char",
            ReferenceType::Field,
            Format::Format22c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE,
            |b, i| b.add_instance_put(MemberType::Char, i.a()?, i.b()?, i.index()?),
        ),
        // IPUT_SHORT
        Opcode::new(
            Opcode::all_apis(0x5f),
            "iput-short",
            ReferenceType::Field,
            Format::Format22c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE,
            |b, i| b.add_instance_put(MemberType::Short, i.a()?, i.b()?, i.index()?),
        ),
        // SGET
        Opcode::new(
            Opcode::all_apis(0x60),
            "sget",
            ReferenceType::Field,
            Format::Format21c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_static_get(MemberType::Single, i.a()?, i.index()?),
        ),
        // SGET_WIDE
        Opcode::new(
            Opcode::all_apis(0x61),
            "sget-wide",
            ReferenceType::Field,
            Format::Format21c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_static_get(MemberType::Wide, i.a()?, i.index()?),
        ),
        // SGET_OBJECT
        Opcode::new(
            Opcode::all_apis(0x62),
            "sget-object",
            ReferenceType::Field,
            Format::Format21c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_static_get(MemberType::Object, i.a()?, i.index()?),
        ),
        // SGET_BOOLEAN
        Opcode::new(
            Opcode::all_apis(0x63),
            "sget-boolean",
            ReferenceType::Field,
            Format::Format21c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_static_get(MemberType::Boolean, i.a()?, i.index()?),
        ),
        // SGET_BYTE
        Opcode::new(
            Opcode::all_apis(0x64),
            "sget-byte",
            ReferenceType::Field,
            Format::Format21c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_static_get(MemberType::Byte, i.a()?, i.index()?),
        ),
        // SGET_CHAR
        Opcode::new(
            Opcode::all_apis(0x65),
            "sget-char",
            ReferenceType::Field,
            Format::Format21c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_static_get(MemberType::Char, i.a()?, i.index()?),
        ),
        // SGET_SHORT
        Opcode::new(
            Opcode::all_apis(0x66),
            "sget-short",
            ReferenceType::Field,
            Format::Format21c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_static_get(MemberType::Short, i.a()?, i.index()?),
        ),
        // SPUT
        Opcode::new(
            Opcode::all_apis(0x67),
            "sput",
            ReferenceType::Field,
            Format::Format21c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE,
            |b, i| b.add_static_put(MemberType::Single, i.a()?, i.index()?),
        ),
        // SPUT_WIDE
        Opcode::new(
            Opcode::all_apis(0x68),
            "sput-wide",
            ReferenceType::Field,
            Format::Format21c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE,
            |b, i| b.add_static_put(MemberType::Wide, i.a()?, i.index()?),
        ),
        // SPUT_OBJECT
        Opcode::new(
            Opcode::all_apis(0x69),
            "sput-object",
            ReferenceType::Field,
            Format::Format21c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE,
            |b, i| b.add_static_put(MemberType::Object, i.a()?, i.index()?),
        ),
        // SPUT_BOOLEAN
        Opcode::new(
            Opcode::all_apis(0x6a),
            "sput-boolean",
            ReferenceType::Field,
            Format::Format21c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE,
            |b, i| b.add_static_put(MemberType::Boolean, i.a()?, i.index()?),
        ),
        // SPUT_BYTE
        Opcode::new(
            Opcode::all_apis(0x6b),
            "sput-byte",
            ReferenceType::Field,
            Format::Format21c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE,
            |b, i| b.add_static_put(MemberType::Byte, i.a()?, i.index()?),
        ),
        // SPUT_CHAR
        Opcode::new(
            Opcode::all_apis(0x6c),
            "sput-char",
            ReferenceType::Field,
            Format::Format21c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE,
            |b, i| b.add_static_put(MemberType::Char, i.a()?, i.index()?),
        ),
        // SPUT_SHORT
        Opcode::new(
            Opcode::all_apis(0x6d),
            "sput-short",
            ReferenceType::Field,
            Format::Format21c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE,
            |b, i| b.add_static_put(MemberType::Short, i.a()?, i.index()?),
        ),
        // INVOKE_VIRTUAL
        Opcode::new(
            Opcode::all_apis(0x6e),
            "invoke-virtual",
            ReferenceType::Method,
            Format::Format35c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_RESULT,
            |b, i| b.add_invoke(InvokeType::Virtual, i.index()?, &i.registers()?),
        ),
        // INVOKE_SUPER
        Opcode::new(
            Opcode::all_apis(0x6f),
            "invoke-super",
            ReferenceType::Method,
            Format::Format35c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_RESULT,
            |b, i| b.add_invoke(InvokeType::Super, i.index()?, &i.registers()?),
        ),
        // INVOKE_DIRECT
        Opcode::new(
            Opcode::all_apis(0x70),
            "invoke-direct",
            ReferenceType::Method,
            Format::Format35c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_RESULT,
            |b, i| b.add_invoke(InvokeType::Direct, i.index()?, &i.registers()?),
        ),
        // INVOKE_STATIC
        Opcode::new(
            Opcode::all_apis(0x71),
            "invoke-static",
            ReferenceType::Method,
            Format::Format35c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_RESULT,
            |b, i| b.add_invoke(InvokeType::Static, i.index()?, &i.registers()?),
        ),
        // INVOKE_INTERFACE
        Opcode::new(
            Opcode::all_apis(0x72),
            "invoke-interface",
            ReferenceType::Method,
            Format::Format35c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_RESULT,
            |b, i| b.add_invoke(InvokeType::Interface, i.index()?, &i.registers()?),
        ),
        // INVOKE_VIRTUAL_RANGE
        Opcode::new(
            Opcode::all_apis(0x74),
            "invoke-virtual/range",
            ReferenceType::Method,
            Format::Format3rc,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_RESULT,
            |b, i| b.add_invoke(InvokeType::Virtual, i.index()?, &i.registers()?),
        ),
        // INVOKE_SUPER_RANGE
        Opcode::new(
            Opcode::all_apis(0x75),
            "invoke-super/range",
            ReferenceType::Method,
            Format::Format3rc,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_RESULT,
            |b, i| b.add_invoke(InvokeType::Super, i.index()?, &i.registers()?),
        ),
        // INVOKE_DIRECT_RANGE
        Opcode::new(
            Opcode::all_apis(0x76),
            "invoke-direct/range",
            ReferenceType::Method,
            Format::Format3rc,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_RESULT,
            |b, i| b.add_invoke(InvokeType::Direct, i.index()?, &i.registers()?),
        ),
        // INVOKE_STATIC_RANGE
        Opcode::new(
            Opcode::all_apis(0x77),
            "invoke-static/range",
            ReferenceType::Method,
            Format::Format3rc,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_RESULT,
            |b, i| b.add_invoke(InvokeType::Static, i.index()?, &i.registers()?),
        ),
        // INVOKE_INTERFACE_RANGE
        Opcode::new(
            Opcode::all_apis(0x78),
            "invoke-interface/range",
            ReferenceType::Method,
            Format::Format3rc,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_RESULT,
            |b, i| b.add_invoke(InvokeType::Interface, i.index()?, &i.registers()?),
        ),
        // NEG_INT
        Opcode::new(
            Opcode::all_apis(0x7b),
            "neg-int",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_neg(NumericType::Int, i.a()?, i.b()?),
        ),
        // NOT_INT
        Opcode::new(
            Opcode::all_apis(0x7c),
            "not-int",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_not(NumericType::Int, i.a()?, i.b()?),
        ),
        // NEG_LONG
        Opcode::new(
            Opcode::all_apis(0x7d),
            "neg-long",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_neg(NumericType::Long, i.a()?, i.b()?),
        ),
        // NOT_LONG
        Opcode::new(
            Opcode::all_apis(0x7e),
            "not-long",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_not(NumericType::Long, i.a()?, i.b()?),
        ),
        // NEG_FLOAT
        Opcode::new(
            Opcode::all_apis(0x7f),
            "neg-float",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_neg(NumericType::Float, i.a()?, i.b()?),
        ),
        // NEG_DOUBLE
        Opcode::new(
            Opcode::all_apis(0x80),
            "neg-double",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_neg(NumericType::Double, i.a()?, i.b()?),
        ),
        // INT_TO_LONG
        Opcode::new(
            Opcode::all_apis(0x81),
            "int-to-long",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_conversion(NumericType::Int, NumericType::Long, i.a()?, i.b()?),
        ),
        // INT_TO_FLOAT
        Opcode::new(
            Opcode::all_apis(0x82),
            "int-to-float",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_conversion(NumericType::Int, NumericType::Float, i.a()?, i.b()?),
        ),
        // INT_TO_DOUBLE
        Opcode::new(
            Opcode::all_apis(0x83),
            "int-to-double",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_conversion(NumericType::Int, NumericType::Double, i.a()?, i.b()?),
        ),
        // LONG_TO_INT
        Opcode::new(
            Opcode::all_apis(0x84),
            "long-to-int",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_conversion(NumericType::Long, NumericType::Int, i.a()?, i.b()?),
        ),
        // LONG_TO_FLOAT
        Opcode::new(
            Opcode::all_apis(0x85),
            "long-to-float",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_conversion(NumericType::Long, NumericType::Float, i.a()?, i.b()?),
        ),
        // LONG_TO_DOUBLE
        Opcode::new(
            Opcode::all_apis(0x86),
            "long-to-double",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_conversion(NumericType::Long, NumericType::Double, i.a()?, i.b()?),
        ),
        // FLOAT_TO_INT
        Opcode::new(
            Opcode::all_apis(0x87),
            "float-to-int",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_conversion(NumericType::Float, NumericType::Int, i.a()?, i.b()?),
        ),
        // FLOAT_TO_LONG
        Opcode::new(
            Opcode::all_apis(0x88),
            "float-to-long",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_conversion(NumericType::Float, NumericType::Long, i.a()?, i.b()?),
        ),
        // FLOAT_TO_DOUBLE
        Opcode::new(
            Opcode::all_apis(0x89),
            "float-to-double",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_conversion(NumericType::Float, NumericType::Double, i.a()?, i.b()?),
        ),
        // DOUBLE_TO_INT
        Opcode::new(
            Opcode::all_apis(0x8a),
            "double-to-int",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_conversion(NumericType::Double, NumericType::Int, i.a()?, i.b()?),
        ),
        // DOUBLE_TO_LONG
        Opcode::new(
            Opcode::all_apis(0x8b),
            "double-to-long",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_conversion(NumericType::Double, NumericType::Long, i.a()?, i.b()?),
        ),
        // DOUBLE_TO_FLOAT
        Opcode::new(
            Opcode::all_apis(0x8c),
            "double-to-float",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_conversion(NumericType::Double, NumericType::Float, i.a()?, i.b()?),
        ),
        // INT_TO_BYTE
        Opcode::new(
            Opcode::all_apis(0x8d),
            "int-to-byte",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_conversion(NumericType::Int, NumericType::Byte, i.a()?, i.b()?),
        ),
        // INT_TO_CHAR
        Opcode::new(
            Opcode::all_apis(0x8e),
            "int-to-char",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_conversion(NumericType::Int, NumericType::Char, i.a()?, i.b()?),
        ),
        // INT_TO_SHORT
        Opcode::new(
            Opcode::all_apis(0x8f),
            "int-to-short",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_conversion(NumericType::Int, NumericType::Short, i.a()?, i.b()?),
        ),
        // ADD_INT
        Opcode::new(
            Opcode::all_apis(0x90),
            "add-int",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop(BinopKind::Add, NumericType::Int, i.a()?, i.b()?, i.c()?),
        ),
        // SUB_INT
        Opcode::new(
            Opcode::all_apis(0x91),
            "sub-int",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop(BinopKind::Sub, NumericType::Int, i.a()?, i.b()?, i.c()?),
        ),
        // MUL_INT
        Opcode::new(
            Opcode::all_apis(0x92),
            "mul-int",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop(BinopKind::Mul, NumericType::Int, i.a()?, i.b()?, i.c()?),
        ),
        // DIV_INT
        Opcode::new(
            Opcode::all_apis(0x93),
            "div-int",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop(BinopKind::Div, NumericType::Int, i.a()?, i.b()?, i.c()?),
        ),
        // REM_INT
        Opcode::new(
            Opcode::all_apis(0x94),
            "rem-int",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop(BinopKind::Rem, NumericType::Int, i.a()?, i.b()?, i.c()?),
        ),
        // AND_INT
        Opcode::new(
            Opcode::all_apis(0x95),
            "and-int",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop(BinopKind::And, NumericType::Int, i.a()?, i.b()?, i.c()?),
        ),
        // OR_INT
        Opcode::new(
            Opcode::all_apis(0x96),
            "or-int",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop(BinopKind::Or, NumericType::Int, i.a()?, i.b()?, i.c()?),
        ),
        // XOR_INT
        Opcode::new(
            Opcode::all_apis(0x97),
            "xor-int",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop(BinopKind::Xor, NumericType::Int, i.a()?, i.b()?, i.c()?),
        ),
        // SHL_INT
        Opcode::new(
            Opcode::all_apis(0x98),
            "shl-int",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop(BinopKind::Shl, NumericType::Int, i.a()?, i.b()?, i.c()?),
        ),
        // SHR_INT
        Opcode::new(
            Opcode::all_apis(0x99),
            "shr-int",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop(BinopKind::Shr, NumericType::Int, i.a()?, i.b()?, i.c()?),
        ),
        // USHR_INT
        Opcode::new(
            Opcode::all_apis(0x9a),
            "ushr-int",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop(BinopKind::Ushr, NumericType::Int, i.a()?, i.b()?, i.c()?),
        ),
        // ADD_LONG
        Opcode::new(
            Opcode::all_apis(0x9b),
            "add-long",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_binop(BinopKind::Add, NumericType::Long, i.a()?, i.b()?, i.c()?),
        ),
        // SUB_LONG
        Opcode::new(
            Opcode::all_apis(0x9c),
            "sub-long",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_binop(BinopKind::Sub, NumericType::Long, i.a()?, i.b()?, i.c()?),
        ),
        // MUL_LONG
        Opcode::new(
            Opcode::all_apis(0x9d),
            "mul-long",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_binop(BinopKind::Mul, NumericType::Long, i.a()?, i.b()?, i.c()?),
        ),
        // DIV_LONG
        Opcode::new(
            Opcode::all_apis(0x9e),
            "div-long",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_binop(BinopKind::Div, NumericType::Long, i.a()?, i.b()?, i.c()?),
        ),
        // REM_LONG
        Opcode::new(
            Opcode::all_apis(0x9f),
            "rem-long",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_binop(BinopKind::Rem, NumericType::Long, i.a()?, i.b()?, i.c()?),
        ),
        // AND_LONG
        Opcode::new(
            Opcode::all_apis(0xa0),
            "and-long",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_binop(BinopKind::And, NumericType::Long, i.a()?, i.b()?, i.c()?),
        ),
        // OR_LONG
        Opcode::new(
            Opcode::all_apis(0xa1),
            "or-long",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_binop(BinopKind::Or, NumericType::Long, i.a()?, i.b()?, i.c()?),
        ),
        // XOR_LONG
        Opcode::new(
            Opcode::all_apis(0xa2),
            "xor-long",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_binop(BinopKind::Xor, NumericType::Long, i.a()?, i.b()?, i.c()?),
        ),
        // SHL_LONG
        Opcode::new(
            Opcode::all_apis(0xa3),
            "shl-long",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_binop(BinopKind::Shl, NumericType::Long, i.a()?, i.b()?, i.c()?),
        ),
        // SHR_LONG
        Opcode::new(
            Opcode::all_apis(0xa4),
            "shr-long",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_binop(BinopKind::Shr, NumericType::Long, i.a()?, i.b()?, i.c()?),
        ),
        // USHR_LONG
        Opcode::new(
            Opcode::all_apis(0xa5),
            "ushr-long",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_binop(BinopKind::Ushr, NumericType::Long, i.a()?, i.b()?, i.c()?),
        ),
        // ADD_FLOAT
        Opcode::new(
            Opcode::all_apis(0xa6),
            "add-float",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop(BinopKind::Add, NumericType::Float, i.a()?, i.b()?, i.c()?),
        ),
        // SUB_FLOAT
        Opcode::new(
            Opcode::all_apis(0xa7),
            "sub-float",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop(BinopKind::Sub, NumericType::Float, i.a()?, i.b()?, i.c()?),
        ),
        // MUL_FLOAT
        Opcode::new(
            Opcode::all_apis(0xa8),
            "mul-float",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop(BinopKind::Mul, NumericType::Float, i.a()?, i.b()?, i.c()?),
        ),
        // DIV_FLOAT
        Opcode::new(
            Opcode::all_apis(0xa9),
            "div-float",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop(BinopKind::Div, NumericType::Float, i.a()?, i.b()?, i.c()?),
        ),
        // REM_FLOAT
        Opcode::new(
            Opcode::all_apis(0xaa),
            "rem-float",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop(BinopKind::Rem, NumericType::Float, i.a()?, i.b()?, i.c()?),
        ),
        // ADD_DOUBLE
        Opcode::new(
            Opcode::all_apis(0xab),
            "add-double",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_binop(BinopKind::Add, NumericType::Double, i.a()?, i.b()?, i.c()?),
        ),
        // SUB_DOUBLE
        Opcode::new(
            Opcode::all_apis(0xac),
            "sub-double",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_binop(BinopKind::Sub, NumericType::Double, i.a()?, i.b()?, i.c()?),
        ),
        // MUL_DOUBLE
        Opcode::new(
            Opcode::all_apis(0xad),
            "mul-double",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_binop(BinopKind::Mul, NumericType::Double, i.a()?, i.b()?, i.c()?),
        ),
        // DIV_DOUBLE
        Opcode::new(
            Opcode::all_apis(0xae),
            "div-double",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_binop(BinopKind::Div, NumericType::Double, i.a()?, i.b()?, i.c()?),
        ),
        // REM_DOUBLE
        Opcode::new(
            Opcode::all_apis(0xaf),
            "rem-double",
            ReferenceType::None,
            Format::Format23x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_binop(BinopKind::Rem, NumericType::Double, i.a()?, i.b()?, i.c()?),
        ),
        // ADD_INT_2ADDR
        Opcode::new(
            Opcode::all_apis(0xb0),
            "add-int/2addr",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop(BinopKind::Add, NumericType::Int, i.a()?, i.a()?, i.b()?),
        ),
        // SUB_INT_2ADDR
        Opcode::new(
            Opcode::all_apis(0xb1),
            "sub-int/2addr",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop(BinopKind::Sub, NumericType::Int, i.a()?, i.a()?, i.b()?),
        ),
        // MUL_INT_2ADDR
        Opcode::new(
            Opcode::all_apis(0xb2),
            "mul-int/2addr",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop(BinopKind::Mul, NumericType::Int, i.a()?, i.a()?, i.b()?),
        ),
        // DIV_INT_2ADDR
        Opcode::new(
            Opcode::all_apis(0xb3),
            "div-int/2addr",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop(BinopKind::Div, NumericType::Int, i.a()?, i.a()?, i.b()?),
        ),
        // REM_INT_2ADDR
        Opcode::new(
            Opcode::all_apis(0xb4),
            "rem-int/2addr",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop(BinopKind::Rem, NumericType::Int, i.a()?, i.a()?, i.b()?),
        ),
        // AND_INT_2ADDR
        Opcode::new(
            Opcode::all_apis(0xb5),
            "and-int/2addr",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop(BinopKind::And, NumericType::Int, i.a()?, i.a()?, i.b()?),
        ),
        // OR_INT_2ADDR
        Opcode::new(
            Opcode::all_apis(0xb6),
            "or-int/2addr",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop(BinopKind::Or, NumericType::Int, i.a()?, i.a()?, i.b()?),
        ),
        // XOR_INT_2ADDR
        Opcode::new(
            Opcode::all_apis(0xb7),
            "xor-int/2addr",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop(BinopKind::Xor, NumericType::Int, i.a()?, i.a()?, i.b()?),
        ),
        // SHL_INT_2ADDR
        Opcode::new(
            Opcode::all_apis(0xb8),
            "shl-int/2addr",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop(BinopKind::Shl, NumericType::Int, i.a()?, i.a()?, i.b()?),
        ),
        // SHR_INT_2ADDR
        Opcode::new(
            Opcode::all_apis(0xb9),
            "shr-int/2addr",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop(BinopKind::Shr, NumericType::Int, i.a()?, i.a()?, i.b()?),
        ),
        // USHR_INT_2ADDR
        Opcode::new(
            Opcode::all_apis(0xba),
            "ushr-int/2addr",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop(BinopKind::Ushr, NumericType::Int, i.a()?, i.a()?, i.b()?),
        ),
        // ADD_LONG_2ADDR
        Opcode::new(
            Opcode::all_apis(0xbb),
            "add-long/2addr",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_binop(BinopKind::Add, NumericType::Long, i.a()?, i.a()?, i.b()?),
        ),
        // SUB_LONG_2ADDR
        Opcode::new(
            Opcode::all_apis(0xbc),
            "sub-long/2addr",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_binop(BinopKind::Sub, NumericType::Long, i.a()?, i.a()?, i.b()?),
        ),
        // MUL_LONG_2ADDR
        Opcode::new(
            Opcode::all_apis(0xbd),
            "mul-long/2addr",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_binop(BinopKind::Mul, NumericType::Long, i.a()?, i.a()?, i.b()?),
        ),
        // DIV_LONG_2ADDR
        Opcode::new(
            Opcode::all_apis(0xbe),
            "div-long/2addr",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_binop(BinopKind::Div, NumericType::Long, i.a()?, i.a()?, i.b()?),
        ),
        // REM_LONG_2ADDR
        Opcode::new(
            Opcode::all_apis(0xbf),
            "rem-long/2addr",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_binop(BinopKind::Rem, NumericType::Long, i.a()?, i.a()?, i.b()?),
        ),
        // AND_LONG_2ADDR
        Opcode::new(
            Opcode::all_apis(0xc0),
            "and-long/2addr",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_binop(BinopKind::And, NumericType::Long, i.a()?, i.a()?, i.b()?),
        ),
        // OR_LONG_2ADDR
        Opcode::new(
            Opcode::all_apis(0xc1),
            "or-long/2addr",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_binop(BinopKind::Or, NumericType::Long, i.a()?, i.a()?, i.b()?),
        ),
        // XOR_LONG_2ADDR
        Opcode::new(
            Opcode::all_apis(0xc2),
            "xor-long/2addr",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_binop(BinopKind::Xor, NumericType::Long, i.a()?, i.a()?, i.b()?),
        ),
        // SHL_LONG_2ADDR
        Opcode::new(
            Opcode::all_apis(0xc3),
            "shl-long/2addr",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_binop(BinopKind::Shl, NumericType::Long, i.a()?, i.a()?, i.b()?),
        ),
        // SHR_LONG_2ADDR
        Opcode::new(
            Opcode::all_apis(0xc4),
            "shr-long/2addr",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_binop(BinopKind::Shr, NumericType::Long, i.a()?, i.a()?, i.b()?),
        ),
        // USHR_LONG_2ADDR
        Opcode::new(
            Opcode::all_apis(0xc5),
            "ushr-long/2addr",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_binop(BinopKind::Ushr, NumericType::Long, i.a()?, i.a()?, i.b()?),
        ),
        // ADD_FLOAT_2ADDR
        Opcode::new(
            Opcode::all_apis(0xc6),
            "add-float/2addr",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop(BinopKind::Add, NumericType::Float, i.a()?, i.a()?, i.b()?),
        ),
        // SUB_FLOAT_2ADDR
        Opcode::new(
            Opcode::all_apis(0xc7),
            "sub-float/2addr",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop(BinopKind::Sub, NumericType::Float, i.a()?, i.a()?, i.b()?),
        ),
        // MUL_FLOAT_2ADDR
        Opcode::new(
            Opcode::all_apis(0xc8),
            "mul-float/2addr",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop(BinopKind::Mul, NumericType::Float, i.a()?, i.a()?, i.b()?),
        ),
        // DIV_FLOAT_2ADDR
        Opcode::new(
            Opcode::all_apis(0xc9),
            "div-float/2addr",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop(BinopKind::Div, NumericType::Float, i.a()?, i.a()?, i.b()?),
        ),
        // REM_FLOAT_2ADDR
        Opcode::new(
            Opcode::all_apis(0xca),
            "rem-float/2addr",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop(BinopKind::Rem, NumericType::Float, i.a()?, i.a()?, i.b()?),
        ),
        // ADD_DOUBLE_2ADDR
        Opcode::new(
            Opcode::all_apis(0xcb),
            "add-double/2addr",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_binop(BinopKind::Add, NumericType::Double, i.a()?, i.a()?, i.b()?),
        ),
        // SUB_DOUBLE_2ADDR
        Opcode::new(
            Opcode::all_apis(0xcc),
            "sub-double/2addr",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_binop(BinopKind::Sub, NumericType::Double, i.a()?, i.a()?, i.b()?),
        ),
        // MUL_DOUBLE_2ADDR
        Opcode::new(
            Opcode::all_apis(0xcd),
            "mul-double/2addr",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_binop(BinopKind::Mul, NumericType::Double, i.a()?, i.a()?, i.b()?),
        ),
        // DIV_DOUBLE_2ADDR
        Opcode::new(
            Opcode::all_apis(0xce),
            "div-double/2addr",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_binop(BinopKind::Div, NumericType::Double, i.a()?, i.a()?, i.b()?),
        ),
        // REM_DOUBLE_2ADDR
        Opcode::new(
            Opcode::all_apis(0xcf),
            "rem-double/2addr",
            ReferenceType::None,
            Format::Format12x,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER | OpcodeFlags::SETS_WIDE_REGISTER,
            |b, i| b.add_binop(BinopKind::Rem, NumericType::Double, i.a()?, i.a()?, i.b()?),
        ),
        // ADD_INT_LIT16
        Opcode::new(
            Opcode::all_apis(0xd0),
            "add-int/lit16",
            ReferenceType::None,
            Format::Format22s,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop_literal(BinopKind::Add, i.a()?, i.b()?, i.literal()?),
        ),
        // RSUB_INT
        Opcode::new(
            Opcode::all_apis(0xd1),
            "rsub-int",
            ReferenceType::None,
            Format::Format22s,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_rsub_literal(i.a()?, i.b()?, i.literal()?),
        ),
        // MUL_INT_LIT16
        Opcode::new(
            Opcode::all_apis(0xd2),
            "mul-int/lit16",
            ReferenceType::None,
            Format::Format22s,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop_literal(BinopKind::Mul, i.a()?, i.b()?, i.literal()?),
        ),
        // DIV_INT_LIT16
        Opcode::new(
            Opcode::all_apis(0xd3),
            "div-int/lit16",
            ReferenceType::None,
            Format::Format22s,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop_literal(BinopKind::Div, i.a()?, i.b()?, i.literal()?),
        ),
        // REM_INT_LIT16
        Opcode::new(
            Opcode::all_apis(0xd4),
            "rem-int/lit16",
            ReferenceType::None,
            Format::Format22s,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop_literal(BinopKind::Rem, i.a()?, i.b()?, i.literal()?),
        ),
        // AND_INT_LIT16
        Opcode::new(
            Opcode::all_apis(0xd5),
            "and-int/lit16",
            ReferenceType::None,
            Format::Format22s,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop_literal(BinopKind::And, i.a()?, i.b()?, i.literal()?),
        ),
        // OR_INT_LIT16
        Opcode::new(
            Opcode::all_apis(0xd6),
            "or-int/lit16",
            ReferenceType::None,
            Format::Format22s,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop_literal(BinopKind::Or, i.a()?, i.b()?, i.literal()?),
        ),
        // XOR_INT_LIT16
        Opcode::new(
            Opcode::all_apis(0xd7),
            "xor-int/lit16",
            ReferenceType::None,
            Format::Format22s,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop_literal(BinopKind::Xor, i.a()?, i.b()?, i.literal()?),
        ),
        // ADD_INT_LIT8
        Opcode::new(
            Opcode::all_apis(0xd8),
            "add-int/lit8",
            ReferenceType::None,
            Format::Format22b,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop_literal(BinopKind::Add, i.a()?, i.b()?, i.literal()?),
        ),
        // RSUB_INT_LIT8
        Opcode::new(
            Opcode::all_apis(0xd9),
            "rsub-int/lit8",
            ReferenceType::None,
            Format::Format22b,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_rsub_literal(i.a()?, i.b()?, i.literal()?),
        ),
        // MUL_INT_LIT8
        Opcode::new(
            Opcode::all_apis(0xda),
            "mul-int/lit8",
            ReferenceType::None,
            Format::Format22b,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop_literal(BinopKind::Mul, i.a()?, i.b()?, i.literal()?),
        ),
        // DIV_INT_LIT8
        Opcode::new(
            Opcode::all_apis(0xdb),
            "div-int/lit8",
            ReferenceType::None,
            Format::Format22b,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop_literal(BinopKind::Div, i.a()?, i.b()?, i.literal()?),
        ),
        // REM_INT_LIT8
        Opcode::new(
            Opcode::all_apis(0xdc),
            "rem-int/lit8",
            ReferenceType::None,
            Format::Format22b,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop_literal(BinopKind::Rem, i.a()?, i.b()?, i.literal()?),
        ),
        // AND_INT_LIT8
        Opcode::new(
            Opcode::all_apis(0xdd),
            "and-int/lit8",
            ReferenceType::None,
            Format::Format22b,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop_literal(BinopKind::And, i.a()?, i.b()?, i.literal()?),
        ),
        // OR_INT_LIT8
        Opcode::new(
            Opcode::all_apis(0xde),
            "or-int/lit8",
            ReferenceType::None,
            Format::Format22b,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop_literal(BinopKind::Or, i.a()?, i.b()?, i.literal()?),
        ),
        // XOR_INT_LIT8
        Opcode::new(
            Opcode::all_apis(0xdf),
            "xor-int/lit8",
            ReferenceType::None,
            Format::Format22b,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop_literal(BinopKind::Xor, i.a()?, i.b()?, i.literal()?),
        ),
        // SHL_INT_LIT8
        Opcode::new(
            Opcode::all_apis(0xe0),
            "shl-int/lit8",
            ReferenceType::None,
            Format::Format22b,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop_literal(BinopKind::Shl, i.a()?, i.b()?, i.literal()?),
        ),
        // SHR_INT_LIT8
        Opcode::new(
            Opcode::all_apis(0xe1),
            "shr-int/lit8",
            ReferenceType::None,
            Format::Format22b,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop_literal(BinopKind::Shr, i.a()?, i.b()?, i.literal()?),
        ),
        // USHR_INT_LIT8
        Opcode::new(
            Opcode::all_apis(0xe2),
            "ushr-int/lit8",
            ReferenceType::None,
            Format::Format22b,
            OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_binop_literal(BinopKind::Ushr, i.a()?, i.b()?, i.literal()?),
        ),
        // INVOKE_POLYMORPHIC
        Opcode::new(
            Opcode::first_api(0xfa, 26),
            "invoke-polymorphic",
            ReferenceType::Method,
            Format::Format45cc,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_RESULT,
            |b, i| b.add_invoke_polymorphic(i.index()?, i.proto_index()?, &i.registers()?),
        ),
        // INVOKE_POLYMORPHIC_RANGE
        Opcode::new(
            Opcode::first_api(0xfb, 26),
            "invoke-polymorphic/range",
            ReferenceType::Method,
            Format::Format4rcc,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_RESULT,
            |b, i| b.add_invoke_polymorphic(i.index()?, i.proto_index()?, &i.registers()?),
        ),
        // INVOKE_CUSTOM
        Opcode::new(
            Opcode::first_api(0xfc, 26),
            "invoke-custom",
            ReferenceType::CallSite,
            Format::Format35c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_RESULT,
            |b, i| b.add_invoke_custom(i.index()?, &i.registers()?),
        ),
        // INVOKE_CUSTOM_RANGE
        Opcode::new(
            Opcode::first_api(0xfd, 26),
            "invoke-custom/range",
            ReferenceType::CallSite,
            Format::Format3rc,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_RESULT,
            |b, i| b.add_invoke_custom(i.index()?, &i.registers()?),
        ),
        // CONST_METHOD_HANDLE
        Opcode::new(
            Opcode::first_api(0xfe, 28),
            "const-method-handle",
            ReferenceType::MethodHandle,
            Format::Format21c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_const_method_handle(i.a()?, i.index()?),
        ),
        // CONST_METHOD_TYPE
        Opcode::new(
            Opcode::first_api(0xff, 28),
            "const-method-type",
            ReferenceType::MethodProto,
            Format::Format21c,
            OpcodeFlags::CAN_THROW | OpcodeFlags::CAN_CONTINUE | OpcodeFlags::SETS_REGISTER,
            |b, i| b.add_const_method_type(i.a()?, i.index()?),
        ),
        // PACKED_SWITCH_PAYLOAD
        Opcode::new(
            Opcode::all_apis(0x100),
            "packed-switch-payload",
            ReferenceType::None,
            Format::PackedSwitchPayload,
            OpcodeFlags::PAYLOAD,
            |b, _| b.add_payload(),
        ),
        // SPARSE_SWITCH_PAYLOAD
        Opcode::new(
            Opcode::all_apis(0x200),
            "sparse-switch-payload",
            ReferenceType::None,
            Format::SparseSwitchPayload,
            OpcodeFlags::PAYLOAD,
            |b, _| b.add_payload(),
        ),
        // ARRAY_PAYLOAD
        Opcode::new(
            Opcode::all_apis(0x300),
            "array-payload",
            ReferenceType::None,
            Format::ArrayPayload,
            OpcodeFlags::PAYLOAD,
            |b, _| b.add_payload(),
        ),
    ]
});

static OPCODES_BY_VALUE: Lazy<HashMap<u16, &'static Opcode>> = Lazy::new(|| {
    OPCODES.iter().map(|opcode| (opcode.value, opcode)).collect()
});

static OPCODES_BY_NAME: Lazy<HashMap<&'static str, &'static Opcode>> = Lazy::new(|| {
    OPCODES.iter().map(|opcode| (opcode.name, opcode)).collect()
});

/// Looks up an opcode by its value. Payload pseudo-opcodes use their full 16 bit ident.
pub fn find_opcode_by_value(value: u16) -> Option<&'static Opcode> {
    OPCODES_BY_VALUE.get(&value).copied()
}

/// Looks up an opcode by its smali mnemonic, e.g. `rem-int/lit8`.
pub fn find_opcode_by_name(name: &str) -> Option<&'static Opcode> {
    OPCODES_BY_NAME.get(name).copied()
}

/// Like [`find_opcode_by_name`], for names the caller knows to be in the catalogue.
pub(crate) fn opcode(name: &str) -> Result<&'static Opcode, crate::dex::error::DexError> {
    match find_opcode_by_name(name) {
        Some(opcode) => Ok(opcode),
        None => fail!("Unknown opcode {}", name),
    }
}
