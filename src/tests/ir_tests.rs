use super::{build_ir, insn, method_code};
use crate::dex::error::ErrorKind;
use crate::dex::opcode_format::Operands;
use crate::ir::{
    BinopKind, BlockId, Definition, Instruction, InstructionId, InstructionKind, MemberType, NumericType,
    ValueType, INSTRUCTION_NUMBER_DELTA,
};
use crate::ir::invoke::Invoke;
use crate::items::{ConstantPool, DexMethod, DexType};

#[test]
fn rem_int_builds_one_throwing_binop() {
    let pool = ConstantPool::new();
    let method = method_code(
        "LFoo;->rem(II)I",
        true,
        3,
        &[insn("rem-int", Operands::F23x { a: 0, b: 1, c: 2 }), insn("return", Operands::F11x { a: 0 })],
    );
    let code = build_ir(&pool, &method).unwrap();
    assert_eq!(code.blocks().len(), 1);

    let instructions: Vec<&Instruction> = code.instructions().collect();
    assert_eq!(instructions.len(), 4);
    assert_eq!(instructions[0].kind, InstructionKind::Argument);
    assert_eq!(instructions[1].kind, InstructionKind::Argument);
    let arguments = [instructions[0].out_value.unwrap(), instructions[1].out_value.unwrap()];
    assert_eq!(code.value(arguments[0]).register, Some(1));
    assert_eq!(code.value(arguments[1]).register, Some(2));

    let rem = instructions[2];
    assert_eq!(
        rem.kind,
        InstructionKind::Binop { op: BinopKind::Rem, ty: NumericType::Int, literal: None, reversed: false }
    );
    assert_eq!(rem.in_values, arguments.to_vec());
    let result = rem.out_value.unwrap();
    assert_eq!(code.value(result).register, Some(0));
    assert_eq!(code.value(result).ty, ValueType::Single);
    assert!(rem.can_throw());
    assert_eq!(rem.position, Some(0));
    assert_eq!(instructions[3].in_values, vec![result]);

    let numbers: Vec<u32> = instructions.iter().map(|i| i.number).collect();
    assert_eq!(numbers, vec![0, 2, 4, 6]);
    assert_eq!(INSTRUCTION_NUMBER_DELTA, 2);
}

pub(super) fn counting_loop() -> crate::conversion::MethodCode {
    // sum = 0; while (n > 0) { sum += n; n-- } return sum
    method_code(
        "LFoo;->sum(I)I",
        true,
        2,
        &[
            insn("const/4", Operands::F11n { a: 0, literal: 0 }),
            insn("if-lez", Operands::F21t { a: 1, offset: 6 }),
            insn("add-int/2addr", Operands::F12x { a: 0, b: 1 }),
            insn("add-int/lit8", Operands::F22b { a: 1, b: 1, literal: -1 }),
            insn("goto", Operands::F10t { offset: -5 }),
            insn("return", Operands::F11x { a: 0 }),
        ],
    )
}

#[test]
fn loops_get_phis() {
    let pool = ConstantPool::new();
    let code = build_ir(&pool, &counting_loop()).unwrap();
    let offsets: Vec<u32> = code.blocks().iter().map(|b| b.offset).collect();
    assert_eq!(offsets, vec![0, 1, 3, 7]);

    let header = code.block(BlockId(1));
    assert_eq!(header.predecessors, vec![BlockId(0), BlockId(2)]);
    assert_eq!(header.successors, vec![BlockId(2), BlockId(3)]);
    assert_eq!(header.phis.len(), 2);
    for phi in &header.phis {
        assert_eq!(code.phi_operands(*phi).len(), 2);
        assert!(matches!(code.value(*phi).definition, Definition::Phi { block: BlockId(1), .. }));
    }

    let exit = code.block(BlockId(3));
    let ret = code.instruction(exit.instructions[0]);
    assert_eq!(ret.kind, InstructionKind::Return);
    assert!(code.value(ret.in_values[0]).is_phi());
    assert_eq!(code.value(ret.in_values[0]).register, Some(0));

    // The first block falls through with an explicit goto.
    let entry = code.block(BlockId(0));
    let last = code.instruction(*entry.instructions.last().unwrap());
    assert_eq!(last.kind, InstructionKind::Goto(BlockId(1)));
}

#[test]
fn straight_line_merges_need_no_phis() {
    let pool = ConstantPool::new();
    // if (a == 0) {} return a
    let method = method_code(
        "LFoo;->id(I)I",
        true,
        1,
        &[insn("if-eqz", Operands::F21t { a: 0, offset: 2 }), insn("return", Operands::F11x { a: 0 })],
    );
    let code = build_ir(&pool, &method).unwrap();
    assert!(code.blocks().iter().all(|b| b.phis.is_empty()));
    let ret = code.instructions().find(|i| i.kind == InstructionKind::Return).unwrap();
    assert_eq!(code.instruction(InstructionId(0)).out_value, Some(ret.in_values[0]));
}

#[test]
fn branch_into_entry_gets_an_argument_block() {
    let pool = ConstantPool::new();
    let method = method_code(
        "LFoo;->spin(I)V",
        true,
        1,
        &[insn("add-int/lit8", Operands::F22b { a: 0, b: 0, literal: 1 }), insn("goto", Operands::F10t { offset: -2 })],
    );
    let code = build_ir(&pool, &method).unwrap();
    assert_eq!(code.blocks().len(), 2);
    let entry = code.block(BlockId(0));
    assert!(entry.predecessors.is_empty());
    assert_eq!(code.instruction(entry.instructions[0]).kind, InstructionKind::Argument);
    assert_eq!(code.block(BlockId(1)).phis.len(), 1);
}

#[test]
fn unreachable_code_is_skipped() {
    let pool = ConstantPool::new();
    let method = method_code(
        "LFoo;->f()V",
        true,
        1,
        &[insn("return-void", Operands::F10x), insn("return", Operands::F11x { a: 0 })],
    );
    let code = build_ir(&pool, &method).unwrap();
    assert_eq!(code.blocks().len(), 1);
    assert_eq!(code.instruction_count(), 1);
}

#[test]
fn writing_half_of_a_wide_pair_kills_it() {
    let pool = ConstantPool::new();
    let method = method_code(
        "LFoo;->f()J",
        true,
        3,
        &[
            insn("const-wide/16", Operands::F21s { a: 0, literal: 5 }),
            insn("const/4", Operands::F11n { a: 1, literal: 1 }),
            insn("return-wide", Operands::F11x { a: 0 }),
        ],
    );
    let e = build_ir(&pool, &method).unwrap_err();
    assert_eq!(e.kind(), ErrorKind::Malformed { offset: 3 });
    assert!(e.to_string().contains("for return-wide of LFoo;->f()J"));
}

#[test]
fn malformed_bodies() {
    let pool = ConstantPool::new();

    let stray = method_code(
        "LFoo;->f()V",
        true,
        1,
        &[insn("move-result", Operands::F11x { a: 0 }), insn("return-void", Operands::F10x)],
    );
    assert_eq!(build_ir(&pool, &stray).unwrap_err().kind(), ErrorKind::Malformed { offset: 0 });

    let undefined = method_code("LFoo;->f()I", true, 1, &[insn("return", Operands::F11x { a: 0 })]);
    assert_eq!(build_ir(&pool, &undefined).unwrap_err().kind(), ErrorKind::Malformed { offset: 0 });

    let falls_off = method_code("LFoo;->f()V", true, 1, &[insn("const/4", Operands::F11n { a: 0, literal: 0 })]);
    assert_eq!(build_ir(&pool, &falls_off).unwrap_err().kind(), ErrorKind::Malformed { offset: 0 });

    let unknown_string = method_code(
        "LFoo;->f()V",
        true,
        1,
        &[insn("const-string", Operands::F21c { a: 0, index: 4 }), insn("return-void", Operands::F10x)],
    );
    assert_eq!(build_ir(&pool, &unknown_string).unwrap_err().kind(), ErrorKind::Malformed { offset: 0 });

    let bad_branch = method_code(
        "LFoo;->f()V",
        true,
        1,
        &[insn("goto", Operands::F10t { offset: 5 }), insn("return-void", Operands::F10x)],
    );
    assert_eq!(build_ir(&pool, &bad_branch).unwrap_err().kind(), ErrorKind::Malformed { offset: 0 });

    let mut wrong_ins = method_code("LFoo;->f(J)V", true, 2, &[insn("return-void", Operands::F10x)]);
    wrong_ins.ins_size = 1;
    assert!(build_ir(&pool, &wrong_ins).unwrap_err().is_malformed());
}

#[test]
fn move_result_binds_to_the_call() {
    let mut pool = ConstantPool::new();
    let callee = DexMethod::parse("LFoo;->get()Ljava/lang/String;").unwrap();
    let index = pool.add_method(&callee);
    let method = method_code(
        "LFoo;->f()Ljava/lang/String;",
        true,
        1,
        &[
            insn("invoke-static", Operands::F35c { registers: vec![], index }),
            insn("move-result-object", Operands::F11x { a: 0 }),
            insn("return-object", Operands::F11x { a: 0 }),
        ],
    );
    let code = build_ir(&pool, &method).unwrap();
    let invokes = code.invokes();
    assert_eq!(invokes.len(), 1);
    let call = code.instruction(invokes[0]);
    assert_eq!(call.as_invoke(), Some(&Invoke::Static(callee)));
    let result = call.out_value.unwrap();
    assert_eq!(code.value(result).ty, ValueType::Object);
    assert!(code.value(result).is_used());
    // No separate node for the move-result itself.
    assert_eq!(code.instruction_count(), 2);
}

#[test]
fn wide_arguments_take_register_pairs() {
    let mut pool = ConstantPool::new();
    let callee = DexMethod::parse("LFoo;->g(JI)V").unwrap();
    let index = pool.add_method(&callee);
    let method = method_code(
        "LFoo;->f(JI)V",
        true,
        3,
        &[
            insn("invoke-static", Operands::F35c { registers: vec![0, 1, 2], index }),
            insn("return-void", Operands::F10x),
        ],
    );
    let code = build_ir(&pool, &method).unwrap();
    let call = code.instruction(code.invokes()[0]);
    assert_eq!(call.in_values.len(), 2);
    assert_eq!(code.value(call.in_values[0]).ty, ValueType::Wide);
    assert_eq!(code.required_argument_registers(call.id), 3);

    let split = method_code(
        "LFoo;->f(JI)V",
        true,
        3,
        &[
            insn("invoke-static", Operands::F35c { registers: vec![0, 2, 1], index }),
            insn("return-void", Operands::F10x),
        ],
    );
    assert!(build_ir(&pool, &split).unwrap_err().is_malformed());
}

#[test]
fn switch_targets_come_from_the_payload() {
    let pool = ConstantPool::new();
    let method = method_code(
        "LFoo;->f(I)I",
        true,
        1,
        &[
            insn("sparse-switch", Operands::F31t { a: 0, offset: 6 }),
            insn("return", Operands::F11x { a: 0 }),
            insn("const/4", Operands::F11n { a: 0, literal: 1 }),
            insn("return", Operands::F11x { a: 0 }),
            insn("sparse-switch-payload", Operands::SparseSwitchPayload { keys: vec![-1, 10], targets: vec![4, 4] }),
        ],
    );
    let code = build_ir(&pool, &method).unwrap();
    let switch = code.instruction(*code.block(BlockId(0)).instructions.last().unwrap());
    match &switch.kind {
        InstructionKind::Switch { keys, targets } => {
            assert_eq!(keys, &vec![-1, 10]);
            assert_eq!(targets, &vec![BlockId(2), BlockId(2)]);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(code.block(BlockId(0)).successors, vec![BlockId(1), BlockId(2), BlockId(2)]);
}

#[test]
fn known_classes_follow_allocation_and_casts() {
    let mut pool = ConstantPool::new();
    let bar = DexType::parse("LBar;").unwrap();
    let baz = DexType::parse("LBaz;").unwrap();
    let bar_index = pool.add_type(&bar);
    let baz_index = pool.add_type(&baz);
    let method = method_code(
        "LFoo;->f(Ljava/lang/Object;)V",
        true,
        2,
        &[
            insn("new-instance", Operands::F21c { a: 0, index: bar_index }),
            insn("check-cast", Operands::F21c { a: 1, index: baz_index }),
            insn("return-void", Operands::F10x),
        ],
    );
    let code = build_ir(&pool, &method).unwrap();
    let classes: Vec<Option<DexType>> = code
        .instructions()
        .filter(|i| matches!(i.kind, InstructionKind::NewInstance(_) | InstructionKind::CheckCast(_)))
        .map(|i| code.value(i.out_value.unwrap()).known_class.clone())
        .collect();
    assert_eq!(classes, vec![Some(bar), Some(baz)]);
}

#[test]
fn faulting_nodes() {
    let mut pool = ConstantPool::new();
    let callee = DexMethod::parse("LFoo;->g()V").unwrap();
    let index = pool.add_method(&callee);
    let method = method_code(
        "LFoo;->f([IIJ)V",
        true,
        5,
        &[
            insn("aget", Operands::F23x { a: 0, b: 1, c: 2 }),
            insn("add-int/2addr", Operands::F12x { a: 0, b: 2 }),
            insn("shl-long/2addr", Operands::F12x { a: 3, b: 0 }),
            insn("rem-long/2addr", Operands::F12x { a: 3, b: 3 }),
            insn("rem-float", Operands::F23x { a: 0, b: 0, c: 0 }),
            insn("invoke-static", Operands::F35c { registers: vec![], index }),
            insn("return-void", Operands::F10x),
        ],
    );
    let code = build_ir(&pool, &method).unwrap();
    let throws: Vec<(String, bool)> = code
        .instructions()
        .filter(|i| i.kind != InstructionKind::Argument)
        .map(|i| (i.kind.name(), i.can_throw()))
        .collect();
    assert_eq!(
        throws,
        vec![
            (format!("ArrayGet{}", MemberType::Single.suffix()), true),
            ("add int".to_string(), false),
            ("shl long".to_string(), false),
            ("rem long".to_string(), true),
            ("rem float".to_string(), false),
            ("Invoke-Static LFoo;->g()V".to_string(), true),
            ("Return".to_string(), false),
        ]
    );
}
