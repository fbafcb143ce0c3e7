use super::ir_tests::counting_loop;
use super::{build_ir, insn, method_code, names, process};
use crate::conversion::dex_builder::DexBuilder;
use crate::dex::opcode_format::Operands;
use crate::ir::{InstructionKind, IrCode, ValueId, ValueType};
use crate::items::{ConstantPool, DexMethod, DexType};
use crate::regalloc::SlotAllocation;

fn pool_with(methods: &[&str]) -> ConstantPool {
    let mut pool = ConstantPool::new();
    for m in methods {
        pool.add_method(&DexMethod::parse(m).unwrap());
    }
    pool
}

fn out_of(code: &IrCode, pick: impl Fn(&InstructionKind) -> bool) -> ValueId {
    code.instructions().find(|i| pick(&i.kind)).and_then(|i| i.out_value).unwrap()
}

#[test]
fn loops_lower_to_their_input() {
    let pool = ConstantPool::new();
    let method = counting_loop();
    let lowered = process(&pool, &method).unwrap();
    assert_eq!(names(&lowered), vec!["const/4", "if-lez", "add-int/2addr", "add-int/lit8", "goto", "return"]);
    assert_eq!(lowered.encode(), method.insns);
    assert_eq!(lowered.registers_size, 2);
    assert_eq!(lowered.ins_size, 1);
    assert_eq!(lowered.outs_size, 0);
}

#[test]
fn five_argument_units_fit_the_short_form() {
    let pool = pool_with(&["LFoo;->g(IIIII)V", "LFoo;->h(JJI)V"]);
    let ints = method_code(
        "LFoo;->f(IIIII)V",
        true,
        5,
        &[
            insn("invoke-static", Operands::F35c { registers: vec![0, 1, 2, 3, 4], index: 0 }),
            insn("return-void", Operands::F10x),
        ],
    );
    let lowered = process(&pool, &ints).unwrap();
    assert_eq!(names(&lowered), vec!["invoke-static", "return-void"]);
    assert_eq!(lowered.encode(), ints.insns);
    assert_eq!(lowered.outs_size, 5);

    let wides = method_code(
        "LFoo;->f(JJI)V",
        true,
        5,
        &[
            insn("invoke-static", Operands::F35c { registers: vec![0, 1, 2, 3, 4], index: 1 }),
            insn("return-void", Operands::F10x),
        ],
    );
    let lowered = process(&pool, &wides).unwrap();
    assert_eq!(lowered.encode(), wides.insns);
}

#[test]
fn six_argument_units_need_a_range() {
    let pool = pool_with(&["LFoo;->g(JJII)V"]);
    let method = method_code(
        "LFoo;->f(JJII)V",
        true,
        6,
        &[
            insn("invoke-static/range", Operands::F3rc { first: 0, count: 6, index: 0 }),
            insn("return-void", Operands::F10x),
        ],
    );
    let lowered = process(&pool, &method).unwrap();
    assert_eq!(names(&lowered), vec!["invoke-static/range", "return-void"]);
    assert_eq!(lowered.encode(), method.insns);
    assert_eq!(lowered.outs_size, 6);
}

#[test]
fn interface_calls_count_the_receiver() {
    let pool = pool_with(&["LI;->m(JJI)V", "LI;->n(JJ)V"]);
    let ranged = method_code(
        "LFoo;->f(LI;JJI)V",
        true,
        6,
        &[
            insn("invoke-interface/range", Operands::F3rc { first: 0, count: 6, index: 0 }),
            insn("return-void", Operands::F10x),
        ],
    );
    let lowered = process(&pool, &ranged).unwrap();
    assert_eq!(names(&lowered), vec!["invoke-interface/range", "return-void"]);
    assert_eq!(lowered.encode(), ranged.insns);
    assert_eq!(lowered.outs_size, 6);

    let short = method_code(
        "LFoo;->f(LI;JJ)V",
        true,
        5,
        &[
            insn("invoke-interface", Operands::F35c { registers: vec![0, 1, 2, 3, 4], index: 1 }),
            insn("return-void", Operands::F10x),
        ],
    );
    let lowered = process(&pool, &short).unwrap();
    assert_eq!(names(&lowered), vec!["invoke-interface", "return-void"]);
    assert_eq!(lowered.encode(), short.insns);
    assert_eq!(lowered.outs_size, 5);
}

#[test]
fn null_is_returned_as_an_object() {
    let pool = ConstantPool::new();
    let method = method_code(
        "LFoo;->f()Ljava/lang/Object;",
        true,
        1,
        &[insn("const/4", Operands::F11n { a: 0, literal: 0 }), insn("return-object", Operands::F11x { a: 0 })],
    );
    let lowered = process(&pool, &method).unwrap();
    assert_eq!(names(&lowered), vec!["const/4", "return-object"]);
    assert_eq!(lowered.encode(), method.insns);
}

#[test]
fn null_merged_with_an_allocation_stays_an_object() {
    let mut pool = ConstantPool::new();
    let bar = pool.add_type(&DexType::parse("LBar;").unwrap());
    let method = method_code(
        "LFoo;->f(I)Ljava/lang/Object;",
        true,
        2,
        &[
            insn("const/4", Operands::F11n { a: 0, literal: 0 }),
            insn("if-eqz", Operands::F21t { a: 1, offset: 4 }),
            insn("new-instance", Operands::F21c { a: 0, index: bar }),
            insn("return-object", Operands::F11x { a: 0 }),
        ],
    );
    let code = build_ir(&pool, &method).unwrap();
    let phis: Vec<ValueId> = code.blocks().iter().flat_map(|b| b.phis.clone()).collect();
    assert_eq!(phis.len(), 1);
    assert_eq!(code.value(phis[0]).ty, ValueType::Object);

    let lowered = process(&pool, &method).unwrap();
    assert_eq!(names(&lowered), vec!["const/4", "if-eqz", "new-instance", "return-object"]);
    assert_eq!(lowered.encode(), method.insns);
}

#[test]
fn high_registers_need_a_range() {
    let pool = pool_with(&["LFoo;->g(I)V"]);
    let method = method_code(
        "LFoo;->f(I)V",
        true,
        20,
        &[
            insn("invoke-static/range", Operands::F3rc { first: 19, count: 1, index: 0 }),
            insn("return-void", Operands::F10x),
        ],
    );
    let lowered = process(&pool, &method).unwrap();
    assert_eq!(lowered.instructions[0].operands, Operands::F3rc { first: 19, count: 1, index: 0 });
    assert_eq!(lowered.encode(), method.insns);
}

#[test]
fn ranged_arguments_must_be_contiguous() {
    let pool = pool_with(&["LFoo;->g(JJII)V"]);
    let method = method_code(
        "LFoo;->f(JJII)V",
        true,
        6,
        &[
            insn("invoke-static/range", Operands::F3rc { first: 0, count: 6, index: 0 }),
            insn("return-void", Operands::F10x),
        ],
    );
    let code = build_ir(&pool, &method).unwrap();
    let last_argument = code
        .instructions()
        .filter(|i| i.kind == InstructionKind::Argument)
        .last()
        .and_then(|i| i.out_value)
        .unwrap();
    let mut allocation = SlotAllocation::from_code(&code);
    allocation.assign(last_argument, 9, 1);
    let e = DexBuilder::new(&code, &allocation, &pool).build().unwrap_err();
    assert!(e.is_internal());
    assert!(e.to_string().contains("contiguous"));
}

#[test]
fn move_result_only_when_used() {
    let pool = pool_with(&["LFoo;->i()I", "LFoo;->j()J", "LFoo;->s()Ljava/lang/String;"]);

    let unused = method_code(
        "LFoo;->f()V",
        true,
        1,
        &[
            insn("invoke-static", Operands::F35c { registers: vec![], index: 0 }),
            insn("move-result", Operands::F11x { a: 0 }),
            insn("return-void", Operands::F10x),
        ],
    );
    assert_eq!(names(&process(&pool, &unused).unwrap()), vec!["invoke-static", "return-void"]);

    let cases = [
        ("LFoo;->f()I", 0, "move-result", "return"),
        ("LFoo;->f()J", 1, "move-result-wide", "return-wide"),
        ("LFoo;->f()Ljava/lang/String;", 2, "move-result-object", "return-object"),
    ];
    for (signature, index, move_result, ret) in cases {
        let method = method_code(
            signature,
            true,
            2,
            &[
                insn("invoke-static", Operands::F35c { registers: vec![], index }),
                insn(move_result, Operands::F11x { a: 0 }),
                insn(ret, Operands::F11x { a: 0 }),
            ],
        );
        let lowered = process(&pool, &method).unwrap();
        assert_eq!(names(&lowered), vec!["invoke-static", move_result, ret]);
        assert_eq!(lowered.outs_size, 0);
    }
}

#[test]
fn compact_forms_are_chosen() {
    let pool = ConstantPool::new();
    let method = method_code(
        "LFoo;->f(I)I",
        true,
        2,
        &[
            insn("move/16", Operands::F32x { a: 0, b: 1 }),
            insn("const", Operands::F31i { a: 1, literal: 3 }),
            insn("add-int", Operands::F23x { a: 0, b: 0, c: 1 }),
            insn("mul-int/lit16", Operands::F22s { a: 0, b: 0, literal: 5 }),
            insn("const-wide", Operands::F51l { a: 0, literal: 0x7fff_0000_0000_0000 }),
            insn("const-wide/32", Operands::F31i { a: 0, literal: -1 }),
            insn("const", Operands::F31i { a: 0, literal: 0x10000 }),
            insn("return", Operands::F11x { a: 0 }),
        ],
    );
    let lowered = process(&pool, &method).unwrap();
    assert_eq!(
        names(&lowered),
        vec![
            "move",
            "const/4",
            "add-int/2addr",
            "mul-int/lit8",
            "const-wide/high16",
            "const-wide/16",
            "const/high16",
            "return",
        ]
    );
}

#[test]
fn reversed_subtraction_keeps_its_operand_order() {
    let pool = ConstantPool::new();
    let method = method_code(
        "LFoo;->f(I)I",
        true,
        2,
        &[
            insn("rsub-int", Operands::F22s { a: 0, b: 1, literal: 1000 }),
            insn("rsub-int/lit8", Operands::F22b { a: 0, b: 0, literal: 1 }),
            insn("return", Operands::F11x { a: 0 }),
        ],
    );
    let lowered = process(&pool, &method).unwrap();
    assert_eq!(lowered.encode(), method.insns);
}

#[test]
fn check_cast_into_another_register_moves_first() {
    let mut pool = ConstantPool::new();
    let bar = pool.add_type(&DexType::parse("LBar;").unwrap());
    let method = method_code(
        "LFoo;->f(Ljava/lang/Object;)V",
        true,
        2,
        &[insn("check-cast", Operands::F21c { a: 1, index: bar }), insn("return-void", Operands::F10x)],
    );
    let code = build_ir(&pool, &method).unwrap();
    let cast = out_of(&code, |k| matches!(k, InstructionKind::CheckCast(_)));
    let mut allocation = SlotAllocation::from_code(&code);
    allocation.assign(cast, 0, 1);
    let lowered = DexBuilder::new(&code, &allocation, &pool).build().unwrap();
    assert_eq!(names(&lowered), vec!["move-object", "check-cast", "return-void"]);
    assert_eq!(lowered.instructions[0].operands, Operands::F12x { a: 0, b: 1 });
}

#[test]
fn phi_operands_must_share_the_phi_register() {
    let pool = ConstantPool::new();
    let code = build_ir(&pool, &counting_loop()).unwrap();
    let sum = out_of(&code, |k| matches!(k, InstructionKind::Binop { literal: None, .. }));
    let mut allocation = SlotAllocation::from_code(&code);
    allocation.assign(sum, 1, 1);
    let e = DexBuilder::new(&code, &allocation, &pool).build().unwrap_err();
    assert!(e.is_internal());
}

#[test]
fn gotos_grow_to_reach_their_target() {
    let pool = ConstantPool::new();

    let mut body: Vec<_> = (0..100).map(|_| insn("const/16", Operands::F21s { a: 0, literal: 100 })).collect();
    body.push(insn("goto/16", Operands::F20t { offset: -200 }));
    let far = method_code("LFoo;->f()V", true, 1, &body);
    let lowered = process(&pool, &far).unwrap();
    assert_eq!(names(&lowered).last(), Some(&"goto/16"));
    assert_eq!(lowered.encode(), far.insns);

    let mut body: Vec<_> = (0..60).map(|_| insn("const/16", Operands::F21s { a: 0, literal: 100 })).collect();
    body.push(insn("goto/16", Operands::F20t { offset: -120 }));
    let near = method_code("LFoo;->f()V", true, 1, &body);
    let lowered = process(&pool, &near).unwrap();
    assert_eq!(lowered.instructions.last().map(|i| &i.operands), Some(&Operands::F10t { offset: -120 }));
}

#[test]
fn self_loops_use_the_widest_goto() {
    let pool = ConstantPool::new();
    let method = method_code("LFoo;->f()V", true, 0, &[insn("goto/32", Operands::F30t { offset: 0 })]);
    let lowered = process(&pool, &method).unwrap();
    assert_eq!(names(&lowered), vec!["goto/32"]);
    assert_eq!(lowered.encode(), method.insns);
}

#[test]
fn payloads_are_aligned() {
    let mut pool = ConstantPool::new();
    let int_array = pool.add_type(&DexType::parse("[I").unwrap());
    let method = method_code(
        "LFoo;->f()V",
        true,
        1,
        &[
            insn("const/4", Operands::F11n { a: 0, literal: 2 }),
            insn("new-array", Operands::F22c { a: 0, b: 0, index: int_array }),
            insn("fill-array-data", Operands::F31t { a: 0, offset: 5 }),
            insn("return-void", Operands::F10x),
            insn("nop", Operands::F10x),
            insn(
                "array-payload",
                Operands::ArrayPayload { element_width: 4, size: 2, data: vec![1, 0, 0, 0, 2, 0, 0, 0] },
            ),
        ],
    );
    let lowered = process(&pool, &method).unwrap();
    assert_eq!(
        names(&lowered),
        vec!["const/4", "new-array", "fill-array-data", "return-void", "nop", "array-payload"]
    );
    assert_eq!(lowered.encode(), method.insns);
}

#[test]
fn switches_pick_packed_or_sparse() {
    let pool = ConstantPool::new();
    let packed = method_code(
        "LFoo;->f(I)I",
        true,
        1,
        &[
            insn("packed-switch", Operands::F31t { a: 0, offset: 6 }),
            insn("return", Operands::F11x { a: 0 }),
            insn("const/4", Operands::F11n { a: 0, literal: 1 }),
            insn("return", Operands::F11x { a: 0 }),
            insn("packed-switch-payload", Operands::PackedSwitchPayload { first_key: 3, targets: vec![4, 4] }),
        ],
    );
    let lowered = process(&pool, &packed).unwrap();
    assert_eq!(lowered.encode(), packed.insns);

    // Consecutive keys written as a sparse switch come out packed.
    let sparse = method_code(
        "LFoo;->f(I)I",
        true,
        1,
        &[
            insn("sparse-switch", Operands::F31t { a: 0, offset: 6 }),
            insn("return", Operands::F11x { a: 0 }),
            insn("const/4", Operands::F11n { a: 0, literal: 1 }),
            insn("return", Operands::F11x { a: 0 }),
            insn("sparse-switch-payload", Operands::SparseSwitchPayload { keys: vec![3, 4], targets: vec![4, 4] }),
        ],
    );
    let lowered = process(&pool, &sparse).unwrap();
    assert_eq!(lowered.encode(), packed.insns);

    let gaps = method_code(
        "LFoo;->f(I)I",
        true,
        1,
        &[
            insn("sparse-switch", Operands::F31t { a: 0, offset: 6 }),
            insn("return", Operands::F11x { a: 0 }),
            insn("const/4", Operands::F11n { a: 0, literal: 1 }),
            insn("return", Operands::F11x { a: 0 }),
            insn("sparse-switch-payload", Operands::SparseSwitchPayload { keys: vec![-7, 40], targets: vec![4, 4] }),
        ],
    );
    let lowered = process(&pool, &gaps).unwrap();
    assert_eq!(lowered.encode(), gaps.insns);
}

#[test]
fn unknown_items_are_internal_errors_when_lowering() {
    let mut pool = ConstantPool::new();
    let bar = pool.add_type(&DexType::parse("LBar;").unwrap());
    let method = method_code(
        "LFoo;->f()V",
        true,
        1,
        &[insn("new-instance", Operands::F21c { a: 0, index: bar }), insn("return-void", Operands::F10x)],
    );
    let code = build_ir(&pool, &method).unwrap();
    let allocation = SlotAllocation::from_code(&code);
    let empty = ConstantPool::new();
    let e = DexBuilder::new(&code, &allocation, &empty).build().unwrap_err();
    assert!(e.is_internal());
}
