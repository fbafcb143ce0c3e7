use super::{insn, method_code};
use crate::conversion::ir_builder::IrBuilder;
use crate::conversion::MethodCode;
use crate::dex::opcode_format::Operands;
use crate::hierarchy::{AccessFlags, ClassDefinition, ClassHierarchy, MethodDefinition, TypeHierarchy};
use std::sync::atomic::{AtomicUsize, Ordering};
use crate::ir::inliner::{InlineDecision, InlineSkipReason, InliningOracle};
use crate::ir::invoke::InvokeType;
use crate::ir::IrCode;
use crate::items::{ConstantPool, DexMethod, DexType};
use crate::options::CompilerOptions;
use crate::processor::MethodProcessor;

const CONCRETE: AccessFlags = AccessFlags::PUBLIC;

fn class(
    name: &str,
    super_type: Option<&str>,
    interfaces: &[&str],
    access: AccessFlags,
    methods: &[(&str, AccessFlags)],
) -> ClassDefinition {
    ClassDefinition {
        class_type: DexType::parse(name).unwrap(),
        super_type: super_type.map(|s| DexType::parse(s).unwrap()),
        interfaces: interfaces.iter().map(|i| DexType::parse(i).unwrap()).collect(),
        access,
        methods: methods
            .iter()
            .map(|(sig, access)| MethodDefinition {
                method: DexMethod::parse(&format!("{}->{}", name, sig)).unwrap(),
                access: *access,
                code_size: if access.contains(AccessFlags::ABSTRACT) { None } else { Some(4) },
            })
            .collect(),
    }
}

fn method(s: &str) -> DexMethod {
    DexMethod::parse(s).unwrap()
}

fn resolve(hierarchy: &ClassHierarchy, kind: InvokeType, target: &str) -> Option<DexMethod> {
    hierarchy.resolve_single_target(kind, &method(target), None)
}

#[test]
fn virtual_calls_need_a_unique_implementation() {
    let unique = ClassHierarchy::new(vec![
        class("LA;", None, &[], CONCRETE, &[("m()V", CONCRETE)]),
        class("LB;", Some("LA;"), &[], CONCRETE, &[]),
    ]);
    assert_eq!(resolve(&unique, InvokeType::Virtual, "LA;->m()V"), Some(method("LA;->m()V")));
    assert_eq!(resolve(&unique, InvokeType::Virtual, "LB;->m()V"), Some(method("LA;->m()V")));

    let overridden = ClassHierarchy::new(vec![
        class("LA;", None, &[], CONCRETE, &[("m()V", CONCRETE)]),
        class("LB;", Some("LA;"), &[], CONCRETE, &[("m()V", CONCRETE)]),
    ]);
    assert_eq!(resolve(&overridden, InvokeType::Virtual, "LA;->m()V"), None);
    assert_eq!(resolve(&overridden, InvokeType::Virtual, "LB;->m()V"), Some(method("LB;->m()V")));

    // Abstract classes never receive calls themselves.
    let abstract_base = ClassHierarchy::new(vec![
        class("LA;", None, &[], AccessFlags::ABSTRACT, &[("m()V", AccessFlags::ABSTRACT)]),
        class("LB;", Some("LA;"), &[], CONCRETE, &[("m()V", CONCRETE)]),
    ]);
    assert_eq!(resolve(&abstract_base, InvokeType::Virtual, "LA;->m()V"), Some(method("LB;->m()V")));

    assert_eq!(resolve(&unique, InvokeType::Virtual, "LUnknown;->m()V"), None);
}

#[test]
fn interface_calls_resolve_to_the_only_implementer() {
    let hierarchy = ClassHierarchy::new(vec![
        class("LI;", None, &[], AccessFlags::INTERFACE, &[("m()V", AccessFlags::ABSTRACT)]),
        class("LC;", Some("Ljava/lang/Object;"), &["LI;"], CONCRETE, &[("m()V", CONCRETE)]),
    ]);
    assert_eq!(resolve(&hierarchy, InvokeType::Interface, "LI;->m()V"), Some(method("LC;->m()V")));

    let two = ClassHierarchy::new(vec![
        class("LI;", None, &[], AccessFlags::INTERFACE, &[("m()V", AccessFlags::ABSTRACT)]),
        class("LC;", None, &["LI;"], CONCRETE, &[("m()V", CONCRETE)]),
        class("LD;", None, &["LI;"], CONCRETE, &[("m()V", CONCRETE)]),
    ]);
    assert_eq!(resolve(&two, InvokeType::Interface, "LI;->m()V"), None);
}

#[test]
fn super_direct_and_other_calls() {
    let hierarchy = ClassHierarchy::new(vec![
        class("LA;", None, &[], CONCRETE, &[("m()V", CONCRETE), ("<init>()V", AccessFlags::CONSTRUCTOR)]),
        class("LB;", Some("LA;"), &[], CONCRETE, &[("m()V", CONCRETE)]),
    ]);
    assert_eq!(resolve(&hierarchy, InvokeType::Super, "LA;->m()V"), Some(method("LA;->m()V")));
    assert_eq!(resolve(&hierarchy, InvokeType::Direct, "LA;-><init>()V"), Some(method("LA;-><init>()V")));
    assert_eq!(resolve(&hierarchy, InvokeType::Direct, "LZ;->p()V"), Some(method("LZ;->p()V")));
    assert_eq!(resolve(&hierarchy, InvokeType::NewArray, "LA;->m()V"), None);
    assert_eq!(resolve(&hierarchy, InvokeType::Custom, "LA;->m()V"), None);
    assert_eq!(resolve(&hierarchy, InvokeType::Polymorphic, "LA;->m()V"), None);
}

fn build(pool: &ConstantPool, method: &MethodCode) -> IrCode {
    IrBuilder::build(method, pool, &CompilerOptions::default()).unwrap()
}

#[test]
fn allocation_refines_the_receiver() {
    let hierarchy = ClassHierarchy::new(vec![
        class("LA;", None, &[], CONCRETE, &[("m()V", CONCRETE)]),
        class("LB;", Some("LA;"), &[], CONCRETE, &[("m()V", CONCRETE)]),
    ]);
    let mut pool = ConstantPool::new();
    let b = pool.add_type(&DexType::parse("LB;").unwrap());
    let m = pool.add_method(&method("LA;->m()V"));

    let refined = method_code(
        "LFoo;->f()V",
        true,
        1,
        &[
            insn("new-instance", Operands::F21c { a: 0, index: b }),
            insn("invoke-virtual", Operands::F35c { registers: vec![0], index: m }),
            insn("return-void", Operands::F10x),
        ],
    );
    let code = build(&pool, &refined);
    let call = code.invokes()[0];
    assert_eq!(code.compute_single_target(call, &hierarchy), Some(method("LB;->m()V")));

    let unrefined = method_code(
        "LFoo;->f(LA;)V",
        true,
        1,
        &[insn("invoke-virtual", Operands::F35c { registers: vec![0], index: m }), insn("return-void", Operands::F10x)],
    );
    let code = build(&pool, &unrefined);
    assert_eq!(code.compute_single_target(code.invokes()[0], &hierarchy), None);
}

#[test]
fn inlining_decisions() {
    let hierarchy = ClassHierarchy::new(vec![
        class(
            "LFoo;",
            None,
            &[],
            CONCRETE,
            &[("f()V", AccessFlags::STATIC), ("g()V", AccessFlags::STATIC), ("v()V", CONCRETE)],
        ),
        class("LBar;", Some("LFoo;"), &[], CONCRETE, &[("v()V", CONCRETE)]),
    ]);
    let mut pool = ConstantPool::new();
    let f = pool.add_method(&method("LFoo;->f()V"));
    let g = pool.add_method(&method("LFoo;->g()V"));
    let h = pool.add_method(&method("LFoo;->h()V"));
    let v = pool.add_method(&method("LFoo;->v()V"));

    let calling = |index: u32| {
        method_code(
            "LFoo;->f(LFoo;)V",
            true,
            1,
            &[
                insn("invoke-static", Operands::F35c { registers: vec![], index }),
                insn("return-void", Operands::F10x),
            ],
        )
    };
    let decide = |code: &IrCode, options: &CompilerOptions| {
        InliningOracle::new(options).decide(&code.method, code, code.invokes()[0], &hierarchy)
    };

    let to_g = build(&pool, &calling(g));
    let options = CompilerOptions::default();
    assert_eq!(decide(&to_g, &options), InlineDecision::Inline(method("LFoo;->g()V")));

    let disabled = CompilerOptions { inlining: false, ..Default::default() };
    assert_eq!(decide(&to_g, &disabled), InlineDecision::Skip(InlineSkipReason::Disabled));

    let small = CompilerOptions { inlining_instruction_limit: 3, ..Default::default() };
    assert_eq!(
        decide(&to_g, &small),
        InlineDecision::Skip(InlineSkipReason::TooBig { size: 4, limit: 3 })
    );

    // The caller is LFoo;->f(LFoo;)V, a different signature than f()V.
    let mut recursive = build(&pool, &calling(f));
    recursive.method = method("LFoo;->f()V");
    assert_eq!(decide(&recursive, &options), InlineDecision::Skip(InlineSkipReason::Recursive));

    let to_h = build(&pool, &calling(h));
    assert_eq!(decide(&to_h, &options), InlineDecision::Skip(InlineSkipReason::NoDefinition));

    let virtual_call = method_code(
        "LFoo;->f(LFoo;)V",
        true,
        1,
        &[insn("invoke-virtual", Operands::F35c { registers: vec![0], index: v }), insn("return-void", Operands::F10x)],
    );
    let code = build(&pool, &virtual_call);
    assert_eq!(decide(&code, &options), InlineDecision::Skip(InlineSkipReason::NoSingleTarget));
    assert_eq!(InlineSkipReason::TooBig { size: 9, limit: 5 }.to_string(), "callee has 9 code units, limit is 5");

    let processor_options = CompilerOptions::default();
    let processor = MethodProcessor::new(&pool, &pool, &hierarchy, &processor_options);
    assert_eq!(processor.inline_candidates(&to_g), vec![method("LFoo;->g()V")]);
    assert!(processor.inline_candidates(&code).is_empty());
}

#[test]
fn failing_methods_do_not_stop_the_others() {
    let pool = ConstantPool::new();
    let hierarchy = ClassHierarchy::new(vec![]);
    let options = CompilerOptions::default();
    let processor = MethodProcessor::new(&pool, &pool, &hierarchy, &options);

    let good = method_code("LFoo;->a()V", true, 0, &[insn("return-void", Operands::F10x)]);
    let bad = method_code("LFoo;->b()V", true, 1, &[insn("const/4", Operands::F11n { a: 0, literal: 1 })]);
    let also_good = method_code("LFoo;->c()I", true, 1, &[
        insn("const/4", Operands::F11n { a: 0, literal: 1 }),
        insn("return", Operands::F11x { a: 0 }),
    ]);

    let results = processor.process_all(&[good.clone(), bad, also_good.clone()]);
    let methods: Vec<String> = results.iter().map(|(m, _)| m.to_string()).collect();
    assert_eq!(methods, vec!["LFoo;->a()V", "LFoo;->b()V", "LFoo;->c()I"]);
    assert_eq!(results[0].1.as_ref().unwrap().encode(), good.insns);
    let e = results[1].1.as_ref().unwrap_err();
    assert!(e.is_malformed());
    assert!(e.to_string().ends_with("for LFoo;->b()V"));
    assert_eq!(results[2].1.as_ref().unwrap().encode(), also_good.insns);
}

struct CountingHierarchy {
    inner: ClassHierarchy,
    queries: AtomicUsize,
}

impl TypeHierarchy for CountingHierarchy {
    fn resolve_single_target(&self, kind: InvokeType, target: &DexMethod, receiver: Option<&DexType>) -> Option<DexMethod> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve_single_target(kind, target, receiver)
    }

    fn method_definition(&self, method: &DexMethod) -> Option<&MethodDefinition> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.inner.method_definition(method)
    }
}

#[test]
fn lowering_does_not_consult_the_hierarchy() {
    let hierarchy = CountingHierarchy {
        inner: ClassHierarchy::new(vec![class("LFoo;", None, &[], CONCRETE, &[("g()V", AccessFlags::STATIC)])]),
        queries: AtomicUsize::new(0),
    };
    let mut pool = ConstantPool::new();
    let g = pool.add_method(&method("LFoo;->g()V"));
    let options = CompilerOptions::default();
    let processor = MethodProcessor::new(&pool, &pool, &hierarchy, &options);
    let calling = method_code(
        "LFoo;->f()V",
        true,
        0,
        &[insn("invoke-static", Operands::F35c { registers: vec![], index: g }), insn("return-void", Operands::F10x)],
    );

    let lowered = processor.process(&calling).unwrap();
    assert_eq!(lowered.encode(), calling.insns);
    assert_eq!(hierarchy.queries.load(Ordering::SeqCst), 0);

    let code = processor.build_ir(&calling).unwrap();
    assert_eq!(processor.inline_candidates(&code), vec![method("LFoo;->g()V")]);
    assert!(hierarchy.queries.load(Ordering::SeqCst) > 0);
}
