//! Drives methods through decode, IR building and lowering.

use crate::conversion::dex_builder::{DexBuilder, DexCode};
use crate::conversion::ir_builder::IrBuilder;
use crate::conversion::MethodCode;
use crate::dex::error::{DexError, ResultExt};
use crate::hierarchy::TypeHierarchy;
use crate::ir::inliner::InliningOracle;
use crate::ir::IrCode;
use crate::items::{DexMethod, IndexResolver, ItemResolver};
use crate::options::CompilerOptions;
use crate::regalloc::{RegisterAllocation, SlotAllocation};
use log::warn;
use rayon::prelude::*;

/// Picks registers for the values of a method.
pub type AllocatorFactory = fn(&IrCode) -> Box<dyn RegisterAllocation>;

fn slot_allocation(code: &IrCode) -> Box<dyn RegisterAllocation> {
    Box::new(SlotAllocation::from_code(code))
}

pub struct MethodProcessor<'a> {
    resolver: &'a (dyn ItemResolver + Sync),
    indices: &'a (dyn IndexResolver + Sync),
    hierarchy: &'a dyn TypeHierarchy,
    options: &'a CompilerOptions,
    allocator: AllocatorFactory,
}

impl<'a> MethodProcessor<'a> {
    pub fn new(
        resolver: &'a (dyn ItemResolver + Sync),
        indices: &'a (dyn IndexResolver + Sync),
        hierarchy: &'a dyn TypeHierarchy,
        options: &'a CompilerOptions,
    ) -> Self {
        MethodProcessor { resolver, indices, hierarchy, options, allocator: slot_allocation }
    }

    pub fn with_allocator(mut self, allocator: AllocatorFactory) -> Self {
        self.allocator = allocator;
        self
    }

    pub fn build_ir(&self, method_code: &MethodCode) -> Result<IrCode, DexError> {
        IrBuilder::build(method_code, self.resolver, self.options)
    }

    /// Calls in `code` that could be inlined, with their single targets.
    pub fn inline_candidates(&self, code: &IrCode) -> Vec<DexMethod> {
        InliningOracle::new(self.options)
            .candidates(code, self.hierarchy)
            .into_iter()
            .map(|(_, target)| target)
            .collect()
    }

    pub fn process(&self, method_code: &MethodCode) -> Result<DexCode, DexError> {
        let code = self.build_ir(method_code)?;
        let allocation = (self.allocator)(&code);
        DexBuilder::new(&code, allocation.as_ref(), self.indices)
            .build()
            .context(|| code.method.to_string())
    }

    /// Processes every method in parallel. A failing method does not stop the others.
    pub fn process_all(&self, methods: &[MethodCode]) -> Vec<(DexMethod, Result<DexCode, DexError>)> {
        methods
            .par_iter()
            .map(|method_code| {
                let result = self.process(method_code);
                if let Err(e) = &result {
                    warn!("Failed to process {}: {}", method_code.method, e);
                }
                (method_code.method.clone(), result)
            })
            .collect()
    }
}
