//! Decides which calls are worth inlining. The inlining transformation itself lives elsewhere; this
//! only answers whether a given invoke qualifies and why not.

use crate::hierarchy::TypeHierarchy;
use crate::ir::{InstructionId, IrCode};
use crate::items::DexMethod;
use crate::options::CompilerOptions;
use log::debug;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineSkipReason {
    Disabled,
    NoSingleTarget,
    Recursive,
    TooBig { size: u32, limit: u32 },
    /// The target has no definition with a body in the hierarchy.
    NoDefinition,
}

impl fmt::Display for InlineSkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InlineSkipReason::Disabled => write!(f, "inlining is disabled"),
            InlineSkipReason::NoSingleTarget => write!(f, "no single target"),
            InlineSkipReason::Recursive => write!(f, "recursive call"),
            InlineSkipReason::TooBig { size, limit } => write!(f, "callee has {} code units, limit is {}", size, limit),
            InlineSkipReason::NoDefinition => write!(f, "callee has no code"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineDecision {
    Inline(DexMethod),
    Skip(InlineSkipReason),
}

pub struct InliningOracle<'a> {
    options: &'a CompilerOptions,
}

impl<'a> InliningOracle<'a> {
    pub fn new(options: &'a CompilerOptions) -> Self {
        InliningOracle { options }
    }

    /// Decides whether the call `invoke` in `code`, the body of `caller`, may be inlined.
    pub fn decide(
        &self,
        caller: &DexMethod,
        code: &IrCode,
        invoke: InstructionId,
        hierarchy: &dyn TypeHierarchy,
    ) -> InlineDecision {
        let decision = self.check(caller, code, invoke, hierarchy);
        if let InlineDecision::Skip(reason) = &decision {
            debug!("Not inlining {} in {}: {}", code.instruction(invoke).kind.name(), caller, reason);
        }
        decision
    }

    fn check(&self, caller: &DexMethod, code: &IrCode, invoke: InstructionId, hierarchy: &dyn TypeHierarchy) -> InlineDecision {
        if !self.options.inlining {
            return InlineDecision::Skip(InlineSkipReason::Disabled);
        }
        let target = match code.compute_single_target(invoke, hierarchy) {
            Some(target) => target,
            None => return InlineDecision::Skip(InlineSkipReason::NoSingleTarget),
        };
        if target == *caller {
            return InlineDecision::Skip(InlineSkipReason::Recursive);
        }
        let size = match hierarchy.method_definition(&target).and_then(|d| d.code_size) {
            Some(size) => size,
            None => return InlineDecision::Skip(InlineSkipReason::NoDefinition),
        };
        let limit = self.options.inlining_instruction_limit;
        if size > limit {
            return InlineDecision::Skip(InlineSkipReason::TooBig { size, limit });
        }
        InlineDecision::Inline(target)
    }

    /// Every invoke of `code` that may be inlined, with its target.
    pub fn candidates(&self, code: &IrCode, hierarchy: &dyn TypeHierarchy) -> Vec<(InstructionId, DexMethod)> {
        code.invokes()
            .into_iter()
            .filter_map(|id| match self.decide(&code.method, code, id, hierarchy) {
                InlineDecision::Inline(target) => Some((id, target)),
                InlineDecision::Skip(_) => None,
            })
            .collect()
    }
}
