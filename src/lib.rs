//! # dexir
//!
//! The code layer of a dex-to-dex optimizer: Dalvik instruction decoding and encoding, SSA IR
//! construction from method bodies, and lowering of the IR back to compact dex code using the
//! registers picked by a register allocator.
//!
//! ```no_run
//!  use dexir::conversion::MethodCode;
//!  use dexir::hierarchy::ClassHierarchy;
//!  use dexir::items::{ConstantPool, DexMethod};
//!  use dexir::options::CompilerOptions;
//!  use dexir::processor::MethodProcessor;
//!
//!  let pool = ConstantPool::new();
//!  let hierarchy = ClassHierarchy::new(vec![]);
//!  let options = CompilerOptions::default();
//!  let method = MethodCode {
//!      method: DexMethod::parse("LFoo;->answer()I").unwrap(),
//!      is_static: true,
//!      registers_size: 1,
//!      ins_size: 0,
//!      insns: vec![0x2012, 0x000f],
//!  };
//!  let processor = MethodProcessor::new(&pool, &pool, &hierarchy, &options);
//!  let lowered = processor.process(&method).unwrap();
//!  assert_eq!(lowered.encode(), method.insns);
//! ```

#[macro_use]
pub mod dex;
pub mod conversion;
pub mod hierarchy;
pub mod ir;
pub mod items;
pub mod options;
pub mod processor;
pub mod regalloc;
#[cfg(test)]
mod tests;
