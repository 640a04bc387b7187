mod fmuladd;
pub mod parallel_region;
mod registry;

use rrvm::program::{LlvmFunc, LlvmProgram};
use utils::errors::Result;

pub use fmuladd::TransformFMulAddIntrinsic;
pub use registry::{PassEntry, PassRegistry};

pub trait RrvmOptimizer {
	fn new() -> Self;
	fn apply(self, program: &mut LlvmProgram) -> Result<bool>;
}

/// A transformation run on one function at a time.
pub trait FunctionPass {
	/// Returns whether `func` changed.
	fn run_on_function(&mut self, func: &mut LlvmFunc) -> bool;
	fn preserves_cfg(&self) -> bool {
		false
	}
}

/// Name and description a pass is registered under, see
/// `#[derive(RegisteredPass)]`.
pub trait PassInfo {
	fn pass_name() -> &'static str;
	fn pass_description() -> &'static str;
}

impl<P: FunctionPass + Default> RrvmOptimizer for P {
	fn new() -> Self {
		Self::default()
	}
	fn apply(mut self, program: &mut LlvmProgram) -> Result<bool> {
		Ok(program
			.funcs
			.iter_mut()
			.fold(false, |changed, func| self.run_on_function(func) || changed))
	}
}
