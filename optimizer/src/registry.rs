use log::trace;
use rrvm::program::LlvmProgram;
use utils::{errors::Result, KernelError};

use crate::{FunctionPass, PassInfo, TransformFMulAddIntrinsic};

pub struct PassEntry {
	pub name: &'static str,
	pub description: &'static str,
	create: fn() -> Box<dyn FunctionPass>,
}

#[derive(Default)]
pub struct PassRegistry {
	passes: Vec<PassEntry>,
}

impl PassRegistry {
	pub fn new() -> Self {
		Self::default()
	}
	/// Every pass this crate provides.
	pub fn with_default_passes() -> Self {
		let mut registry = Self::new();
		registry.register::<TransformFMulAddIntrinsic>();
		registry
	}
	pub fn register<P>(&mut self)
	where
		P: FunctionPass + PassInfo + Default + 'static,
	{
		self.passes.retain(|v| v.name != P::pass_name());
		self.passes.push(PassEntry {
			name: P::pass_name(),
			description: P::pass_description(),
			create: || Box::new(P::default()),
		});
	}
	pub fn passes(&self) -> &[PassEntry] {
		&self.passes
	}
	pub fn create(&self, name: &str) -> Result<Box<dyn FunctionPass>> {
		self
			.passes
			.iter()
			.find(|v| v.name == name)
			.map(|v| (v.create)())
			.ok_or_else(|| KernelError::UnknownPass(name.to_string()))
	}
	/// Run the pass called `name` over every function of `program`.
	pub fn run(&self, name: &str, program: &mut LlvmProgram) -> Result<bool> {
		let mut pass = self.create(name)?;
		let mut changed = false;
		for func in program.funcs.iter_mut() {
			let func_changed = pass.run_on_function(func);
			trace!("{} on @{}: changed = {}", name, func.name, func_changed);
			changed |= func_changed;
		}
		Ok(changed)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn lookup_by_name() {
		let registry = PassRegistry::with_default_passes();
		assert_eq!(registry.passes().len(), 1);
		assert_eq!(
			registry.passes()[0].description,
			"Transform llvm.fmuladd intrinsic to fmul and fadd instructions"
		);
		assert!(registry.create("transform-fmuladd-intrinsic").is_ok());
		assert!(matches!(
			registry.create("licm"),
			Err(KernelError::UnknownPass(name)) if name == "licm"
		));
	}

	#[test]
	fn run_by_name() {
		let mut program = LlvmProgram::parse(
			"define float @f(float %a) {
entry:
  %r = call float @llvm.fmuladd.f32(float %a, float %a, float %a)
  ret float %r
}",
		)
		.unwrap();
		let registry = PassRegistry::with_default_passes();
		assert!(registry.run("transform-fmuladd-intrinsic", &mut program).unwrap());
		assert!(!registry.run("transform-fmuladd-intrinsic", &mut program).unwrap());
	}

	#[derive(Default)]
	struct Nop;

	impl FunctionPass for Nop {
		fn run_on_function(&mut self, _func: &mut rrvm::program::LlvmFunc) -> bool {
			false
		}
	}

	impl PassInfo for Nop {
		fn pass_name() -> &'static str {
			"nop"
		}
		fn pass_description() -> &'static str {
			"Do nothing"
		}
	}

	#[test]
	fn re_registering_replaces() {
		let mut registry = PassRegistry::new();
		registry.register::<Nop>();
		registry.register::<Nop>();
		assert_eq!(registry.passes().len(), 1);
		assert!(!registry.create("nop").unwrap().preserves_cfg());
	}
}
