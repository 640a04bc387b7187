use std::fmt::Display;

use llvm::{parser, GlobalVar, LlvmInstr, LlvmModule};
use utils::{errors::Result, KernelError};

use crate::func::RrvmFunc;

pub type LlvmFunc = RrvmFunc<LlvmInstr>;
pub type LlvmProgram = RrvmProgram<LlvmInstr>;

pub struct RrvmProgram<T: Display> {
	pub global_vars: Vec<GlobalVar>,
	pub funcs: Vec<RrvmFunc<T>>,
}

impl LlvmProgram {
	pub fn build_from(module: LlvmModule) -> Result<Self> {
		let funcs = module
			.funcs
			.into_iter()
			.map(LlvmFunc::build_from)
			.collect::<Result<Vec<_>>>()?;
		Ok(Self {
			global_vars: module.global_vars,
			funcs,
		})
	}
	pub fn parse(src: &str) -> Result<Self> {
		Self::build_from(parser::parse(src)?)
	}
	pub fn get_func(&self, name: &str) -> Result<&LlvmFunc> {
		self
			.funcs
			.iter()
			.find(|v| v.name == name)
			.ok_or_else(|| KernelError::MissingFunction(name.to_string()))
	}
	pub fn get_func_mut(&mut self, name: &str) -> Result<&mut LlvmFunc> {
		self
			.funcs
			.iter_mut()
			.find(|v| v.name == name)
			.ok_or_else(|| KernelError::MissingFunction(name.to_string()))
	}
}
