use std::fmt::Display;

use utils::Label;

use crate::{LlvmInstr, LlvmTemp, PhiInstr, Value, VarType};

#[derive(Debug)]
pub struct GlobalVar {
	pub ident: String,
	pub var_type: VarType,
	// `None` for external declarations
	pub init: Option<Value>,
}

/// A block straight out of the parser, before the CFG links it up.
#[derive(Debug)]
pub struct ModuleBlock {
	pub label: Label,
	pub phi_instrs: Vec<PhiInstr>,
	pub instrs: Vec<LlvmInstr>,
	pub jump_instr: LlvmInstr,
}

#[derive(Debug)]
pub struct ModuleFunc {
	pub name: String,
	pub ret_type: VarType,
	pub params: Vec<LlvmTemp>,
	pub blocks: Vec<ModuleBlock>,
}

#[derive(Debug, Default)]
pub struct LlvmModule {
	pub global_vars: Vec<GlobalVar>,
	pub funcs: Vec<ModuleFunc>,
}

impl Display for GlobalVar {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match &self.init {
			Some(init) => {
				write!(f, "@{} = global {} {}", self.ident, self.var_type, init)
			}
			None => write!(f, "@{} = external global {}", self.ident, self.var_type),
		}
	}
}

impl GlobalVar {
	pub fn new(ident: impl Display, var_type: VarType, init: Option<Value>) -> Self {
		Self {
			ident: ident.to_string(),
			var_type,
			init,
		}
	}
}
