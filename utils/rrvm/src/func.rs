use std::{cell::RefCell, fmt::Display, rc::Rc};

use llvm::{
	LlvmInstrTrait, LlvmTemp, LlvmTempManager, ModuleFunc, Value, VarType,
};
use utils::{errors::Result, KernelError};

use crate::{
	cfg::{BasicBlock, CFG},
	program::LlvmFunc,
	LlvmNode,
};

pub struct RrvmFunc<T: Display> {
	pub total: i32,
	pub cfg: CFG<T>,
	pub name: String,
	pub ret_type: VarType,
	pub params: Vec<LlvmTemp>,
	pub temp_mgr: LlvmTempManager,
}

impl<T: Display> RrvmFunc<T> {
	pub fn len(&self) -> usize {
		self.cfg.blocks.iter().map(|v| v.borrow().instrs.len()).sum()
	}
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl LlvmFunc {
	pub fn build_from(func: ModuleFunc) -> Result<Self> {
		let mut temp_mgr = LlvmTempManager::new();
		func.params.iter().for_each(|v| temp_mgr.register(&v.name));
		let mut blocks: Vec<LlvmNode> = Vec::new();
		for (id, block) in func.blocks.into_iter().enumerate() {
			if blocks.iter().any(|v| v.borrow().label == block.label) {
				return Err(KernelError::LlvmSyntaxError(format!(
					"label '%{}' defined twice in '@{}'",
					block.label, func.name
				)));
			}
			let mut bb = BasicBlock::new(id as i32, block.label);
			for phi in block.phi_instrs {
				phi.get_write().iter().for_each(|v| temp_mgr.register(&v.name));
				bb.push_phi(phi);
			}
			for instr in block.instrs {
				instr.get_write().iter().for_each(|v| temp_mgr.register(&v.name));
				bb.push(instr);
			}
			bb.set_jump(Some(block.jump_instr));
			blocks.push(Rc::new(RefCell::new(bb)));
		}
		let cfg = CFG::new(blocks);
		cfg.resolve_edges()?;
		Ok(Self {
			total: cfg.size() as i32,
			cfg,
			name: func.name,
			ret_type: func.ret_type,
			params: func.params,
			temp_mgr,
		})
	}
	pub fn is_param(&self, temp: &LlvmTemp) -> bool {
		!temp.is_global && self.params.iter().any(|v| v == temp)
	}
	/// The block holding the definition of `temp`, if any.
	pub fn get_def(&self, temp: &LlvmTemp) -> Option<LlvmNode> {
		self
			.cfg
			.blocks
			.iter()
			.find(|bb| {
				let bb = bb.borrow();
				bb.phi_instrs.iter().any(|v| v.get_write().as_ref() == Some(temp))
					|| bb.instrs.iter().any(|v| v.get_write().as_ref() == Some(temp))
			})
			.cloned()
	}
	pub fn new_temp(&mut self, prefix: &str, var_type: VarType) -> LlvmTemp {
		self.temp_mgr.new_temp_with_prefix(prefix, var_type)
	}
	/// Rewrite every read of `temp` to `value`, returns the number of operands
	/// touched.
	pub fn replace_temp_with_value(&self, temp: &LlvmTemp, value: &Value) -> usize {
		let mut count = 0;
		for bb in self.cfg.blocks.iter() {
			let bb = &mut *bb.borrow_mut();
			for phi in bb.phi_instrs.iter_mut() {
				count += phi.replace_read(temp, value);
			}
			for instr in bb.instrs.iter_mut() {
				count += instr.replace_read(temp, value);
			}
			if let Some(jump) = bb.jump_instr.as_mut() {
				count += jump.replace_read(temp, value);
			}
		}
		count
	}
	pub fn erase_def(&self, temp: &LlvmTemp) -> bool {
		for bb in self.cfg.blocks.iter() {
			let bb = &mut *bb.borrow_mut();
			let before = bb.phi_instrs.len() + bb.instrs.len();
			bb.phi_instrs.retain(|v| v.get_write().as_ref() != Some(temp));
			bb.instrs.retain(|v| v.get_write().as_ref() != Some(temp));
			if bb.phi_instrs.len() + bb.instrs.len() != before {
				return true;
			}
		}
		false
	}
	/// Delete the instruction defining `temp` and hand its uses `value`.
	/// Returns false when nothing defines `temp`.
	pub fn replace_instr_with_value(&self, temp: &LlvmTemp, value: Value) -> bool {
		if !self.erase_def(temp) {
			return false;
		}
		self.replace_temp_with_value(temp, &value);
		true
	}
}
