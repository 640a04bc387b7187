use llvm::{
	ArithInstr, ArithOp, LlvmInstr, LlvmInstrTrait, LlvmInstrVariant, LlvmTemp,
	Value, VarType,
};
use log::debug;
use rrvm::program::LlvmFunc;
use utils::FMULADD_INTRINSIC_PREFIX;

use super::TransformFMulAddIntrinsic;
use crate::FunctionPass;

struct FMulAdd {
	target: LlvmTemp,
	var_type: VarType,
	a: Value,
	b: Value,
	c: Value,
}

fn as_fmuladd(instr: &LlvmInstr) -> Option<FMulAdd> {
	let LlvmInstrVariant::CallInstr(call) = instr.get_variant() else {
		return None;
	};
	if !call.func.name.starts_with(FMULADD_INTRINSIC_PREFIX) {
		return None;
	}
	match (call.target.as_ref(), call.params.as_slice()) {
		(Some(target), [(_, a), (_, b), (_, c)]) => Some(FMulAdd {
			target: target.clone(),
			var_type: call.var_type,
			a: a.clone(),
			b: b.clone(),
			c: c.clone(),
		}),
		_ => None,
	}
}

impl FunctionPass for TransformFMulAddIntrinsic {
	fn run_on_function(&mut self, func: &mut LlvmFunc) -> bool {
		let mut changed = false;
		for bb in func.cfg.blocks.clone().iter() {
			let instrs = std::mem::take(&mut bb.borrow_mut().instrs);
			let mut new_instrs = Vec::with_capacity(instrs.len());
			for instr in instrs {
				let Some(call) = as_fmuladd(&instr) else {
					new_instrs.push(instr);
					continue;
				};
				debug!("replacing llvm.fmuladd.* intrinsic with fmul and fadd instructions");
				// the add takes over the call's name so its uses stay valid
				let product = func.new_temp("fmul", call.var_type);
				new_instrs.push(ArithInstr::new(
					product.clone(),
					call.a,
					ArithOp::Fmul,
					call.b,
					call.var_type,
				));
				new_instrs.push(ArithInstr::new(
					call.target,
					product,
					ArithOp::Fadd,
					call.c,
					call.var_type,
				));
				changed = true;
			}
			bb.borrow_mut().instrs = new_instrs;
		}
		changed
	}
	fn preserves_cfg(&self) -> bool {
		true
	}
}
