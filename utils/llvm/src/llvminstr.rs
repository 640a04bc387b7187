use crate::{llvmop::*, llvmvar::VarType, temp::Temp, LlvmInstrVariant};
use std::fmt::{Debug, Display};
use utils::Label;

pub trait LlvmInstrTrait: Display + Debug {
	fn get_read(&self) -> Vec<Temp> {
		Vec::new()
	}
	fn get_write(&self) -> Option<Temp> {
		None
	}
	fn get_variant(&self) -> LlvmInstrVariant<'_>;
	fn type_valid(&self) -> bool {
		true
	}
	// jump targets, empty for every non-terminator
	fn get_succ(&self) -> Vec<Label> {
		Vec::new()
	}
	fn is_seq(&self) -> bool {
		true
	}
	fn is_ret(&self) -> bool {
		false
	}
	fn is_phi(&self) -> bool {
		false
	}
	fn is_call(&self) -> bool {
		false
	}
	// substitute `value` for every read of `temp`, returns the count replaced
	fn replace_read(&mut self, temp: &Temp, value: &Value) -> usize;
}

#[derive(Debug)]
pub struct ArithInstr {
	pub target: Temp,
	pub op: ArithOp,
	pub var_type: VarType,
	pub lhs: Value,
	pub rhs: Value,
}

#[derive(Debug)]
pub struct CompInstr {
	pub kind: CompKind,
	pub target: Temp,
	pub op: CompOp,
	pub var_type: VarType,
	pub lhs: Value,
	pub rhs: Value,
}

#[derive(Debug)]
pub struct ConvertInstr {
	pub target: Temp,
	pub op: ConvertOp,
	pub from_type: VarType,
	pub lhs: Value,
	pub to_type: VarType,
}

#[derive(Debug)]
pub struct JumpInstr {
	pub target: Label,
}

#[derive(Debug)]
pub struct JumpCondInstr {
	pub var_type: VarType,
	pub cond: Value,
	pub target_true: Label,
	pub target_false: Label,
}

#[derive(Debug)]
pub struct PhiInstr {
	pub target: Temp,
	pub var_type: VarType,
	pub source: Vec<(Value, Label)>,
}

#[derive(Debug)]
pub struct RetInstr {
	pub value: Option<Value>,
}

#[derive(Debug)]
pub struct StoreInstr {
	pub value: Value,
	pub addr: Value,
}

#[derive(Debug)]
pub struct LoadInstr {
	pub target: Temp,
	pub var_type: VarType,
	pub addr: Value,
}

#[derive(Debug)]
pub struct GEPInstr {
	pub target: Temp,
	pub var_type: VarType,
	pub addr: Value,
	pub offset: Value,
}

#[derive(Debug)]
pub struct CallInstr {
	pub target: Option<Temp>,
	pub var_type: VarType,
	pub func: Label,
	pub params: Vec<(VarType, Value)>,
}
