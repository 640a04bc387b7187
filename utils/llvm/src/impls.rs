use std::fmt::Display;

use utils::Label;

use crate::{
	llvminstr::*, llvmop::*, llvmvar::VarType, temp::Temp, utils_llvm::*,
	LlvmInstr, LlvmInstrVariant,
};

impl Display for ArithInstr {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(
			f,
			"{} = {} {} {}, {}",
			self.target, self.op, self.var_type, self.lhs, self.rhs
		)
	}
}

impl LlvmInstrTrait for ArithInstr {
	fn get_read(&self) -> Vec<Temp> {
		unwrap_values(vec![&self.lhs, &self.rhs])
	}
	fn get_write(&self) -> Option<Temp> {
		Some(self.target.clone())
	}
	fn get_variant(&self) -> LlvmInstrVariant<'_> {
		LlvmInstrVariant::ArithInstr(self)
	}
	fn type_valid(&self) -> bool {
		self.op.accepts(self.var_type)
			&& all_equal(&[
				self.var_type,
				self.target.var_type,
				self.lhs.get_type(),
				self.rhs.get_type(),
			])
	}
	fn replace_read(&mut self, temp: &Temp, value: &Value) -> usize {
		replace_value(&mut self.lhs, temp, value)
			+ replace_value(&mut self.rhs, temp, value)
	}
}

impl ArithInstr {
	pub fn new(
		target: Temp,
		lhs: impl Into<Value>,
		op: ArithOp,
		rhs: impl Into<Value>,
		var_type: VarType,
	) -> LlvmInstr {
		Box::new(Self {
			target,
			op,
			var_type,
			lhs: lhs.into(),
			rhs: rhs.into(),
		})
	}
}

impl Display for CompInstr {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(
			f,
			"{} = {} {} {} {}, {}",
			self.target, self.kind, self.op, self.var_type, self.lhs, self.rhs
		)
	}
}

impl LlvmInstrTrait for CompInstr {
	fn get_read(&self) -> Vec<Temp> {
		unwrap_values(vec![&self.lhs, &self.rhs])
	}
	fn get_write(&self) -> Option<Temp> {
		Some(self.target.clone())
	}
	fn get_variant(&self) -> LlvmInstrVariant<'_> {
		LlvmInstrVariant::CompInstr(self)
	}
	fn type_valid(&self) -> bool {
		self.kind.accepts(self.var_type)
			&& self.op.accepts(self.var_type)
			&& self.target.var_type == VarType::I1
			&& all_equal(&[self.var_type, self.lhs.get_type(), self.rhs.get_type()])
	}
	fn replace_read(&mut self, temp: &Temp, value: &Value) -> usize {
		replace_value(&mut self.lhs, temp, value)
			+ replace_value(&mut self.rhs, temp, value)
	}
}

impl Display for ConvertInstr {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(
			f,
			"{} = {} {} {} to {}",
			self.target, self.op, self.from_type, self.lhs, self.to_type
		)
	}
}

impl LlvmInstrTrait for ConvertInstr {
	fn get_read(&self) -> Vec<Temp> {
		unwrap_values(vec![&self.lhs])
	}
	fn get_write(&self) -> Option<Temp> {
		Some(self.target.clone())
	}
	fn get_variant(&self) -> LlvmInstrVariant<'_> {
		LlvmInstrVariant::ConvertInstr(self)
	}
	fn type_valid(&self) -> bool {
		let (from, to) = (self.from_type, self.to_type);
		let shape = match self.op {
			ConvertOp::Trunc => from.is_int() && to.is_int() && from.bits() > to.bits(),
			ConvertOp::Zext | ConvertOp::Sext => {
				from.is_int() && to.is_int() && from.bits() < to.bits()
			}
			ConvertOp::Sitofp => from.is_int() && to.is_float(),
			ConvertOp::Fptosi => from.is_float() && to.is_int(),
		};
		shape
			&& self.target.var_type == to
			&& self.lhs.get_type() == from
			&& self.op.accepts(from)
	}
	fn replace_read(&mut self, temp: &Temp, value: &Value) -> usize {
		replace_value(&mut self.lhs, temp, value)
	}
}

impl Display for JumpInstr {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "br label %{}", self.target)
	}
}

impl LlvmInstrTrait for JumpInstr {
	fn get_variant(&self) -> LlvmInstrVariant<'_> {
		LlvmInstrVariant::JumpInstr(self)
	}
	fn get_succ(&self) -> Vec<Label> {
		vec![self.target.clone()]
	}
	fn is_seq(&self) -> bool {
		false
	}
	fn replace_read(&mut self, _temp: &Temp, _value: &Value) -> usize {
		0
	}
}

impl Display for JumpCondInstr {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(
			f,
			"br {} {}, label %{}, label %{}",
			self.var_type, self.cond, self.target_true, self.target_false
		)
	}
}

impl LlvmInstrTrait for JumpCondInstr {
	fn get_read(&self) -> Vec<Temp> {
		unwrap_values(vec![&self.cond])
	}
	fn get_variant(&self) -> LlvmInstrVariant<'_> {
		LlvmInstrVariant::JumpCondInstr(self)
	}
	fn type_valid(&self) -> bool {
		self.var_type == VarType::I1 && self.cond.get_type() == VarType::I1
	}
	fn get_succ(&self) -> Vec<Label> {
		vec![self.target_true.clone(), self.target_false.clone()]
	}
	fn is_seq(&self) -> bool {
		false
	}
	fn replace_read(&mut self, temp: &Temp, value: &Value) -> usize {
		replace_value(&mut self.cond, temp, value)
	}
}

impl Display for PhiInstr {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		let source = self
			.source
			.iter()
			.map(|(value, label)| format!("[ {}, %{} ]", value, label))
			.collect::<Vec<_>>()
			.join(", ");
		write!(f, "{} = phi {} {}", self.target, self.var_type, source)
	}
}

impl LlvmInstrTrait for PhiInstr {
	fn get_read(&self) -> Vec<Temp> {
		unwrap_values(self.source.iter().map(|(v, _)| v).collect())
	}
	fn get_write(&self) -> Option<Temp> {
		Some(self.target.clone())
	}
	fn get_variant(&self) -> LlvmInstrVariant<'_> {
		LlvmInstrVariant::PhiInstr(self)
	}
	fn type_valid(&self) -> bool {
		self.source.iter().all(|(v, _)| v.get_type() == self.var_type)
	}
	fn is_phi(&self) -> bool {
		true
	}
	fn replace_read(&mut self, temp: &Temp, value: &Value) -> usize {
		self
			.source
			.iter_mut()
			.map(|(v, _)| replace_value(v, temp, value))
			.sum()
	}
}

impl Display for RetInstr {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match &self.value {
			Some(value) => write!(f, "ret {} {}", value.get_type(), value),
			None => write!(f, "ret void"),
		}
	}
}

impl LlvmInstrTrait for RetInstr {
	fn get_read(&self) -> Vec<Temp> {
		self.value.iter().flat_map(|v| v.unwrap_temp()).collect()
	}
	fn get_variant(&self) -> LlvmInstrVariant<'_> {
		LlvmInstrVariant::RetInstr(self)
	}
	fn is_seq(&self) -> bool {
		false
	}
	fn is_ret(&self) -> bool {
		true
	}
	fn replace_read(&mut self, temp: &Temp, value: &Value) -> usize {
		self.value.as_mut().map_or(0, |v| replace_value(v, temp, value))
	}
}

impl Display for StoreInstr {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(
			f,
			"store {} {}, ptr {}",
			self.value.get_type(),
			self.value,
			self.addr
		)
	}
}

impl LlvmInstrTrait for StoreInstr {
	fn get_read(&self) -> Vec<Temp> {
		unwrap_values(vec![&self.value, &self.addr])
	}
	fn get_variant(&self) -> LlvmInstrVariant<'_> {
		LlvmInstrVariant::StoreInstr(self)
	}
	fn type_valid(&self) -> bool {
		self.addr.get_type().is_ptr()
	}
	fn replace_read(&mut self, temp: &Temp, value: &Value) -> usize {
		replace_value(&mut self.value, temp, value)
			+ replace_value(&mut self.addr, temp, value)
	}
}

impl Display for LoadInstr {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "{} = load {}, ptr {}", self.target, self.var_type, self.addr)
	}
}

impl LlvmInstrTrait for LoadInstr {
	fn get_read(&self) -> Vec<Temp> {
		unwrap_values(vec![&self.addr])
	}
	fn get_write(&self) -> Option<Temp> {
		Some(self.target.clone())
	}
	fn get_variant(&self) -> LlvmInstrVariant<'_> {
		LlvmInstrVariant::LoadInstr(self)
	}
	fn type_valid(&self) -> bool {
		self.addr.get_type().is_ptr() && self.target.var_type == self.var_type
	}
	fn replace_read(&mut self, temp: &Temp, value: &Value) -> usize {
		replace_value(&mut self.addr, temp, value)
	}
}

impl Display for GEPInstr {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(
			f,
			"{} = getelementptr {}, ptr {}, {} {}",
			self.target,
			self.var_type,
			self.addr,
			self.offset.get_type(),
			self.offset
		)
	}
}

impl LlvmInstrTrait for GEPInstr {
	fn get_read(&self) -> Vec<Temp> {
		unwrap_values(vec![&self.addr, &self.offset])
	}
	fn get_write(&self) -> Option<Temp> {
		Some(self.target.clone())
	}
	fn get_variant(&self) -> LlvmInstrVariant<'_> {
		LlvmInstrVariant::GEPInstr(self)
	}
	fn type_valid(&self) -> bool {
		self.addr.get_type().is_ptr()
			&& self.target.var_type.is_ptr()
			&& self.offset.get_type().is_int()
	}
	fn replace_read(&mut self, temp: &Temp, value: &Value) -> usize {
		replace_value(&mut self.addr, temp, value)
			+ replace_value(&mut self.offset, temp, value)
	}
}

impl Display for CallInstr {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		let params = self
			.params
			.iter()
			.map(|(var_type, value)| format!("{} {}", var_type, value))
			.collect::<Vec<_>>()
			.join(", ");
		if let Some(target) = &self.target {
			write!(f, "{} = ", target)?;
		}
		write!(f, "call {} @{}({})", self.var_type, self.func, params)
	}
}

impl LlvmInstrTrait for CallInstr {
	fn get_read(&self) -> Vec<Temp> {
		unwrap_values(self.params.iter().map(|(_, v)| v).collect())
	}
	fn get_write(&self) -> Option<Temp> {
		self.target.clone()
	}
	fn get_variant(&self) -> LlvmInstrVariant<'_> {
		LlvmInstrVariant::CallInstr(self)
	}
	fn type_valid(&self) -> bool {
		self.target.is_some() != self.var_type.is_void()
			&& self.params.iter().all(|(t, v)| *t == v.get_type())
	}
	fn is_call(&self) -> bool {
		true
	}
	fn replace_read(&mut self, temp: &Temp, value: &Value) -> usize {
		self
			.params
			.iter_mut()
			.map(|(_, v)| replace_value(v, temp, value))
			.sum()
	}
}
