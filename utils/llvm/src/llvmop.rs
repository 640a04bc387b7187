use std::fmt::Display;

use kernelopt_derive::OpDisplay;

use crate::{llvmvar::VarType, temp::Temp};

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
	Bool(bool),
	Int(i32),
	Long(i64),
	Float(f32),
	Double(f64),
	Temp(Temp),
}

pub trait LlvmOp: Display {
	// whether the operator can take operands of `var_type`
	fn accepts(&self, var_type: VarType) -> bool;
}

#[derive(OpDisplay, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArithOp {
	Add,
	Sub,
	Mul,
	// signed division
	#[style("sdiv")]
	Div,
	// signed modulo
	#[style("srem")]
	Rem,
	// Float add
	Fadd,
	// Float sub
	Fsub,
	// Float mul
	Fmul,
	// Float div
	Fdiv,
	// Float modulo
	Frem,
	// shift left
	Shl,
	// logical shift right
	Lshr,
	// arithmetic shift right
	Ashr,
	And,
	Or,
	Xor,
}

#[derive(OpDisplay, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompOp {
	EQ,
	NE,
	// unsigned greater than
	UGT,
	// unsigned greater or equal
	UGE,
	// unsigned less than
	ULT,
	// unsigned less or equal
	ULE,
	// signed greater than
	SGT,
	// signed greater or equal
	SGE,
	// signed less than
	SLT,
	// signed less or equal
	SLE,
	// ordered and equal
	OEQ,
	// ordered and not equal
	ONE,
	// ordered and greater than
	OGT,
	// ordered and greater or equal
	OGE,
	// ordered and less than
	OLT,
	// ordered and less or equal
	OLE,
}

#[derive(OpDisplay, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompKind {
	Icmp,
	Fcmp,
}

#[derive(OpDisplay, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConvertOp {
	Trunc,
	Zext,
	Sext,
	Sitofp,
	Fptosi,
}

impl Value {
	pub fn get_type(&self) -> VarType {
		match self {
			Self::Bool(_) => VarType::I1,
			Self::Int(_) => VarType::I32,
			Self::Long(_) => VarType::I64,
			Self::Float(_) => VarType::F32,
			Self::Double(_) => VarType::F64,
			Self::Temp(v) => v.var_type,
		}
	}
	pub fn is_constant(&self) -> bool {
		!matches!(self, Self::Temp(_))
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::Bool(v) => write!(f, "{}", v),
			Self::Int(v) => write!(f, "{}", v),
			Self::Long(v) => write!(f, "{}", v),
			Self::Float(v) => write!(f, "{:?}", v),
			Self::Double(v) => write!(f, "{:?}", v),
			Self::Temp(v) => write!(f, "{}", v),
		}
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Value::Bool(value)
	}
}

impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Value::Int(value)
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Value::Long(value)
	}
}

impl From<Temp> for Value {
	fn from(value: Temp) -> Self {
		Value::Temp(value)
	}
}

impl From<&Temp> for Value {
	fn from(value: &Temp) -> Self {
		Value::Temp(value.clone())
	}
}

impl LlvmOp for ArithOp {
	fn accepts(&self, var_type: VarType) -> bool {
		match self {
			Self::Fadd | Self::Fsub | Self::Fmul | Self::Fdiv | Self::Frem => {
				var_type.is_float()
			}
			_ => var_type.is_int(),
		}
	}
}

impl LlvmOp for CompOp {
	fn accepts(&self, var_type: VarType) -> bool {
		match self {
			Self::OEQ | Self::ONE | Self::OGT | Self::OGE | Self::OLT | Self::OLE => {
				var_type.is_float()
			}
			_ => var_type.is_int() || var_type.is_ptr(),
		}
	}
}

impl LlvmOp for CompKind {
	fn accepts(&self, var_type: VarType) -> bool {
		match self {
			Self::Icmp => var_type.is_int() || var_type.is_ptr(),
			Self::Fcmp => var_type.is_float(),
		}
	}
}

impl LlvmOp for ConvertOp {
	fn accepts(&self, var_type: VarType) -> bool {
		match self {
			Self::Trunc | Self::Zext | Self::Sext | Self::Sitofp => var_type.is_int(),
			Self::Fptosi => var_type.is_float(),
		}
	}
}
