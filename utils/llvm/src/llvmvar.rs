use kernelopt_derive::OpDisplay;

#[derive(OpDisplay, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VarType {
	I1,
	I32,
	I64,
	#[style("float")]
	F32,
	#[style("double")]
	F64,
	Ptr,
	Void,
}

impl VarType {
	pub fn is_int(&self) -> bool {
		matches!(self, Self::I1 | Self::I32 | Self::I64)
	}
	pub fn is_float(&self) -> bool {
		matches!(self, Self::F32 | Self::F64)
	}
	pub fn is_ptr(&self) -> bool {
		matches!(self, Self::Ptr)
	}
	pub fn is_void(&self) -> bool {
		matches!(self, Self::Void)
	}
	pub fn bits(&self) -> u32 {
		match self {
			Self::I1 => 1,
			Self::I32 | Self::F32 => 32,
			Self::I64 | Self::F64 | Self::Ptr => 64,
			Self::Void => 0,
		}
	}
}
