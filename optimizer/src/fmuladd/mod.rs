mod impls;

use kernelopt_derive::RegisteredPass;

use crate::PassInfo;

/// Lowers `llvm.fmuladd.*` calls to a separate `fmul` and `fadd`.
#[derive(Default, RegisteredPass)]
#[pass(
	name = "transform-fmuladd-intrinsic",
	description = "Transform llvm.fmuladd intrinsic to fmul and fadd instructions"
)]
pub struct TransformFMulAddIntrinsic {}
