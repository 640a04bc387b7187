pub mod llvminstr;
pub mod llvmop;
pub mod llvmvar;
pub mod module;
pub mod parser;
pub mod temp;

mod impls;
mod utils_llvm;

pub use llvminstr::*;
pub use llvmop::*;
pub use llvmvar::*;
pub use module::*;
pub use temp::*;
pub use utils_llvm::*;

pub type LlvmInstr = Box<dyn LlvmInstrTrait>;
pub type LlvmTemp = Temp;
pub type LlvmTempManager = TempManager;

pub enum LlvmInstrVariant<'a> {
	ArithInstr(&'a ArithInstr),
	CompInstr(&'a CompInstr),
	ConvertInstr(&'a ConvertInstr),
	JumpInstr(&'a JumpInstr),
	JumpCondInstr(&'a JumpCondInstr),
	PhiInstr(&'a PhiInstr),
	RetInstr(&'a RetInstr),
	StoreInstr(&'a StoreInstr),
	LoadInstr(&'a LoadInstr),
	GEPInstr(&'a GEPInstr),
	CallInstr(&'a CallInstr),
}
