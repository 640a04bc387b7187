use basicblock::Node;
use cfg::CFG;
use llvm::LlvmInstr;

pub mod basicblock;
pub mod cfg;
pub mod dominator;
pub mod func;
mod impls;
pub mod program;
pub mod region;

pub type LlvmCFG = CFG<LlvmInstr>;
pub type LlvmNode = Node<LlvmInstr>;
