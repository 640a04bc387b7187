mod impls;
mod naive;

use std::collections::HashMap;

pub use naive::*;

use crate::LlvmNode;

/// Anything able to answer "does `a` dominate `b`". Dominance is reflexive.
pub trait Dominance {
	fn dominates(&self, a: &LlvmNode, b: &LlvmNode) -> bool;
}

#[derive(Default)]
pub struct DomTree {
	pub reverse: bool,
	pub dominates: HashMap<i32, Vec<LlvmNode>>,
	pub dominator: HashMap<i32, LlvmNode>,
	pub dom_direct: HashMap<i32, Vec<LlvmNode>>,
}
