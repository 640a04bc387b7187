use crate::{LlvmCFG, LlvmNode};

use super::{compute_dominator, DomTree, Dominance};

impl DomTree {
	pub fn new(cfg: &LlvmCFG, reverse: bool) -> Self {
		let mut dom_tree = Self {
			reverse,
			..Self::default()
		};
		compute_dominator(
			cfg,
			reverse,
			&mut dom_tree.dominates,
			&mut dom_tree.dom_direct,
			&mut dom_tree.dominator,
		);
		dom_tree
	}
	pub fn get_children(&self, id: i32) -> &[LlvmNode] {
		self.dom_direct.get(&id).map(Vec::as_slice).unwrap_or(&[])
	}
	pub fn get_dominator(&self, id: i32) -> Option<LlvmNode> {
		self.dominator.get(&id).cloned()
	}
}

impl Dominance for DomTree {
	fn dominates(&self, a: &LlvmNode, b: &LlvmNode) -> bool {
		let (a, b) = (a.borrow().id, b.borrow().id);
		self
			.dominates
			.get(&a)
			.map_or(false, |v| v.iter().any(|x| x.borrow().id == b))
	}
}
