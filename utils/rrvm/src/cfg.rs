use std::{fmt::Display, rc::Rc};

use llvm::{LlvmInstr, LlvmInstrTrait};
use utils::{errors::Result, KernelError, Label};

pub use crate::basicblock::{BasicBlock, Node};

pub struct CFG<T: Display> {
	pub blocks: Vec<Node<T>>,
}

impl<T: Display> CFG<T> {
	pub fn new(blocks: Vec<Node<T>>) -> Self {
		Self { blocks }
	}
	pub fn get_entry(&self) -> Option<Node<T>> {
		self.blocks.first().cloned()
	}
	/// Blocks without successors, in block order.
	pub fn get_exits(&self) -> Vec<Node<T>> {
		self.blocks.iter().filter(|v| v.borrow().succ.is_empty()).cloned().collect()
	}
	pub fn get_block(&self, label: &Label) -> Option<Node<T>> {
		self.blocks.iter().find(|v| v.borrow().label == *label).cloned()
	}
	pub fn size(&self) -> usize {
		self.blocks.len()
	}
}

pub fn link_node<T: Display>(from: &Node<T>, to: &Node<T>) {
	if from.borrow().succ.iter().any(|v| Rc::ptr_eq(v, to)) {
		return;
	}
	from.borrow_mut().succ.push(to.clone());
	to.borrow_mut().prev.push(from.clone());
}

impl CFG<LlvmInstr> {
	/// Rebuild every `prev`/`succ` list from the terminators.
	pub fn resolve_edges(&self) -> Result<()> {
		self.blocks.iter().for_each(|v| v.borrow_mut().clear());
		for bb in self.blocks.iter() {
			let targets =
				bb.borrow().jump_instr.as_ref().map_or(Vec::new(), |v| v.get_succ());
			for label in targets {
				let succ = self
					.get_block(&label)
					.ok_or_else(|| KernelError::UndefinedLabel(label.name.clone()))?;
				link_node(bb, &succ);
			}
		}
		Ok(())
	}
}
