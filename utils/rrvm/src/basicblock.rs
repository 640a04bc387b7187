use std::{cell::RefCell, fmt::Display, rc::Rc};

use llvm::{LlvmInstr, PhiInstr};
use utils::Label;

pub type Node<T> = Rc<RefCell<BasicBlock<T>>>;

pub struct BasicBlock<T: Display> {
	pub id: i32,
	pub label: Label,
	pub prev: Vec<Node<T>>,
	pub succ: Vec<Node<T>>,
	pub phi_instrs: Vec<PhiInstr>,
	pub instrs: Vec<T>,
	pub jump_instr: Option<T>,
}

impl<T: Display> BasicBlock<T> {
	pub fn new(id: i32, label: Label) -> BasicBlock<T> {
		BasicBlock {
			id,
			label,
			prev: Vec::new(),
			succ: Vec::new(),
			phi_instrs: Vec::new(),
			instrs: Vec::new(),
			jump_instr: None,
		}
	}
	pub fn new_node(id: i32, label: Label) -> Node<T> {
		Rc::new(RefCell::new(Self::new(id, label)))
	}
	pub fn label(&self) -> Label {
		self.label.clone()
	}
	pub fn clear(&mut self) {
		self.prev.clear();
		self.succ.clear();
	}
	pub fn push(&mut self, instr: T) {
		self.instrs.push(instr);
	}
	pub fn push_phi(&mut self, instr: PhiInstr) {
		self.phi_instrs.push(instr);
	}
	pub fn set_jump(&mut self, instr: Option<T>) {
		self.jump_instr = instr;
	}
	/// Number of instructions, terminator and phis included.
	pub fn size(&self) -> usize {
		self.phi_instrs.len()
			+ self.instrs.len()
			+ self.jump_instr.as_ref().map_or(0, |_| 1)
	}
	pub fn single_prev(&self) -> bool {
		self.prev.len() == 1
	}
	pub fn single_succ(&self) -> bool {
		self.succ.len() == 1
	}
	pub fn get_succ(&self) -> Option<Node<T>> {
		match self.succ.as_slice() {
			[succ] => Some(succ.clone()),
			_ => None,
		}
	}
}

impl BasicBlock<LlvmInstr> {
	// a lone unconditional jump with exactly one way in and one way out
	pub fn is_forwarding(&self) -> bool {
		self.size() == 1 && self.single_prev() && self.single_succ()
	}
}

fn instr_format<T: Display>(v: T) -> String {
	format!("  {}", v)
}

fn block_body<T: Display>(bb: &BasicBlock<T>) -> String {
	bb.phi_instrs
		.iter()
		.map(instr_format)
		.chain(bb.instrs.iter().map(instr_format))
		.chain(bb.jump_instr.iter().map(instr_format))
		.collect::<Vec<_>>()
		.join("\n")
}

#[cfg(not(feature = "debug"))]
impl<T: Display> Display for BasicBlock<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		write!(f, "{}:\n{}", self.label, block_body(self))
	}
}

#[cfg(feature = "debug")]
impl<T: Display> Display for BasicBlock<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		let prev: Vec<_> =
			self.prev.iter().map(|v| v.borrow().label.name.clone()).collect();
		let succ: Vec<_> =
			self.succ.iter().map(|v| v.borrow().label.name.clone()).collect();
		write!(
			f,
			"{}: ; id: {} prev: {:?} succ: {:?}\n{}",
			self.label,
			self.id,
			prev,
			succ,
			block_body(self)
		)
	}
}
