use std::{collections::HashMap, collections::HashSet, fmt::Display};

use llvm::{
	ArithOp, CompKind, CompOp, ConvertOp, LlvmInstrTrait, LlvmInstrVariant,
	LlvmTemp, Value,
};
use log::{debug, trace};
use rrvm::program::LlvmFunc;
use utils::MAX_CONDITION_NODES;

use super::{BoundFact, Dimension, EarlyExitBoundAnalysis};

/// The parts of a definition the guard pattern cares about.
enum DefShape {
	Compare {
		kind: CompKind,
		op: CompOp,
		lhs: Value,
		rhs: Value,
		text: String,
	},
	And(Value, Value),
	Add(Value, Value),
	Trunc(Value),
	Load(Value),
	Other(String),
}

/// Snapshot of every definition in a function, keyed by the defined temp.
struct DefTable {
	defs: HashMap<LlvmTemp, DefShape>,
}

impl DefTable {
	fn new(func: &LlvmFunc) -> Self {
		let mut defs = HashMap::new();
		for bb in func.cfg.blocks.iter() {
			let bb = bb.borrow();
			for phi in bb.phi_instrs.iter() {
				defs.entry(phi.target.clone()).or_insert(DefShape::Other(phi.to_string()));
			}
			for instr in bb.instrs.iter() {
				let Some(target) = instr.get_write() else {
					continue;
				};
				let shape = match instr.get_variant() {
					LlvmInstrVariant::CompInstr(i) => DefShape::Compare {
						kind: i.kind,
						op: i.op,
						lhs: i.lhs.clone(),
						rhs: i.rhs.clone(),
						text: i.to_string(),
					},
					LlvmInstrVariant::ArithInstr(i) if i.op == ArithOp::And => {
						DefShape::And(i.lhs.clone(), i.rhs.clone())
					}
					LlvmInstrVariant::ArithInstr(i) if i.op == ArithOp::Add => {
						DefShape::Add(i.lhs.clone(), i.rhs.clone())
					}
					LlvmInstrVariant::ConvertInstr(i) if i.op == ConvertOp::Trunc => {
						DefShape::Trunc(i.lhs.clone())
					}
					LlvmInstrVariant::LoadInstr(i) => DefShape::Load(i.addr.clone()),
					_ => DefShape::Other(instr.to_string()),
				};
				defs.entry(target).or_insert(shape);
			}
		}
		Self { defs }
	}

	fn get(&self, value: &Value) -> Option<&DefShape> {
		value.as_temp().and_then(|v| self.defs.get(v))
	}
}

impl EarlyExitBoundAnalysis<'_> {
	fn latch(&mut self, reason: impl Display) {
		trace!("unsupported guard: {}", reason);
		self.safe_transformation = false;
	}

	/// Walk the AND-tree feeding the branch, left operand first. A failing
	/// operand latches but the rest of the tree is still visited.
	pub(super) fn decompose(&mut self, cond: &Value) {
		let defs = DefTable::new(self.func);
		let mut worklist = vec![cond.clone()];
		let mut visited = HashSet::new();
		let mut budget = MAX_CONDITION_NODES;
		while let Some(value) = worklist.pop() {
			if budget == 0 {
				self.latch(format!(
					"condition has more than {} nodes",
					MAX_CONDITION_NODES
				));
				return;
			}
			budget -= 1;
			let Some(temp) = value.as_temp() else {
				self.latch(format!("constant {} in condition", value));
				continue;
			};
			if !visited.insert(temp.clone()) {
				trace!("{} already classified", temp);
				continue;
			}
			match defs.get(&value) {
				Some(DefShape::Compare {
					kind,
					op,
					lhs,
					rhs,
					text,
				}) => self.classify_compare(&defs, temp, (*kind, *op), lhs, rhs, text),
				Some(DefShape::And(lhs, rhs)) => {
					worklist.push(rhs.clone());
					worklist.push(lhs.clone());
				}
				Some(DefShape::Other(text)) => {
					self.latch(format!("'{}' in condition", text))
				}
				Some(_) => self.latch(format!("{} is not a comparison", temp)),
				None => self.latch(format!("{} has no definition", temp)),
			}
		}
	}

	fn classify_compare(
		&mut self,
		defs: &DefTable,
		compare: &LlvmTemp,
		(kind, op): (CompKind, CompOp),
		lhs: &Value,
		rhs: &Value,
		text: &str,
	) {
		if kind != CompKind::Icmp || !matches!(op, CompOp::ULT | CompOp::SLT) {
			self.latch(format!("unsupported predicate in '{}'", text));
			return;
		}
		if !rhs.as_temp().is_some_and(|v| self.func.is_param(v)) {
			self.latch(format!("bound of '{}' is not a parameter", text));
			return;
		}
		let mut index = defs.get(lhs);
		if let Some(DefShape::Trunc(value)) = index {
			index = defs.get(value);
		}
		let Some(DefShape::Add(a, b)) = index else {
			self.latch(format!("index of '{}' is not an add", text));
			return;
		};
		let mut recognised = false;
		for operand in [a, b] {
			let Some(DefShape::Load(addr)) = defs.get(operand) else {
				continue;
			};
			let dimension =
				addr.as_temp().and_then(|v| self.symbols.dimension_of(&v.name));
			if let Some(dimension) = dimension {
				recognised = true;
				self.record(dimension, compare, rhs, text);
			}
		}
		if !recognised {
			self.latch(format!("index of '{}' loads no local id", text));
		}
	}

	fn record(&mut self, dimension: Dimension, compare: &LlvmTemp, bound: &Value, text: &str) {
		let slot = &mut self.bounds[dimension.index()];
		if slot.is_some() {
			trace!("keeping earlier {} upper bound, ignoring '{}'", dimension, text);
			return;
		}
		debug!("kernel using {} upper bound: {}", dimension, text);
		*slot = Some(BoundFact {
			dimension,
			compare: compare.clone(),
			bound: bound.clone(),
			text: text.to_string(),
			removed: false,
		});
	}
}
