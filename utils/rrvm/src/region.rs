use std::rc::Rc;

use utils::{errors::Result, KernelError, Label};

use crate::{LlvmCFG, LlvmNode};

/// Ordered set of blocks executed by every work-item of a work-group.
pub struct ParallelRegion {
	blocks: Vec<LlvmNode>,
}

impl ParallelRegion {
	pub fn new(blocks: Vec<LlvmNode>) -> Self {
		Self { blocks }
	}
	pub fn from_cfg(cfg: &LlvmCFG) -> Self {
		Self::new(cfg.blocks.clone())
	}
	pub fn from_labels(cfg: &LlvmCFG, labels: &[Label]) -> Result<Self> {
		let blocks = labels
			.iter()
			.map(|label| {
				cfg
					.get_block(label)
					.ok_or_else(|| KernelError::UndefinedLabel(label.name.clone()))
			})
			.collect::<Result<Vec<_>>>()?;
		Ok(Self::new(blocks))
	}
	pub fn iter(&self) -> impl Iterator<Item = &LlvmNode> {
		self.blocks.iter()
	}
	pub fn len(&self) -> usize {
		self.blocks.len()
	}
	pub fn is_empty(&self) -> bool {
		self.blocks.is_empty()
	}
	pub fn contains(&self, node: &LlvmNode) -> bool {
		self.blocks.iter().any(|v| Rc::ptr_eq(v, node))
	}
}
