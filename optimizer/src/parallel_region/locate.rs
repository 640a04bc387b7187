use std::collections::HashSet;

use llvm::{LlvmInstrTrait, LlvmInstrVariant};
use log::trace;
use rrvm::{dominator::Dominance, region::ParallelRegion, LlvmNode};
use utils::Label;

use super::EarlyExitBranch;

// skip blocks that only jump onwards
fn representative(node: LlvmNode) -> LlvmNode {
	let mut current = node;
	let mut visited = HashSet::new();
	loop {
		let next = {
			let bb = current.borrow();
			if bb.is_forwarding() && visited.insert(bb.id) {
				bb.get_succ()
			} else {
				None
			}
		};
		match next {
			Some(next) => current = next,
			None => return current,
		}
	}
}

fn successor(block: &LlvmNode, label: &Label) -> Option<LlvmNode> {
	block.borrow().succ.iter().find(|v| v.borrow().label == *label).cloned()
}

/// The first conditional branch of the region, provided one of its
/// successors post-dominates it.
pub(super) fn find_early_exit(
	region: &ParallelRegion,
	post_dom_tree: &dyn Dominance,
) -> Option<EarlyExitBranch> {
	let (block, cond, targets) = region.iter().find_map(|bb| {
		let bb_ref = bb.borrow();
		let branch = match bb_ref.jump_instr.as_ref()?.get_variant() {
			LlvmInstrVariant::JumpCondInstr(br) => Some((
				bb.clone(),
				br.cond.clone(),
				[br.target_true.clone(), br.target_false.clone()],
			)),
			_ => None,
		};
		branch
	})?;
	trace!("early exit candidate in block {}", block.borrow().label);
	for target in targets.iter() {
		let exit = representative(successor(&block, target)?);
		if post_dom_tree.dominates(&exit, &block) {
			let exit = exit.borrow().label();
			trace!("block {} post-dominates the candidate", exit);
			return Some(EarlyExitBranch {
				block: block.borrow().label(),
				exit,
				cond,
			});
		}
	}
	trace!("no successor post-dominates the candidate");
	None
}
