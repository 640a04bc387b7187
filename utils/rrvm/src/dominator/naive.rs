// naive algorithm computing dominator tree with complexity O(n*m)
// Ref: https://blog.csdn.net/Dong_HFUT/article/details/121375025

use std::collections::{HashMap, HashSet, VecDeque};

use log::trace;

use crate::{LlvmCFG, LlvmNode};

fn dominates_id(dominates: &HashMap<i32, Vec<LlvmNode>>, a: i32, b: i32) -> bool {
	dominates.get(&a).map_or(false, |v| v.iter().any(|x| x.borrow().id == b))
}

/// `reverse` computes post-dominance. Every block without successors acts as
/// an exit, so removing one exit still leaves the others as roots.
pub fn compute_dominator(
	cfg: &LlvmCFG,
	reverse: bool,
	dominates: &mut HashMap<i32, Vec<LlvmNode>>,
	dominates_directly: &mut HashMap<i32, Vec<LlvmNode>>,
	dominator: &mut HashMap<i32, LlvmNode>,
) {
	let roots = if reverse {
		cfg.get_exits()
	} else {
		cfg.get_entry().into_iter().collect()
	};
	for bb in cfg.blocks.iter() {
		// blocks unreachable once `bb` is gone are the ones it dominates
		let to_be_removed = bb.borrow().id;

		let mut reachable = HashSet::new();
		let mut worklist: VecDeque<LlvmNode> = roots
			.iter()
			.filter(|v| v.borrow().id != to_be_removed)
			.cloned()
			.collect();
		while let Some(node) = worklist.pop_front() {
			if !reachable.insert(node.borrow().id) {
				continue;
			}
			let node = node.borrow();
			let next = if reverse { &node.prev } else { &node.succ };
			for v in next.iter() {
				if v.borrow().id != to_be_removed {
					worklist.push_back(v.clone());
				}
			}
		}
		let entry = dominates.entry(to_be_removed).or_default();
		cfg.blocks.iter().for_each(|bb_inner| {
			if !reachable.contains(&bb_inner.borrow().id) {
				entry.push(bb_inner.clone());
			}
		});
	}
	for bb in cfg.blocks.iter() {
		let bb_id = bb.borrow().id;
		let Some(dominated) = dominates.get(&bb_id) else {
			continue;
		};
		for bb_inner in dominated.iter() {
			let bb_inner_id = bb_inner.borrow().id;
			if bb_inner_id == bb_id {
				continue;
			}
			match dominator.get(&bb_inner_id).map(|v| v.borrow().id) {
				None => {
					dominates_directly.entry(bb_id).or_default().push(bb_inner.clone());
					dominator.insert(bb_inner_id, bb.clone());
				}
				// bb sits between bb_inner and its current candidate
				Some(old) if dominates_id(dominates, old, bb_id) => {
					dominates_directly.entry(bb_id).or_default().push(bb_inner.clone());
					dominates_directly
						.entry(old)
						.or_default()
						.retain(|x| x.borrow().id != bb_inner_id);
					dominator.insert(bb_inner_id, bb.clone());
				}
				Some(_) => {}
			}
		}
	}
	dominator.iter().for_each(|(k, v)| {
		trace!(
			"{} {}: {}",
			if reverse { "post dominator" } else { "dominator" },
			k,
			v.borrow().id
		);
	});
}
