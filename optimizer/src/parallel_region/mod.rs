//! Early-exit bound analysis.
//!
//! Work-group kernels usually start with a guard such as
//! `if (get_local_id(0) < n) { ... }`. Once the region is replicated for
//! every work-item, that comparison against the local id is redundant when
//! the launch never exceeds `n`. This analysis finds the guard, checks that
//! it has a shape we fully understand and records which dimension is bounded
//! by which kernel parameter. Only two calls ever modify the IR:
//! [`EarlyExitBoundAnalysis::remove_x_upper_bound`] and
//! [`EarlyExitBoundAnalysis::remove_y_upper_bound`].

mod condition;
mod locate;
#[cfg(test)]
mod tests;

use kernelopt_derive::OpDisplay;
use llvm::{LlvmTemp, Value};
use log::{info, warn};
use rrvm::{dominator::Dominance, program::LlvmFunc, region::ParallelRegion};
use utils::{Label, LOCAL_ID_X_GLOBAL, LOCAL_ID_Y_GLOBAL, LOCAL_ID_Z_GLOBAL};

#[derive(OpDisplay, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dimension {
	X,
	Y,
	Z,
}

impl Dimension {
	pub const ALL: [Dimension; 3] = [Dimension::X, Dimension::Y, Dimension::Z];

	fn index(self) -> usize {
		match self {
			Dimension::X => 0,
			Dimension::Y => 1,
			Dimension::Z => 2,
		}
	}
}

/// Names of the globals holding the work-item's local id, one per dimension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexSymbols {
	pub x: String,
	pub y: String,
	pub z: String,
}

impl Default for IndexSymbols {
	fn default() -> Self {
		Self::new(LOCAL_ID_X_GLOBAL, LOCAL_ID_Y_GLOBAL, LOCAL_ID_Z_GLOBAL)
	}
}

impl IndexSymbols {
	pub fn new(x: impl Into<String>, y: impl Into<String>, z: impl Into<String>) -> Self {
		Self {
			x: x.into(),
			y: y.into(),
			z: z.into(),
		}
	}
	pub fn dimension_of(&self, name: &str) -> Option<Dimension> {
		Dimension::ALL.into_iter().find(|&v| self.symbol(v) == name)
	}
	pub fn symbol(&self, dimension: Dimension) -> &str {
		match dimension {
			Dimension::X => &self.x,
			Dimension::Y => &self.y,
			Dimension::Z => &self.z,
		}
	}
}

/// A comparison `index(dimension) < bound` guarding the early exit.
#[derive(Clone, Debug)]
pub struct BoundFact {
	pub dimension: Dimension,
	pub compare: LlvmTemp,
	pub bound: Value,
	// the comparison as printed when it was found
	pub text: String,
	removed: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EarlyExitBranch {
	pub block: Label,
	pub exit: Label,
	pub cond: Value,
}

#[derive(OpDisplay, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardStatus {
	#[style("no early exit")]
	NoEarlyExit,
	#[style("not understood")]
	Unsupported,
	Understood,
}

pub struct EarlyExitBoundAnalysis<'a> {
	region: &'a ParallelRegion,
	func: &'a LlvmFunc,
	symbols: IndexSymbols,
	early_exit: Option<EarlyExitBranch>,
	bounds: [Option<BoundFact>; 3],
	safe_transformation: bool,
}

impl<'a> EarlyExitBoundAnalysis<'a> {
	/// Classify the region right away. `post_dom_tree` is only consulted
	/// while locating the guard.
	pub fn new(
		region: &'a ParallelRegion,
		func: &'a LlvmFunc,
		post_dom_tree: &dyn Dominance,
	) -> Self {
		Self::with_symbols(region, func, post_dom_tree, IndexSymbols::default())
	}

	pub fn with_symbols(
		region: &'a ParallelRegion,
		func: &'a LlvmFunc,
		post_dom_tree: &dyn Dominance,
		symbols: IndexSymbols,
	) -> Self {
		let mut analysis = Self {
			region,
			func,
			symbols,
			early_exit: locate::find_early_exit(region, post_dom_tree),
			bounds: [None, None, None],
			safe_transformation: true,
		};
		match analysis.early_exit.as_ref().map(|v| v.cond.clone()) {
			Some(cond) => {
				analysis.decompose(&cond);
				if !analysis.safe_transformation {
					warn!("early exit branch transformation not safe or not understood");
				}
			}
			None => info!("no early exit found"),
		}
		analysis
	}

	pub fn region(&self) -> &ParallelRegion {
		self.region
	}

	pub fn early_exit(&self) -> Option<&EarlyExitBranch> {
		self.early_exit.as_ref()
	}

	pub fn status(&self) -> GuardStatus {
		match (&self.early_exit, self.safe_transformation) {
			(None, _) => GuardStatus::NoEarlyExit,
			(Some(_), false) => GuardStatus::Unsupported,
			(Some(_), true) => GuardStatus::Understood,
		}
	}

	// a fact is usable when the latch holds and every lower dimension is
	// bounded as well
	fn usable(&self, dimension: Dimension) -> Option<&BoundFact> {
		if !self.safe_transformation {
			return None;
		}
		let prefix = &self.bounds[..=dimension.index()];
		if prefix.iter().all(Option::is_some) {
			self.bounds[dimension.index()].as_ref()
		} else {
			None
		}
	}

	pub fn get_dimension_upper_bound(&self, dimension: Dimension) -> Option<&Value> {
		self.usable(dimension).map(|v| &v.bound)
	}

	pub fn get_x_dimension_upper_bound(&self) -> Option<&Value> {
		self.get_dimension_upper_bound(Dimension::X)
	}

	pub fn get_y_dimension_upper_bound(&self) -> Option<&Value> {
		self.get_dimension_upper_bound(Dimension::Y)
	}

	pub fn get_z_dimension_upper_bound(&self) -> Option<&Value> {
		self.get_dimension_upper_bound(Dimension::Z)
	}

	/// Usable facts in dimension order.
	pub fn bound_facts(&self) -> Vec<&BoundFact> {
		Dimension::ALL.into_iter().filter_map(|v| self.usable(v)).collect()
	}

	fn remove_upper_bound(&mut self, dimension: Dimension) -> bool {
		if self.usable(dimension).map_or(true, |v| v.removed) {
			return false;
		}
		let func = self.func;
		let Some(fact) = self.bounds[dimension.index()].as_mut() else {
			return false;
		};
		info!(
			"replacing {} upper bound comparison instruction with constant",
			dimension
		);
		fact.removed = true;
		func.replace_instr_with_value(&fact.compare, Value::Bool(true))
	}

	/// Fold the x comparison to `true`. Returns whether the IR changed.
	pub fn remove_x_upper_bound(&mut self) -> bool {
		self.remove_upper_bound(Dimension::X)
	}

	/// Fold the y comparison to `true`. Requires an x bound as well.
	pub fn remove_y_upper_bound(&mut self) -> bool {
		self.remove_upper_bound(Dimension::Y)
	}
}
