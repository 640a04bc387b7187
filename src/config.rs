use optimizer::parallel_region::IndexSymbols;
use utils::Label;

use crate::cli::Args;

pub struct AnalysisConfig {
	pub function: Option<String>,
	// empty means the whole function
	pub region: Vec<Label>,
	pub symbols: IndexSymbols,
	pub remove_x: bool,
	pub remove_y: bool,
}

impl AnalysisConfig {
	pub fn from_args(args: &Args) -> Self {
		let default = IndexSymbols::default();
		Self {
			function: args.function.clone(),
			region: args.region.iter().map(|v| Label::new(v.trim_start_matches('%'))).collect(),
			symbols: IndexSymbols::new(
				args.local_id_x.clone().unwrap_or(default.x),
				args.local_id_y.clone().unwrap_or(default.y),
				args.local_id_z.clone().unwrap_or(default.z),
			),
			remove_x: args.remove_x,
			remove_y: args.remove_y,
		}
	}
	pub fn selects(&self, func_name: &str) -> bool {
		self.function.as_ref().map_or(true, |v| v == func_name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::cli::Parser;

	#[test]
	fn defaults() {
		let args = Args::parse_from(["kernelopt", "--analyze", "in.ll"]);
		let config = AnalysisConfig::from_args(&args);
		assert!(config.region.is_empty());
		assert_eq!(config.symbols, IndexSymbols::default());
		assert!(config.selects("anything"));
		assert!(!config.remove_x && !config.remove_y);
	}

	#[test]
	fn overrides() {
		let args = Args::parse_from([
			"kernelopt",
			"--analyze",
			"--function",
			"kernel",
			"--region",
			"%region,body",
			"--local-id-y",
			"lid.y",
			"--remove-x",
			"in.ll",
		]);
		let config = AnalysisConfig::from_args(&args);
		assert_eq!(config.region, vec![Label::from("region"), Label::from("body")]);
		assert_eq!(config.symbols.y, "lid.y");
		assert_eq!(config.symbols.x, utils::LOCAL_ID_X_GLOBAL);
		assert!(config.selects("kernel") && !config.selects("other"));
		assert!(config.remove_x && !config.remove_y);
	}

	#[test]
	fn repeated_passes_keep_order() {
		let args = Args::parse_from(["kernelopt", "--pass", "b", "--pass", "a", "-vv"]);
		assert_eq!(args.passes, vec!["b", "a"]);
		assert_eq!(args.verbose, 2);
		assert!(args.input.is_none());
	}
}
