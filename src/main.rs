mod cli;
mod config;
mod logging;

use std::{
	fs::{self, File},
	io,
	io::Write,
};

use anyhow::Result;
use clap::Parser;
use cli::Args;
use config::AnalysisConfig;
use log::{info, trace};
use optimizer::{
	parallel_region::{EarlyExitBoundAnalysis, GuardStatus},
	PassRegistry,
};
use rrvm::{
	dominator::DomTree,
	program::{LlvmFunc, LlvmProgram},
	region::ParallelRegion,
};
use utils::{fatal_error, map_sys_err, warning};

fn step_parse(file_name: &str) -> Result<LlvmProgram> {
	let code = fs::read_to_string(file_name).map_err(map_sys_err)?;
	Ok(LlvmProgram::parse(&code)?)
}

fn step_passes(
	program: &mut LlvmProgram,
	registry: &PassRegistry,
	passes: &[String],
) -> Result<()> {
	for name in passes {
		let changed = registry.run(name, program)?;
		info!("{}: changed = {}", name, changed);
	}
	Ok(())
}

// one report line per finding, the caller turns them into IR comments
fn step_analyze(func: &LlvmFunc, config: &AnalysisConfig) -> Result<Vec<String>> {
	let region = if config.region.is_empty() {
		ParallelRegion::from_cfg(&func.cfg)
	} else {
		ParallelRegion::from_labels(&func.cfg, &config.region)?
	};
	let post_dom_tree = DomTree::new(&func.cfg, true);
	let mut analysis = EarlyExitBoundAnalysis::with_symbols(
		&region,
		func,
		&post_dom_tree,
		config.symbols.clone(),
	);

	let mut report = Vec::new();
	match analysis.early_exit() {
		Some(branch) => report.push(format!(
			"@{}: early exit from %{} to %{} on {}, {}",
			func.name,
			branch.block,
			branch.exit,
			branch.cond,
			analysis.status()
		)),
		None => report.push(format!("@{}: {}", func.name, GuardStatus::NoEarlyExit)),
	}
	for fact in analysis.bound_facts() {
		report.push(format!(
			"  {} < {}  [{}]",
			fact.dimension, fact.bound, fact.text
		));
	}

	if (config.remove_x || config.remove_y)
		&& analysis.status() == GuardStatus::Unsupported
	{
		warning(format!(
			"bounds of '@{}' are kept, its early exit is not understood",
			func.name
		));
	}
	if config.remove_x && analysis.remove_x_upper_bound() {
		report.push("  removed x upper bound".to_string());
	}
	if config.remove_y && analysis.remove_y_upper_bound() {
		report.push("  removed y upper bound".to_string());
	}
	Ok(report)
}

fn main() -> Result<()> {
	let args = Args::parse();
	logging::init(args.verbose);
	trace!("start");

	let registry = PassRegistry::with_default_passes();
	if args.list_passes {
		for pass in registry.passes() {
			println!("{:32} {}", pass.name, pass.description);
		}
		return Ok(());
	}

	let mut writer: Box<dyn Write> = if let Some(o) = &args.output {
		Box::new(File::create(o).map_err(map_sys_err)?)
	} else {
		Box::new(io::stdout())
	};

	let file_name = args.input.clone().unwrap_or_else(|| {
		fatal_error("no input files");
		unreachable!()
	});

	let mut program = step_parse(&file_name)?;
	step_passes(&mut program, &registry, &args.passes)?;

	if args.analyze {
		let config = AnalysisConfig::from_args(&args);
		if let Some(name) = &config.function {
			program.get_func(name)?;
		}
		for func in program.funcs.iter().filter(|v| config.selects(&v.name)) {
			for line in step_analyze(func, &config)? {
				writeln!(writer, "; {}", line)?;
			}
		}
	}

	if !args.analyze || args.print_ir {
		write!(writer, "{}", program)?;
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use optimizer::parallel_region::IndexSymbols;

	const KERNEL: &str = "@_local_id_x = external global i32

define void @kernel(ptr %out, i32 %n) {
entry:
  %x = load i32, ptr @_local_id_x
  %ix = add i32 %x, 0
  %cmpx = icmp ult i32 %ix, %n
  br i1 %cmpx, label %body, label %exit
body:
  store i32 1, ptr %out
  br label %exit
exit:
  ret void
}
";

	fn config(remove_x: bool, region: &[&str]) -> AnalysisConfig {
		AnalysisConfig {
			function: None,
			region: region.iter().map(|&v| v.into()).collect(),
			symbols: IndexSymbols::default(),
			remove_x,
			remove_y: false,
		}
	}

	#[test]
	fn report_and_remove() {
		logging::init_test();
		let program = LlvmProgram::parse(KERNEL).unwrap();
		let report = step_analyze(&program.funcs[0], &config(true, &[])).unwrap();
		assert_eq!(
			report[0],
			"@kernel: early exit from %entry to %exit on %cmpx, understood"
		);
		assert_eq!(report[1], "  x < %n  [%cmpx = icmp ult i32 %ix, %n]");
		assert_eq!(report[2], "  removed x upper bound");
		assert!(program.to_string().contains("br i1 true"));
	}

	#[test]
	fn region_without_branch() {
		logging::init_test();
		let program = LlvmProgram::parse(KERNEL).unwrap();
		let report =
			step_analyze(&program.funcs[0], &config(false, &["body", "exit"])).unwrap();
		assert_eq!(report, vec!["@kernel: no early exit"]);
		assert!(step_analyze(&program.funcs[0], &config(false, &["nowhere"])).is_err());
	}
}
