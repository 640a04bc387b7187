use llvm::{LlvmTemp, Value, VarType};
use rrvm::{
	dominator::DomTree, program::LlvmProgram, region::ParallelRegion,
};
use utils::MAX_CONDITION_NODES;

use super::*;

const GLOBALS: &str = "@_local_id_x = external global i32
@_local_id_y = external global i32
@_local_id_z = external global i32
";

const X_CMP: &str = "  %x = load i32, ptr @_local_id_x
  %ix = add i32 %x, 0
  %cmpx = icmp ult i32 %ix, %n
";

const Y_CMP: &str = "  %y = load i32, ptr @_local_id_y
  %iy = add i32 3, %y
  %cmpy = icmp ult i32 %iy, %m
";

const Z_CMP: &str = "  %z = load i32, ptr @_local_id_z
  %iz = add i32 %z, %k
  %cmpz = icmp slt i32 %iz, %k
";

// `guard` computes `cond` in the block ending with the candidate branch
fn kernel(guard: &str, cond: &str) -> String {
	format!(
		"{GLOBALS}
define void @kernel(ptr %out, i32 %n, i32 %m, i32 %k) {{
entry:
  br label %region
region:
{guard}  br i1 {cond}, label %body, label %exit
body:
  store i32 1, ptr %out
  br label %exit
exit:
  ret void
}}
"
	)
}

fn param(name: &str) -> Value {
	Value::Temp(LlvmTemp::local(name, VarType::I32))
}

fn analyze<R>(src: &str, f: impl FnOnce(&mut EarlyExitBoundAnalysis, &LlvmFunc) -> R) -> R {
	analyze_with(src, IndexSymbols::default(), f)
}

fn analyze_with<R>(
	src: &str,
	symbols: IndexSymbols,
	f: impl FnOnce(&mut EarlyExitBoundAnalysis, &LlvmFunc) -> R,
) -> R {
	let program = LlvmProgram::parse(src).unwrap();
	let func = &program.funcs[0];
	let post_dom_tree = DomTree::new(&func.cfg, true);
	let region = ParallelRegion::from_cfg(&func.cfg);
	let mut analysis =
		EarlyExitBoundAnalysis::with_symbols(&region, func, &post_dom_tree, symbols);
	f(&mut analysis, func)
}

fn all_absent(analysis: &EarlyExitBoundAnalysis) -> bool {
	Dimension::ALL
		.into_iter()
		.all(|v| analysis.get_dimension_upper_bound(v).is_none())
}

#[test]
fn no_early_exit_is_absent() {
	let src = format!(
		"{GLOBALS}
define void @kernel(ptr %out) {{
entry:
  store i32 1, ptr %out
  br label %exit
exit:
  ret void
}}"
	);
	analyze(&src, |analysis, func| {
		let before = func.to_string();
		assert_eq!(analysis.status(), GuardStatus::NoEarlyExit);
		assert!(analysis.early_exit().is_none());
		assert!(all_absent(analysis));
		assert!(!analysis.remove_x_upper_bound());
		assert!(!analysis.remove_y_upper_bound());
		assert_eq!(func.to_string(), before);
	});
}

#[test]
fn single_x_guard() {
	analyze(&kernel(X_CMP, "%cmpx"), |analysis, _| {
		assert_eq!(analysis.status(), GuardStatus::Understood);
		let branch = analysis.early_exit().unwrap();
		assert_eq!(branch.block, Label::from("region"));
		assert_eq!(branch.exit, Label::from("exit"));
		assert_eq!(analysis.get_x_dimension_upper_bound(), Some(&param("n")));
		assert!(analysis.get_y_dimension_upper_bound().is_none());
		assert!(analysis.get_z_dimension_upper_bound().is_none());
		assert_eq!(analysis.bound_facts().len(), 1);
	});
}

#[test]
fn unsigned_greater_latches() {
	let guard = X_CMP.replace("icmp ult", "icmp ugt");
	analyze(&kernel(&guard, "%cmpx"), |analysis, func| {
		let before = func.to_string();
		assert_eq!(analysis.status(), GuardStatus::Unsupported);
		assert!(all_absent(analysis));
		assert!(!analysis.remove_x_upper_bound());
		assert_eq!(func.to_string(), before);
	});
}

#[test]
fn and_of_x_and_y_is_removed() {
	let guard = format!("{X_CMP}{Y_CMP}  %cond = and i1 %cmpx, %cmpy\n");
	analyze(&kernel(&guard, "%cond"), |analysis, func| {
		assert_eq!(analysis.get_x_dimension_upper_bound(), Some(&param("n")));
		assert_eq!(analysis.get_y_dimension_upper_bound(), Some(&param("m")));
		assert!(analysis.get_z_dimension_upper_bound().is_none());

		assert!(analysis.remove_x_upper_bound());
		assert!(analysis.remove_y_upper_bound());
		let text = func.to_string();
		assert!(!text.contains("icmp"));
		assert!(text.contains("%cond = and i1 true, true"));
		assert!(text.contains("br i1 %cond, label %body, label %exit"));
		assert!(func.get_def(&LlvmTemp::local("cmpx", VarType::I1)).is_none());
	});
}

#[test]
fn or_latches_immediately() {
	let guard = format!("{X_CMP}{Y_CMP}  %cond = or i1 %cmpx, %cmpy\n");
	analyze(&kernel(&guard, "%cond"), |analysis, _| {
		assert_eq!(analysis.status(), GuardStatus::Unsupported);
		assert!(all_absent(analysis));
		assert!(analysis.bounds.iter().all(Option::is_none));
	});
}

#[test]
fn failing_operand_does_not_stop_traversal() {
	let bad = Y_CMP.replace("icmp ult", "icmp uge");
	let guard = format!("{X_CMP}{bad}  %cond = and i1 %cmpy, %cmpx\n");
	analyze(&kernel(&guard, "%cond"), |analysis, _| {
		assert_eq!(analysis.status(), GuardStatus::Unsupported);
		assert!(analysis.bounds[0].is_some());
		assert!(all_absent(analysis));
		assert!(!analysis.remove_x_upper_bound());
	});
}

#[test]
fn y_without_x_is_hidden() {
	let guard = format!("{Y_CMP}{Z_CMP}  %cond = and i1 %cmpy, %cmpz\n");
	analyze(&kernel(&guard, "%cond"), |analysis, func| {
		assert_eq!(analysis.status(), GuardStatus::Understood);
		assert!(analysis.bounds[1].is_some() && analysis.bounds[2].is_some());
		assert!(all_absent(analysis));
		assert!(!analysis.remove_y_upper_bound());
		assert_eq!(func.to_string().matches("icmp").count(), 2);
	});
}

#[test]
fn z_reported_after_x_and_y() {
	let guard = format!(
		"{X_CMP}{Y_CMP}{Z_CMP}  %xy = and i1 %cmpx, %cmpy\n  %cond = and i1 %xy, %cmpz\n"
	);
	analyze(&kernel(&guard, "%cond"), |analysis, _| {
		assert_eq!(analysis.get_z_dimension_upper_bound(), Some(&param("k")));
		assert_eq!(analysis.bound_facts().len(), 3);
		assert_eq!(analysis.bound_facts()[2].dimension, Dimension::Z);
	});
}

#[test]
fn first_fact_per_dimension_wins() {
	let again = "  %x2 = load i32, ptr @_local_id_x
  %ix2 = add i32 %x2, 1
  %cmpx2 = icmp slt i32 %ix2, %m
";
	let guard = format!("{X_CMP}{again}  %cond = and i1 %cmpx, %cmpx2\n");
	analyze(&kernel(&guard, "%cond"), |analysis, _| {
		assert_eq!(analysis.status(), GuardStatus::Understood);
		assert_eq!(analysis.get_x_dimension_upper_bound(), Some(&param("n")));
		assert_eq!(analysis.bound_facts()[0].compare.name, "cmpx");
	});
}

#[test]
fn truncated_index() {
	let guard = "  %x = load i64, ptr @_local_id_x
  %ix = add i64 %x, 0
  %ix32 = trunc i64 %ix to i32
  %cmpx = icmp ult i32 %ix32, %n
";
	analyze(&kernel(guard, "%cmpx"), |analysis, _| {
		assert_eq!(analysis.get_x_dimension_upper_bound(), Some(&param("n")));
	});
}

#[test]
fn forwarding_blocks_are_skipped() {
	let src = format!(
		"{GLOBALS}
define void @kernel(ptr %out, i32 %n) {{
region:
{X_CMP}  br i1 %cmpx, label %body, label %skip
skip:
  br label %exit
body:
  store i32 1, ptr %out
  br label %exit
exit:
  ret void
}}"
	);
	analyze(&src, |analysis, _| {
		let branch = analysis.early_exit().unwrap();
		assert_eq!(branch.exit, Label::from("exit"));
		assert_eq!(analysis.get_x_dimension_upper_bound(), Some(&param("n")));
	});
}

#[test]
fn candidate_without_post_dominating_successor() {
	let src = format!(
		"{GLOBALS}
define void @kernel(ptr %out, i32 %n) {{
region:
{X_CMP}  br i1 %cmpx, label %body, label %other
body:
  store i32 1, ptr %out
  ret void
other:
  ret void
}}"
	);
	analyze(&src, |analysis, _| {
		assert_eq!(analysis.status(), GuardStatus::NoEarlyExit);
		assert!(all_absent(analysis));
	});
}

#[test]
fn only_the_first_conditional_branch_is_considered() {
	let src = format!(
		"{GLOBALS}
define void @kernel(ptr %out, i32 %n, i1 %c) {{
entry:
  br i1 %c, label %left, label %right
left:
  ret void
right:
  br label %region
region:
{X_CMP}  br i1 %cmpx, label %body, label %exit
body:
  store i32 1, ptr %out
  br label %exit
exit:
  ret void
}}"
	);
	analyze(&src, |analysis, _| {
		assert_eq!(analysis.status(), GuardStatus::NoEarlyExit);
	});
}

#[test]
fn bound_must_be_a_parameter() {
	let guard = "  %x = load i32, ptr @_local_id_x
  %ix = add i32 %x, 0
  %lim = add i32 %n, 1
  %cmpx = icmp ult i32 %ix, %lim
";
	analyze(&kernel(guard, "%cmpx"), |analysis, _| {
		assert_eq!(analysis.status(), GuardStatus::Unsupported);
		assert!(all_absent(analysis));
	});
}

#[test]
fn index_must_be_an_add() {
	let guard = X_CMP.replace("add i32", "mul i32");
	analyze(&kernel(&guard, "%cmpx"), |analysis, _| {
		assert_eq!(analysis.status(), GuardStatus::Unsupported);
		assert!(analysis.bounds.iter().all(Option::is_none));
	});
}

#[test]
fn add_without_local_id_latches() {
	let guard = "  %ix = add i32 %m, 1
  %cmpx = icmp ult i32 %ix, %n
";
	analyze(&kernel(guard, "%cmpx"), |analysis, _| {
		assert_eq!(analysis.status(), GuardStatus::Unsupported);
	});
}

#[test]
fn constant_condition_latches() {
	analyze(&kernel("", "true"), |analysis, _| {
		assert!(analysis.early_exit().is_some());
		assert_eq!(analysis.status(), GuardStatus::Unsupported);
	});
}

#[test]
fn cyclic_condition_terminates() {
	let guard = format!("{X_CMP}  %cond = and i1 %cmpx, %loop\n  %loop = and i1 %cond, %cmpx\n");
	analyze(&kernel(&guard, "%cond"), |analysis, _| {
		assert_eq!(analysis.status(), GuardStatus::Understood);
		assert_eq!(analysis.get_x_dimension_upper_bound(), Some(&param("n")));
	});
}

#[test]
fn oversized_condition_latches() {
	let mut guard = format!("{X_CMP}  %a0 = and i1 %cmpx, %cmpx\n");
	for i in 1..MAX_CONDITION_NODES {
		guard.push_str(&format!("  %a{} = and i1 %a{}, %cmpx\n", i, i - 1));
	}
	let cond = format!("%a{}", MAX_CONDITION_NODES - 1);
	analyze(&kernel(&guard, &cond), |analysis, _| {
		assert_eq!(analysis.status(), GuardStatus::Unsupported);
	});
}

#[test]
fn custom_index_symbols() {
	let src = kernel(X_CMP, "%cmpx").replace("_local_id_", "lid.");
	let symbols = IndexSymbols::new("lid.x", "lid.y", "lid.z");
	analyze_with(&src, symbols, |analysis, _| {
		assert_eq!(analysis.get_x_dimension_upper_bound(), Some(&param("n")));
	});
	analyze(&src, |analysis, _| {
		assert_eq!(analysis.status(), GuardStatus::Unsupported);
	});
}

#[test]
fn double_removal_is_a_no_op() {
	analyze(&kernel(X_CMP, "%cmpx"), |analysis, func| {
		assert!(analysis.remove_x_upper_bound());
		let after = func.to_string();
		assert!(after.contains("br i1 true, label %body, label %exit"));
		assert!(!analysis.remove_x_upper_bound());
		assert_eq!(func.to_string(), after);
		assert_eq!(analysis.get_x_dimension_upper_bound(), Some(&param("n")));
	});
}

#[test]
fn removed_ir_reparses() {
	let guard = format!("{X_CMP}{Y_CMP}  %cond = and i1 %cmpx, %cmpy\n");
	let src = kernel(&guard, "%cond");
	let mut program = LlvmProgram::parse(&src).unwrap();
	{
		let func = &program.funcs[0];
		let post_dom_tree = DomTree::new(&func.cfg, true);
		let region = ParallelRegion::from_cfg(&func.cfg);
		let mut analysis = EarlyExitBoundAnalysis::new(&region, func, &post_dom_tree);
		assert!(analysis.remove_x_upper_bound());
	}
	let printed = program.to_string();
	program = LlvmProgram::parse(&printed).unwrap();
	assert_eq!(program.to_string(), printed);
}
