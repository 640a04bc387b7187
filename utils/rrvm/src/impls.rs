use std::fmt::Display;

use crate::{func::RrvmFunc, program::RrvmProgram};

impl<T: Display> Display for RrvmFunc<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		let params = self
			.params
			.iter()
			.map(|v| format!("{} {}", v.var_type, v))
			.collect::<Vec<_>>()
			.join(", ");
		let blocks = self
			.cfg
			.blocks
			.iter()
			.map(|v| v.borrow().to_string())
			.collect::<Vec<_>>()
			.join("\n");
		write!(
			f,
			"define {} @{}({}) {{\n{}\n}}",
			self.ret_type, self.name, params, blocks
		)
	}
}

impl<T: Display> Display for RrvmProgram<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		let global_vars = self
			.global_vars
			.iter()
			.map(|v| format!("{}\n", v))
			.collect::<String>();
		let funcs = self
			.funcs
			.iter()
			.map(|v| v.to_string())
			.collect::<Vec<_>>()
			.join("\n\n");
		if global_vars.is_empty() {
			writeln!(f, "{}", funcs)
		} else {
			writeln!(f, "{}\n{}", global_vars, funcs)
		}
	}
}
