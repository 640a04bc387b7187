use std::{
	collections::HashSet,
	fmt::Display,
	hash::{Hash, Hasher},
};

use crate::{llvmop::Value, llvmvar::VarType};

// SSA values are identified by name; the type travels along for printing.
#[derive(Clone, Debug)]
pub struct Temp {
	pub name: String,
	pub is_global: bool,
	pub var_type: VarType,
}

impl PartialEq for Temp {
	fn eq(&self, other: &Self) -> bool {
		self.name == other.name && self.is_global == other.is_global
	}
}

impl Eq for Temp {}

impl Hash for Temp {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.name.hash(state);
		self.is_global.hash(state);
	}
}

impl Display for Temp {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		if self.is_global {
			write!(f, "@{}", self.name)
		} else {
			write!(f, "%{}", self.name)
		}
	}
}

impl Temp {
	pub fn new(name: impl Display, var_type: VarType, is_global: bool) -> Self {
		Self {
			name: name.to_string(),
			var_type,
			is_global,
		}
	}
	pub fn local(name: impl Display, var_type: VarType) -> Self {
		Self::new(name, var_type, false)
	}
	pub fn global(name: impl Display) -> Self {
		Self::new(name, VarType::Ptr, true)
	}
}

impl Value {
	pub fn unwrap_temp(&self) -> Option<Temp> {
		match self {
			Self::Temp(v) => Some(v.clone()),
			_ => None,
		}
	}
	pub fn as_temp(&self) -> Option<&Temp> {
		match self {
			Self::Temp(v) => Some(v),
			_ => None,
		}
	}
}

/// Hands out local temps whose names do not clash with any name already
/// registered.
#[derive(Default)]
pub struct TempManager {
	pub total: u32,
	used: HashSet<String>,
}

impl TempManager {
	pub fn new() -> Self {
		Self::default()
	}
	pub fn register(&mut self, name: impl Display) {
		self.used.insert(name.to_string());
	}
	pub fn new_temp(&mut self, var_type: VarType) -> Temp {
		self.new_temp_with_prefix("t", var_type)
	}
	pub fn new_temp_with_prefix(&mut self, prefix: &str, var_type: VarType) -> Temp {
		loop {
			self.total += 1;
			let name = format!("{}.{}", prefix, self.total);
			if self.used.insert(name.clone()) {
				return Temp::local(name, var_type);
			}
		}
	}
}
