pub mod constants;
pub mod errors;
pub mod label;

pub use constants::*;
pub use errors::*;
pub use label::Label;

pub fn fatal_error(str: impl std::fmt::Display) {
	eprintln!("{}: {}", console::style("fatal error").bold().red(), str);
	std::process::exit(1);
}

pub fn warning(str: impl std::fmt::Display) {
	eprintln!("{}: {}", console::style("warning").bold().yellow(), str);
}
