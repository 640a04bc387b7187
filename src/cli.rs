pub use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "kernelopt", about = "Work-group kernel IR analyses and passes")]
pub struct Args {
	#[arg(short)]
	pub output: Option<String>,

	/// Run a registered function pass, may be repeated
	#[arg(long = "pass", value_name = "NAME")]
	pub passes: Vec<String>,

	#[arg(long)]
	pub list_passes: bool,

	/// Report early-exit bounds of every function
	#[arg(long)]
	pub analyze: bool,

	#[arg(long)]
	pub function: Option<String>,

	/// Blocks of the parallel region, whole function when omitted
	#[arg(long, value_delimiter = ',', value_name = "LABELS")]
	pub region: Vec<String>,

	#[arg(long)]
	pub remove_x: bool,

	#[arg(long)]
	pub remove_y: bool,

	#[arg(long, value_name = "SYMBOL")]
	pub local_id_x: Option<String>,

	#[arg(long, value_name = "SYMBOL")]
	pub local_id_y: Option<String>,

	#[arg(long, value_name = "SYMBOL")]
	pub local_id_z: Option<String>,

	#[arg(long)]
	pub print_ir: bool,

	#[arg(short, long, action = clap::ArgAction::Count)]
	pub verbose: u8,

	#[arg(value_parser)]
	pub input: Option<String>,
}
