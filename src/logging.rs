//! Logging setup for the `kernelopt` binary.
//!
//! Libraries only talk to the `log` facade. The binary picks the level from
//! `-v` flags, or from `RUST_LOG` when it is set:
//!
//! ```bash
//! RUST_LOG=debug kernelopt --analyze kernel.ll
//! RUST_LOG=optimizer::parallel_region=trace kernelopt --analyze kernel.ll
//! ```

use std::{io::Write, sync::Once};

use env_logger::Builder;
use log::LevelFilter;

static INIT: Once = Once::new();

/// Level selected by the number of `-v` flags.
pub fn level_for(verbose: u8) -> LevelFilter {
	match verbose {
		0 => LevelFilter::Warn,
		1 => LevelFilter::Info,
		2 => LevelFilter::Debug,
		_ => LevelFilter::Trace,
	}
}

/// Initialize logging once. `RUST_LOG` wins over `verbose`.
pub fn init(verbose: u8) {
	if std::env::var_os("RUST_LOG").is_some() {
		init_from_env();
	} else {
		init_with_level(level_for(verbose));
	}
}

pub fn init_with_level(level: LevelFilter) {
	INIT.call_once(|| {
		Builder::new()
			.filter_level(level)
			.format(|buf, record| {
				writeln!(
					buf,
					"[{:5}] {}: {}",
					record.level(),
					record.target(),
					record.args()
				)
			})
			.init();
	});
}

pub fn init_from_env() {
	INIT.call_once(|| {
		Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
	});
}

/// Test-friendly logger, safe to call from every test.
#[cfg(test)]
pub fn init_test() {
	let _ = env_logger::builder()
		.filter_level(LevelFilter::Warn)
		.is_test(true)
		.try_init();
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn verbosity_levels() {
		assert_eq!(level_for(0), LevelFilter::Warn);
		assert_eq!(level_for(1), LevelFilter::Info);
		assert_eq!(level_for(2), LevelFilter::Debug);
		assert_eq!(level_for(7), LevelFilter::Trace);
	}

	#[test]
	fn init_test_is_idempotent() {
		init_test();
		init_test();
		log::warn!("logging ready");
	}
}
