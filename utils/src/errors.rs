use thiserror::Error;

pub type Result<T, E = KernelError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum KernelError {
	#[error("llvm syntax error: {0}")]
	LlvmSyntaxError(String),
	#[error("undefined label '%{0}'")]
	UndefinedLabel(String),
	#[error("no function named '@{0}'")]
	MissingFunction(String),
	#[error("unknown pass '{0}'")]
	UnknownPass(String),
	#[error("system error: {0}")]
	SystemError(String),
}

pub fn map_sys_err(e: std::io::Error) -> KernelError {
	KernelError::SystemError(e.to_string())
}
