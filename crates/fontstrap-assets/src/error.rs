//! Error types for bundle assembly and compilation.

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single stylesheet compilation.
///
/// Always recoverable: the bundle middleware turns it into a diagnostic
/// response instead of failing the request.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
	/// The compiler executable could not be started.
	#[error("failed to start `{program}`: {source}")]
	Spawn {
		program: String,
		#[source]
		source: io::Error,
	},

	/// The compiler ran and reported an error.
	#[error("{diagnostic}")]
	Failed { status: String, diagnostic: String },

	/// The compiler did not finish within the configured bound.
	#[error("compilation timed out after {0:?}")]
	TimedOut(Duration),

	/// An import directory cannot be passed on the command line.
	#[error("invalid include path: {0}")]
	InvalidIncludePath(String),

	/// I/O failure talking to the compiler process.
	#[error("compiler I/O error: {0}")]
	Io(#[from] io::Error),
}

impl CompileError {
	/// Build a [`CompileError::Failed`] from a diagnostic message.
	///
	/// # Examples
	///
	/// ```
	/// use fontstrap_assets::CompileError;
	///
	/// let err = CompileError::failed("ParseError: Unrecognised input in style.less on line 3");
	/// assert_eq!(err.to_string(), "ParseError: Unrecognised input in style.less on line 3");
	/// ```
	pub fn failed(diagnostic: impl Into<String>) -> Self {
		Self::Failed {
			status: "error".to_string(),
			diagnostic: diagnostic.into(),
		}
	}

	/// Human-readable diagnostic, safe to embed in a CSS comment.
	pub fn diagnostic(&self) -> String {
		self.to_string().replace("*/", "* /")
	}
}

/// Errors that escape the request interceptor.
///
/// Compile failures are answered with a diagnostic stylesheet and never
/// reach this type; what remains is unexpected filesystem trouble.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AssetError {
	#[error("asset I/O error: {0}")]
	Io(#[from] io::Error),
}

impl From<AssetError> for fontstrap_http::Error {
	fn from(error: AssetError) -> Self {
		match error {
			AssetError::Io(e) => fontstrap_http::Error::Io(e),
		}
	}
}
