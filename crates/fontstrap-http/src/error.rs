//! Framework error type shared by handlers and middleware.

use thiserror::Error;

/// Result type for request handling.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced while handling a request.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
	/// The request could not be built or parsed.
	#[error("invalid request: {0}")]
	InvalidRequest(String),

	/// The requested resource does not exist.
	#[error("not found: {0}")]
	NotFound(String),

	/// Filesystem or socket failure.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	/// Any other failure while producing a response.
	#[error("internal error: {0}")]
	Internal(String),
}

impl Error {
	/// HTTP status code this error maps to.
	///
	/// # Examples
	///
	/// ```
	/// use fontstrap_http::Error;
	///
	/// assert_eq!(Error::NotFound("x".into()).status_code(), 404);
	/// assert_eq!(Error::Internal("boom".into()).status_code(), 500);
	/// ```
	pub fn status_code(&self) -> u16 {
		match self {
			Error::InvalidRequest(_) => 400,
			Error::NotFound(_) => 404,
			Error::Io(_) | Error::Internal(_) => 500,
		}
	}
}
