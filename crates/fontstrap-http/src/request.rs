use bytes::Bytes;
use hyper::{HeaderMap, Method, Uri, Version};
use std::net::SocketAddr;

use crate::{Error, Result};

/// HTTP Request representation
#[derive(Debug, Clone)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	pub body: Bytes,
	/// Peer address, when the request came in over a socket
	pub remote_addr: Option<SocketAddr>,
}

impl Request {
	/// Create a new request from its parts
	///
	/// # Examples
	///
	/// ```
	/// use fontstrap_http::Request;
	/// use hyper::{HeaderMap, Method, Uri, Version};
	/// use bytes::Bytes;
	///
	/// let request = Request::new(
	///     Method::GET,
	///     Uri::from_static("/css/bootstrap.css"),
	///     Version::HTTP_11,
	///     HeaderMap::new(),
	///     Bytes::new(),
	/// );
	/// assert_eq!(request.path(), "/css/bootstrap.css");
	/// ```
	pub fn new(method: Method, uri: Uri, version: Version, headers: HeaderMap, body: Bytes) -> Self {
		Self {
			method,
			uri,
			version,
			headers,
			body,
			remote_addr: None,
		}
	}

	/// Start building a request
	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	/// The path component of the request URI
	pub fn path(&self) -> &str {
		self.uri.path()
	}
}

/// Builder for [`Request`]
///
/// Defaults to `GET / HTTP/1.1` with no headers and an empty body.
#[derive(Debug, Default)]
pub struct RequestBuilder {
	method: Option<Method>,
	uri: Option<String>,
	version: Option<Version>,
	headers: HeaderMap,
	body: Bytes,
	remote_addr: Option<SocketAddr>,
}

impl RequestBuilder {
	pub fn method(mut self, method: Method) -> Self {
		self.method = Some(method);
		self
	}

	pub fn uri(mut self, uri: impl AsRef<str>) -> Self {
		self.uri = Some(uri.as_ref().to_string());
		self
	}

	pub fn version(mut self, version: Version) -> Self {
		self.version = Some(version);
		self
	}

	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;
		self
	}

	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	pub fn remote_addr(mut self, addr: SocketAddr) -> Self {
		self.remote_addr = Some(addr);
		self
	}

	/// Finish the request
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidRequest`] if the URI does not parse.
	///
	/// # Examples
	///
	/// ```
	/// use fontstrap_http::Request;
	///
	/// let request = Request::builder().uri("/font/fontawesome-webfont.woff").build().unwrap();
	/// assert_eq!(request.method, hyper::Method::GET);
	///
	/// assert!(Request::builder().uri("/has space").build().is_err());
	/// ```
	pub fn build(self) -> Result<Request> {
		let raw = self.uri.unwrap_or_else(|| "/".to_string());
		let uri = raw
			.parse::<Uri>()
			.map_err(|e| Error::InvalidRequest(format!("{}: {}", raw, e)))?;

		Ok(Request {
			method: self.method.unwrap_or(Method::GET),
			uri,
			version: self.version.unwrap_or(Version::HTTP_11),
			headers: self.headers,
			body: self.body,
			remote_addr: self.remote_addr,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_builder_defaults() {
		let request = Request::builder().build().unwrap();
		assert_eq!(request.method, Method::GET);
		assert_eq!(request.path(), "/");
		assert_eq!(request.version, Version::HTTP_11);
		assert!(request.body.is_empty());
		assert!(request.remote_addr.is_none());
	}

	#[rstest]
	#[case("/css/bootstrap.css?v=2", "/css/bootstrap.css")]
	#[case("/img/glyphicons-halflings.png", "/img/glyphicons-halflings.png")]
	fn test_path_excludes_query(#[case] uri: &str, #[case] expected: &str) {
		let request = Request::builder().uri(uri).build().unwrap();
		assert_eq!(request.path(), expected);
	}
}
