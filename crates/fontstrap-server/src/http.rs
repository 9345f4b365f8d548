use bytes::Bytes;
use fontstrap_http::{Handler, Middleware, MiddlewareChain, Request, Response};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::Service;
use hyper_util::rt::TokioIo;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};

/// Error type returned by the server loop
pub type ServerError = Box<dyn std::error::Error + Send + Sync>;

/// HTTP Server with middleware support
pub struct HttpServer {
	handler: Arc<dyn Handler>,
	middlewares: Vec<Arc<dyn Middleware>>,
}

impl HttpServer {
	/// Create a new server with the given terminal handler
	///
	/// # Examples
	///
	/// ```
	/// use std::sync::Arc;
	/// use fontstrap_http::NotFoundHandler;
	/// use fontstrap_server::HttpServer;
	///
	/// let server = HttpServer::new(Arc::new(NotFoundHandler));
	/// assert_eq!(server.middleware_count(), 0);
	/// ```
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self {
			handler,
			middlewares: Vec::new(),
		}
	}

	/// Add a middleware to the server using builder pattern
	///
	/// Middlewares are executed in the order they are added.
	pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
		self.middlewares.push(middleware);
		self
	}

	pub fn middleware_count(&self) -> usize {
		self.middlewares.len()
	}

	/// Build the final handler with middleware chain
	fn build_handler(&self) -> Arc<dyn Handler> {
		if self.middlewares.is_empty() {
			return self.handler.clone();
		}

		let mut chain = MiddlewareChain::new(self.handler.clone());
		for middleware in &self.middlewares {
			chain.add_middleware(middleware.clone());
		}

		Arc::new(chain)
	}

	/// Bind `addr` and serve until `shutdown` completes
	///
	/// # Examples
	///
	/// ```no_run
	/// use std::sync::Arc;
	/// use std::net::SocketAddr;
	/// use fontstrap_http::NotFoundHandler;
	/// use fontstrap_server::{HttpServer, shutdown_signal};
	///
	/// # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
	/// let addr: SocketAddr = "127.0.0.1:8000".parse()?;
	/// HttpServer::new(Arc::new(NotFoundHandler))
	///     .listen_with_shutdown(addr, shutdown_signal())
	///     .await?;
	/// # Ok(())
	/// # }
	/// ```
	pub async fn listen_with_shutdown<F>(self, addr: SocketAddr, shutdown: F) -> Result<(), ServerError>
	where
		F: Future<Output = ()> + Send,
	{
		let listener = TcpListener::bind(addr).await?;
		self.serve_listener(listener, shutdown).await
	}

	/// Serve connections from an already bound listener until `shutdown` completes
	///
	/// In-flight connections are left to finish on their own tasks.
	pub async fn serve_listener<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
	where
		F: Future<Output = ()> + Send,
	{
		let local_addr = listener.local_addr()?;
		tracing::info!("Server listening on http://{}", local_addr);

		let handler = self.build_handler();
		tokio::pin!(shutdown);

		loop {
			tokio::select! {
				result = listener.accept() => {
					let (stream, socket_addr) = result?;
					let handler = handler.clone();

					tokio::task::spawn(async move {
						if let Err(err) = Self::handle_connection(stream, socket_addr, handler).await {
							tracing::debug!(peer = %socket_addr, error = %err, "connection closed with error");
						}
					});
				}
				_ = &mut shutdown => {
					tracing::info!("Shutdown signal received, stopping server");
					break;
				}
			}
		}

		Ok(())
	}

	/// Handle a single TCP connection by processing HTTP requests
	pub async fn handle_connection(
		stream: TcpStream,
		socket_addr: SocketAddr,
		handler: Arc<dyn Handler>,
	) -> Result<(), ServerError> {
		let io = TokioIo::new(stream);
		let service = RequestService {
			handler,
			remote_addr: socket_addr,
		};

		http1::Builder::new().serve_connection(io, service).await?;

		Ok(())
	}
}

/// Service implementation for hyper
struct RequestService {
	handler: Arc<dyn Handler>,
	remote_addr: SocketAddr,
}

impl Service<hyper::Request<Incoming>> for RequestService {
	type Response = hyper::Response<Full<Bytes>>;
	type Error = ServerError;
	type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

	fn call(&self, req: hyper::Request<Incoming>) -> Self::Future {
		let handler = self.handler.clone();
		let remote_addr = self.remote_addr;

		Box::pin(async move {
			let (parts, body) = req.into_parts();
			let body_bytes = body.collect().await?.to_bytes();

			let mut request = Request::new(
				parts.method,
				parts.uri,
				parts.version,
				parts.headers,
				body_bytes,
			);
			request.remote_addr = Some(remote_addr);

			let method = request.method.clone();
			let path = request.path().to_string();

			let response = match handler.handle(request).await {
				Ok(response) => response,
				Err(err) => {
					tracing::error!(%method, %path, error = %err, "request failed");
					Response::from(err)
				}
			};
			tracing::debug!(%method, %path, status = response.status.as_u16(), "request handled");

			let mut hyper_response = hyper::Response::builder().status(response.status);
			for (key, value) in response.headers.iter() {
				hyper_response = hyper_response.header(key, value);
			}

			Ok(hyper_response.body(Full::new(response.body))?)
		})
	}
}

/// Resolve when the process receives Ctrl-C
///
/// If the signal handler cannot be installed, the server keeps running.
pub async fn shutdown_signal() {
	if let Err(err) = tokio::signal::ctrl_c().await {
		tracing::error!(error = %err, "failed to listen for shutdown signal");
		std::future::pending::<()>().await;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	struct TestHandler;

	#[async_trait::async_trait]
	impl Handler for TestHandler {
		async fn handle(&self, _request: Request) -> fontstrap_http::Result<Response> {
			Ok(Response::ok().with_body("Hello, World!"))
		}
	}

	struct PrefixMiddleware {
		prefix: String,
	}

	#[async_trait::async_trait]
	impl Middleware for PrefixMiddleware {
		async fn process(
			&self,
			request: Request,
			next: Arc<dyn Handler>,
		) -> fontstrap_http::Result<Response> {
			let response = next.handle(request).await?;
			let current_body = String::from_utf8(response.body.to_vec()).unwrap_or_default();
			Ok(Response::ok().with_body(format!("{}{}", self.prefix, current_body)))
		}
	}

	#[rstest]
	#[tokio::test]
	async fn test_middleware_chain_execution() {
		let server = HttpServer::new(Arc::new(TestHandler))
			.with_middleware(Arc::new(PrefixMiddleware {
				prefix: "First:".to_string(),
			}))
			.with_middleware(Arc::new(PrefixMiddleware {
				prefix: "Second:".to_string(),
			}));

		let handler = server.build_handler();
		let request = Request::builder().uri("/").build().unwrap();
		let response = handler.handle(request).await.unwrap();

		assert_eq!(server.middleware_count(), 2);
		assert_eq!(
			String::from_utf8(response.body.to_vec()).unwrap(),
			"First:Second:Hello, World!"
		);
	}
}
