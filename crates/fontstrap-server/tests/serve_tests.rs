//! Serving requests over a real socket

use async_trait::async_trait;
use fontstrap_http::{Error, Handler, Middleware, NotFoundHandler, Request, Response, Result};
use fontstrap_server::HttpServer;
use rstest::rstest;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

struct Stylesheet;

#[async_trait]
impl Middleware for Stylesheet {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		match request.path() {
			"/bootstrap.css" => Ok(Response::ok()
				.with_content_type("text/css")
				.with_header("X-Cache", "HIT")
				.with_body("body{}")),
			"/broken" => Err(Error::Internal("disk on fire".to_string())),
			_ => next.handle(request).await,
		}
	}
}

async fn get(addr: std::net::SocketAddr, path: &str) -> String {
	let mut stream = TcpStream::connect(addr).await.unwrap();
	let request = format!(
		"GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
		path
	);
	stream.write_all(request.as_bytes()).await.unwrap();

	let mut raw = String::new();
	stream.read_to_string(&mut raw).await.unwrap();
	raw
}

#[rstest]
#[tokio::test]
async fn test_serves_chain_until_shutdown() {
	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	let (stop_tx, stop_rx) = oneshot::channel::<()>();

	let server = HttpServer::new(Arc::new(NotFoundHandler)).with_middleware(Arc::new(Stylesheet));
	let running = tokio::spawn(server.serve_listener(listener, async move {
		let _ = stop_rx.await;
	}));

	let css = get(addr, "/bootstrap.css").await;
	assert!(css.starts_with("HTTP/1.1 200 OK"));
	assert!(css.to_ascii_lowercase().contains("content-type: text/css"));
	assert!(css.to_ascii_lowercase().contains("x-cache: hit"));
	assert!(css.ends_with("body{}"));

	let missing = get(addr, "/nope").await;
	assert!(missing.starts_with("HTTP/1.1 404"));
	assert!(missing.ends_with("Not Found: /nope"));

	let broken = get(addr, "/broken").await;
	assert!(broken.starts_with("HTTP/1.1 500"));

	stop_tx.send(()).unwrap();
	running.await.unwrap().unwrap();
}
