//! HTTP server for Fontstrap.
//!
//! A small HTTP/1.1 server based on Hyper that runs a
//! [`MiddlewareChain`](fontstrap_http::MiddlewareChain) for every request.
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use fontstrap_http::NotFoundHandler;
//! use fontstrap_server::{HttpServer, shutdown_signal};
//! use std::net::SocketAddr;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let addr: SocketAddr = "127.0.0.1:8000".parse()?;
//! HttpServer::new(Arc::new(NotFoundHandler))
//!     .listen_with_shutdown(addr, shutdown_signal())
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod http;

pub use http::{HttpServer, ServerError, shutdown_signal};
