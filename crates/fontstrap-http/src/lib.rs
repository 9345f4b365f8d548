//! # Fontstrap HTTP
//!
//! The host-framework surface Fontstrap plugs into: request and response
//! types, the [`Handler`] and [`Middleware`] traits, and the
//! [`MiddlewareChain`] that composes them.
//!
//! ## Quick Start
//!
//! ```rust
//! use fontstrap_http::{Handler, MiddlewareChain, NotFoundHandler, Request};
//! use hyper::StatusCode;
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let chain = MiddlewareChain::new(Arc::new(NotFoundHandler));
//! let request = Request::builder().uri("/missing").build().unwrap();
//! let response = chain.handle(request).await.unwrap();
//! assert_eq!(response.status, StatusCode::NOT_FOUND);
//! # }
//! ```

pub mod error;
pub mod middleware;
pub mod request;
pub mod response;

pub use error::{Error, Result};
pub use middleware::{Handler, Middleware, MiddlewareChain, NotFoundHandler};
pub use request::{Request, RequestBuilder};
pub use response::Response;
