//! # Fontstrap Assets
//!
//! Serves a Bootstrap stylesheet bundle compiled from LESS, together with
//! the Font Awesome font files (or the legacy glyphicon sprites) it
//! references.
//!
//! The compiled bundle is cached on disk under a name derived from the
//! settings that shaped it and the modification times of the custom
//! fragments appended to it. At most one entry is kept: whenever a new
//! bundle is compiled, every other `bs_*.css` file in the cache directory
//! is removed.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fontstrap_assets::Fontstrap;
//! use fontstrap_conf::FontstrapSettings;
//! use fontstrap_http::{Handler, MiddlewareChain, NotFoundHandler, Request};
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let settings = FontstrapSettings::new().with_disabled(["carousel"]);
//! let fontstrap = Arc::new(Fontstrap::new(settings));
//! let chain = fontstrap.install(MiddlewareChain::new(Arc::new(NotFoundHandler)));
//!
//! let request = Request::builder().uri("/css/bootstrap.css").build().unwrap();
//! let response = chain.handle(request).await.unwrap();
//! assert_eq!(response.content_type(), Some("text/css"));
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`fingerprint`]: cache key derivation
//! - [`store`]: the on-disk cache
//! - [`classify`]: request path classification
//! - [`assembler`]: bundle source text
//! - [`compiler`]: the compiler seam and the `lessc` backend
//! - [`middleware`]: the request interceptor

pub mod assembler;
pub mod classify;
pub mod compiler;
pub mod error;
pub mod fingerprint;
pub mod middleware;
pub mod store;

pub use assembler::BundleAssembler;
pub use classify::{Classification, Classifier};
pub use compiler::{LesscCompiler, StyleCompiler};
pub use error::{AssetError, CompileError};
pub use fingerprint::CacheKey;
pub use middleware::{BundleMiddleware, Fontstrap, IconAssetMiddleware, Outcome};
pub use store::CacheStore;
