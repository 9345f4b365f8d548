//! # Fontstrap
//!
//! Serve a configurable Bootstrap stylesheet bundle compiled from LESS,
//! with Font Awesome replacing the glyphicon sprites and a fingerprinted
//! on-disk cache of the compiled CSS.
//!
//! Disable Bootstrap modules you do not use, append your own `.less`
//! fragments so they see Bootstrap's variables and mixins, and include
//! `bootstrap.css` in your layout as usual.
//!
//! ## Feature Flags
//!
//! - `server` (default) - Hyper-based HTTP server and the `serve` command
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use fontstrap::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let settings = fontstrap::load_settings(None)?
//!     .with_disabled(["carousel", "hero-unit"])
//!     .with_custom(["style"]);
//!
//! let (_fontstrap, chain) = fontstrap::app(settings);
//! let request = Request::builder().uri("/css/bootstrap.css").build()?;
//! let response = chain.handle(request).await?;
//! assert_eq!(response.content_type(), Some("text/css"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`http`]: request, response and middleware chain
//! - [`conf`]: layered settings
//! - [`assets`]: cache keys, cache store, bundle assembly and compilation
//! - [`server`]: the HTTP server (feature `server`)

use std::path::Path;
use std::sync::Arc;

pub use fontstrap_assets as assets;
pub use fontstrap_conf as conf;
pub use fontstrap_http as http;
#[cfg(feature = "server")]
pub use fontstrap_server as server;

use fontstrap_assets::Fontstrap;
use fontstrap_conf::{DefaultSource, EnvSource, FontstrapSettings, SettingsBuilder, auto_source};
use fontstrap_http::{MiddlewareChain, NotFoundHandler};

/// Commonly used types
pub mod prelude {
	pub use fontstrap_assets::{
		CacheKey, CacheStore, Classification, CompileError, Fontstrap, LesscCompiler, Outcome,
		StyleCompiler,
	};
	pub use fontstrap_conf::FontstrapSettings;
	pub use fontstrap_http::{Handler, Middleware, MiddlewareChain, Request, Response};
}

/// Load settings from defaults, an optional TOML/JSON file and `FONTSTRAP_*`
/// environment variables
///
/// Relative paths are resolved against the directory holding the config
/// file, or the current directory without one.
pub fn load_settings(config_file: Option<&Path>) -> anyhow::Result<FontstrapSettings> {
	let mut builder = SettingsBuilder::new()
		.add_source(DefaultSource::fontstrap())
		.add_source(EnvSource::fontstrap());

	let base = match config_file {
		Some(path) => {
			if !path.exists() {
				anyhow::bail!("config file not found: {}", path.display());
			}
			builder = builder.add_boxed_source(auto_source(path)?);
			match path.parent() {
				Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
				_ => std::env::current_dir()?,
			}
		}
		None => std::env::current_dir()?,
	};

	Ok(builder.build()?.resolve_paths(&base))
}

/// Mount Fontstrap in front of a 404 handler
pub fn app(settings: FontstrapSettings) -> (Arc<Fontstrap>, MiddlewareChain) {
	let fontstrap = Arc::new(Fontstrap::new(settings));
	let chain = fontstrap.install(MiddlewareChain::new(Arc::new(NotFoundHandler)));
	(fontstrap, chain)
}
