//! Request interception.
//!
//! [`Fontstrap`] owns the classifier, cache store, assembler and compiler for
//! one settings value and answers a single request with an [`Outcome`]. It
//! is mounted as two ordered middleware steps: [`IconAssetMiddleware`] for
//! icon fonts and sprites, then [`BundleMiddleware`] for the stylesheet.

use async_trait::async_trait;
use bytes::Bytes;
use fontstrap_conf::FontstrapSettings;
use fontstrap_http::{Handler, Middleware, MiddlewareChain, Request, Response};
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

use crate::assembler::BundleAssembler;
use crate::classify::{Classification, Classifier};
use crate::compiler::{LesscCompiler, StyleCompiler};
use crate::error::{AssetError, CompileError};
use crate::fingerprint::CacheKey;
use crate::store::CacheStore;

pub const FONT_CONTENT_TYPE: &str = "font/opentype";
pub const IMAGE_CONTENT_TYPE: &str = "image/png";
pub const STYLESHEET_CONTENT_TYPE: &str = "text/css";

/// Header reporting whether the bundle came from the cache
pub const CACHE_STATUS_HEADER: &str = "X-Cache";

/// Result of handling one request
#[derive(Debug)]
pub enum Outcome {
	/// A terminal response
	Served(Response),
	/// Not ours; forward to the next handler unchanged
	PassThrough,
}

/// Serves the Bootstrap bundle and its icon assets
pub struct Fontstrap {
	settings: FontstrapSettings,
	classifier: Classifier,
	store: CacheStore,
	assembler: BundleAssembler,
	compiler: Arc<dyn StyleCompiler>,
	// Serializes cache misses so one key is compiled once.
	compile_lock: Mutex<()>,
}

impl Fontstrap {
	/// Build with the `lessc` compiler named in `settings`
	pub fn new(settings: FontstrapSettings) -> Self {
		let compiler = Arc::new(LesscCompiler::from_settings(&settings));
		Self::with_compiler(settings, compiler)
	}

	/// Build with a custom compiler
	pub fn with_compiler(settings: FontstrapSettings, compiler: Arc<dyn StyleCompiler>) -> Self {
		Self {
			classifier: Classifier::new(&settings),
			store: CacheStore::new(&settings.cache_path),
			assembler: BundleAssembler::new(&settings),
			compiler,
			compile_lock: Mutex::new(()),
			settings,
		}
	}

	pub fn settings(&self) -> &FontstrapSettings {
		&self.settings
	}

	pub fn store(&self) -> &CacheStore {
		&self.store
	}

	/// Cache key for the current settings and fragment files
	pub fn cache_key(&self) -> CacheKey {
		CacheKey::derive(&self.settings)
	}

	pub fn classify(&self, path: &str) -> Classification {
		self.classifier.classify(path)
	}

	/// Add both middleware steps to `chain`, icon assets first
	///
	/// # Examples
	///
	/// ```
	/// use fontstrap_assets::Fontstrap;
	/// use fontstrap_conf::FontstrapSettings;
	/// use fontstrap_http::{MiddlewareChain, NotFoundHandler};
	/// use std::sync::Arc;
	///
	/// let fontstrap = Arc::new(Fontstrap::new(FontstrapSettings::default()));
	/// let chain = fontstrap.install(MiddlewareChain::new(Arc::new(NotFoundHandler)));
	/// assert_eq!(chain.len(), 2);
	/// ```
	pub fn install(self: &Arc<Self>, chain: MiddlewareChain) -> MiddlewareChain {
		chain
			.with_middleware(Arc::new(IconAssetMiddleware::new(self.clone())))
			.with_middleware(Arc::new(BundleMiddleware::new(self.clone())))
	}

	/// Handle one request
	///
	/// # Errors
	///
	/// Only unexpected filesystem failures are returned; missing assets and
	/// compile failures become responses.
	pub async fn respond(&self, request: &Request) -> Result<Outcome, AssetError> {
		let classification = self.classify(request.path());
		tracing::debug!(path = %request.path(), ?classification, "classified request");

		match classification {
			Classification::FontAsset(name) => {
				self.serve_binary(&self.settings.font_asset_dir(), &name, FONT_CONTENT_TYPE)
					.await
			}
			Classification::LegacyIconImage(name) => {
				self.serve_binary(&self.settings.image_asset_dir(), &name, IMAGE_CONTENT_TYPE)
					.await
			}
			Classification::StylesheetBundle => self.serve_bundle().await,
			Classification::Passthrough => Ok(Outcome::PassThrough),
		}
	}

	async fn serve_binary(
		&self,
		dir: &Path,
		name: &str,
		content_type: &'static str,
	) -> Result<Outcome, AssetError> {
		let path = dir.join(name);
		match tokio::fs::read(&path).await {
			Ok(data) => Ok(Outcome::Served(
				Response::ok()
					.with_content_type(content_type)
					.with_body(data),
			)),
			Err(e) if e.kind() == io::ErrorKind::NotFound => {
				tracing::warn!(path = %path.display(), "icon asset not found");
				Ok(Outcome::Served(Response::from(
					fontstrap_http::Error::NotFound(name.to_string()),
				)))
			}
			Err(e) => Err(e.into()),
		}
	}

	async fn serve_bundle(&self) -> Result<Outcome, AssetError> {
		let key = self.cache_key();
		self.store.ensure_directory().await?;

		if let Some(css) = self.store.read(&key).await? {
			tracing::debug!(%key, "bundle cache hit");
			return Ok(Outcome::Served(stylesheet(css, "HIT")));
		}

		let _guard = self.compile_lock.lock().await;

		// Another request may have compiled this key while we waited.
		if let Some(css) = self.store.read(&key).await? {
			tracing::debug!(%key, "bundle compiled by concurrent request");
			return Ok(Outcome::Served(stylesheet(css, "HIT")));
		}

		let Some(source) = self.assembler.assemble().await? else {
			tracing::warn!(
				base = %self.assembler.base_source().display(),
				"base source missing, passing request through"
			);
			self.store.sweep_except(&key).await;
			return Ok(Outcome::PassThrough);
		};

		tracing::info!(%key, "compiling stylesheet bundle");
		let started = Instant::now();
		let compiled = self
			.compiler
			.compile(&source, &self.settings.import_dirs())
			.await;

		let outcome = match compiled {
			Ok(css) => {
				self.store.write(&key, css.as_bytes()).await?;
				tracing::info!(
					%key,
					bytes = css.len(),
					elapsed_ms = started.elapsed().as_millis() as u64,
					"stylesheet bundle compiled"
				);
				Outcome::Served(stylesheet(Bytes::from(css), "MISS"))
			}
			Err(e) => {
				tracing::warn!(%key, error = %e, "stylesheet compilation failed");
				Outcome::Served(compile_failure(&e))
			}
		};

		self.store.sweep_except(&key).await;
		Ok(outcome)
	}
}

fn stylesheet(css: Bytes, cache_status: &str) -> Response {
	Response::ok()
		.with_content_type(STYLESHEET_CONTENT_TYPE)
		.with_header(CACHE_STATUS_HEADER, cache_status)
		.with_body(css)
}

fn compile_failure(error: &CompileError) -> Response {
	Response::ok()
		.with_content_type(STYLESHEET_CONTENT_TYPE)
		.with_header(CACHE_STATUS_HEADER, "MISS")
		.with_body(format!("/* less compile error: {} */\n", error.diagnostic()))
}

async fn forward(
	fontstrap: &Fontstrap,
	request: Request,
	next: Arc<dyn Handler>,
) -> fontstrap_http::Result<Response> {
	match fontstrap.respond(&request).await? {
		Outcome::Served(response) => Ok(response),
		Outcome::PassThrough => next.handle(request).await,
	}
}

/// Serves icon fonts, or glyphicon sprites when the icon font is off
pub struct IconAssetMiddleware {
	fontstrap: Arc<Fontstrap>,
}

impl IconAssetMiddleware {
	pub fn new(fontstrap: Arc<Fontstrap>) -> Self {
		Self { fontstrap }
	}
}

#[async_trait]
impl Middleware for IconAssetMiddleware {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> fontstrap_http::Result<Response> {
		forward(&self.fontstrap, request, next).await
	}

	fn should_continue(&self, request: &Request) -> bool {
		self.fontstrap.classify(request.path()).is_icon_asset()
	}
}

/// Serves the compiled bundle from cache, compiling on a miss
pub struct BundleMiddleware {
	fontstrap: Arc<Fontstrap>,
}

impl BundleMiddleware {
	pub fn new(fontstrap: Arc<Fontstrap>) -> Self {
		Self { fontstrap }
	}
}

#[async_trait]
impl Middleware for BundleMiddleware {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> fontstrap_http::Result<Response> {
		forward(&self.fontstrap, request, next).await
	}

	fn should_continue(&self, request: &Request) -> bool {
		self.fontstrap.classify(request.path()) == Classification::StylesheetBundle
	}
}
