//! Typed Fontstrap settings
//!
//! Built once at startup by [`SettingsBuilder`](crate::builder::SettingsBuilder)
//! and handed by value to every component that needs it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name of the root LESS source inside the Bootstrap tree
pub const BASE_SOURCE_NAME: &str = "bootstrap.less";

/// Fontstrap configuration
///
/// Every field has a default, so a partial TOML/JSON document or an empty
/// environment still yields a usable value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontstrapSettings {
	/// Root of the Bootstrap source tree (`less/`, `img/`)
	pub bootstrap_path: PathBuf,

	/// Root of the Font Awesome source tree (`less/`, `font/`)
	pub font_path: PathBuf,

	/// The `lessc` executable, either a bare name looked up on `PATH` or a path
	pub lessc_path: PathBuf,

	/// Directory holding the user's custom `.less` fragments
	pub import_path: PathBuf,

	/// Directory holding compiled `bs_*.css` cache entries
	pub cache_path: PathBuf,

	/// Bundle file name; any request path containing it is served the bundle
	pub bootstrap_name: String,

	/// Replace the glyphicon sprites with the Font Awesome icon font
	#[serde(rename = "font-awesome", alias = "font_awesome")]
	pub font_awesome: bool,

	/// Bootstrap modules whose `@import` is stripped from the bundle
	pub disabled: BTreeSet<String>,

	/// Custom fragments appended to the bundle, in order, by name without extension
	pub custom: Vec<String>,

	/// Upper bound on a single `lessc` run
	pub compile_timeout_secs: u64,
}

impl Default for FontstrapSettings {
	fn default() -> Self {
		Self {
			bootstrap_path: PathBuf::from("vendor/bootstrap"),
			font_path: PathBuf::from("vendor/Font-Awesome"),
			lessc_path: PathBuf::from("lessc"),
			import_path: PathBuf::from("webroot/less"),
			cache_path: PathBuf::from("resources/tmp/cache/css"),
			bootstrap_name: "bootstrap.css".to_string(),
			font_awesome: true,
			disabled: BTreeSet::new(),
			custom: Vec::new(),
			compile_timeout_secs: 30,
		}
	}
}

impl FontstrapSettings {
	/// Create settings with all defaults
	pub fn new() -> Self {
		Self::default()
	}

	/// Set the disabled module list
	///
	/// # Examples
	///
	/// ```
	/// use fontstrap_conf::FontstrapSettings;
	///
	/// let settings = FontstrapSettings::new().with_disabled(["carousel", "hero-unit"]);
	/// assert!(settings.disabled.contains("carousel"));
	/// ```
	pub fn with_disabled<I, S>(mut self, modules: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.disabled = modules.into_iter().map(Into::into).collect();
		self
	}

	/// Set the custom fragment list
	pub fn with_custom<I, S>(mut self, fragments: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.custom = fragments.into_iter().map(Into::into).collect();
		self
	}

	/// Toggle the Font Awesome icon font
	pub fn with_font_awesome(mut self, enabled: bool) -> Self {
		self.font_awesome = enabled;
		self
	}

	/// Resolve relative filesystem settings against `base`
	///
	/// `lessc_path` is only resolved when it contains a directory separator,
	/// so a bare `lessc` keeps its `PATH` lookup.
	///
	/// # Examples
	///
	/// ```
	/// use fontstrap_conf::FontstrapSettings;
	/// use std::path::{Path, PathBuf};
	///
	/// let settings = FontstrapSettings::new().resolve_paths(Path::new("/srv/app"));
	/// assert_eq!(settings.cache_path, PathBuf::from("/srv/app/resources/tmp/cache/css"));
	/// assert_eq!(settings.lessc_path, PathBuf::from("lessc"));
	/// ```
	pub fn resolve_paths(mut self, base: &Path) -> Self {
		let resolve = |path: &mut PathBuf| {
			if path.is_relative() {
				*path = base.join(&*path);
			}
		};

		resolve(&mut self.bootstrap_path);
		resolve(&mut self.font_path);
		resolve(&mut self.import_path);
		resolve(&mut self.cache_path);
		if self.lessc_path.components().count() > 1 {
			resolve(&mut self.lessc_path);
		}
		self
	}

	/// Bootstrap's `less/` directory
	pub fn bootstrap_less_dir(&self) -> PathBuf {
		self.bootstrap_path.join("less")
	}

	/// The root LESS file the bundle is assembled from
	pub fn base_source(&self) -> PathBuf {
		self.bootstrap_less_dir().join(BASE_SOURCE_NAME)
	}

	/// Font Awesome's `less/` directory
	pub fn font_less_dir(&self) -> PathBuf {
		self.font_path.join("less")
	}

	/// Directory the icon-font binaries are served from
	pub fn font_asset_dir(&self) -> PathBuf {
		self.font_path.join("font")
	}

	/// Directory the legacy glyphicon sprites are served from
	pub fn image_asset_dir(&self) -> PathBuf {
		self.bootstrap_path.join("img")
	}

	/// Compiler import search path, highest priority first
	///
	/// # Examples
	///
	/// ```
	/// use fontstrap_conf::FontstrapSettings;
	/// use std::path::PathBuf;
	///
	/// let dirs = FontstrapSettings::new().import_dirs();
	/// assert_eq!(dirs, vec![
	///     PathBuf::from("vendor/bootstrap/less"),
	///     PathBuf::from("vendor/Font-Awesome/less"),
	///     PathBuf::from("webroot/less"),
	/// ]);
	/// ```
	pub fn import_dirs(&self) -> Vec<PathBuf> {
		vec![
			self.bootstrap_less_dir(),
			self.font_less_dir(),
			self.import_path.clone(),
		]
	}

	/// Path a custom fragment name resolves to
	pub fn fragment_path(&self, name: &str) -> PathBuf {
		self.import_path.join(format!("{}.less", name))
	}

	/// Compile timeout as a [`Duration`]
	pub fn compile_timeout(&self) -> Duration {
		Duration::from_secs(self.compile_timeout_secs)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_defaults_match_documented_layout() {
		let settings = FontstrapSettings::default();

		assert!(settings.font_awesome);
		assert!(settings.disabled.is_empty());
		assert!(settings.custom.is_empty());
		assert_eq!(settings.bootstrap_name, "bootstrap.css");
		assert_eq!(
			settings.base_source(),
			PathBuf::from("vendor/bootstrap/less/bootstrap.less")
		);
		assert_eq!(settings.font_asset_dir(), PathBuf::from("vendor/Font-Awesome/font"));
		assert_eq!(settings.image_asset_dir(), PathBuf::from("vendor/bootstrap/img"));
		assert_eq!(settings.compile_timeout(), Duration::from_secs(30));
	}

	#[rstest]
	fn test_partial_document_keeps_defaults() {
		let settings: FontstrapSettings =
			serde_json::from_str(r#"{"disabled": ["carousel"], "font-awesome": false}"#).unwrap();

		assert!(!settings.font_awesome);
		assert!(settings.disabled.contains("carousel"));
		assert_eq!(settings.cache_path, PathBuf::from("resources/tmp/cache/css"));
	}

	#[rstest]
	fn test_font_awesome_accepts_snake_case_alias() {
		let settings: FontstrapSettings =
			serde_json::from_str(r#"{"font_awesome": false}"#).unwrap();
		assert!(!settings.font_awesome);
	}

	#[rstest]
	fn test_fragment_path() {
		let settings = FontstrapSettings::new();
		assert_eq!(
			settings.fragment_path("style"),
			PathBuf::from("webroot/less/style.less")
		);
	}

	#[rstest]
	fn test_resolve_paths_keeps_absolute_and_resolves_lessc_with_dir() {
		let mut settings = FontstrapSettings::new();
		settings.font_path = PathBuf::from("/opt/fa");
		settings.lessc_path = PathBuf::from("node_modules/.bin/lessc");

		let settings = settings.resolve_paths(Path::new("/srv/app"));

		assert_eq!(settings.font_path, PathBuf::from("/opt/fa"));
		assert_eq!(
			settings.lessc_path,
			PathBuf::from("/srv/app/node_modules/.bin/lessc")
		);
		assert_eq!(settings.import_path, PathBuf::from("/srv/app/webroot/less"));
	}
}
