//! Configuration sources for layered settings
//!
//! Sources are merged in priority order
//! (environment variables > config files > defaults).

use indexmap::IndexMap;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::settings::FontstrapSettings;

/// Prefix for environment variables read by [`EnvSource::fontstrap`]
pub const ENV_PREFIX: &str = "FONTSTRAP_";

/// How a raw environment value is converted for a given key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
	/// Comma-separated list of strings
	List,
	Bool,
	Integer,
}

/// Keys whose environment value is not a plain string
const TYPED_KEYS: &[(&str, ValueKind)] = &[
	("disabled", ValueKind::List),
	("custom", ValueKind::List),
	("font-awesome", ValueKind::Bool),
	("font_awesome", ValueKind::Bool),
	("compile_timeout_secs", ValueKind::Integer),
];

/// Trait for configuration sources
pub trait ConfigSource: Send + Sync {
	/// Load configuration from this source
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError>;

	/// Get the priority of this source (higher = more important)
	fn priority(&self) -> u8;

	/// Get a description of this source
	fn description(&self) -> String;
}

/// Error type for configuration sources
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Parse error: {0}")]
	Parse(String),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("Invalid source: {0}")]
	InvalidSource(String),
}

/// Environment variable configuration source
pub struct EnvSource {
	prefix: Option<String>,
}

impl EnvSource {
	/// Create a source over all environment variables
	pub fn new() -> Self {
		Self { prefix: None }
	}

	/// Create a source over `FONTSTRAP_*` variables
	///
	/// # Examples
	///
	/// ```
	/// use fontstrap_conf::sources::{ConfigSource, EnvSource};
	///
	/// let source = EnvSource::fontstrap();
	/// assert_eq!(source.description(), "Environment variables (prefix: FONTSTRAP_)");
	/// ```
	pub fn fontstrap() -> Self {
		Self::new().with_prefix(ENV_PREFIX)
	}

	/// Set a prefix filter for environment variables
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = Some(prefix.into());
		self
	}

	/// Convert one raw environment value to a JSON value for `key`
	///
	/// Values that do not parse as their key's kind stay strings, so the
	/// settings build reports them against the right field.
	fn parse_value(key: &str, value: String) -> Value {
		let kind = TYPED_KEYS
			.iter()
			.find(|(name, _)| *name == key)
			.map(|(_, kind)| *kind);

		match kind {
			Some(ValueKind::List) => Value::Array(
				value
					.split(',')
					.map(str::trim)
					.filter(|s| !s.is_empty())
					.map(|s| Value::String(s.to_string()))
					.collect(),
			),
			Some(ValueKind::Bool) => match value.trim().to_lowercase().as_str() {
				"true" | "yes" | "on" | "1" => Value::Bool(true),
				"false" | "no" | "off" | "0" => Value::Bool(false),
				_ => Value::String(value),
			},
			Some(ValueKind::Integer) => match value.trim().parse::<u64>() {
				Ok(num) => Value::Number(num.into()),
				Err(_) => Value::String(value),
			},
			None => Value::String(value),
		}
	}
}

impl Default for EnvSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for EnvSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		let mut config = IndexMap::new();

		for (key, value) in std::env::vars() {
			let clean_key = match &self.prefix {
				Some(prefix) => match key.strip_prefix(prefix.as_str()) {
					Some(rest) => rest,
					None => continue,
				},
				None => key.as_str(),
			};

			let lower_key = clean_key.to_lowercase();
			let parsed = Self::parse_value(&lower_key, value);
			config.insert(lower_key, parsed);
		}

		Ok(config)
	}

	fn priority(&self) -> u8 {
		100
	}

	fn description(&self) -> String {
		match &self.prefix {
			Some(prefix) => format!("Environment variables (prefix: {})", prefix),
			None => "Environment variables".to_string(),
		}
	}
}

/// TOML file configuration source
///
/// A missing file loads as empty.
pub struct TomlFileSource {
	path: PathBuf,
}

impl TomlFileSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

impl ConfigSource for TomlFileSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		if !self.path.exists() {
			return Ok(IndexMap::new());
		}

		let content = fs::read_to_string(&self.path)?;
		let toml_value: toml::Value = toml::from_str(&content)?;
		let json_value = serde_json::to_value(toml_value)?;

		into_map(json_value)
	}

	fn priority(&self) -> u8 {
		50
	}

	fn description(&self) -> String {
		format!("TOML file: {}", self.path.display())
	}
}

/// JSON file configuration source
///
/// A missing file loads as empty.
pub struct JsonFileSource {
	path: PathBuf,
}

impl JsonFileSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

impl ConfigSource for JsonFileSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		if !self.path.exists() {
			return Ok(IndexMap::new());
		}

		let content = fs::read_to_string(&self.path)?;
		let json_value: Value = serde_json::from_str(&content)?;

		into_map(json_value)
	}

	fn priority(&self) -> u8 {
		50
	}

	fn description(&self) -> String {
		format!("JSON file: {}", self.path.display())
	}
}

/// Default values configuration source
pub struct DefaultSource {
	values: IndexMap<String, Value>,
}

impl DefaultSource {
	/// Create an empty default source
	pub fn new() -> Self {
		Self {
			values: IndexMap::new(),
		}
	}

	/// Default source holding every [`FontstrapSettings`] default
	///
	/// # Examples
	///
	/// ```
	/// use fontstrap_conf::sources::{ConfigSource, DefaultSource};
	/// use serde_json::Value;
	///
	/// let values = DefaultSource::fontstrap().load().unwrap();
	/// assert_eq!(values.get("font-awesome"), Some(&Value::Bool(true)));
	/// assert_eq!(values.get("bootstrap_name"), Some(&Value::String("bootstrap.css".into())));
	/// ```
	pub fn fontstrap() -> Self {
		let mut source = Self::new();
		if let Ok(Value::Object(map)) = serde_json::to_value(FontstrapSettings::default()) {
			source.values.extend(map);
		}
		source
	}

	/// Add a default value for a configuration key
	pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
		self.values.insert(key.into(), value);
		self
	}
}

impl Default for DefaultSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for DefaultSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		Ok(self.values.clone())
	}

	fn priority(&self) -> u8 {
		0
	}

	fn description(&self) -> String {
		"Default values".to_string()
	}
}

/// Auto-detect configuration source based on file extension
///
/// # Examples
///
/// ```
/// use fontstrap_conf::sources::auto_source;
///
/// assert!(auto_source("fontstrap.toml").is_ok());
/// assert!(auto_source("fontstrap.json").is_ok());
/// assert!(auto_source("fontstrap.ini").is_err());
/// ```
pub fn auto_source(path: impl AsRef<Path>) -> Result<Box<dyn ConfigSource>, SourceError> {
	let path = path.as_ref();
	let ext = path
		.extension()
		.and_then(|e| e.to_str())
		.ok_or_else(|| SourceError::InvalidSource("No file extension".to_string()))?;

	match ext {
		"toml" => Ok(Box::new(TomlFileSource::new(path))),
		"json" => Ok(Box::new(JsonFileSource::new(path))),
		_ => Err(SourceError::InvalidSource(format!(
			"Unsupported file extension: {}",
			ext
		))),
	}
}

fn into_map(value: Value) -> Result<IndexMap<String, Value>, SourceError> {
	match value {
		Value::Object(map) => Ok(map.into_iter().collect()),
		_ => Err(SourceError::Parse("Expected object at root".to_string())),
	}
}
