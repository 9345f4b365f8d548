//! Merge configuration sources into typed settings

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::settings::FontstrapSettings;
use crate::sources::{ConfigSource, SourceError};

/// Spellings folded onto their canonical key before merging
const KEY_ALIASES: &[(&str, &str)] = &[("font_awesome", "font-awesome")];

/// Error raised while building settings
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("Failed to load {description}: {source}")]
	Source {
		description: String,
		#[source]
		source: SourceError,
	},

	#[error("Invalid settings: {0}")]
	Deserialize(#[from] serde_json::Error),
}

/// Merged key/value view over all sources
#[derive(Debug, Clone, Default)]
pub struct MergedSettings {
	values: IndexMap<String, Value>,
}

impl MergedSettings {
	/// Look up a raw merged value
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.values.get(key)
	}

	/// Iterate over merged keys in insertion order
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.values.keys().map(String::as_str)
	}

	/// Deserialize the merged values into `T`
	pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, SettingsError> {
		let object: serde_json::Map<String, Value> = self.values.into_iter().collect();
		Ok(serde_json::from_value(Value::Object(object))?)
	}
}

/// Layered settings builder
///
/// Sources are applied in ascending priority, so a key set by a
/// higher-priority source replaces the whole value from a lower one.
///
/// # Examples
///
/// ```
/// use fontstrap_conf::builder::SettingsBuilder;
/// use fontstrap_conf::sources::DefaultSource;
/// use serde_json::json;
///
/// let settings = SettingsBuilder::new()
///     .add_source(DefaultSource::fontstrap())
///     .add_source(DefaultSource::new().with_value("disabled", json!(["carousel"])))
///     .build()
///     .unwrap();
///
/// assert!(settings.disabled.contains("carousel"));
/// assert!(settings.font_awesome);
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl SettingsBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a configuration source
	pub fn add_source<S: ConfigSource + 'static>(mut self, source: S) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Add an already boxed source, as returned by [`auto_source`](crate::sources::auto_source)
	pub fn add_boxed_source(mut self, source: Box<dyn ConfigSource>) -> Self {
		self.sources.push(source);
		self
	}

	/// Load and merge every source without deserializing
	pub fn build_raw(mut self) -> Result<MergedSettings, SettingsError> {
		// Stable sort keeps insertion order between equal priorities.
		self.sources.sort_by_key(|source| source.priority());

		let mut values = IndexMap::new();
		for source in &self.sources {
			let loaded = source.load().map_err(|e| SettingsError::Source {
				description: source.description(),
				source: e,
			})?;
			tracing::debug!(
				source = %source.description(),
				keys = loaded.len(),
				"loaded configuration source"
			);

			for (key, value) in loaded {
				values.insert(canonical_key(key), value);
			}
		}

		Ok(MergedSettings { values })
	}

	/// Load, merge and deserialize into [`FontstrapSettings`]
	pub fn build(self) -> Result<FontstrapSettings, SettingsError> {
		self.build_raw()?.into_typed()
	}
}

fn canonical_key(key: String) -> String {
	KEY_ALIASES
		.iter()
		.find(|(alias, _)| *alias == key)
		.map(|(_, canonical)| canonical.to_string())
		.unwrap_or(key)
}
