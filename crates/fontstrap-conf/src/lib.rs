//! # Fontstrap Configuration
//!
//! Layered settings for the stylesheet bundle server.
//!
//! Values come from defaults, an optional TOML or JSON file, and
//! `FONTSTRAP_*` environment variables, merged by priority and
//! deserialized into [`FontstrapSettings`].
//!
//! ## Quick Start
//!
//! ```rust
//! use fontstrap_conf::{DefaultSource, EnvSource, SettingsBuilder};
//!
//! let settings = SettingsBuilder::new()
//!     .add_source(DefaultSource::fontstrap())
//!     .add_source(EnvSource::fontstrap())
//!     .build()
//!     .unwrap();
//!
//! assert!(!settings.bootstrap_name.is_empty());
//! ```
//!
//! ## Module Organization
//!
//! - [`settings`]: the typed settings value and derived paths
//! - [`sources`]: configuration sources
//! - [`builder`]: merging sources into settings

pub mod builder;
pub mod settings;
pub mod sources;

pub use builder::{MergedSettings, SettingsBuilder, SettingsError};
pub use settings::{BASE_SOURCE_NAME, FontstrapSettings};
pub use sources::{
	ConfigSource, DefaultSource, EnvSource, JsonFileSource, SourceError, TomlFileSource,
	auto_source,
};
