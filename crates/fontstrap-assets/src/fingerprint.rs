//! Cache key derivation.
//!
//! A cache key is a pair of short fingerprints: one over the settings that
//! shape the bundle source, one over the modification times of the custom
//! fragments appended to it. Both are SHA-256 digests of a JSON rendering of
//! their inputs, so they are stable across runs and platforms.

use fontstrap_conf::FontstrapSettings;
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Hex characters kept from each digest
pub const FINGERPRINT_LEN: usize = 32;

/// Identifies one compiled bundle
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
	pub config: String,
	pub content: String,
}

impl CacheKey {
	/// Derive the key for the current settings and fragment files
	///
	/// Fragments that do not exist on disk are left out of the content
	/// fingerprint rather than reported.
	pub fn derive(settings: &FontstrapSettings) -> Self {
		let fragments = settings
			.custom
			.iter()
			.map(|name| (name.as_str(), settings.fragment_path(name)));

		Self {
			config: config_fingerprint(&settings.disabled, settings.font_awesome),
			content: content_fingerprint(fragments),
		}
	}

	/// File name of the cache entry for this key
	///
	/// # Examples
	///
	/// ```
	/// use fontstrap_assets::CacheKey;
	///
	/// let key = CacheKey { config: "abc".into(), content: "def".into() };
	/// assert_eq!(key.file_name(), "bs_abc.def.css");
	/// ```
	pub fn file_name(&self) -> String {
		format!("bs_{}.{}.css", self.config, self.content)
	}
}

impl fmt::Display for CacheKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}.{}", self.config, self.content)
	}
}

/// Fingerprint of the disabled module set and the icon font toggle
///
/// `BTreeSet` serializes in sorted order, so insertion order never matters.
pub fn config_fingerprint(disabled: &BTreeSet<String>, font_awesome: bool) -> String {
	let modules = serde_json::to_string(disabled).unwrap_or_default();
	digest(format!("{}-{}", modules, font_awesome).as_bytes())
}

/// Fingerprint of `(name, path)` fragments by modification time, in order
pub fn content_fingerprint<'a, I, P>(fragments: I) -> String
where
	I: IntoIterator<Item = (&'a str, P)>,
	P: AsRef<Path>,
{
	let stamps: Vec<Value> = fragments
		.into_iter()
		.filter_map(|(name, path)| {
			let modified = path.as_ref().metadata().ok()?.modified().ok()?;
			let (secs, nanos) = epoch_offset(modified);
			Some(json!([name, secs, nanos]))
		})
		.collect();

	digest(Value::Array(stamps).to_string().as_bytes())
}

/// Signed seconds and non-negative nanoseconds relative to the Unix epoch
///
/// Times before 1970 floor to a negative second, so `(-2, 500_000_000)` is
/// one and a half seconds before the epoch.
fn epoch_offset(time: SystemTime) -> (i64, u32) {
	match time.duration_since(UNIX_EPOCH) {
		Ok(since) => (since.as_secs() as i64, since.subsec_nanos()),
		Err(err) => {
			let before = err.duration();
			let secs = -(before.as_secs() as i64);
			match before.subsec_nanos() {
				0 => (secs, 0),
				nanos => (secs - 1, 1_000_000_000 - nanos),
			}
		}
	}
}

fn digest(input: &[u8]) -> String {
	let mut hasher = Sha256::new();
	hasher.update(input);
	let mut encoded = hex::encode(hasher.finalize());
	encoded.truncate(FINGERPRINT_LEN);
	encoded
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::time::Duration;

	fn set(names: &[&str]) -> BTreeSet<String> {
		names.iter().map(|s| s.to_string()).collect()
	}

	#[rstest]
	fn test_config_fingerprint_ignores_order() {
		let a = config_fingerprint(&set(&["carousel", "accordion"]), true);
		let b = config_fingerprint(&set(&["accordion", "carousel"]), true);
		assert_eq!(a, b);
		assert_eq!(a.len(), FINGERPRINT_LEN);
	}

	#[rstest]
	#[case(set(&[]), true, set(&["carousel"]), true)]
	#[case(set(&["carousel"]), true, set(&["carousel"]), false)]
	#[case(set(&["carousel"]), false, set(&["carousel", "hero-unit"]), false)]
	fn test_config_fingerprint_sensitivity(
		#[case] left: BTreeSet<String>,
		#[case] left_icons: bool,
		#[case] right: BTreeSet<String>,
		#[case] right_icons: bool,
	) {
		assert_ne!(
			config_fingerprint(&left, left_icons),
			config_fingerprint(&right, right_icons)
		);
	}

	#[rstest]
	#[case(UNIX_EPOCH + Duration::new(1_700_000_000, 250), (1_700_000_000, 250))]
	#[case(UNIX_EPOCH, (0, 0))]
	#[case(UNIX_EPOCH - Duration::from_secs(86_400), (-86_400, 0))]
	#[case(UNIX_EPOCH - Duration::new(1, 500_000_000), (-2, 500_000_000))]
	fn test_epoch_offset(#[case] time: SystemTime, #[case] expected: (i64, u32)) {
		assert_eq!(epoch_offset(time), expected);
	}

	#[rstest]
	fn test_content_fingerprint_skips_missing_files() {
		let none: Vec<(&str, &Path)> = Vec::new();
		let missing = vec![("ghost", Path::new("/nonexistent/ghost.less"))];
		assert_eq!(content_fingerprint(none), content_fingerprint(missing));
	}
}
