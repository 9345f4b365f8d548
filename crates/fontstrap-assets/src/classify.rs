//! Request path classification.

use fontstrap_conf::FontstrapSettings;
use regex::Regex;
use std::sync::LazyLock;

// Icon font binaries, matched at the end of the path in any case.
static FONT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?i)(fontawesome(?:-webfont)?\.(?:eot|svg|ttf|woff|otf))$")
		.expect("FONT_PATTERN: invalid regex pattern")
});

static GLYPH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(glyphicons-halflings(?:-white)?\.png)")
		.expect("GLYPH_PATTERN: invalid regex pattern")
});

/// What a request path asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
	/// An icon font file, by file name
	FontAsset(String),
	/// A legacy glyphicon sprite, by file name
	LegacyIconImage(String),
	/// The compiled stylesheet bundle
	StylesheetBundle,
	/// Anything else
	Passthrough,
}

impl Classification {
	/// Whether this names a binary icon asset
	pub fn is_icon_asset(&self) -> bool {
		matches!(self, Self::FontAsset(_) | Self::LegacyIconImage(_))
	}
}

/// Classifies request paths for one settings value
///
/// Icon assets are checked before the bundle name, so a path containing
/// both is an icon asset.
///
/// # Examples
///
/// ```
/// use fontstrap_assets::{Classification, Classifier};
/// use fontstrap_conf::FontstrapSettings;
///
/// let classifier = Classifier::new(&FontstrapSettings::default());
///
/// assert_eq!(
///     classifier.classify("/font/fontawesome-webfont.woff"),
///     Classification::FontAsset("fontawesome-webfont.woff".into())
/// );
/// assert_eq!(classifier.classify("/css/bootstrap.css"), Classification::StylesheetBundle);
/// assert_eq!(classifier.classify("/index.html"), Classification::Passthrough);
/// ```
#[derive(Debug, Clone)]
pub struct Classifier {
	bundle_name: String,
	icon_font: bool,
}

impl Classifier {
	pub fn new(settings: &FontstrapSettings) -> Self {
		Self {
			bundle_name: settings.bootstrap_name.clone(),
			icon_font: settings.font_awesome,
		}
	}

	pub fn classify(&self, path: &str) -> Classification {
		let icon = if self.icon_font {
			FONT_PATTERN
				.captures(path)
				.map(|caps| Classification::FontAsset(caps[1].to_string()))
		} else {
			GLYPH_PATTERN
				.captures(path)
				.map(|caps| Classification::LegacyIconImage(caps[1].to_string()))
		};

		if let Some(icon) = icon {
			return icon;
		}

		if !self.bundle_name.is_empty() && path.contains(&self.bundle_name) {
			Classification::StylesheetBundle
		} else {
			Classification::Passthrough
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn classifier(icon_font: bool) -> Classifier {
		Classifier::new(&FontstrapSettings::default().with_font_awesome(icon_font))
	}

	#[rstest]
	#[case("/font/fontawesome-webfont.eot", "fontawesome-webfont.eot")]
	#[case("/font/fontawesome-webfont.svg", "fontawesome-webfont.svg")]
	#[case("/font/fontawesome-webfont.ttf", "fontawesome-webfont.ttf")]
	#[case("/font/fontawesome-webfont.woff", "fontawesome-webfont.woff")]
	#[case("/font/FontAwesome.otf", "FontAwesome.otf")]
	fn test_font_assets(#[case] path: &str, #[case] name: &str) {
		assert_eq!(
			classifier(true).classify(path),
			Classification::FontAsset(name.to_string())
		);
	}

	#[rstest]
	#[case("/img/glyphicons-halflings.png", "glyphicons-halflings.png")]
	#[case("/img/glyphicons-halflings-white.png", "glyphicons-halflings-white.png")]
	fn test_legacy_icons(#[case] path: &str, #[case] name: &str) {
		assert_eq!(
			classifier(false).classify(path),
			Classification::LegacyIconImage(name.to_string())
		);
	}

	#[rstest]
	fn test_icon_class_follows_toggle() {
		assert_eq!(
			classifier(true).classify("/img/glyphicons-halflings.png"),
			Classification::Passthrough
		);
		assert_eq!(
			classifier(false).classify("/font/fontawesome-webfont.woff"),
			Classification::Passthrough
		);
	}

	#[rstest]
	fn test_font_pattern_is_anchored_at_end() {
		assert_eq!(
			classifier(true).classify("/font/fontawesome-webfont.woff.map"),
			Classification::Passthrough
		);
	}

	#[rstest]
	fn test_icon_asset_wins_over_bundle() {
		assert_eq!(
			classifier(true).classify("/bootstrap.css/fontawesome-webfont.woff"),
			Classification::FontAsset("fontawesome-webfont.woff".to_string())
		);
		assert_eq!(
			classifier(false).classify("/bootstrap.css/glyphicons-halflings.png"),
			Classification::LegacyIconImage("glyphicons-halflings.png".to_string())
		);
	}

	#[rstest]
	#[case("/css/bootstrap.css")]
	#[case("/assets/bootstrap.css.map")]
	#[case("/bootstrap.css")]
	fn test_bundle_is_substring_match(#[case] path: &str) {
		assert_eq!(classifier(true).classify(path), Classification::StylesheetBundle);
	}
}
