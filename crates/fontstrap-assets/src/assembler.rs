//! Bundle source assembly.
//!
//! The bundle is built by plain text substitution on Bootstrap's root
//! `bootstrap.less`: disabled module imports are removed by exact match,
//! custom fragment imports are appended, and the glyphicon import is pointed
//! at Font Awesome. Names that match nothing are reported and skipped.

use fontstrap_conf::FontstrapSettings;
use std::collections::BTreeSet;
use std::io;
use std::path::PathBuf;

/// Import target replaced when the icon font is enabled
pub const GLYPH_STYLESHEET: &str = "glyphicons.less";

/// Import target substituted for [`GLYPH_STYLESHEET`]
pub const ICON_FONT_STYLESHEET: &str = "font-awesome.less";

/// The `@import` statement for a module or fragment name
///
/// # Examples
///
/// ```
/// use fontstrap_assets::assembler::import_statement;
///
/// assert_eq!(import_statement("carousel"), r#"@import "carousel.less";"#);
/// ```
pub fn import_statement(name: &str) -> String {
	format!("@import \"{}.less\";", name)
}

/// Builds bundle source text from settings
#[derive(Debug, Clone)]
pub struct BundleAssembler {
	base_source: PathBuf,
	disabled: BTreeSet<String>,
	custom: Vec<(String, PathBuf)>,
	icon_font: bool,
}

impl BundleAssembler {
	pub fn new(settings: &FontstrapSettings) -> Self {
		Self {
			base_source: settings.base_source(),
			disabled: settings.disabled.clone(),
			custom: settings
				.custom
				.iter()
				.map(|name| (name.clone(), settings.fragment_path(name)))
				.collect(),
			icon_font: settings.font_awesome,
		}
	}

	/// The root source file the bundle starts from
	pub fn base_source(&self) -> &PathBuf {
		&self.base_source
	}

	/// Read the base source and rewrite it
	///
	/// Returns `None` when the base source does not exist, in which case
	/// there is nothing to compile.
	pub async fn assemble(&self) -> io::Result<Option<String>> {
		let base = match tokio::fs::read_to_string(&self.base_source).await {
			Ok(base) => base,
			Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
			Err(e) => return Err(e),
		};

		for (name, path) in &self.custom {
			if !tokio::fs::try_exists(path).await.unwrap_or(false) {
				tracing::warn!(fragment = %name, path = %path.display(), "custom fragment not found");
			}
		}

		Ok(Some(self.rewrite(&base)))
	}

	/// Apply the substitutions to `base`
	///
	/// # Examples
	///
	/// ```
	/// use fontstrap_assets::BundleAssembler;
	/// use fontstrap_conf::FontstrapSettings;
	///
	/// let settings = FontstrapSettings::new()
	///     .with_disabled(["carousel"])
	///     .with_custom(["style"]);
	/// let assembler = BundleAssembler::new(&settings);
	///
	/// let source = assembler.rewrite("@import \"carousel.less\";\n@import \"glyphicons.less\";\n");
	/// assert_eq!(source, "\n@import \"font-awesome.less\";\n\n@import \"style.less\";\n");
	/// ```
	pub fn rewrite(&self, base: &str) -> String {
		let mut source = base.to_string();

		for module in &self.disabled {
			let statement = import_statement(module);
			if source.contains(&statement) {
				source = source.replace(&statement, "");
			} else {
				tracing::warn!(module = %module, "disabled module is not imported by the base source");
			}
		}

		for (name, _) in &self.custom {
			source.push('\n');
			source.push_str(&import_statement(name));
			source.push('\n');
		}

		if self.icon_font {
			source = source.replace(GLYPH_STYLESHEET, ICON_FONT_STYLESHEET);
		}

		source
	}
}
