//! Shared fixtures: a scratch Bootstrap / Font Awesome tree and a
//! recording compiler.

#![allow(dead_code)]

use async_trait::async_trait;
use fontstrap_assets::{CompileError, StyleCompiler};
use fontstrap_conf::FontstrapSettings;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

pub const BOOTSTRAP_LESS: &str = r#"// Core variables and mixins
@import "variables.less";
@import "mixins.less";

// Components
@import "sprites.less";
@import "glyphicons.less";
@import "carousel.less";
@import "hero-unit.less";
"#;

pub const WEBFONT_BYTES: &[u8] = b"wOFF\x00\x01\x00\x00fake-woff";
pub const SPRITE_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-png";

/// Marker that makes [`RecordingCompiler`] fail
pub const BROKEN_MARKER: &str = "@@broken";

/// A site root with Bootstrap, Font Awesome, user fragments and a cache dir
pub struct Site {
	pub root: TempDir,
	pub settings: FontstrapSettings,
}

impl Site {
	pub fn new() -> Self {
		let root = TempDir::new().unwrap();
		let settings = FontstrapSettings::new().resolve_paths(root.path());

		fs::create_dir_all(settings.bootstrap_less_dir()).unwrap();
		fs::create_dir_all(settings.image_asset_dir()).unwrap();
		fs::create_dir_all(settings.font_less_dir()).unwrap();
		fs::create_dir_all(settings.font_asset_dir()).unwrap();
		fs::create_dir_all(&settings.import_path).unwrap();

		fs::write(settings.base_source(), BOOTSTRAP_LESS).unwrap();
		fs::write(
			settings.font_asset_dir().join("fontawesome-webfont.woff"),
			WEBFONT_BYTES,
		)
		.unwrap();
		fs::write(
			settings.image_asset_dir().join("glyphicons-halflings.png"),
			SPRITE_BYTES,
		)
		.unwrap();

		Self { root, settings }
	}

	pub fn cache_dir(&self) -> &Path {
		&self.settings.cache_path
	}

	/// Write a custom fragment with an explicit modification time
	pub fn write_fragment(&self, name: &str, content: &str, modified_secs: u64) -> PathBuf {
		let path = self.settings.fragment_path(name);
		fs::write(&path, content).unwrap();
		self.touch(&path, modified_secs);
		path
	}

	pub fn touch(&self, path: &Path, modified_secs: u64) {
		self.touch_at(path, SystemTime::UNIX_EPOCH + Duration::from_secs(modified_secs));
	}

	pub fn touch_at(&self, path: &Path, when: SystemTime) {
		File::options()
			.write(true)
			.open(path)
			.unwrap()
			.set_modified(when)
			.unwrap();
	}

	/// Names of files in the cache directory matching `bs_*.css`
	pub fn cache_files(&self) -> Vec<String> {
		let Ok(dir) = fs::read_dir(self.cache_dir()) else {
			return Vec::new();
		};
		let mut names: Vec<String> = dir
			.map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
			.filter(|n| n.starts_with("bs_") && n.ends_with(".css"))
			.collect();
		names.sort();
		names
	}
}

/// Compiler that records every source it is given
///
/// Output is the source wrapped in a comment header. Compilation fails with
/// a parse diagnostic when the source, or any file it imports from the
/// import directories, contains [`BROKEN_MARKER`].
#[derive(Default)]
pub struct RecordingCompiler {
	pub calls: Mutex<Vec<(String, Vec<PathBuf>)>>,
}

impl RecordingCompiler {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn call_count(&self) -> usize {
		self.calls.lock().unwrap().len()
	}

	pub fn last_source(&self) -> Option<String> {
		self.calls.lock().unwrap().last().map(|(s, _)| s.clone())
	}

	pub fn last_import_dirs(&self) -> Option<Vec<PathBuf>> {
		self.calls.lock().unwrap().last().map(|(_, d)| d.clone())
	}
}

#[async_trait]
impl StyleCompiler for RecordingCompiler {
	async fn compile(&self, source: &str, import_dirs: &[PathBuf]) -> Result<String, CompileError> {
		self.calls
			.lock()
			.unwrap()
			.push((source.to_string(), import_dirs.to_vec()));

		// Give concurrent callers a chance to interleave.
		tokio::task::yield_now().await;

		if source.contains(BROKEN_MARKER) || imports_broken_file(source, import_dirs) {
			return Err(CompileError::failed(
				"ParseError: Unrecognised input in style.less on line 1",
			));
		}
		Ok(format!("/* compiled */\n{}", source))
	}
}

fn imports_broken_file(source: &str, import_dirs: &[PathBuf]) -> bool {
	source
		.lines()
		.filter_map(|line| line.trim().strip_prefix("@import \"")?.strip_suffix("\";"))
		.any(|name| {
			import_dirs.iter().any(|dir| {
				fs::read_to_string(dir.join(name))
					.map(|content| content.contains(BROKEN_MARKER))
					.unwrap_or(false)
			})
		})
}
