//! Stylesheet compilation.
//!
//! [`StyleCompiler`] is the seam the bundle middleware compiles through.
//! [`LesscCompiler`] drives the `lessc` command-line compiler, feeding the
//! assembled source on stdin and reading CSS from stdout.

use async_trait::async_trait;
use fontstrap_conf::FontstrapSettings;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::error::CompileError;

/// Compiles assembled source text to CSS
#[async_trait]
pub trait StyleCompiler: Send + Sync {
	/// Compile `source`, resolving `@import` against `import_dirs` in order
	async fn compile(&self, source: &str, import_dirs: &[PathBuf]) -> Result<String, CompileError>;
}

/// Compiler backed by the external `lessc` executable
#[derive(Debug, Clone)]
pub struct LesscCompiler {
	program: PathBuf,
	timeout: Duration,
}

impl LesscCompiler {
	/// Default upper bound on one compilation
	pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

	pub fn new(program: impl Into<PathBuf>) -> Self {
		Self {
			program: program.into(),
			timeout: Self::DEFAULT_TIMEOUT,
		}
	}

	pub fn from_settings(settings: &FontstrapSettings) -> Self {
		Self::new(&settings.lessc_path).with_timeout(settings.compile_timeout())
	}

	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}

	pub fn program(&self) -> &PathBuf {
		&self.program
	}

	/// Arguments passed to `lessc` for the given import directories
	///
	/// # Examples
	///
	/// ```
	/// use fontstrap_assets::LesscCompiler;
	/// use std::path::PathBuf;
	///
	/// let args = LesscCompiler::new("lessc")
	///     .arguments(&[PathBuf::from("bootstrap/less"), PathBuf::from("font/less")])
	///     .unwrap();
	///
	/// # #[cfg(unix)]
	/// assert_eq!(args, vec!["--include-path=bootstrap/less:font/less", "-"]);
	/// ```
	pub fn arguments(&self, import_dirs: &[PathBuf]) -> Result<Vec<OsString>, CompileError> {
		let joined = std::env::join_paths(import_dirs)
			.map_err(|e| CompileError::InvalidIncludePath(e.to_string()))?;

		let mut include = OsString::from("--include-path=");
		include.push(joined);

		Ok(vec![include, OsString::from("-")])
	}
}

#[async_trait]
impl StyleCompiler for LesscCompiler {
	async fn compile(&self, source: &str, import_dirs: &[PathBuf]) -> Result<String, CompileError> {
		let mut cmd = Command::new(&self.program);
		cmd.args(self.arguments(import_dirs)?)
			.stdin(Stdio::piped())
			.stdout(Stdio::piped())
			.stderr(Stdio::piped())
			.kill_on_drop(true);

		tracing::debug!(program = %self.program.display(), "spawning lessc");

		let mut child = cmd.spawn().map_err(|e| CompileError::Spawn {
			program: self.program.display().to_string(),
			source: e,
		})?;

		// Feed stdin concurrently so a compiler that writes before it has
		// read everything cannot deadlock on a full pipe.
		let stdin = child.stdin.take();
		let input = source.to_owned();
		let writer = tokio::spawn(async move {
			if let Some(mut stdin) = stdin {
				stdin.write_all(input.as_bytes()).await?;
				stdin.shutdown().await?;
			}
			Ok::<_, std::io::Error>(())
		});

		let output = tokio::time::timeout(self.timeout, child.wait_with_output())
			.await
			.map_err(|_| CompileError::TimedOut(self.timeout))??;

		if let Ok(Err(e)) = writer.await {
			tracing::debug!(error = %e, "lessc closed stdin early");
		}

		if !output.status.success() {
			let stderr = String::from_utf8_lossy(&output.stderr);
			let diagnostic = match stderr.trim() {
				"" => format!("lessc exited with {}", output.status),
				message => message.to_string(),
			};
			return Err(CompileError::Failed {
				status: output.status.to_string(),
				diagnostic,
			});
		}

		Ok(String::from_utf8_lossy(&output.stdout).into_owned())
	}
}
