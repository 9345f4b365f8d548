//! Single-slot on-disk cache of compiled bundles.

use bytes::Bytes;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::fingerprint::CacheKey;

const ENTRY_PREFIX: &str = "bs_";
const ENTRY_SUFFIX: &str = ".css";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Whether `name` is a cache entry file name (`bs_*.css`)
///
/// # Examples
///
/// ```
/// use fontstrap_assets::store::is_entry_name;
///
/// assert!(is_entry_name("bs_abc.def.css"));
/// assert!(!is_entry_name("bootstrap.css"));
/// assert!(!is_entry_name(".bs_abc.def.css.1.tmp"));
/// ```
pub fn is_entry_name(name: &str) -> bool {
	name.starts_with(ENTRY_PREFIX) && name.ends_with(ENTRY_SUFFIX)
}

/// Compiled bundle cache rooted at one directory
///
/// Entries are named after their [`CacheKey`]. Writes land in a hidden
/// temporary file first and are renamed into place, so readers see either
/// the old state or the complete new entry.
#[derive(Debug, Clone)]
pub struct CacheStore {
	dir: PathBuf,
}

impl CacheStore {
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}

	/// Path of the entry for `key`
	pub fn path_for(&self, key: &CacheKey) -> PathBuf {
		self.dir.join(key.file_name())
	}

	/// Create the cache directory if needed
	///
	/// Safe to call concurrently; an existing directory is not an error.
	pub async fn ensure_directory(&self) -> io::Result<()> {
		tokio::fs::create_dir_all(&self.dir).await
	}

	pub async fn exists(&self, key: &CacheKey) -> bool {
		tokio::fs::try_exists(self.path_for(key))
			.await
			.unwrap_or(false)
	}

	/// Read the entry for `key`, `None` if it is absent
	pub async fn read(&self, key: &CacheKey) -> io::Result<Option<Bytes>> {
		match tokio::fs::read(self.path_for(key)).await {
			Ok(data) => Ok(Some(Bytes::from(data))),
			Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
			Err(e) => Err(e),
		}
	}

	/// Atomically store `data` as the entry for `key`
	pub async fn write(&self, key: &CacheKey, data: &[u8]) -> io::Result<()> {
		self.ensure_directory().await?;

		let target = self.path_for(key);
		let temp = self.dir.join(format!(
			".{}.{}.{}.tmp",
			key.file_name(),
			std::process::id(),
			TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
		));

		tokio::fs::write(&temp, data).await?;
		if let Err(e) = tokio::fs::rename(&temp, &target).await {
			let _ = tokio::fs::remove_file(&temp).await;
			return Err(e);
		}
		Ok(())
	}

	/// Live entry files, sorted by name
	///
	/// A missing cache directory has no entries.
	pub async fn entries(&self) -> io::Result<Vec<PathBuf>> {
		let mut dir = match tokio::fs::read_dir(&self.dir).await {
			Ok(dir) => dir,
			Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
			Err(e) => return Err(e),
		};

		let mut entries = Vec::new();
		while let Some(entry) = dir.next_entry().await? {
			if entry.file_name().to_str().is_some_and(is_entry_name) {
				entries.push(entry.path());
			}
		}
		entries.sort();
		Ok(entries)
	}

	/// Delete every entry; returns how many were removed
	pub async fn sweep(&self) -> usize {
		self.sweep_matching(|_| true).await
	}

	/// Delete every entry except the one for `keep`
	pub async fn sweep_except(&self, keep: &CacheKey) -> usize {
		let keep = self.path_for(keep);
		self.sweep_matching(|path| path != keep.as_path()).await
	}

	// Best-effort: failures are logged and skipped.
	async fn sweep_matching<F>(&self, remove: F) -> usize
	where
		F: Fn(&Path) -> bool,
	{
		let entries = match self.entries().await {
			Ok(entries) => entries,
			Err(e) => {
				tracing::warn!(dir = %self.dir.display(), error = %e, "cannot list cache directory");
				return 0;
			}
		};

		let mut removed = 0;
		for path in entries.iter().filter(|p| remove(p.as_path())) {
			match tokio::fs::remove_file(path).await {
				Ok(()) => removed += 1,
				Err(e) if e.kind() == io::ErrorKind::NotFound => {}
				Err(e) => {
					tracing::warn!(path = %path.display(), error = %e, "failed to remove stale cache entry");
				}
			}
		}

		if removed > 0 {
			tracing::debug!(removed, "swept stale cache entries");
		}
		removed
	}
}
