//! Cache key derivation against real fragment files

mod fixtures;

use fixtures::Site;
use fontstrap_assets::CacheKey;
use rstest::{fixture, rstest};
use std::time::{Duration, UNIX_EPOCH};

#[fixture]
fn site() -> Site {
	Site::new()
}

#[rstest]
fn test_derive_is_deterministic(site: Site) {
	site.write_fragment("style", "a { color: red; }", 1_700_000_000);
	let settings = site.settings.clone().with_custom(["style"]);

	let first = CacheKey::derive(&settings);
	let second = CacheKey::derive(&settings);

	assert_eq!(first, second);
	assert_eq!(first.file_name(), second.file_name());
}

#[rstest]
fn test_disabling_a_module_changes_config_fingerprint(site: Site) {
	let before = CacheKey::derive(&site.settings);
	let after = CacheKey::derive(&site.settings.clone().with_disabled(["carousel"]));

	assert_ne!(before.config, after.config);
	assert_eq!(before.content, after.content);
}

#[rstest]
fn test_toggling_icon_font_changes_config_fingerprint(site: Site) {
	let on = CacheKey::derive(&site.settings.clone().with_font_awesome(true));
	let off = CacheKey::derive(&site.settings.clone().with_font_awesome(false));

	assert_ne!(on.config, off.config);
}

#[rstest]
fn test_touching_a_fragment_changes_content_fingerprint(site: Site) {
	let path = site.write_fragment("style", "a { color: red; }", 1_700_000_000);
	let settings = site.settings.clone().with_custom(["style"]);
	let before = CacheKey::derive(&settings);

	site.touch(&path, 1_700_000_060);
	let after = CacheKey::derive(&settings);

	assert_eq!(before.config, after.config);
	assert_ne!(before.content, after.content);
}

#[rstest]
fn test_fragment_dated_before_epoch_still_counts(site: Site) {
	let path = site.write_fragment("style", "a { color: red; }", 0);
	let settings = site.settings.clone().with_custom(["style"]);
	let without = CacheKey::derive(&site.settings);

	site.touch_at(&path, UNIX_EPOCH - Duration::from_secs(86_400));
	let before = CacheKey::derive(&settings);
	site.touch_at(&path, UNIX_EPOCH - Duration::from_secs(3_600));
	let after = CacheKey::derive(&settings);

	assert_ne!(before.content, without.content);
	assert_ne!(before.content, after.content);
}

#[rstest]
fn test_changing_fragment_list_changes_content_fingerprint(site: Site) {
	site.write_fragment("style", "a {}", 1_700_000_000);
	site.write_fragment("theme", "b {}", 1_700_000_000);

	let style = CacheKey::derive(&site.settings.clone().with_custom(["style"]));
	let theme = CacheKey::derive(&site.settings.clone().with_custom(["theme"]));
	let both = CacheKey::derive(&site.settings.clone().with_custom(["style", "theme"]));

	assert_ne!(style.content, theme.content);
	assert_ne!(style.content, both.content);
}

#[rstest]
fn test_missing_fragment_is_skipped(site: Site) {
	site.write_fragment("style", "a {}", 1_700_000_000);

	let present = CacheKey::derive(&site.settings.clone().with_custom(["style"]));
	let with_ghost = CacheKey::derive(&site.settings.clone().with_custom(["style", "ghost"]));

	assert_eq!(present, with_ghost);
}

#[rstest]
fn test_file_name_layout(site: Site) {
	let key = CacheKey::derive(&site.settings);
	let name = key.file_name();

	assert!(name.starts_with("bs_"));
	assert!(name.ends_with(".css"));
	assert_eq!(name, format!("bs_{}.{}.css", key.config, key.content));
}
