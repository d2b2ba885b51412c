//! Tests for Claude CLI discovery.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use claude_bridge::cli::ToolLocator;

fn touch(path: &Path, executable: bool) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "#!/bin/sh\n").unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = if executable { 0o755 } else { 0o644 };
        fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
    }
    #[cfg(not(unix))]
    let _ = executable;
}

fn search_path<P: AsRef<Path>>(dirs: &[P]) -> Option<OsString> {
    Some(std::env::join_paths(dirs.iter().map(|d| d.as_ref().to_path_buf())).unwrap())
}

#[test]
fn search_path_wins_over_existing_fallback() {
    let root = tempfile::tempdir().unwrap();
    let on_path = root.path().join("bin").join("claude");
    let fallback = root.path().join("fallback").join("claude");
    touch(&on_path, true);
    touch(&fallback, true);

    let locator = ToolLocator::new(
        "claude",
        search_path(&[root.path().join("bin")]),
        vec![fallback],
    );

    assert_eq!(locator.locate().unwrap(), on_path);
}

#[test]
fn search_path_order_is_respected() {
    let root = tempfile::tempdir().unwrap();
    let first = root.path().join("first");
    let second = root.path().join("second");
    touch(&first.join("claude"), true);
    touch(&second.join("claude"), true);

    let locator = ToolLocator::new("claude", search_path(&[&first, &second]), vec![]);

    assert_eq!(locator.locate().unwrap(), first.join("claude"));
}

#[test]
fn fallback_used_when_not_on_search_path() {
    let root = tempfile::tempdir().unwrap();
    let empty_bin = root.path().join("bin");
    fs::create_dir_all(&empty_bin).unwrap();
    let missing = root.path().join("missing").join("claude");
    let fallback = root.path().join("npm").join("claude");
    touch(&fallback, false);

    let locator = ToolLocator::new(
        "claude",
        search_path(&[&empty_bin]),
        vec![missing, fallback.clone()],
    );

    assert_eq!(locator.locate().unwrap(), fallback);
}

#[cfg(unix)]
#[test]
fn non_executable_on_search_path_is_skipped() {
    let root = tempfile::tempdir().unwrap();
    let bin = root.path().join("bin");
    let fallback = root.path().join("fallback").join("claude");
    touch(&bin.join("claude"), false);
    touch(&fallback, true);

    let locator = ToolLocator::new("claude", search_path(&[&bin]), vec![fallback.clone()]);

    assert_eq!(locator.locate().unwrap(), fallback);
}

#[test]
fn not_found_when_nothing_exists() {
    let root = tempfile::tempdir().unwrap();
    let locator = ToolLocator::new(
        "claude",
        search_path(&[root.path()]),
        vec![PathBuf::from("/nonexistent/claude")],
    );

    let err = locator.locate().unwrap_err();
    assert!(err.searched.contains(&PathBuf::from("/nonexistent/claude")));
}

#[test]
fn extra_fallbacks_are_appended() {
    let locator = ToolLocator::new("claude", None, vec![PathBuf::from("/a/claude")])
        .with_extra_fallbacks(vec![PathBuf::from("/b/claude")]);

    assert_eq!(
        locator.fallbacks(),
        &[PathBuf::from("/a/claude"), PathBuf::from("/b/claude")]
    );
}
