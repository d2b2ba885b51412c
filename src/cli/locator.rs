//! Claude CLI executable discovery.
//!
//! Looks on the executable search path first, then in the install locations
//! used by the common package managers.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Name of the Claude Code executable.
pub const CLAUDE_BINARY: &str = "claude";

/// Error returned when no candidate exists.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Claude CLI not found")]
pub struct LocateError {
    /// Every location that was checked, in order.
    pub searched: Vec<PathBuf>,
}

/// Fallback install locations relative to the home directory, in order.
const HOME_FALLBACKS: &[&str] = &[
    "AppData/Roaming/npm/claude.cmd",
    "AppData/Roaming/npm/claude",
    ".npm-global/bin/claude",
    ".claude/bin/claude",
    ".claude/local/bin/claude",
    ".bun/bin/claude",
    ".volta/bin/claude",
    ".asdf/shims/claude",
    ".nix-profile/bin/claude",
    "Library/pnpm/claude",
    ".local/share/pnpm/claude",
];

/// Global install prefixes checked after the home locations.
const GLOBAL_FALLBACKS: &[&str] = &["/opt/homebrew/bin/claude", "/usr/local/bin/claude"];

/// The built-in fallback list for a given home directory.
#[must_use]
pub fn default_fallbacks(home: Option<&Path>) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = home
        .map(|home| HOME_FALLBACKS.iter().map(|rel| home.join(rel)).collect())
        .unwrap_or_default();
    paths.extend(GLOBAL_FALLBACKS.iter().map(PathBuf::from));
    paths
}

/// Resolves the path of the Claude CLI.
#[derive(Debug, Clone)]
pub struct ToolLocator {
    binary: String,
    search_path: Option<OsString>,
    fallbacks: Vec<PathBuf>,
}

impl ToolLocator {
    /// A locator for `binary` with an explicit search path and fallback list.
    #[must_use]
    pub fn new(
        binary: impl Into<String>,
        search_path: Option<OsString>,
        fallbacks: Vec<PathBuf>,
    ) -> Self {
        Self {
            binary: binary.into(),
            search_path,
            fallbacks,
        }
    }

    /// A locator built from the current `PATH` and home directory.
    #[must_use]
    pub fn from_env() -> Self {
        let home = dirs::home_dir();
        Self::new(
            CLAUDE_BINARY,
            std::env::var_os("PATH"),
            default_fallbacks(home.as_deref()),
        )
    }

    /// Append extra fallback locations after the built-in ones.
    #[must_use]
    pub fn with_extra_fallbacks(mut self, extra: impl IntoIterator<Item = PathBuf>) -> Self {
        self.fallbacks.extend(extra);
        self
    }

    /// The configured fallback locations.
    #[must_use]
    pub fn fallbacks(&self) -> &[PathBuf] {
        &self.fallbacks
    }

    /// Find the executable.
    ///
    /// A match on the search path always wins over the fallbacks.
    ///
    /// # Errors
    ///
    /// Returns `LocateError` if no candidate exists.
    pub fn locate(&self) -> Result<PathBuf, LocateError> {
        let mut searched = Vec::new();

        if let Some(search_path) = &self.search_path {
            for dir in std::env::split_paths(search_path) {
                for name in self.binary_names() {
                    let candidate = dir.join(&name);
                    if is_executable(&candidate) {
                        tracing::debug!(path = %candidate.display(), "Found Claude CLI on PATH");
                        return Ok(candidate);
                    }
                    searched.push(candidate);
                }
            }
        }

        for candidate in &self.fallbacks {
            if candidate.exists() {
                tracing::debug!(path = %candidate.display(), "Found Claude CLI at fallback location");
                return Ok(candidate.clone());
            }
            searched.push(candidate.clone());
        }

        tracing::warn!(candidates = searched.len(), "Claude CLI not found");
        Err(LocateError { searched })
    }

    fn binary_names(&self) -> Vec<String> {
        if cfg!(windows) {
            vec![
                format!("{}.exe", self.binary),
                format!("{}.cmd", self.binary),
                self.binary.clone(),
            ]
        } else {
            vec![self.binary.clone()]
        }
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_fallbacks_order() {
        let paths = default_fallbacks(Some(Path::new("/home/dev")));
        assert_eq!(paths.len(), HOME_FALLBACKS.len() + GLOBAL_FALLBACKS.len());
        assert_eq!(
            paths[0],
            Path::new("/home/dev").join("AppData/Roaming/npm/claude.cmd")
        );
        assert_eq!(paths.last(), Some(&PathBuf::from("/usr/local/bin/claude")));
    }

    #[test]
    fn default_fallbacks_without_home() {
        let paths = default_fallbacks(None);
        assert_eq!(paths.len(), GLOBAL_FALLBACKS.len());
        assert_eq!(paths[0], PathBuf::from("/opt/homebrew/bin/claude"));
    }

    #[test]
    fn not_found_lists_searched_locations() {
        let locator = ToolLocator::new(
            "claude",
            None,
            vec![PathBuf::from("/nonexistent/a/claude"), PathBuf::from("/nonexistent/b/claude")],
        );
        let err = locator.locate().unwrap_err();
        assert_eq!(err.searched.len(), 2);
        assert_eq!(err.to_string(), "Claude CLI not found");
    }
}
