//! # Configuration directory resolution
//!
//! Platform-agnostic helper shared by both `unix` and `windows` `sys` shims (each re-exports this
//! module so callers only ever go through `sys::conf_dirs`).

use std::path::PathBuf;

/// The crate name used to namespace configuration directories.
const CRATE_NAME: &str = "rust-text-editor";

/// Return the ordered list of directories to search for `config.ini`, from lowest to highest
/// priority (a later directory's value for the same key overrides an earlier one's).
///
/// - On Unix: `/etc/<crate>` (system-wide), then `$XDG_CONFIG_HOME/<crate>` if set, otherwise
///   `$HOME/.config/<crate>` (user-level).
/// - On Windows: `%APPDATA%\<crate>`.
pub fn conf_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    #[cfg(unix)]
    {
        dirs.push(PathBuf::from("/etc").join(CRATE_NAME));
        let user_dir = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")));
        if let Some(dir) = user_dir {
            dirs.push(dir.join(CRATE_NAME));
        }
    }
    #[cfg(windows)]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            dirs.push(PathBuf::from(appdata).join(CRATE_NAME));
        }
    }
    dirs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conf_dirs_is_non_empty_when_home_is_set() {
        // HOME/APPDATA are expected to be set in any real session; we only assert the function
        // does not panic and returns a plausibly-ordered list (system dir, if present, first).
        let dirs = conf_dirs();
        if dirs.len() > 1 {
            assert!(dirs[0].to_string_lossy().contains(CRATE_NAME));
        }
    }
}
