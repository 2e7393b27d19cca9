//! # Configuration
//!
//! Utilities to configure the text editor.

use std::fmt::Display;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::{sys, Error};

#[derive(Debug, PartialEq)]
pub struct Config {
    /// The size of a tab. Must be > 0.
    pub tab_stop: usize,
    /// The number of confirmations needed before quitting, when changes have been made since the
    /// file was last changed.
    pub quit_times: usize,
    /// The duration for which messages are shown in the status bar.
    pub message_dur: Duration,
}

impl Default for Config {
    /// Default configuration, matching the tunables pinned by the specification: an 8-column tab
    /// stop, 3 confirmations required to discard unsaved changes, and a 5 second message bar TTL.
    fn default() -> Self {
        Self { tab_stop: 8, quit_times: 3, message_dur: Duration::new(5, 0) }
    }
}

impl Config {
    /// Load the configuration, potentially overridden using `config.ini` files that can be located
    /// in the following directories:
    ///   - On Linux, macOS and other *nix systems:
    ///     - `/etc/rust-text-editor` (system-wide configuration).
    ///     - `$XDG_CONFIG_HOME/rust-text-editor` if environment variable `$XDG_CONFIG_HOME` is defined,
    ///         `$HOME/.config/rust-text-editor` otherwise (user-level configuration).
    ///   - On Windows:
    ///     - `%APPDATA%\rust-text-editor`
    ///
    /// Directories are applied in order, so a user-level file overrides a system-wide one.
    ///
    /// # Errors
    ///
    /// Will return `Err` if one of the configuration files exists but cannot be parsed.
    pub fn load() -> Result<Self, Error> {
        let mut config = Self::default();
        for dir in sys::conf_dirs() {
            let path = dir.join("config.ini");
            if !path.is_file() {
                continue;
            }
            process_ini_file(&path, &mut |key, value| match key {
                "tab_stop" => {
                    config.tab_stop = parse_value(value)?;
                    Ok(())
                }
                "quit_times" => {
                    config.quit_times = parse_value(value)?;
                    Ok(())
                }
                "message_dur" => {
                    config.message_dur = Duration::from_secs(parse_value(value)?);
                    Ok(())
                }
                other => Err(format!("unrecognized configuration key: {}", other)),
            })?;
        }
        Ok(config)
    }
}

/// Process an INI file. Blank lines, lines whose first non-whitespace character is `#` or `;`,
/// and `[section]` headers are ignored (sections are not currently meaningful to this editor, but
/// are tolerated so a shared config file format can be reused by other tools).
///
/// The `kv_fn` function will be called for each key-value pair in the file. Typically, this
/// function will update a configuration instance.
pub fn process_ini_file<F>(path: &Path, kv_fn: &mut F) -> Result<(), Error>
where F: FnMut(&str, &str) -> Result<(), String> {
    let contents = fs::read_to_string(path)?;
    for (line_no, line) in contents.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') || trimmed.starts_with('[') {
            continue;
        }
        let (key, value) = trimmed
            .split_once('=')
            .ok_or_else(|| Error::Config(path.to_path_buf(), line_no + 1, "expected `key = value`".to_string()))?;
        kv_fn(key.trim(), value.trim())
            .map_err(|msg| Error::Config(path.to_path_buf(), line_no + 1, msg))?;
    }
    Ok(())
}

/// Trim a value (right-hand side of a key-value INI line) and parse it.
pub fn parse_value<T: FromStr<Err = E>, E: Display>(value: &str) -> Result<T, String> {
    value.trim().parse().map_err(|e: E| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_the_pinned_tunables() {
        let config = Config::default();
        assert_eq!(config.tab_stop, 8);
        assert_eq!(config.quit_times, 3);
        assert_eq!(config.message_dur, Duration::new(5, 0));
    }

    #[test]
    fn process_ini_file_reads_simple_key_value_pairs() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# a comment\ntab_stop = 4\nquit_times=1\n").unwrap();
        let mut seen = Vec::new();
        process_ini_file(file.path(), &mut |k, v| {
            seen.push((k.to_string(), v.to_string()));
            Ok(())
        })
        .unwrap();
        assert_eq!(seen, vec![("tab_stop".to_string(), "4".to_string()), ("quit_times".to_string(), "1".to_string())]);
    }

    #[test]
    fn process_ini_file_reports_the_failing_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tab_stop = 4\nnot a kv line\n").unwrap();
        let err = process_ini_file(file.path(), &mut |_, _| Ok(())).unwrap_err();
        match err {
            Error::Config(_, line, _) => assert_eq!(line, 2),
            _ => panic!("expected Error::Config"),
        }
    }

    #[test]
    fn parse_value_trims_whitespace() {
        let v: usize = parse_value(" 42 \n").unwrap();
        assert_eq!(v, 42);
    }
}
