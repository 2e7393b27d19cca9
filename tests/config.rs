//! Integration tests for `Config::load`, driving the crate only through its public API and the
//! `XDG_CONFIG_HOME` environment variable it's documented to respect.

use std::io::Write;

use serial_test::serial;

fn with_xdg_config_home<F: FnOnce(&std::path::Path)>(contents: &str, f: F) {
    let dir = tempfile::tempdir().unwrap();
    let conf_dir = dir.path().join("rust-text-editor");
    std::fs::create_dir_all(&conf_dir).unwrap();
    let mut file = std::fs::File::create(conf_dir.join("config.ini")).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    std::env::set_var("XDG_CONFIG_HOME", dir.path());
    f(dir.path());
    std::env::remove_var("XDG_CONFIG_HOME");
}

#[test]
#[serial]
fn load_applies_overrides_from_xdg_config_home() {
    with_xdg_config_home("tab_stop = 4\nquit_times = 1\n", |_dir| {
        let config = rust_text_editor::Config::load().unwrap();
        assert_eq!(config.tab_stop, 4);
        assert_eq!(config.quit_times, 1);
    });
}

#[test]
#[serial]
fn load_falls_back_to_defaults_without_a_config_file() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("XDG_CONFIG_HOME", dir.path());
    let config = rust_text_editor::Config::load().unwrap();
    std::env::remove_var("XDG_CONFIG_HOME");
    let defaults = rust_text_editor::Config::default();
    assert_eq!(config, defaults);
}

#[test]
#[serial]
fn load_reports_the_offending_file_and_line_on_a_malformed_entry() {
    with_xdg_config_home("tab_stop = 4\nthis is not valid\n", |dir| {
        let err = rust_text_editor::Config::load().unwrap_err();
        let message = err.to_string();
        assert!(message.contains(&dir.join("rust-text-editor").join("config.ini").display().to_string()));
        assert!(message.contains('2'));
    });
}
