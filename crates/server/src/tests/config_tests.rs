use super::{apply_env, apply_file, Settings};

use std::collections::HashMap;

#[test]
fn defaults_match_the_client_base_url() {
    let settings = Settings::default();
    assert_eq!(settings.server_bind, "127.0.0.1:8080");
    assert_eq!(settings.log_filter, "info");
}

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    apply_file(
        &mut settings,
        "bind_addr = \"0.0.0.0:9000\"\nlog_filter = \"debug\"\n",
    )
    .expect("parse");
    assert_eq!(settings.server_bind, "0.0.0.0:9000");
    assert_eq!(settings.log_filter, "debug");
}

#[test]
fn malformed_file_is_an_error() {
    let mut settings = Settings::default();
    assert!(apply_file(&mut settings, "bind_addr = [").is_err());
    assert_eq!(settings, Settings::default());
}

#[test]
fn prefixed_env_wins_over_short_name() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("SERVER_BIND", "127.0.0.1:1111"),
        ("APP__BIND_ADDR", "127.0.0.1:2222"),
        ("RUST_LOG", "warn"),
    ]);
    let mut settings = Settings::default();
    apply_env(&mut settings, |key| env.get(key).map(|v| v.to_string()));
    assert_eq!(settings.server_bind, "127.0.0.1:2222");
    assert_eq!(settings.log_filter, "warn");
}
