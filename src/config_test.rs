use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn development_is_the_default_environment() {
    let cfg = ApiConfig::resolve(Environment::default(), None, Timeouts::default()).unwrap();
    assert_eq!(cfg.base_url, DEFAULT_DEVELOPMENT_BASE_URL);
    assert_eq!(
        cfg.timeouts,
        Timeouts { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    );
}

#[test]
fn production_selects_proxied_url() {
    let cfg = ApiConfig::resolve(Environment::Production, None, Timeouts::default()).unwrap();
    assert_eq!(cfg.base_url, DEFAULT_PRODUCTION_BASE_URL);
}

#[test]
fn explicit_url_overrides_environment_and_drops_trailing_slash() {
    let cfg =
        ApiConfig::resolve(Environment::Production, Some("https://todo.example.test/api/"), Timeouts::default())
            .unwrap();
    assert_eq!(cfg.base_url, "https://todo.example.test/api");
}

#[test]
fn blank_url_falls_back_to_environment_default() {
    let cfg = ApiConfig::resolve(Environment::Development, Some("  "), Timeouts::default()).unwrap();
    assert_eq!(cfg.base_url, DEFAULT_DEVELOPMENT_BASE_URL);
}

#[test]
fn timeouts_pass_through_unchanged() {
    let timeouts = Timeouts { request_secs: 42, connect_secs: 7 };
    let cfg = ApiConfig::resolve(Environment::Development, None, timeouts).unwrap();
    assert_eq!(cfg.timeouts, timeouts);
}

#[test]
fn unknown_environment_is_rejected() {
    let err = "staging".parse::<Environment>().unwrap_err();
    assert_eq!(err, ConfigError::UnknownEnvironment("staging".into()));
}

#[test]
fn environment_parse_accepts_short_aliases() {
    assert_eq!("dev".parse::<Environment>().unwrap(), Environment::Development);
    assert_eq!("PROD".parse::<Environment>().unwrap(), Environment::Production);
}

#[test]
fn base_url_without_scheme_is_rejected() {
    let err = ApiConfig::resolve(Environment::Development, Some("localhost:8000"), Timeouts::default()).unwrap_err();
    assert_eq!(err, ConfigError::InvalidBaseUrl("localhost:8000".into()));
}

#[test]
fn prefs_path_prefers_explicit_override() {
    let path = prefs_path_from_lookup(lookup_from(&[("TODO_PREFS_PATH", "/tmp/p.json"), ("HOME", "/home/u")]));
    assert_eq!(path, PathBuf::from("/tmp/p.json"));
}

#[test]
fn prefs_path_defaults_under_home_config() {
    let path = prefs_path_from_lookup(lookup_from(&[("HOME", "/home/u")]));
    assert_eq!(path, PathBuf::from("/home/u/.config/todo-sync/preferences.json"));
}

#[test]
fn prefs_path_without_home_uses_working_directory() {
    let path = prefs_path_from_lookup(lookup_from(&[]));
    assert_eq!(path, PathBuf::from("preferences.json"));
}
