use tc_domain::config::Config;

#[test]
fn default_ttl_is_24_hours() {
    let config = Config::default();
    assert_eq!(config.sessions.ttl_hours, 24);
    assert_eq!(config.sessions.ttl(), chrono::Duration::hours(24));
}

#[test]
fn default_token_bytes_is_32() {
    let config = Config::default();
    assert_eq!(config.sessions.token_bytes, 32);
}

#[test]
fn default_db_path() {
    let config = Config::default();
    assert_eq!(config.storage.db_path.to_str(), Some("tenantcore.db"));
}

#[test]
fn ttl_parses_from_toml() {
    let toml_str = r#"
[sessions]
ttl_hours = 8
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.sessions.ttl_hours, 8);
    // Unspecified fields keep their defaults.
    assert_eq!(config.sessions.token_bytes, 32);
}

#[test]
fn db_path_parses_from_toml() {
    let toml_str = r#"
[storage]
db_path = "/var/lib/tenantcore/core.db"
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(
        config.storage.db_path.to_str(),
        Some("/var/lib/tenantcore/core.db")
    );
}
