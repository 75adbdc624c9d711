//! Configuration parsing from an environment-like lookup.

use std::collections::HashMap;
use std::time::Duration;

use stock_tracker::config::{Config, ConfigError, DEFAULT_QUOTE_BASE_URL};

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name: &str| map.get(name).cloned()
}

#[test]
fn defaults_apply_when_only_secret_is_set() {
    let config = Config::from_lookup(lookup(&[("JWT_SECRET", "s3cret")])).unwrap();

    assert_eq!(config.jwt_secret, b"s3cret".to_vec());
    assert_eq!(config.bind_addr.port(), 3000);
    assert!(config.database_url.is_none());
    assert_eq!(config.db_max_connections, 5);
    assert_eq!(config.quote_base_url, DEFAULT_QUOTE_BASE_URL);
    assert_eq!(config.quote_api_key, "demo");
    assert_eq!(config.quote_timeout, Duration::from_secs(10));
}

#[test]
fn explicit_values_override_defaults() {
    let config = Config::from_lookup(lookup(&[
        ("JWT_SECRET", "s3cret"),
        ("BIND_ADDR", "127.0.0.1:8080"),
        ("DATABASE_URL", "postgres://localhost/tracker"),
        ("DB_MAX_CONNECTIONS", "12"),
        ("QUOTE_API_KEY", "KEY123"),
        ("QUOTE_TIMEOUT_SECS", "3"),
    ]))
    .unwrap();

    assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
    assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/tracker"));
    assert_eq!(config.db_max_connections, 12);
    assert_eq!(config.quote_api_key, "KEY123");
    assert_eq!(config.quote_timeout, Duration::from_secs(3));
}

#[test]
fn missing_secret_is_an_error() {
    assert!(matches!(
        Config::from_lookup(lookup(&[("BIND_ADDR", "127.0.0.1:8080")])),
        Err(ConfigError::Missing("JWT_SECRET"))
    ));
    assert!(matches!(
        Config::from_lookup(lookup(&[("JWT_SECRET", "  ")])),
        Err(ConfigError::Missing("JWT_SECRET"))
    ));
}

#[test]
fn unparseable_values_are_errors() {
    assert!(matches!(
        Config::from_lookup(lookup(&[("JWT_SECRET", "x"), ("BIND_ADDR", "nowhere")])),
        Err(ConfigError::Invalid { name: "BIND_ADDR", .. })
    ));
    assert!(matches!(
        Config::from_lookup(lookup(&[("JWT_SECRET", "x"), ("QUOTE_TIMEOUT_SECS", "soon")])),
        Err(ConfigError::Invalid { name: "QUOTE_TIMEOUT_SECS", .. })
    ));
}
