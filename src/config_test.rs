use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_when_unset() {
    let cfg = RelayConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(cfg, RelayConfig::default());
    assert_eq!(cfg.bind_addr(), "0.0.0.0:3000");
}

#[test]
fn parses_overrides() {
    let cfg = RelayConfig::from_lookup(lookup_from(&[
        ("PORT", "8080"),
        ("RELAY_HOST", "127.0.0.1"),
        ("RELAY_CLIENT_BUFFER", "16"),
    ]))
    .unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.client_buffer, 16);
    assert_eq!(cfg.bind_addr(), "127.0.0.1:8080");
}

#[test]
fn blank_values_fall_back_to_defaults() {
    let cfg = RelayConfig::from_lookup(lookup_from(&[("PORT", "  "), ("RELAY_HOST", "")])).unwrap();
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.host, DEFAULT_HOST);
}

#[test]
fn rejects_non_numeric_port() {
    let err = RelayConfig::from_lookup(lookup_from(&[("PORT", "http")])).unwrap_err();
    let ConfigError::Invalid { var, value, .. } = err;
    assert_eq!(var, "PORT");
    assert_eq!(value, "http");
}

#[test]
fn rejects_out_of_range_port() {
    let err = RelayConfig::from_lookup(lookup_from(&[("PORT", "70000")])).unwrap_err();
    assert!(err.to_string().starts_with("invalid PORT=\"70000\""));
}

#[test]
fn rejects_zero_client_buffer() {
    let err = RelayConfig::from_lookup(lookup_from(&[("RELAY_CLIENT_BUFFER", "0")])).unwrap_err();
    let ConfigError::Invalid { var, .. } = err;
    assert_eq!(var, "RELAY_CLIENT_BUFFER");
}
