//! Configuration file loading tests

use lamden_config::*;
use std::io::Write;

#[test]
fn test_load_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = ClientConfig::load(&dir.path().join("lamden.toml")).unwrap();

    assert_eq!(config, ClientConfig::default());
    assert_eq!(config.network.network_type, NetworkType::TestNet);
    assert_eq!(config.transactions.batch_size, MAX_BATCH_SIZE);
    assert_eq!(config.transactions.check_limit, TX_CHECK_LIMIT);
}

#[test]
fn test_load_partial_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[network]
hosts = ["http://127.0.0.1:18080"]
type = "mockchain"
version = 2

[transactions]
check_limit = 3
"#
    )
    .unwrap();

    let config = ClientConfig::load(file.path()).unwrap();
    assert_eq!(config.network.hosts, vec!["http://127.0.0.1:18080"]);
    assert_eq!(config.network.network_type, NetworkType::MockChain);
    assert_eq!(config.network.version, 2);
    assert_eq!(config.network.currency_symbol, DEFAULT_CURRENCY_SYMBOL);
    assert_eq!(config.network.name, DEFAULT_NETWORK_NAME);
    assert_eq!(config.transactions.check_limit, 3);
    assert_eq!(config.transactions.check_interval_ms, TX_CHECK_INTERVAL_MS);
    assert_eq!(config.logger.level, "info");
}

#[test]
fn test_invalid_toml_is_reported() {
    let err = ClientConfig::from_toml("[network\nhosts = 1").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn test_network_info_json_shape() {
    let info = NetworkInfo::preset(NetworkType::MainNet);
    let json = serde_json::to_value(&info).unwrap();

    assert_eq!(json["type"], "mainnet");
    assert_eq!(json["lamden"], true);
    assert_eq!(json["currency_symbol"], "TAU");
    assert_eq!(json["hosts"][0], MAINNET_HOSTS[0]);
}
