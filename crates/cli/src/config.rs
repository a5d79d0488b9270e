//! Configuration for the Lamden CLI
//!
//! Settings come from the TOML config file (`lamden.toml` by default) and are
//! then overridden by command-line flags.

use crate::args::CliArgs;
use anyhow::{Context, Result};
use lamden_config::{ClientConfig, NetworkInfo, NetworkType};
use std::path::{Path, PathBuf};

/// Config file read when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "lamden.toml";

pub fn config_path(args: &CliArgs) -> PathBuf {
    args.config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Loads the config file and applies the command-line overrides.
///
/// An explicit `--config` must exist; the default file is optional.
pub fn load(args: &CliArgs) -> Result<ClientConfig> {
    let path = config_path(args);
    if args.config.is_some() && !path.exists() {
        anyhow::bail!("config file {} does not exist", path.display());
    }
    let config = ClientConfig::load(&path)
        .with_context(|| format!("failed to load config from {}", path.display()))?;
    Ok(apply_overrides(config, args))
}

pub fn load_from(path: &Path, args: &CliArgs) -> Result<ClientConfig> {
    let config = ClientConfig::load(path)
        .with_context(|| format!("failed to load config from {}", path.display()))?;
    Ok(apply_overrides(config, args))
}

/// Applies `--network`, `--host`, `--blockservice`, `--verbose` and
/// `--json-logs`.
pub fn apply_overrides(mut config: ClientConfig, args: &CliArgs) -> ClientConfig {
    if let Some(network) = args.network {
        config.network = NetworkInfo::preset(NetworkType::from(network));
    }
    if !args.hosts.is_empty() {
        config.network.hosts = args.hosts.clone();
        if args.network.is_none() {
            config.network.network_type = NetworkType::Custom;
            config.network.lamden = false;
        }
    }
    if !args.blockservice_hosts.is_empty() {
        config.network.blockservice_hosts = args.blockservice_hosts.clone();
    }
    if let Some(level) = args.verbose {
        config.logger.level = level.as_str().to_string();
    }
    if args.json_logs {
        config.logger.json = true;
    }
    config
}
