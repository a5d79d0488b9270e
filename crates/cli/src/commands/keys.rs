//! Key generation and keystore files.

use crate::args::KeygenArgs;
use anyhow::{bail, Context, Result};
use lamden_wallets::{wallet, KeyInfo, Keystore};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tracing::info;

pub fn keygen(args: &KeygenArgs) -> Result<Value> {
    if !args.is_hd() {
        return Ok(serde_json::to_value(wallet::new_wallet(None))?);
    }

    let account = match (&args.mnemonic, &args.seed) {
        (Some(mnemonic), _) => wallet::wallet_from_mnemonic(mnemonic, args.index)?,
        (None, seed) => wallet::new_wallet_bip39(seed.as_deref(), args.index)?,
    };
    Ok(serde_json::to_value(account)?)
}

/// Uses `given`, or asks on the terminal.
fn read_password(given: Option<String>, prompt: &str) -> Result<String> {
    match given {
        Some(password) => Ok(password),
        None => rpassword::prompt_password(prompt).context("failed to read password"),
    }
}

pub fn keystore_create(file: &Path, sks: &[String], hint: Option<&str>, password: Option<String>) -> Result<Value> {
    if file.exists() {
        bail!("{} already exists", file.display());
    }
    let keystore = Keystore::from_keys(sks.iter().map(KeyInfo::new))?;
    let password = password_or_prompt(password)?;
    let text = keystore.create_keystore(&password, hint)?;
    fs::write(file, text).with_context(|| format!("failed to write {}", file.display()))?;
    info!(target: "lamden", path = %file.display(), keys = keystore.num_of_keys(), "keystore written");

    let vks: Vec<&str> = keystore.wallets().iter().map(|w| w.vk()).collect();
    Ok(json!({
        "file": file.display().to_string(),
        "vks": vks,
    }))
}

fn password_or_prompt(password: Option<String>) -> Result<String> {
    let first = password.is_none();
    let password = read_password(password, "Keystore password: ")?;
    if first && password != read_password(None, "Repeat password: ")? {
        bail!("passwords do not match");
    }
    Ok(password)
}

pub fn keystore_open(file: &Path, password: Option<String>) -> Result<Value> {
    let text = fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    let mut keystore = Keystore::from_keystore_data(&text)?;
    let hint = keystore.password_hint(None)?;
    if password.is_none() && !hint.is_empty() {
        eprintln!("Hint: {}", hint);
    }
    let password = read_password(password, "Keystore password: ")?;
    keystore.decrypt_keystore(&password, None)?;

    let wallets: Vec<Value> = keystore.wallets().iter().map(|w| w.to_json()).collect();
    Ok(json!({
        "version": keystore.version(),
        "hint": hint,
        "wallets": wallets,
    }))
}
