use lamden_wallets::wallet::{new_wallet, verify};
use lamden_wallets::{Error, KeyInfo, Keystore};
use serde_json::{json, Value};
use std::fs;

fn keys() -> Vec<KeyInfo> {
    vec![
        KeyInfo::new(new_wallet(None).sk).with("nickname", "key1"),
        KeyInfo::new(new_wallet(None).sk).with("nickname", "key2").with("network", "lamden"),
    ]
}

#[test]
fn test_create_and_decrypt_keystore_file() {
    let keystore = Keystore::from_keys(keys()).unwrap();
    let text = keystore.create_keystore("Testing010203", Some("Testing")).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keystore.json");
    fs::write(&path, &text).unwrap();
    let loaded = fs::read_to_string(&path).unwrap();

    let mut opened = Keystore::from_keystore_data(&loaded).unwrap();
    assert_eq!(opened.password_hint(None).unwrap(), "Testing");
    opened.decrypt_keystore("Testing010203", None).unwrap();

    assert_eq!(opened.num_of_keys(), 2);
    assert_eq!(opened.version(), Some("1.0"));
    for (original, decrypted) in keystore.wallets().iter().zip(opened.wallets()) {
        assert_eq!(original.to_json(), decrypted.to_json());
    }

    let wallet = opened.get_wallet(keystore.wallets()[1].vk()).unwrap();
    assert_eq!(wallet.extra["network"], json!("lamden"));
    let sig = wallet.sign(b"message").unwrap();
    assert!(verify(wallet.vk(), b"message", &sig));
}

#[test]
fn test_keystore_file_shape() {
    let text = Keystore::from_keys(keys()).unwrap().create_keystore("pw", None).unwrap();
    let file: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(file["w"], json!(""));

    let cipher: Value = serde_json::from_str(file["data"].as_str().unwrap()).unwrap();
    assert!(cipher["ct"].is_string());
    assert_eq!(cipher["iv"].as_str().unwrap().len(), 32);
    assert_eq!(cipher["s"].as_str().unwrap().len(), 16);

    let keystore = Keystore::from_keystore_data(&text).unwrap();
    assert_eq!(keystore.password_hint(None).unwrap(), "");
    assert_eq!(keystore.password_hint(Some(&text)).unwrap(), "");
}

#[test]
fn test_wrong_password() {
    let text = Keystore::from_keys(keys()).unwrap().create_keystore("right", None).unwrap();
    let mut keystore = Keystore::new();
    let err = keystore.decrypt_keystore("wrong", Some(&text)).unwrap_err();
    assert!(matches!(err, Error::IncorrectPassword));
    assert_eq!(err.to_string(), "Incorrect Keystore Password.");
    assert_eq!(keystore.num_of_keys(), 0);
}

#[test]
fn test_decrypted_keys_are_appended() {
    let text = Keystore::from_keys(keys()).unwrap().create_keystore("pw", None).unwrap();
    let mut keystore = Keystore::from_key(KeyInfo::new(new_wallet(None).sk)).unwrap();
    keystore.decrypt_keystore("pw", Some(&text)).unwrap();
    assert_eq!(keystore.num_of_keys(), 3);

    keystore.clear_keys();
    assert!(keystore.wallets().is_empty());
}

#[test]
fn test_rejects_empty_password_and_bad_keys() {
    let keystore = Keystore::new();
    assert!(matches!(keystore.create_keystore("", None), Err(Error::InvalidArgument(_))));
    assert!(matches!(
        Keystore::from_key(KeyInfo::new("")),
        Err(Error::InvalidPrivateKey(_))
    ));
}
