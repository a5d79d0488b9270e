//! Sending, tracking and batching transactions against a mock masternode.

use lamden_config::{NetworkInfo, TransactionConfig};
use lamden_rpc_client::{ResultKind, TransactionBatcher, TransactionBuilder, TxEvent, TxInfo};
use lamden_wallets::wallet;
use mockito::{Matcher, Server};
use serde_json::{json, Map};
use std::collections::HashMap;

const SK: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
const VK: &str = "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";
const PROCESSOR: &str = "89f67bb871351a1629d66676e4bd92bbacb23bd0649b890542ef98f1b664a497";

fn localhost_binding_permitted() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

fn fast_config() -> TransactionConfig {
    TransactionConfig {
        check_limit: 3,
        check_interval_ms: 5,
        batch_spacing_ms: 5,
        ..TransactionConfig::default()
    }
}

fn transfer(sender: &str) -> TxInfo {
    let mut kwargs = Map::new();
    kwargs.insert("amount".into(), json!({"__fixed__": "1.5"}));
    kwargs.insert("to".into(), json!("bob"));
    TxInfo::new(sender, "currency", "transfer", kwargs, 50)
}

async fn mock_nonce(server: &mut Server, vk: &str, nonce: u64) -> mockito::Mock {
    server
        .mock("GET", format!("/nonce/{}", vk).as_str())
        .with_status(200)
        .with_body(json!({"nonce": nonce, "processor": PROCESSOR, "sender": vk}).to_string())
        .create_async()
        .await
}

#[tokio::test]
async fn send_then_check_result() {
    if !localhost_binding_permitted() {
        return;
    }
    let mut server = Server::new_async().await;
    let _nonce = mock_nonce(&mut server, VK, 5).await;
    let submit = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({
            "payload": {"nonce": 5, "processor": PROCESSOR, "sender": VK, "stamps_supplied": 50}
        })))
        .with_status(200)
        .with_body(r#"{"success": "Transaction successfully submitted to the network.", "hash": "abc123"}"#)
        .expect(1)
        .create_async()
        .await;
    let _result = server
        .mock("GET", "/tx")
        .match_query(Matcher::UrlEncoded("hash".into(), "abc123".into()))
        .with_status(200)
        .with_body(r#"{"hash": "abc123", "status": 0, "stamps_used": 18, "result": "None"}"#)
        .create_async()
        .await;

    let mut builder = TransactionBuilder::new(NetworkInfo::with_hosts([server.url()]), transfer(VK), None)
        .unwrap()
        .with_config(fast_config());
    let mut events = builder.subscribe();

    let sent = builder.send(Some(SK)).await.unwrap();
    assert!(sent.is_pending());
    assert_eq!(builder.tx_hash(), Some("abc123"));
    assert_eq!(builder.nonce(), Some(5));
    assert_eq!(builder.nonce_result().unwrap().masternode.as_deref(), Some(server.url().as_str()));
    assert_eq!(builder.result_info().unwrap().title, "Transaction Pending");
    assert!(matches!(events.recv().await.unwrap(), TxEvent::Response { .. }));
    submit.assert_async().await;

    let checked = builder.check_for_transaction_result().await.unwrap();
    assert_eq!(checked.stamps_used, Some(18));
    assert_eq!(builder.tx_check_attempts(), 1);
    let info = builder.result_info().unwrap();
    assert_eq!(info.title, "Transaction Successful");
    assert_eq!(info.subtitle, "Your transaction used 18 stamps");
    assert_eq!(info.kind, ResultKind::Success);
    assert_eq!(builder.tx_block_result(), Some(&checked));
}

#[tokio::test]
async fn check_gives_up_after_limit() {
    if !localhost_binding_permitted() {
        return;
    }
    let mut server = Server::new_async().await;
    let polls = server
        .mock("GET", "/tx")
        .match_query(Matcher::UrlEncoded("hash".into(), "missing".into()))
        .with_status(200)
        .with_body(r#"{"error": "Transaction not found."}"#)
        .expect(3)
        .create_async()
        .await;

    let mut builder = TransactionBuilder::new(NetworkInfo::with_hosts([server.url()]), transfer(VK), None)
        .unwrap()
        .with_config(fast_config());
    builder.handle_masternode_response(lamden_rpc_client::TxResult {
        hash: Some("missing".into()),
        success: Some("submitted".into()),
        ..Default::default()
    });

    let result = builder.check_for_transaction_result().await.unwrap();
    assert_eq!(
        result.error_list(),
        [
            json!("Transaction not found."),
            json!("Retry Attmpts 3 hit while checking for Tx Result.")
        ]
    );
    assert_eq!(builder.result_info().unwrap().title, "Transaction Failed");
    polls.assert_async().await;
}

#[tokio::test]
async fn rejected_submission_is_recorded() {
    if !localhost_binding_permitted() {
        return;
    }
    let mut server = Server::new_async().await;
    let _nonce = mock_nonce(&mut server, VK, 1).await;
    let _submit = server
        .mock("POST", "/")
        .with_status(200)
        .with_body(r#"{"error": "Transaction is not signed by the sender."}"#)
        .create_async()
        .await;

    let mut builder = TransactionBuilder::new(NetworkInfo::with_hosts([server.url()]), transfer(VK), None).unwrap();
    let result = builder.send(Some(SK)).await.unwrap();
    assert_eq!(result.error_list(), [json!("Transaction is not signed by the sender.")]);
    assert_eq!(builder.tx_hash(), None);
    assert_eq!(
        builder.result_info().unwrap().message,
        "This transaction returned 1 errors."
    );
}

#[tokio::test]
async fn unreachable_masternode_records_failure() {
    let mut builder =
        TransactionBuilder::new(NetworkInfo::with_hosts(["http://127.0.0.1:1"]), transfer(VK), None).unwrap();
    let result = builder.send(Some(SK)).await.unwrap();
    assert!(result
        .error
        .as_deref()
        .unwrap()
        .starts_with("Unable to get nonce for"));
    assert!(result.timestamp.is_some());
}

#[tokio::test]
async fn batches_use_consecutive_nonces() {
    if !localhost_binding_permitted() {
        return;
    }
    let other = wallet::new_wallet(None);
    let mut server = Server::new_async().await;
    let _nonce_a = mock_nonce(&mut server, VK, 20).await;
    let _nonce_b = mock_nonce(&mut server, &other.vk, 3).await;
    let submissions = server
        .mock("POST", "/")
        .with_status(200)
        .with_body(r#"{"success": "submitted", "hash": "feed"}"#)
        .expect(3)
        .create_async()
        .await;

    let batcher = TransactionBatcher::new(NetworkInfo::with_hosts([server.url()]))
        .unwrap()
        .with_config(fast_config());
    batcher
        .add_transaction_list([transfer(VK), transfer(VK), transfer(&other.vk)])
        .unwrap();

    let keys = HashMap::from([(VK.to_string(), SK.to_string()), (other.vk.clone(), other.sk.clone())]);
    let report = batcher.send_all_batches(&keys).await.unwrap();
    assert!(report.failed.is_empty());
    assert_eq!(report.sent.len(), 3);
    assert!(!batcher.has_transactions());
    assert!(!batcher.is_running());

    let mut nonces: Vec<_> = report
        .sent
        .iter()
        .filter(|builder| builder.sender() == VK)
        .map(|builder| builder.nonce().unwrap())
        .collect();
    nonces.sort_unstable();
    assert_eq!(nonces, [20, 21]);
    assert!(report.sent.iter().all(|builder| builder.tx_hash() == Some("feed")));
    assert_eq!(batcher.nonce_result(&other.vk).unwrap().nonce, 3);
    submissions.assert_async().await;
}

#[tokio::test]
async fn batches_are_capped_per_sender() {
    if !localhost_binding_permitted() {
        return;
    }
    let mut server = Server::new_async().await;
    let _nonce = mock_nonce(&mut server, VK, 0).await;
    let _submit = server
        .mock("POST", "/")
        .with_status(200)
        .with_body(r#"{"success": "submitted", "hash": "feed"}"#)
        .create_async()
        .await;

    let config = TransactionConfig {
        batch_size: 2,
        ..fast_config()
    };
    let batcher = TransactionBatcher::new(NetworkInfo::with_hosts([server.url()]))
        .unwrap()
        .with_config(config);
    batcher
        .add_transaction_list((0..3).map(|_| transfer(VK)))
        .unwrap();

    let keys = HashMap::from([(VK.to_string(), SK.to_string())]);
    let report = batcher.send_all_batches(&keys).await.unwrap();
    assert_eq!(report.sent.len(), 2);
    assert_eq!(batcher.pending(VK), 1);
}
