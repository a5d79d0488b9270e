//! Response and transaction models exchanged with masternodes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Contract metadata from `/contracts/<name>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// State variables of a contract
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractVariables {
    #[serde(default)]
    pub variables: Vec<String>,
    #[serde(default)]
    pub hashes: Vec<String>,
}

/// Nonce and processor a masternode assigned to a sender
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonceResult {
    pub nonce: u64,
    pub processor: String,
    pub sender: String,
    /// Host that served the nonce
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub masternode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Key request for the block service batch lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyRequest {
    pub contract_name: String,
    pub variable_name: String,
    pub key: String,
}

impl KeyRequest {
    pub fn new(contract_name: impl Into<String>, variable_name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            contract_name: contract_name.into(),
            variable_name: variable_name.into(),
            key: key.into(),
        }
    }
}

/// A submission response or a processed transaction result.
///
/// Submissions answer `{"success", "hash"}`; processed transactions carry
/// `status`, `stamps_used`, `result` and optionally `errors`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TxResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<Value>>,
    #[serde(default, alias = "stampsUsed", skip_serializing_if = "Option::is_none")]
    pub stamps_used: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TxResult {
    pub fn with_errors<I, S>(errors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            errors: Some(errors.into_iter().map(|e| Value::String(e.into())).collect()),
            ..Self::default()
        }
    }

    /// A submission the masternode accepted.
    pub fn is_pending(&self) -> bool {
        let present = |field: &Option<String>| field.as_deref().is_some_and(|s| !s.is_empty());
        present(&self.hash) && present(&self.success)
    }

    /// Errors reported for the transaction, empty when there were none.
    pub fn error_list(&self) -> &[Value] {
        self.errors.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Success,
    Error,
}

/// Human readable summary of a transaction's state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultInfo {
    pub title: String,
    pub subtitle: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: ResultKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_info: Option<Vec<Value>>,
    #[serde(default, rename = "stampUsed", skip_serializing_if = "Option::is_none")]
    pub stamps_used: Option<u64>,
}

impl ResultInfo {
    pub fn pending(tx_hash: &str) -> Self {
        Self {
            title: "Transaction Pending".to_string(),
            subtitle: "Your transaction was submitted and is is being processed".to_string(),
            message: format!("Tx Hash: {}", tx_hash),
            kind: ResultKind::Success,
            error_info: None,
            stamps_used: None,
        }
    }

    /// Summary of a processed transaction result
    pub fn from_result(result: &TxResult) -> Self {
        let stamps = result.stamps_used.unwrap_or(0);
        let errors = result.error_list();
        let failed = !errors.is_empty();

        Self {
            title: format!("Transaction {}", if failed { "Failed" } else { "Successful" }),
            subtitle: format!(
                "Your transaction {}used {} stamps",
                if failed { "returned an error and " } else { "" },
                stamps
            ),
            message: if failed {
                format!("This transaction returned {} errors.", errors.len())
            } else {
                String::new()
            },
            kind: if failed { ResultKind::Error } else { ResultKind::Success },
            error_info: failed.then(|| errors.to_vec()),
            stamps_used: Some(stamps),
        }
    }
}

/// Events broadcast by a [`crate::Network`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkEvent {
    Online(bool),
}

/// Events broadcast by a [`crate::TransactionBuilder`]
#[derive(Debug, Clone, PartialEq)]
pub enum TxEvent {
    Response { result: TxResult, subtitle: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tx_result_reads_both_stamp_spellings() {
        let a: TxResult = serde_json::from_value(json!({"stamps_used": 12, "status": 0})).unwrap();
        let b: TxResult = serde_json::from_value(json!({"stampsUsed": 12})).unwrap();
        assert_eq!(a.stamps_used, Some(12));
        assert_eq!(b.stamps_used, Some(12));
        assert_eq!(a.extra["status"], json!(0));
    }

    #[test]
    fn null_errors_are_no_errors() {
        let result: TxResult = serde_json::from_value(json!({"errors": null, "stamps_used": 3})).unwrap();
        assert!(result.error_list().is_empty());
        let info = ResultInfo::from_result(&result);
        assert_eq!(info.title, "Transaction Successful");
        assert_eq!(info.subtitle, "Your transaction used 3 stamps");
        assert_eq!(info.kind, ResultKind::Success);
    }

    #[test]
    fn failed_result_info() {
        let result = TxResult::with_errors(["AssertionError"]);
        let info = ResultInfo::from_result(&result);
        assert_eq!(info.title, "Transaction Failed");
        assert_eq!(info.subtitle, "Your transaction returned an error and used 0 stamps");
        assert_eq!(info.message, "This transaction returned 1 errors.");
        assert_eq!(
            serde_json::to_value(&info).unwrap(),
            json!({
                "title": "Transaction Failed",
                "subtitle": "Your transaction returned an error and used 0 stamps",
                "message": "This transaction returned 1 errors.",
                "type": "error",
                "errorInfo": ["AssertionError"],
                "stampUsed": 0
            })
        );
    }

    #[test]
    fn pending_needs_hash_and_success() {
        let mut result = TxResult {
            hash: Some("abc".into()),
            ..TxResult::default()
        };
        assert!(!result.is_pending());
        result.success = Some("Transaction successfully submitted to the network.".into());
        assert!(result.is_pending());
        assert_eq!(ResultInfo::pending("abc").message, "Tx Hash: abc");
    }
}
