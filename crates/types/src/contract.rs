//! Contract method signatures as reported by a masternode.

use crate::encoder::Encoder;
use crate::error::EncodeError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A declared argument of a contract method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodArgument {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl MethodArgument {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// An exported contract method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSignature {
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<MethodArgument>,
}

impl MethodSignature {
    /// Encodes call kwargs against this method's declared arguments.
    pub fn encode_kwargs(&self, kwargs: &Map<String, Value>) -> Result<Map<String, Value>, EncodeError> {
        Encoder::encode_kwargs(&self.arguments, kwargs)
    }

    pub fn argument(&self, name: &str) -> Option<&MethodArgument> {
        self.arguments.iter().find(|arg| arg.name == name)
    }
}
