//! Store/load type fidelity check.
//!
//! Writes one value of every contract type into a [`Hash`] under
//! `[uid, <argument name>]`, reads each one back and checks that it kept its
//! runtime type.

use crate::contract::{MethodArgument, MethodSignature};
use crate::encoder::Encoder;
use crate::error::{EncodeError, StateError};
use crate::state::Hash;
use crate::value::{ContractValue, ValueType};
use crate::Result;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

/// Contract name the fixture is deployed under.
pub const VALUES_CONTRACT: &str = "con_values_testing";

/// Exported method of the fixture contract.
pub const VALUES_METHOD: &str = "test_values";

/// Hash the fixture stores its arguments in.
pub const VALUES_STATE: &str = "yourState";

/// Argument names and declared types, in store order.
const ARGUMENTS: [(&str, &str); 10] = [
    ("UID", "str"),
    ("Str", "str"),
    ("Int", "int"),
    ("Float", "float"),
    ("Bool", "bool"),
    ("Dict", "dict"),
    ("List", "list"),
    ("ANY", "Any"),
    ("DateTime", "datetime.datetime"),
    ("TimeDelta", "datetime.timedelta"),
];

/// Inputs of the fixture
#[derive(Debug, Clone, PartialEq)]
pub struct ValuesArgs {
    pub uid: String,
    pub str_value: ContractValue,
    pub int_value: ContractValue,
    pub float_value: ContractValue,
    pub bool_value: ContractValue,
    pub dict_value: ContractValue,
    pub list_value: ContractValue,
    pub any_value: ContractValue,
    pub datetime_value: ContractValue,
    pub timedelta_value: ContractValue,
}

impl ValuesArgs {
    /// Signature of the fixture method.
    pub fn method_signature() -> MethodSignature {
        MethodSignature {
            name: VALUES_METHOD.to_string(),
            arguments: ARGUMENTS
                .iter()
                .map(|(name, type_name)| MethodArgument::new(*name, *type_name))
                .collect(),
        }
    }

    /// Loosely typed sample kwargs covering nested decimals and both temporal
    /// key forms.
    pub fn sample_kwargs(uid: &str) -> Map<String, Value> {
        let kwargs = json!({
            "UID": uid,
            "Str": "test string",
            "Int": 1,
            "Float": 1.01,
            "Bool": false,
            "Dict": {"s": "test", "i": 1, "f": 1.1, "b": true, "d": {"f": 1.1, "l": [1, 1.1]}, "l": [1, 1.1]},
            "List": ["test", 1, 1.1, false, {"f": 1.1, "l": [1, 1.1]}, [1, 1.1]],
            "ANY": {"f": 1.1, "l": [1, 1.1]},
            "DateTime": {"datetime": "2020-07-28T19:16:35.059Z"},
            "TimeDelta": {"timedelta": 1000}
        });
        match kwargs {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    /// Encodes the sample kwargs as one `object` and builds the fixture input
    /// from the result.
    pub fn sample(uid: &str) -> Result<Self> {
        let encoded = Encoder::encode("object", &Value::Object(Self::sample_kwargs(uid)))?;
        match encoded {
            Value::Object(kwargs) => Self::from_kwargs(&kwargs),
            other => Err(EncodeError::invalid("object", &other).into()),
        }
    }

    /// Builds the input from wire-encoded kwargs.
    pub fn from_kwargs(kwargs: &Map<String, Value>) -> Result<Self> {
        let arg = |name: &str| -> Result<ContractValue> {
            let value = kwargs
                .get(name)
                .ok_or_else(|| EncodeError::MissingArgument(name.to_string()))?;
            Ok(ContractValue::from_wire(value)?)
        };

        let uid = match arg("UID")? {
            ContractValue::Str(uid) => uid,
            other => {
                return Err(StateError::TypeMismatch {
                    field: "UID".into(),
                    expected: ValueType::Str,
                    found: other.value_type(),
                })
            }
        };

        Ok(Self {
            uid,
            str_value: arg("Str")?,
            int_value: arg("Int")?,
            float_value: arg("Float")?,
            bool_value: arg("Bool")?,
            dict_value: arg("Dict")?,
            list_value: arg("List")?,
            any_value: arg("ANY")?,
            datetime_value: arg("DateTime")?,
            timedelta_value: arg("TimeDelta")?,
        })
    }

    /// Wire-encoded kwargs for a `test_values` transaction.
    pub fn to_kwargs(&self) -> Map<String, Value> {
        let mut kwargs = Map::new();
        kwargs.insert("UID".into(), Value::String(self.uid.clone()));
        for (name, value, _) in self.fields() {
            kwargs.insert(name.to_string(), value.to_wire());
        }
        kwargs
    }

    /// Stored fields with the type each must keep; `ANY` is not checked.
    fn fields(&self) -> [(&'static str, &ContractValue, Option<ValueType>); 9] {
        [
            ("Str", &self.str_value, Some(ValueType::Str)),
            ("Int", &self.int_value, Some(ValueType::Int)),
            ("Float", &self.float_value, Some(ValueType::Float)),
            ("Bool", &self.bool_value, Some(ValueType::Bool)),
            ("Dict", &self.dict_value, Some(ValueType::Dict)),
            ("List", &self.list_value, Some(ValueType::List)),
            ("ANY", &self.any_value, None),
            ("DateTime", &self.datetime_value, Some(ValueType::DateTime)),
            ("TimeDelta", &self.timedelta_value, Some(ValueType::TimeDelta)),
        ]
    }
}

/// Stores every argument under `[uid, name]` and checks the loaded type.
pub fn test_values(state: &Hash, args: &ValuesArgs) -> Result<()> {
    for (name, value, expected) in args.fields() {
        let keys = [args.uid.as_str(), name];
        state.set(&keys, value)?;

        let loaded = state.get(&keys)?;
        if let Some(expected) = expected {
            let found = loaded.value_type();
            if found != expected {
                return Err(StateError::TypeMismatch {
                    field: name.to_string(),
                    expected,
                    found,
                });
            }
        }
        debug!(target: "lamden", uid = %args.uid, field = name, "value kept its type");
    }
    info!(target: "lamden", uid = %args.uid, "all values kept their types");
    Ok(())
}
