//! Lamden Types Library
//!
//! Typed contract values and the coercion layer between loosely typed client
//! input and the values a contract stores:
//! - [`ContractingDecimal`]: 30-digit fixed point decimal
//! - [`ContractValue`] and its JSON wire codec (`__fixed__`, `__time__`,
//!   `__delta__`, `__big_int__`)
//! - [`Encoder`]: argument coercion by contract type name
//! - [`state::Hash`]: hashed contract variable over a [`state::StateDriver`]
//! - [`values::test_values`]: store/load type fidelity check

pub mod contract;
pub mod decimal;
pub mod encoder;
pub mod error;
pub mod state;
pub mod value;
pub mod values;

pub use contract::{MethodArgument, MethodSignature};
pub use decimal::{ContractingDecimal, FIXED_PRECISION};
pub use encoder::{Encoder, EncodingType};
pub use error::{DecodeError, EncodeError, StateError};
pub use state::{Hash, MemoryDriver, StateDriver};
pub use value::{ContractValue, ValueType};
pub use values::{test_values, ValuesArgs, VALUES_CONTRACT, VALUES_METHOD, VALUES_STATE};

/// Result type for state operations
pub type Result<T> = std::result::Result<T, StateError>;
