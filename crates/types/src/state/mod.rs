//! Hashed contract state.
//!
//! A [`Hash`] is a named, multi-key contract variable. Values are stored as
//! their JSON wire form through a [`StateDriver`], so anything written comes
//! back with the same type.

mod driver;
mod hash;

pub use driver::{MemoryDriver, StateDriver};
pub use hash::{Hash, DELIMITER, MAX_HASH_DIMENSIONS, MAX_KEY_SIZE};
