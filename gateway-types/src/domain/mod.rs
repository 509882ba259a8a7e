//! Domain models for the payment gateway.

pub mod card;
pub mod compact;
pub mod key;
pub mod response_code;
pub mod transaction;

pub use compact::{COMPACT_RECORD_LEN, CompactRecord};
pub use key::{EphemeralKey, KeyId};
pub use response_code::ResponseCode;
pub use transaction::{DEFAULT_PROCESSING_CODE, FunctionCode, Transaction};
