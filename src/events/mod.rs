//! NFC scan events and verification outcomes

pub mod record;
pub mod types;

pub use record::{iso_time, EventRecord};
pub use types::{LogEntry, Partition, VerificationEntry, VerificationMessage};
