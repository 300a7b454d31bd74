//! Timestamp join between scans and verification outcomes

pub mod matcher;
pub mod status;

pub use matcher::{find_match, match_logs, status_for, MatchedLog, VerificationIndex};
pub use status::MatchStatus;
