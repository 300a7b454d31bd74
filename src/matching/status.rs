use serde::{Deserialize, Serialize};
use std::fmt;

use crate::events::VerificationEntry;

/// Outcome shown next to each scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    /// Matched verification recorded boolean `true`
    Accepted,
    /// Matched verification recorded anything else
    Rejected,
    /// No verification yet; one may arrive on a later poll
    Pending,
}

impl MatchStatus {
    pub fn from_match(verification: Option<&VerificationEntry>) -> Self {
        match verification {
            Some(entry) if entry.message.is_accepted() => MatchStatus::Accepted,
            Some(_) => MatchStatus::Rejected,
            None => MatchStatus::Pending,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchStatus::Accepted => "ACCEPTED",
            MatchStatus::Rejected => "REJECTED",
            MatchStatus::Pending => "PENDING",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_derivation() {
        let accepted = VerificationEntry::new(1, true);
        let rejected = VerificationEntry::new(1, false);
        let text = VerificationEntry::new(1, "true");
        let other = VerificationEntry::new(1, json!(1));

        assert_eq!(MatchStatus::from_match(Some(&accepted)), MatchStatus::Accepted);
        assert_eq!(MatchStatus::from_match(Some(&rejected)), MatchStatus::Rejected);
        assert_eq!(MatchStatus::from_match(Some(&text)), MatchStatus::Rejected);
        assert_eq!(MatchStatus::from_match(Some(&other)), MatchStatus::Rejected);
        assert_eq!(MatchStatus::from_match(None), MatchStatus::Pending);
    }

    #[test]
    fn test_labels() {
        assert_eq!(MatchStatus::Pending.to_string(), "PENDING");
        assert_eq!(serde_json::to_value(MatchStatus::Accepted).unwrap(), json!("ACCEPTED"));
    }
}
