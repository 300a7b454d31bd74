//! Log/Verification Matcher
//!
//! Associates each scan with the earliest verification recorded at or after
//! it. There is no explicit link between the two collections; the join is
//! purely by timestamp.
//!
//! Ties between verifications sharing the minimal qualifying timestamp go to
//! the one that appears first in the input collection. Matching is many-to-one:
//! several scans may resolve to the same verification, and verifications
//! older than every scan are never matched.

use crate::events::{LogEntry, VerificationEntry};

use super::status::MatchStatus;

/// Earliest verification with `timestamp >= t`, by linear scan
pub fn find_match(t: i64, verified: &[VerificationEntry]) -> Option<&VerificationEntry> {
    let mut best: Option<&VerificationEntry> = None;

    for entry in verified.iter().filter(|entry| entry.timestamp >= t) {
        match best {
            // Strict comparison keeps the first of equal timestamps
            Some(current) if entry.timestamp >= current.timestamp => {}
            _ => best = Some(entry),
        }
    }

    best
}

/// Status of the scan at `t` against the given verifications
pub fn status_for(t: i64, verified: &[VerificationEntry]) -> MatchStatus {
    MatchStatus::from_match(find_match(t, verified))
}

/// Verifications sorted once by timestamp for repeated lower-bound lookups
#[derive(Debug, Clone)]
pub struct VerificationIndex<'a> {
    sorted: Vec<&'a VerificationEntry>,
}

impl<'a> VerificationIndex<'a> {
    pub fn new(verified: &'a [VerificationEntry]) -> Self {
        let mut sorted: Vec<&VerificationEntry> = verified.iter().collect();
        // Stable, so equal timestamps keep their input order
        sorted.sort_by_key(|entry| entry.timestamp);
        Self { sorted }
    }

    /// Same result as [`find_match`] in O(log V)
    pub fn find(&self, t: i64) -> Option<&'a VerificationEntry> {
        let idx = self.sorted.partition_point(|entry| entry.timestamp < t);
        self.sorted.get(idx).copied()
    }
}

/// A scan together with the verification it resolved to
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedLog<'a> {
    pub log: &'a LogEntry,
    pub verification: Option<&'a VerificationEntry>,
    pub status: MatchStatus,
}

/// Match every scan, ascending by scan timestamp
pub fn match_logs<'a>(
    logs: &'a [LogEntry],
    verified: &'a [VerificationEntry],
) -> Vec<MatchedLog<'a>> {
    let index = VerificationIndex::new(verified);

    let mut ordered: Vec<&LogEntry> = logs.iter().collect();
    ordered.sort_by_key(|log| log.timestamp);

    ordered
        .into_iter()
        .map(|log| {
            let verification = index.find(log.timestamp);
            MatchedLog {
                log,
                verification,
                status: MatchStatus::from_match(verification),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::VerificationMessage;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn log(t: i64, message: &str) -> LogEntry {
        LogEntry::new(t, message)
    }

    fn verdict(t: i64, accepted: bool) -> VerificationEntry {
        VerificationEntry::new(t, accepted)
    }

    #[test]
    fn test_empty_verifications_is_pending() {
        assert!(find_match(100, &[]).is_none());
        assert_eq!(status_for(100, &[]), MatchStatus::Pending);
    }

    #[test]
    fn test_later_verification_accepted() {
        let verified = vec![verdict(150, true)];
        assert_eq!(status_for(100, &verified), MatchStatus::Accepted);
    }

    #[test]
    fn test_earliest_qualifying_verification_wins() {
        let verified = vec![verdict(200, true), verdict(150, false)];
        let matched = find_match(100, &verified).unwrap();
        assert_eq!(matched.timestamp, 150);
        assert_eq!(status_for(100, &verified), MatchStatus::Rejected);
    }

    #[test]
    fn test_orphaned_earlier_verification_ignored() {
        let verified = vec![verdict(150, true)];
        assert!(find_match(300, &verified).is_none());
        assert_eq!(status_for(300, &verified), MatchStatus::Pending);
    }

    #[test]
    fn test_equal_timestamp_matches() {
        let verified = vec![verdict(100, true)];
        assert_eq!(find_match(100, &verified).unwrap().timestamp, 100);
    }

    #[test]
    fn test_ties_resolve_to_first_in_input() {
        let verified = vec![
            VerificationEntry::new(150, "first"),
            VerificationEntry::new(150, true),
        ];

        let matched = find_match(100, &verified).unwrap();
        assert_eq!(matched.message, VerificationMessage::Text("first".to_string()));

        let index = VerificationIndex::new(&verified);
        assert_eq!(index.find(100), Some(&verified[0]));
    }

    #[test]
    fn test_many_logs_share_one_verification() {
        let logs = vec![log(120, "B"), log(100, "A")];
        let verified = vec![verdict(150, true), verdict(50, false)];

        let matched = match_logs(&logs, &verified);
        assert_eq!(matched.len(), 2);
        assert_eq!(matched[0].log.message, "A");
        assert_eq!(matched[1].log.message, "B");
        for m in &matched {
            assert_eq!(m.verification.unwrap().timestamp, 150);
            assert_eq!(m.status, MatchStatus::Accepted);
        }
    }

    #[test]
    fn test_matching_is_idempotent() {
        let logs = vec![log(10, "a"), log(30, "b"), log(70, "c")];
        let verified = vec![verdict(20, true), verdict(60, false)];

        assert_eq!(match_logs(&logs, &verified), match_logs(&logs, &verified));
        assert_eq!(find_match(30, &verified), find_match(30, &verified));
    }

    #[test]
    fn test_index_agrees_with_linear_scan() {
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..200 {
            let count = rng.gen_range(0..25);
            let verified: Vec<VerificationEntry> = (0..count)
                .map(|_| verdict(rng.gen_range(0..100), rng.gen_bool(0.5)))
                .collect();
            let index = VerificationIndex::new(&verified);

            for t in -5..110 {
                let linear = find_match(t, &verified);
                // Same entry, not just an equal one
                assert_eq!(
                    linear.map(|e| e as *const VerificationEntry),
                    index.find(t).map(|e| e as *const VerificationEntry),
                );

                match linear {
                    Some(m) => {
                        assert!(m.timestamp >= t);
                        assert!(verified
                            .iter()
                            .filter(|v| v.timestamp >= t)
                            .all(|v| v.timestamp >= m.timestamp));
                    }
                    None => assert!(verified.iter().all(|v| v.timestamp < t)),
                }
            }
        }
    }
}
