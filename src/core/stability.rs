use crate::core::error::{MalformedPreferenceError, Side};
use crate::core::matching::Matching;
use crate::core::preferences::{validate, PreferenceTable, RankIndex};
use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;

/// A proposer and responder who both prefer each other over their partners
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockingPair {
    pub proposer: String,
    pub responder: String,
}

/// Blocking-pair detection against a fixed pair of preference tables
///
/// For each proposer the scan visits every responder it ranks above its
/// current partner (its whole list when unmatched), which is exactly the set
/// of responders it would leave its partner for. Each of those responders is
/// then asked whether it would leave its own partner. A pair passing both
/// tests is blocking, so both sides of the definition are covered by a single
/// pass over the proposer lists.
pub struct StabilityCheck<'a> {
    proposers: &'a PreferenceTable,
    responders: &'a PreferenceTable,
    proposer_ranks: RankIndex<'a>,
    responder_ranks: RankIndex<'a>,
}

impl<'a> StabilityCheck<'a> {
    pub fn new(
        proposers: &'a PreferenceTable,
        responders: &'a PreferenceTable,
    ) -> Result<Self, MalformedPreferenceError> {
        validate(proposers, responders)?;
        Ok(Self {
            proposers,
            responders,
            proposer_ranks: RankIndex::new(Side::Proposer, proposers),
            responder_ranks: RankIndex::new(Side::Responder, responders),
        })
    }

    /// Every blocking pair in proposer order, then preference order
    pub fn blocking_pairs(&self, matching: &Matching) -> Result<Vec<BlockingPair>, MalformedPreferenceError> {
        let mut blocking = Vec::new();
        self.scan(matching, |proposer, responder| {
            blocking.push(BlockingPair {
                proposer: proposer.to_string(),
                responder: responder.to_string(),
            });
            ControlFlow::Continue(())
        })?;
        Ok(blocking)
    }

    /// Stops at the first blocking pair
    pub fn is_stable(&self, matching: &Matching) -> Result<bool, MalformedPreferenceError> {
        let mut stable = true;
        self.scan(matching, |_, _| {
            stable = false;
            ControlFlow::Break(())
        })?;
        Ok(stable)
    }

    fn scan<F>(&self, matching: &Matching, mut on_blocking: F) -> Result<(), MalformedPreferenceError>
    where
        F: FnMut(&str, &str) -> ControlFlow<()>,
    {
        self.check_agents(matching)?;

        for (proposer, list) in self.proposers.iter() {
            // Proposers missing from the matching count as unmatched
            let cutoff = match matching.partner_of(proposer) {
                Some(partner) => self.proposer_ranks.rank_of(proposer, partner)?,
                None => list.len(),
            };

            for responder in &list[..cutoff] {
                let would_accept = match matching.proposer_of(responder) {
                    Some(holder) => self.responder_ranks.prefers(responder, proposer, holder)?,
                    None => true,
                };

                if would_accept && on_blocking(proposer, responder).is_break() {
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    fn check_agents(&self, matching: &Matching) -> Result<(), MalformedPreferenceError> {
        for (proposer, responder) in matching.iter() {
            if !self.proposers.contains(proposer) {
                return Err(MalformedPreferenceError::UnknownMatchedAgent {
                    side: Side::Proposer,
                    agent: proposer.to_string(),
                });
            }
            if let Some(responder) = responder {
                if !self.responders.contains(responder) {
                    return Err(MalformedPreferenceError::UnknownMatchedAgent {
                        side: Side::Responder,
                        agent: responder.to_string(),
                    });
                }
                // Both ends must rank each other for the pair to be admissible
                self.proposer_ranks.rank_of(proposer, responder)?;
                self.responder_ranks.rank_of(responder, proposer)?;
            }
        }
        Ok(())
    }
}

/// List every blocking pair of `matching`
pub fn blocking_pairs(
    matching: &Matching,
    proposers: &PreferenceTable,
    responders: &PreferenceTable,
) -> Result<Vec<BlockingPair>, MalformedPreferenceError> {
    StabilityCheck::new(proposers, responders)?.blocking_pairs(matching)
}

/// Whether `matching` admits no blocking pair
pub fn is_stable(
    matching: &Matching,
    proposers: &PreferenceTable,
    responders: &PreferenceTable,
) -> Result<bool, MalformedPreferenceError> {
    StabilityCheck::new(proposers, responders)?.is_stable(matching)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market() -> (PreferenceTable, PreferenceTable) {
        let hospitals = PreferenceTable::new()
            .with("H1", ["S1", "S2", "S3"])
            .with("H2", ["S1", "S3", "S2"])
            .with("H3", ["S3", "S2", "S1"]);
        let students = PreferenceTable::new()
            .with("S1", ["H2", "H1", "H3"])
            .with("S2", ["H1", "H3", "H2"])
            .with("S3", ["H1", "H2", "H3"]);
        (hospitals, students)
    }

    #[test]
    fn test_stable_matching_has_no_blocking_pairs() {
        let (hospitals, students) = market();
        let matching = Matching::from_pairs([("H1", "S2"), ("H2", "S1"), ("H3", "S3")]).unwrap();

        assert!(is_stable(&matching, &hospitals, &students).unwrap());
        assert!(blocking_pairs(&matching, &hospitals, &students).unwrap().is_empty());
    }

    #[test]
    fn test_detects_blocking_pair() {
        let (hospitals, students) = market();
        // H1 prefers S1 over S3, and S1 prefers H1 over H3
        let matching = Matching::from_pairs([("H1", "S3"), ("H2", "S2"), ("H3", "S1")]).unwrap();

        let pairs = blocking_pairs(&matching, &hospitals, &students).unwrap();
        assert!(pairs.contains(&BlockingPair {
            proposer: "H1".to_string(),
            responder: "S1".to_string(),
        }));
        assert!(!is_stable(&matching, &hospitals, &students).unwrap());
    }

    #[test]
    fn test_unmatched_agents_block_each_other() {
        let (hospitals, students) = market();
        let matching = Matching::from_pairs([("H2", "S1"), ("H3", "S3")]).unwrap();

        // H1 is free; S2 is free too and S3 would drop H3 for H1
        let pairs = blocking_pairs(&matching, &hospitals, &students).unwrap();
        assert_eq!(
            pairs,
            vec![
                BlockingPair {
                    proposer: "H1".to_string(),
                    responder: "S2".to_string(),
                },
                BlockingPair {
                    proposer: "H1".to_string(),
                    responder: "S3".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_explicitly_unmatched_entry_is_valid() {
        let hospitals = PreferenceTable::new()
            .with("H1", ["S1"])
            .with("H2", ["S1"]);
        let students = PreferenceTable::new().with("S1", ["H2", "H1"]);
        let matching = Matching::from_assignments([("H1", None), ("H2", Some("S1"))]).unwrap();

        assert!(is_stable(&matching, &hospitals, &students).unwrap());
    }

    #[test]
    fn test_is_stable_agrees_with_blocking_pairs() {
        let (hospitals, students) = market();
        let check = StabilityCheck::new(&hospitals, &students).unwrap();
        let matchings = [
            Matching::from_pairs([("H1", "S2"), ("H2", "S1"), ("H3", "S3")]).unwrap(),
            Matching::from_pairs([("H1", "S3"), ("H2", "S2"), ("H3", "S1")]).unwrap(),
            Matching::from_pairs([("H2", "S1"), ("H3", "S3")]).unwrap(),
            Matching::new(),
        ];

        for matching in &matchings {
            let pairs = check.blocking_pairs(matching).unwrap();
            assert_eq!(check.is_stable(matching).unwrap(), pairs.is_empty(), "{}", matching);
        }
    }

    #[test]
    fn test_is_stable_still_rejects_malformed_matching() {
        let (hospitals, students) = market();
        let check = StabilityCheck::new(&hospitals, &students).unwrap();
        let matching = Matching::from_pairs([("H1", "S3"), ("H3", "S9")]).unwrap();
        assert!(matches!(
            check.is_stable(&matching),
            Err(MalformedPreferenceError::UnknownMatchedAgent { side: Side::Responder, .. })
        ));
    }

    #[test]
    fn test_verification_is_pure() {
        let (hospitals, students) = market();
        let matching = Matching::from_pairs([("H1", "S3"), ("H2", "S2"), ("H3", "S1")]).unwrap();

        let first = blocking_pairs(&matching, &hospitals, &students).unwrap();
        let second = blocking_pairs(&matching, &hospitals, &students).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rejects_unknown_and_unranked_pairs() {
        let (hospitals, students) = market();

        let unknown = Matching::from_pairs([("H9", "S1")]).unwrap();
        assert!(matches!(
            is_stable(&unknown, &hospitals, &students),
            Err(MalformedPreferenceError::UnknownMatchedAgent { side: Side::Proposer, .. })
        ));

        let unknown = Matching::from_pairs([("H1", "S9")]).unwrap();
        assert!(matches!(
            is_stable(&unknown, &hospitals, &students),
            Err(MalformedPreferenceError::UnknownMatchedAgent { side: Side::Responder, .. })
        ));

        let hospitals = PreferenceTable::new()
            .with("H1", ["S1"])
            .with("H2", ["S2"]);
        let students = PreferenceTable::new()
            .with("S1", ["H1"])
            .with("S2", ["H2"]);
        let unranked = Matching::from_pairs([("H1", "S2"), ("H2", "S1")]).unwrap();
        assert!(matches!(
            is_stable(&unranked, &hospitals, &students),
            Err(MalformedPreferenceError::Unranked { side: Side::Proposer, .. })
        ));
    }
}
