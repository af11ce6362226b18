use crate::core::engine::DeferredAcceptance;
use crate::core::error::{MalformedPreferenceError, Side};
use crate::core::matching::Matching;
use crate::core::preferences::{PreferenceTable, RankIndex};
use crate::core::stability::StabilityCheck;

/// Stable matchings reachable from the proposer-optimal matching by one
/// exchange of partners
///
/// The first element is always the deferred-acceptance result. A pair of
/// proposers `(h1, h2)` holding `(s1, s2)` yields a candidate only when `s1`
/// prefers `h2` to `h1` and `s2` prefers `h1` to `h2`; a candidate is kept
/// only if it has no blocking pair.
///
/// # Limitations
/// This samples the neighbourhood of the seed. Stable matchings that need
/// more than one exchange to reach from the seed are not produced.
pub fn enumerate_stable(
    proposers: &PreferenceTable,
    responders: &PreferenceTable,
) -> Result<Vec<Matching>, MalformedPreferenceError> {
    enumerate_stable_up_to(proposers, responders, usize::MAX)
}

/// Like [`enumerate_stable`], but stops once `limit` matchings are found
///
/// The seed counts towards `limit`. Input is validated even when `limit` is
/// zero.
pub fn enumerate_stable_up_to(
    proposers: &PreferenceTable,
    responders: &PreferenceTable,
    limit: usize,
) -> Result<Vec<Matching>, MalformedPreferenceError> {
    let seed = DeferredAcceptance::new(proposers, responders)?.run()?.matching;
    if limit == 0 {
        return Ok(Vec::new());
    }

    let check = StabilityCheck::new(proposers, responders)?;
    let proposer_ranks = RankIndex::new(Side::Proposer, proposers);
    let responder_ranks = RankIndex::new(Side::Responder, responders);

    let agents: Vec<&str> = proposers.agents().collect();
    let mut found = vec![seed.clone()];

    'pairs: for (i, &first) in agents.iter().enumerate() {
        for &second in &agents[i + 1..] {
            if found.len() >= limit {
                tracing::debug!("Stopping enumeration at {} matchings", limit);
                break 'pairs;
            }

            let (Some(first_partner), Some(second_partner)) =
                (seed.partner_of(first), seed.partner_of(second))
            else {
                continue;
            };

            // A swap onto a partner who is not listed cannot be a matching
            let admissible = proposer_ranks.rank(first, second_partner).is_some()
                && proposer_ranks.rank(second, first_partner).is_some()
                && responder_ranks.rank(first_partner, second).is_some()
                && responder_ranks.rank(second_partner, first).is_some();
            if !admissible {
                continue;
            }

            if !responder_ranks.prefers(first_partner, second, first)?
                || !responder_ranks.prefers(second_partner, first, second)?
            {
                continue;
            }

            let Some(candidate) = seed.swapped(first, second) else {
                continue;
            };

            if check.is_stable(&candidate)? {
                tracing::debug!("Swapping partners of {} and {} keeps the matching stable", first, second);
                found.push(candidate);
            }
        }
    }

    tracing::debug!("Found {} stable matchings by pairwise exchange", found.len());
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_by_four() -> (PreferenceTable, PreferenceTable) {
        let hospitals = PreferenceTable::new()
            .with("H1", ["S1", "S2", "S3", "S4"])
            .with("H2", ["S2", "S1", "S3", "S4"])
            .with("H3", ["S3", "S2", "S1", "S4"])
            .with("H4", ["S4", "S2", "S3", "S1"]);
        let students = PreferenceTable::new()
            .with("S1", ["H2", "H1", "H3", "H4"])
            .with("S2", ["H1", "H2", "H3", "H4"])
            .with("S3", ["H3", "H2", "H1", "H4"])
            .with("S4", ["H4", "H2", "H3", "H1"]);
        (hospitals, students)
    }

    #[test]
    fn test_seed_comes_first() {
        let (hospitals, students) = four_by_four();
        let matchings = enumerate_stable(&hospitals, &students).unwrap();

        let seed = Matching::from_pairs([("H1", "S1"), ("H2", "S2"), ("H3", "S3"), ("H4", "S4")]).unwrap();
        assert_eq!(matchings[0], seed);
    }

    #[test]
    fn test_finds_responder_preferred_swap() {
        let (hospitals, students) = four_by_four();
        let matchings = enumerate_stable(&hospitals, &students).unwrap();

        let swapped = Matching::from_pairs([("H1", "S2"), ("H2", "S1"), ("H3", "S3"), ("H4", "S4")]).unwrap();
        assert_eq!(matchings.len(), 2);
        assert_eq!(matchings[1], swapped);

        let check = StabilityCheck::new(&hospitals, &students).unwrap();
        for matching in &matchings {
            assert!(check.is_stable(matching).unwrap(), "unstable: {}", matching);
        }
    }

    #[test]
    fn test_single_stable_matching() {
        let hospitals = PreferenceTable::new()
            .with("H1", ["S1", "S2"])
            .with("H2", ["S1", "S2"]);
        let students = PreferenceTable::new()
            .with("S1", ["H1", "H2"])
            .with("S2", ["H1", "H2"]);

        let matchings = enumerate_stable(&hospitals, &students).unwrap();
        assert_eq!(matchings.len(), 1);
    }

    /// `blocks` independent 2x2 markets, each with exactly one stable swap
    fn independent_blocks(blocks: usize) -> (PreferenceTable, PreferenceTable) {
        let mut hospitals = PreferenceTable::new();
        let mut students = PreferenceTable::new();
        for b in 0..blocks {
            let (h1, h2) = (format!("H{}", 2 * b), format!("H{}", 2 * b + 1));
            let (s1, s2) = (format!("S{}", 2 * b), format!("S{}", 2 * b + 1));
            hospitals = hospitals
                .with(h1.clone(), [s1.clone(), s2.clone()])
                .with(h2.clone(), [s2.clone(), s1.clone()]);
            students = students
                .with(s1, [h2.clone(), h1.clone()])
                .with(s2, [h1, h2]);
        }
        (hospitals, students)
    }

    #[test]
    fn test_every_block_contributes_a_swap() {
        let (hospitals, students) = independent_blocks(5);
        let matchings = enumerate_stable(&hospitals, &students).unwrap();
        assert_eq!(matchings.len(), 6);
    }

    #[test]
    fn test_limit_stops_after_enough_matchings() {
        let (hospitals, students) = independent_blocks(5);
        let all = enumerate_stable(&hospitals, &students).unwrap();

        let capped = enumerate_stable_up_to(&hospitals, &students, 3).unwrap();
        assert_eq!(capped.len(), 3);
        assert_eq!(capped[..], all[..3]);

        let seed_only = enumerate_stable_up_to(&hospitals, &students, 1).unwrap();
        assert_eq!(seed_only, vec![all[0].clone()]);

        assert!(enumerate_stable_up_to(&hospitals, &students, 0).unwrap().is_empty());
        assert_eq!(enumerate_stable_up_to(&hospitals, &students, 100).unwrap(), all);
    }

    #[test]
    fn test_limit_still_validates_input() {
        let (hospitals, students) = four_by_four();
        let hospitals = hospitals.with("H5", ["S9"]);
        assert!(enumerate_stable_up_to(&hospitals, &students, 0).is_err());
    }

    #[test]
    fn test_propagates_malformed_input() {
        let (hospitals, students) = four_by_four();
        let hospitals = hospitals.with("H5", ["S9"]);
        assert!(enumerate_stable(&hospitals, &students).is_err());
    }
}
