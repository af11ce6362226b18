use crate::core::error::{MalformedPreferenceError, Side};
use crate::core::matching::Matching;
use crate::core::preferences::{validate, PreferenceTable, RankIndex};
use std::collections::VecDeque;

/// Result of a deferred-acceptance run
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub matching: Matching,
    /// Proposals made before convergence
    pub proposals: usize,
}

/// Proposer-initiated deferred acceptance (Gale–Shapley)
///
/// The preference tables are borrowed, never consumed: each proposer walks
/// its own list through a cursor, so the caller's tables are untouched and
/// can be inspected after solving.
///
/// # Guarantees
/// For strict preferences the result is stable, proposer-optimal and
/// responder-pessimal. At most one proposal is made per list entry.
pub struct DeferredAcceptance<'a> {
    proposers: &'a PreferenceTable,
    responder_ranks: RankIndex<'a>,
}

impl<'a> DeferredAcceptance<'a> {
    pub fn new(
        proposers: &'a PreferenceTable,
        responders: &'a PreferenceTable,
    ) -> Result<Self, MalformedPreferenceError> {
        validate(proposers, responders)?;
        Ok(Self {
            proposers,
            responder_ranks: RankIndex::new(Side::Responder, responders),
        })
    }

    /// Run proposals until no free proposer has anyone left to ask
    pub fn run(&self) -> Result<SolveOutcome, MalformedPreferenceError> {
        let mut matching = Matching::unmatched(self.proposers.agents());
        let mut cursors = vec![0usize; self.proposers.len()];
        let mut free: VecDeque<usize> = (0..self.proposers.len()).collect();
        let mut proposals = 0;

        while let Some(&current) = free.front() {
            let Some((proposer, list)) = self.proposers.entry(current) else {
                free.pop_front();
                continue;
            };

            let Some(responder) = list.get(cursors[current]) else {
                tracing::trace!("{} exhausted its preferences and stays unmatched", proposer);
                free.pop_front();
                continue;
            };
            cursors[current] += 1;
            proposals += 1;

            match matching.proposer_of(responder).map(str::to_string) {
                None => {
                    tracing::trace!("{} proposes to free {}", proposer, responder);
                    matching.assign(proposer, responder);
                    free.pop_front();
                }
                Some(holder) => {
                    if !self.responder_ranks.prefers(responder, proposer, &holder)? {
                        tracing::trace!("{} rejects {} and keeps {}", responder, proposer, holder);
                        continue;
                    }

                    tracing::trace!("{} trades {} for {}", responder, holder, proposer);
                    free.pop_front();
                    if let Some(displaced) = matching.assign(proposer, responder) {
                        if let Some(position) = self.proposers.position(&displaced) {
                            free.push_back(position);
                        }
                    }
                }
            }
        }

        tracing::debug!(
            "Deferred acceptance converged after {} proposals ({} of {} proposers matched)",
            proposals,
            matching.matched_count(),
            matching.len()
        );

        Ok(SolveOutcome {
            matching,
            proposals,
        })
    }
}

/// Compute the proposer-optimal stable matching
///
/// Fails with [`MalformedPreferenceError`] when either side names an agent
/// the other side does not define or does not rank back.
pub fn solve(
    proposers: &PreferenceTable,
    responders: &PreferenceTable,
) -> Result<Matching, MalformedPreferenceError> {
    Ok(DeferredAcceptance::new(proposers, responders)?.run()?.matching)
}
