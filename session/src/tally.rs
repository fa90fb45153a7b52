//! Winner selection.

use crate::proposal::Proposal;
use ballot_types::{EventSink, ProposalId, SessionEvent};

/// Outcome of a tie-break between the current leader and a challenger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TieDecision {
    KeepIncumbent,
    TakeChallenger,
}

/// Tie-break policy consulted whenever two proposals share the leading
/// count during a tally scan.
///
/// Hosts inject their own policy via
/// [`SessionWorkflow::with_tie_break`](crate::SessionWorkflow::with_tie_break).
pub trait TieBreak {
    fn resolve(&self, incumbent: &Proposal, challenger: &Proposal) -> TieDecision;
}

/// Placeholder tie-break: the earlier-registered (lower-id) proposal stays
/// the leader.
///
/// Pending a real policy decision; ties are still announced as [`Draw`]
/// events so observers can see that the outcome rested on this rule.
///
/// [`Draw`]: SessionEvent::Draw
#[derive(Clone, Copy, Debug, Default)]
pub struct KeepEarliest;

impl TieBreak for KeepEarliest {
    fn resolve(&self, _incumbent: &Proposal, _challenger: &Proposal) -> TieDecision {
        TieDecision::KeepIncumbent
    }
}

/// Deterministic winner scan over the proposal ledger.
pub struct TallyEngine;

impl TallyEngine {
    /// Find the winning proposal id.
    ///
    /// Scans in id order keeping a current leader: a strictly greater count
    /// replaces the leader; an equal count raises a `Draw` event and defers
    /// to the tie-break. Returns [`ProposalId::NONE`] when the ledger is
    /// empty or no proposal received a vote.
    pub fn compute_winner(
        proposals: &[Proposal],
        tie_break: &dyn TieBreak,
        sink: &dyn EventSink,
    ) -> ProposalId {
        let Some(first) = proposals.first() else {
            return ProposalId::NONE;
        };
        let mut leader = first;
        for challenger in &proposals[1..] {
            if challenger.vote_count > leader.vote_count {
                leader = challenger;
            } else if challenger.vote_count == leader.vote_count {
                sink.emit(SessionEvent::Draw {
                    incumbent: leader.id,
                    challenger: challenger.id,
                });
                if tie_break.resolve(leader, challenger) == TieDecision::TakeChallenger {
                    leader = challenger;
                }
            }
        }
        if leader.vote_count == 0 {
            ProposalId::NONE
        } else {
            leader.id
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_nullables::{NullSink, RecordingSink};

    fn proposals(counts: &[u32]) -> Vec<Proposal> {
        counts
            .iter()
            .enumerate()
            .map(|(i, &vote_count)| Proposal {
                id: ProposalId::new(i as u32 + 1),
                description: format!("proposal {}", i + 1),
                vote_count,
            })
            .collect()
    }

    #[test]
    fn strictly_greater_count_wins() {
        let winner = TallyEngine::compute_winner(&proposals(&[2, 5, 3]), &KeepEarliest, &NullSink);
        assert_eq!(winner.as_u32(), 2);
    }

    #[test]
    fn tie_keeps_earlier_proposal_and_announces_draw() {
        let sink = RecordingSink::new();
        let winner = TallyEngine::compute_winner(&proposals(&[5, 5, 3]), &KeepEarliest, &sink);

        assert_eq!(winner.as_u32(), 1);
        assert_eq!(
            sink.events(),
            vec![SessionEvent::Draw {
                incumbent: ProposalId::new(1),
                challenger: ProposalId::new(2),
            }]
        );
    }

    #[test]
    fn empty_ledger_has_no_winner() {
        let winner = TallyEngine::compute_winner(&[], &KeepEarliest, &NullSink);
        assert!(winner.is_none());
    }

    #[test]
    fn all_zero_counts_have_no_winner() {
        let winner = TallyEngine::compute_winner(&proposals(&[0, 0, 0]), &KeepEarliest, &NullSink);
        assert!(winner.is_none());
    }

    #[test]
    fn late_leader_after_early_tie() {
        // Tie between 1 and 2 first, then 3 overtakes outright.
        let sink = RecordingSink::new();
        let winner = TallyEngine::compute_winner(&proposals(&[4, 4, 7]), &KeepEarliest, &sink);

        assert_eq!(winner.as_u32(), 3);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn replacement_policy_takes_the_challenger() {
        struct KeepLatest;
        impl TieBreak for KeepLatest {
            fn resolve(&self, _incumbent: &Proposal, _challenger: &Proposal) -> TieDecision {
                TieDecision::TakeChallenger
            }
        }

        let winner = TallyEngine::compute_winner(&proposals(&[5, 5]), &KeepLatest, &NullSink);
        assert_eq!(winner.as_u32(), 2);
    }
}
