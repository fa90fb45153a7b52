//! The proposal ledger.

use crate::error::SessionError;
use ballot_types::ProposalId;
use serde::{Deserialize, Serialize};

/// A registered proposal with its running vote count.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub description: String,
    pub vote_count: u32,
}

/// Ordered list of proposals, append-only within a session.
///
/// Invariant: `proposals[i].id == i + 1`. Ids are derived from the sequence
/// position, never a separate counter, so they are dense, 1-based, and
/// never reused until [`ProposalLedger::reset`] starts a new session.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProposalLedger {
    proposals: Vec<Proposal>,
}

impl ProposalLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a proposal, returning its assigned id.
    pub fn add(&mut self, description: impl Into<String>) -> ProposalId {
        let id = ProposalId::new(self.proposals.len() as u32 + 1);
        self.proposals.push(Proposal {
            id,
            description: description.into(),
            vote_count: 0,
        });
        id
    }

    fn index_of(&self, id: ProposalId) -> Result<usize, SessionError> {
        let raw = id.as_u32() as usize;
        if raw == 0 || raw > self.proposals.len() {
            return Err(SessionError::NoSuchProposal(id));
        }
        Ok(raw - 1)
    }

    /// Look up a proposal by id. The reserved id 0 always fails.
    pub fn get(&self, id: ProposalId) -> Result<&Proposal, SessionError> {
        self.index_of(id).map(|i| &self.proposals[i])
    }

    /// All proposals in id order.
    pub fn all(&self) -> &[Proposal] {
        &self.proposals
    }

    /// Count a vote for a proposal.
    pub fn record_vote(&mut self, id: ProposalId) -> Result<(), SessionError> {
        let i = self.index_of(id)?;
        self.proposals[i].vote_count += 1;
        Ok(())
    }

    /// Reverse a previously counted vote.
    pub fn retract_vote(&mut self, id: ProposalId) -> Result<(), SessionError> {
        let i = self.index_of(id)?;
        self.proposals[i].vote_count = self.proposals[i].vote_count.saturating_sub(1);
        Ok(())
    }

    /// Move a counted vote between proposals.
    ///
    /// The target is validated before the source is touched, so the total
    /// count across the ledger is unchanged whether or not this succeeds.
    pub fn move_vote(&mut self, from: ProposalId, to: ProposalId) -> Result<(), SessionError> {
        let to_idx = self.index_of(to)?;
        let from_idx = self.index_of(from)?;
        self.proposals[from_idx].vote_count = self.proposals[from_idx].vote_count.saturating_sub(1);
        self.proposals[to_idx].vote_count += 1;
        Ok(())
    }

    /// Discard every proposal; the next assigned id is 1 again.
    pub fn reset(&mut self) {
        self.proposals.clear();
    }

    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_dense_and_one_based() {
        let mut ledger = ProposalLedger::new();
        for i in 0..5 {
            let id = ledger.add(format!("proposal {i}"));
            assert_eq!(id.as_u32(), i + 1);
        }
        for (i, proposal) in ledger.all().iter().enumerate() {
            assert_eq!(proposal.id.as_u32() as usize, i + 1);
        }
    }

    #[test]
    fn id_zero_is_reserved() {
        let mut ledger = ProposalLedger::new();
        ledger.add("only");
        assert!(matches!(
            ledger.get(ProposalId::NONE),
            Err(SessionError::NoSuchProposal(_))
        ));
    }

    #[test]
    fn out_of_range_id_fails() {
        let mut ledger = ProposalLedger::new();
        ledger.add("only");
        match ledger.get(ProposalId::new(2)).unwrap_err() {
            SessionError::NoSuchProposal(id) => assert_eq!(id.as_u32(), 2),
            other => panic!("expected NoSuchProposal, got {other}"),
        }
    }

    #[test]
    fn record_and_retract_adjust_counts() {
        let mut ledger = ProposalLedger::new();
        let id = ledger.add("p");
        ledger.record_vote(id).unwrap();
        ledger.record_vote(id).unwrap();
        assert_eq!(ledger.get(id).unwrap().vote_count, 2);

        ledger.retract_vote(id).unwrap();
        assert_eq!(ledger.get(id).unwrap().vote_count, 1);
    }

    #[test]
    fn move_vote_conserves_total() {
        let mut ledger = ProposalLedger::new();
        let a = ledger.add("a");
        let b = ledger.add("b");
        ledger.record_vote(a).unwrap();

        ledger.move_vote(a, b).unwrap();
        assert_eq!(ledger.get(a).unwrap().vote_count, 0);
        assert_eq!(ledger.get(b).unwrap().vote_count, 1);
    }

    #[test]
    fn move_vote_to_invalid_target_changes_nothing() {
        let mut ledger = ProposalLedger::new();
        let a = ledger.add("a");
        ledger.record_vote(a).unwrap();

        assert!(ledger.move_vote(a, ProposalId::new(9)).is_err());
        assert_eq!(ledger.get(a).unwrap().vote_count, 1);
    }

    #[test]
    fn reset_restarts_id_sequence() {
        let mut ledger = ProposalLedger::new();
        ledger.add("a");
        ledger.add("b");

        ledger.reset();
        assert!(ledger.is_empty());
        assert_eq!(ledger.add("fresh").as_u32(), 1);
    }
}
