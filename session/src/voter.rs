//! Voter records and the whitelist registry.

use crate::error::SessionError;
use ballot_types::{ProposalId, VoterAddress};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-identity voting state for the current session.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Voter {
    /// Eligible to propose and vote in the current phase.
    pub is_registered: bool,
    /// The proposal this voter's counted vote points at, if any.
    pub voted_for: Option<ProposalId>,
}

impl Voter {
    fn registered() -> Self {
        Self {
            is_registered: true,
            voted_for: None,
        }
    }

    /// Whether this voter has a counted vote.
    pub fn has_voted(&self) -> bool {
        self.voted_for.is_some()
    }
}

/// The voter whitelist: identity records plus the ordered identity list.
///
/// Whitelist membership ("known to the session") is distinct from
/// registration ("currently eligible to propose/vote"); an unregistered
/// voter stays on the whitelist until removed outright.
///
/// The registry does no phase or capability gating; that is the
/// workflow's job.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VoterRegistry {
    records: HashMap<VoterAddress, Voter>,
    /// Identities in whitelisting order.
    order: Vec<VoterAddress>,
}

impl VoterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whitelist a new identity as a registered voter.
    pub fn add(&mut self, id: VoterAddress) -> Result<(), SessionError> {
        if self.records.contains_key(&id) {
            return Err(SessionError::AlreadyRegistered(id));
        }
        self.records.insert(id.clone(), Voter::registered());
        self.order.push(id);
        Ok(())
    }

    /// Hard-delete an identity: record and order entry both go.
    ///
    /// The identity could later be re-added as a fresh voter with no
    /// history.
    pub fn remove(&mut self, id: &VoterAddress) -> Result<(), SessionError> {
        if self.records.remove(id).is_none() {
            return Err(SessionError::NotAVoter(id.clone()));
        }
        self.order.retain(|v| v != id);
        Ok(())
    }

    /// Drop registration while keeping whitelist membership.
    ///
    /// Any counted vote stays on the record; the caller decides whether to
    /// retract it (see [`VoterRegistry::retract`]).
    pub fn unregister(&mut self, id: &VoterAddress) -> Result<(), SessionError> {
        let record = self
            .records
            .get_mut(id)
            .ok_or_else(|| SessionError::NotAVoter(id.clone()))?;
        if !record.is_registered {
            return Err(SessionError::AlreadyUnregistered(id.clone()));
        }
        record.is_registered = false;
        Ok(())
    }

    /// Restore registration for a whitelisted identity.
    ///
    /// Re-registration never restores a previously retracted vote.
    pub fn register(&mut self, id: &VoterAddress) -> Result<(), SessionError> {
        let record = self
            .records
            .get_mut(id)
            .ok_or_else(|| SessionError::NotAVoter(id.clone()))?;
        if record.is_registered {
            return Err(SessionError::AlreadyRegistered(id.clone()));
        }
        record.is_registered = true;
        Ok(())
    }

    /// Take the voter's counted vote, if any, leaving the record voteless.
    ///
    /// The returned id must be reversed in the proposal ledger by the
    /// caller.
    pub fn retract(&mut self, id: &VoterAddress) -> Option<ProposalId> {
        self.records.get_mut(id).and_then(|r| r.voted_for.take())
    }

    /// Record a counted vote. No-op for unknown identities; the workflow
    /// validates the caller before getting here.
    pub fn record_vote(&mut self, id: &VoterAddress, proposal: ProposalId) {
        if let Some(record) = self.records.get_mut(id) {
            record.voted_for = Some(proposal);
        }
    }

    /// Look up a voter record. Fails for identities never whitelisted.
    pub fn get(&self, id: &VoterAddress) -> Result<&Voter, SessionError> {
        self.records
            .get(id)
            .ok_or_else(|| SessionError::NotAVoter(id.clone()))
    }

    /// Whitelist membership, independent of registration or voting state.
    pub fn is_voter(&self, id: &VoterAddress) -> bool {
        self.records.contains_key(id)
    }

    /// Clear every record's counted vote, keeping membership and
    /// registration.
    pub fn clear_votes(&mut self) {
        for record in self.records.values_mut() {
            record.voted_for = None;
        }
    }

    /// Remove every identity, returning them in whitelisting order.
    pub fn purge(&mut self) -> Vec<VoterAddress> {
        self.records.clear();
        std::mem::take(&mut self.order)
    }

    /// Identities in whitelisting order.
    pub fn iter(&self) -> impl Iterator<Item = &VoterAddress> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
