//! The session workflow state machine.
//!
//! [`SessionWorkflow`] owns the authoritative state (phase, voter registry,
//! proposal ledger, winner) and is the only way to mutate it. Every
//! operation checks the administrative gate and/or the current phase before
//! delegating to a registry, and either fully applies or leaves the state
//! untouched.

use crate::error::SessionError;
use crate::proposal::{Proposal, ProposalLedger};
use crate::tally::{KeepEarliest, TallyEngine, TieBreak};
use crate::voter::{Voter, VoterRegistry};
use ballot_types::{AdminGate, EventSink, Phase, ProposalId, SessionEvent, VoterAddress};
use serde::{Deserialize, Serialize};

/// What happens to the voter whitelist on restart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestartMode {
    /// Remove every listed voter; the registry starts over empty.
    PurgeVoters,
    /// Keep whitelist membership and registration flags; clear vote state.
    RetainVoters,
}

/// One voting session: phase machine, registries, and injected seams.
pub struct SessionWorkflow {
    phase: Phase,
    winning_proposal: ProposalId,
    voters: VoterRegistry,
    proposals: ProposalLedger,
    admin: Box<dyn AdminGate>,
    sink: Box<dyn EventSink>,
    tie_break: Box<dyn TieBreak>,
}

impl SessionWorkflow {
    /// Create an empty session in `RegisteringVoters`.
    pub fn new(admin: Box<dyn AdminGate>, sink: Box<dyn EventSink>) -> Self {
        Self::with_tie_break(admin, sink, Box::new(KeepEarliest))
    }

    /// Create an empty session with a custom tie-break policy.
    pub fn with_tie_break(
        admin: Box<dyn AdminGate>,
        sink: Box<dyn EventSink>,
        tie_break: Box<dyn TieBreak>,
    ) -> Self {
        Self {
            phase: Phase::RegisteringVoters,
            winning_proposal: ProposalId::NONE,
            voters: VoterRegistry::new(),
            proposals: ProposalLedger::new(),
            admin,
            sink,
            tie_break,
        }
    }

    /// Create a session with pre-seeded voters.
    ///
    /// Seeding follows `add_voter` semantics: each identity is whitelisted,
    /// registered, and announced. Duplicates are dropped.
    pub fn seeded(
        admin: Box<dyn AdminGate>,
        sink: Box<dyn EventSink>,
        voters: impl IntoIterator<Item = VoterAddress>,
    ) -> Self {
        let mut session = Self::new(admin, sink);
        for voter in voters {
            if session.voters.add(voter.clone()).is_ok() {
                session.sink.emit(SessionEvent::VoterRegistered(voter));
            }
        }
        session
    }

    // ── guards ───────────────────────────────────────────────────────────

    fn ensure_admin(&self, caller: &VoterAddress) -> Result<(), SessionError> {
        if self.admin.is_administrator(caller) {
            Ok(())
        } else {
            Err(SessionError::Unauthorized(caller.clone()))
        }
    }

    fn ensure_phase(&self, required: Phase) -> Result<(), SessionError> {
        if self.phase == required {
            Ok(())
        } else {
            Err(SessionError::InvalidPhase {
                required,
                actual: self.phase,
            })
        }
    }

    fn ensure_registered(&self, caller: &VoterAddress) -> Result<&Voter, SessionError> {
        let voter = self.voters.get(caller)?;
        if !voter.is_registered {
            return Err(SessionError::NotRegistered(caller.clone()));
        }
        Ok(voter)
    }

    fn set_phase(&mut self, current: Phase) {
        let previous = self.phase;
        self.phase = current;
        tracing::debug!(%previous, %current, "session phase advanced");
        self.sink
            .emit(SessionEvent::PhaseChanged { previous, current });
    }

    fn transition(
        &mut self,
        caller: &VoterAddress,
        from: Phase,
        to: Phase,
    ) -> Result<(), SessionError> {
        self.ensure_admin(caller)?;
        self.ensure_phase(from)?;
        self.set_phase(to);
        Ok(())
    }

    // ── phase transitions (administrative) ───────────────────────────────

    /// `RegisteringVoters → ProposalsRegistrationOpen`.
    pub fn open_proposals(&mut self, caller: &VoterAddress) -> Result<(), SessionError> {
        self.transition(
            caller,
            Phase::RegisteringVoters,
            Phase::ProposalsRegistrationOpen,
        )
    }

    /// `ProposalsRegistrationOpen → ProposalsRegistrationClosed`.
    pub fn close_proposals(&mut self, caller: &VoterAddress) -> Result<(), SessionError> {
        self.transition(
            caller,
            Phase::ProposalsRegistrationOpen,
            Phase::ProposalsRegistrationClosed,
        )
    }

    /// `ProposalsRegistrationClosed → VotingOpen`.
    pub fn open_voting(&mut self, caller: &VoterAddress) -> Result<(), SessionError> {
        self.transition(caller, Phase::ProposalsRegistrationClosed, Phase::VotingOpen)
    }

    /// `VotingOpen → VotingClosed`.
    pub fn close_voting(&mut self, caller: &VoterAddress) -> Result<(), SessionError> {
        self.transition(caller, Phase::VotingOpen, Phase::VotingClosed)
    }

    /// `VotingClosed → Tallied`: run the tally and store the winner.
    ///
    /// Returns the winning id, [`ProposalId::NONE`] when no proposal
    /// received any vote.
    pub fn tally(&mut self, caller: &VoterAddress) -> Result<ProposalId, SessionError> {
        self.ensure_admin(caller)?;
        self.ensure_phase(Phase::VotingClosed)?;
        let winner = TallyEngine::compute_winner(
            self.proposals.all(),
            self.tie_break.as_ref(),
            self.sink.as_ref(),
        );
        self.winning_proposal = winner;
        tracing::info!(%winner, "tally complete");
        self.set_phase(Phase::Tallied);
        Ok(winner)
    }

    /// `Tallied → RegisteringVoters`: start a new round.
    ///
    /// Proposals are discarded (the next id is 1 again) and the stored
    /// winner is cleared in both modes. [`RestartMode::PurgeVoters`] fails
    /// with `NoVotersToRestart` on an empty registry;
    /// [`RestartMode::RetainVoters`] is legal with zero voters.
    pub fn restart(
        &mut self,
        caller: &VoterAddress,
        mode: RestartMode,
    ) -> Result<(), SessionError> {
        self.ensure_admin(caller)?;
        self.ensure_phase(Phase::Tallied)?;
        match mode {
            RestartMode::PurgeVoters => {
                if self.voters.is_empty() {
                    return Err(SessionError::NoVotersToRestart);
                }
                for removed in self.voters.purge() {
                    self.sink.emit(SessionEvent::VoterRemoved(removed));
                }
            }
            RestartMode::RetainVoters => self.voters.clear_votes(),
        }
        self.proposals.reset();
        self.winning_proposal = ProposalId::NONE;
        tracing::info!(?mode, "session restarted");
        self.set_phase(Phase::RegisteringVoters);
        Ok(())
    }

    // ── voter management (administrative) ────────────────────────────────

    /// Whitelist and register a new voter. Phase `RegisteringVoters` only.
    pub fn add_voter(
        &mut self,
        caller: &VoterAddress,
        id: VoterAddress,
    ) -> Result<(), SessionError> {
        self.ensure_admin(caller)?;
        self.ensure_phase(Phase::RegisteringVoters)?;
        self.voters.add(id.clone())?;
        tracing::debug!(voter = %id, "voter whitelisted");
        self.sink.emit(SessionEvent::VoterRegistered(id));
        Ok(())
    }

    /// Remove a voter outright: whitelist entry, record, and history.
    /// Phase `RegisteringVoters` only.
    pub fn remove_voter(
        &mut self,
        caller: &VoterAddress,
        id: &VoterAddress,
    ) -> Result<(), SessionError> {
        self.ensure_admin(caller)?;
        self.ensure_phase(Phase::RegisteringVoters)?;
        self.voters.remove(id)?;
        tracing::debug!(voter = %id, "voter removed");
        self.sink.emit(SessionEvent::VoterRemoved(id.clone()));
        Ok(())
    }

    /// Drop a voter's registration, keeping whitelist membership.
    ///
    /// Legal in any phase. A counted vote is reversed in the ledger unless
    /// the tally has already run.
    pub fn unregister_voter(
        &mut self,
        caller: &VoterAddress,
        id: &VoterAddress,
    ) -> Result<(), SessionError> {
        self.ensure_admin(caller)?;
        self.voters.unregister(id)?;
        if !self.phase.is_tallied() {
            if let Some(proposal) = self.voters.retract(id) {
                self.proposals.retract_vote(proposal)?;
                tracing::debug!(voter = %id, %proposal, "vote retracted on unregister");
            }
        }
        self.sink.emit(SessionEvent::VoterUnregistered(id.clone()));
        Ok(())
    }

    /// Restore a previously unregistered voter's registration.
    ///
    /// Legal in any phase. Never restores a retracted vote.
    pub fn register_voter(
        &mut self,
        caller: &VoterAddress,
        id: &VoterAddress,
    ) -> Result<(), SessionError> {
        self.ensure_admin(caller)?;
        self.voters.register(id)?;
        self.sink.emit(SessionEvent::VoterRegistered(id.clone()));
        Ok(())
    }

    // ── participant operations ───────────────────────────────────────────

    /// Register a proposal; returns its assigned id.
    ///
    /// Phase `ProposalsRegistrationOpen`; the caller must be whitelisted
    /// and currently registered.
    pub fn add_proposal(
        &mut self,
        caller: &VoterAddress,
        description: impl Into<String>,
    ) -> Result<ProposalId, SessionError> {
        self.ensure_phase(Phase::ProposalsRegistrationOpen)?;
        self.ensure_registered(caller)?;
        let id = self.proposals.add(description);
        tracing::debug!(proposer = %caller, proposal = %id, "proposal registered");
        self.sink.emit(SessionEvent::ProposalRegistered(id));
        Ok(id)
    }

    /// Cast the caller's one vote for a proposal. Phase `VotingOpen`.
    pub fn cast_vote(
        &mut self,
        caller: &VoterAddress,
        proposal: ProposalId,
    ) -> Result<(), SessionError> {
        self.ensure_phase(Phase::VotingOpen)?;
        let voter = self.ensure_registered(caller)?;
        if voter.has_voted() {
            return Err(SessionError::AlreadyVoted(caller.clone()));
        }
        self.proposals.record_vote(proposal)?;
        self.voters.record_vote(caller, proposal);
        tracing::debug!(voter = %caller, %proposal, "vote cast");
        self.sink.emit(SessionEvent::VoteCast {
            voter: caller.clone(),
            proposal,
        });
        Ok(())
    }

    /// Move the caller's counted vote to a different proposal.
    ///
    /// Phase `VotingOpen`. The vote total across the ledger is unchanged
    /// whether or not this succeeds.
    pub fn change_vote(
        &mut self,
        caller: &VoterAddress,
        proposal: ProposalId,
    ) -> Result<(), SessionError> {
        self.ensure_phase(Phase::VotingOpen)?;
        let voter = self.voters.get(caller)?;
        let Some(previous) = voter.voted_for else {
            return Err(SessionError::NoVoteToChange(caller.clone()));
        };
        self.proposals.move_vote(previous, proposal)?;
        self.voters.record_vote(caller, proposal);
        tracing::debug!(voter = %caller, from = %previous, to = %proposal, "vote changed");
        self.sink.emit(SessionEvent::VoteCast {
            voter: caller.clone(),
            proposal,
        });
        Ok(())
    }

    // ── queries (any phase) ──────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The voter record for a whitelisted identity.
    pub fn voter(&self, id: &VoterAddress) -> Result<&Voter, SessionError> {
        self.voters.get(id)
    }

    /// Whitelist membership, independent of registration or voting state.
    pub fn is_voter(&self, id: &VoterAddress) -> bool {
        self.voters.is_voter(id)
    }

    pub fn voter_count(&self) -> usize {
        self.voters.len()
    }

    pub fn proposal(&self, id: ProposalId) -> Result<&Proposal, SessionError> {
        self.proposals.get(id)
    }

    /// All proposals in id order.
    pub fn proposals(&self) -> &[Proposal] {
        self.proposals.all()
    }

    /// Raw stored winner: [`ProposalId::NONE`] until the tally runs.
    pub fn winning_proposal(&self) -> ProposalId {
        self.winning_proposal
    }

    /// The tallied winner.
    ///
    /// Fails with `InvalidPhase` before the tally and with `NoWinner` when
    /// no proposal received any vote.
    pub fn winner(&self) -> Result<ProposalId, SessionError> {
        self.ensure_phase(Phase::Tallied)?;
        if self.winning_proposal.is_none() {
            return Err(SessionError::NoWinner);
        }
        Ok(self.winning_proposal)
    }
}

/// Serializable snapshot of a session's authoritative state.
///
/// The injected seams (admin gate, sink, tie-break) are not part of the
/// state and are supplied again on load.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub winning_proposal: ProposalId,
    pub voters: VoterRegistry,
    pub proposals: ProposalLedger,
}

impl SessionWorkflow {
    /// Serialize the session state to bytes; where they go is the host's
    /// concern.
    pub fn save_state(&self) -> Vec<u8> {
        let snapshot = SessionSnapshot {
            phase: self.phase,
            winning_proposal: self.winning_proposal,
            voters: self.voters.clone(),
            proposals: self.proposals.clone(),
        };
        bincode::serialize(&snapshot).unwrap_or_default()
    }

    /// Restore a session from snapshot bytes.
    ///
    /// Falls back to a fresh empty session if the bytes do not decode.
    pub fn load_state(data: &[u8], admin: Box<dyn AdminGate>, sink: Box<dyn EventSink>) -> Self {
        match bincode::deserialize::<SessionSnapshot>(data) {
            Ok(snapshot) => Self {
                phase: snapshot.phase,
                winning_proposal: snapshot.winning_proposal,
                voters: snapshot.voters,
                proposals: snapshot.proposals,
                admin,
                sink,
                tie_break: Box::new(KeepEarliest),
            },
            Err(_) => Self::new(admin, sink),
        }
    }
}
