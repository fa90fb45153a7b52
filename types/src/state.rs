//! The session phase machine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The phase of a voting session.
///
/// Phases advance along a fixed linear order; the only backward edge is the
/// explicit restart from `Tallied` back to `RegisteringVoters`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// The administrator is assembling the voter whitelist.
    RegisteringVoters,
    /// Registered voters may submit proposals.
    ProposalsRegistrationOpen,
    /// Proposal intake is closed; voting has not started.
    ProposalsRegistrationClosed,
    /// Registered voters may cast and change votes.
    VotingOpen,
    /// Voting is closed; the tally has not run.
    VotingClosed,
    /// The winner has been computed.
    Tallied,
}

impl Phase {
    /// The next phase in the linear order (`None` after `Tallied`).
    pub fn successor(&self) -> Option<Phase> {
        match self {
            Self::RegisteringVoters => Some(Self::ProposalsRegistrationOpen),
            Self::ProposalsRegistrationOpen => Some(Self::ProposalsRegistrationClosed),
            Self::ProposalsRegistrationClosed => Some(Self::VotingOpen),
            Self::VotingOpen => Some(Self::VotingClosed),
            Self::VotingClosed => Some(Self::Tallied),
            Self::Tallied => None,
        }
    }

    /// Whether whitelist changes (add/remove) are accepted.
    pub fn accepts_voter_changes(&self) -> bool {
        matches!(self, Self::RegisteringVoters)
    }

    /// Whether proposal submissions are accepted.
    pub fn accepts_proposals(&self) -> bool {
        matches!(self, Self::ProposalsRegistrationOpen)
    }

    /// Whether votes may be cast or changed.
    pub fn accepts_votes(&self) -> bool {
        matches!(self, Self::VotingOpen)
    }

    /// Whether the tally has run.
    pub fn is_tallied(&self) -> bool {
        matches!(self, Self::Tallied)
    }

    /// Stable lowercase name of this phase.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RegisteringVoters => "registering_voters",
            Self::ProposalsRegistrationOpen => "proposals_registration_open",
            Self::ProposalsRegistrationClosed => "proposals_registration_closed",
            Self::VotingOpen => "voting_open",
            Self::VotingClosed => "voting_closed",
            Self::Tallied => "tallied",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
