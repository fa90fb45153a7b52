//! Session notifications and the observer seam.

use crate::address::VoterAddress;
use crate::id::ProposalId;
use crate::state::Phase;
use serde::{Deserialize, Serialize};

/// A discrete notification emitted by the core.
///
/// Events are fire-and-forget: the core reports that something happened;
/// delivery and persistence belong to the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// The session moved to a new phase.
    PhaseChanged { previous: Phase, current: Phase },
    /// An identity was whitelisted, or a whitelisted identity re-registered.
    VoterRegistered(VoterAddress),
    /// A voter lost registration while keeping whitelist membership.
    VoterUnregistered(VoterAddress),
    /// An identity was removed from the whitelist entirely.
    VoterRemoved(VoterAddress),
    /// A proposal entered the ledger.
    ProposalRegistered(ProposalId),
    /// A vote was counted for a proposal.
    VoteCast {
        voter: VoterAddress,
        proposal: ProposalId,
    },
    /// Two proposals were observed sharing the leading count during tally.
    Draw {
        incumbent: ProposalId,
        challenger: ProposalId,
    },
}

/// Observer for session events.
pub trait EventSink {
    fn emit(&self, event: SessionEvent);
}
