//! Session error taxonomy.

use ballot_types::{Phase, ProposalId, VoterAddress};
use thiserror::Error;

/// Errors surfaced by session operations.
///
/// All are synchronous, non-retryable, and caller-correctable; no operation
/// leaves a partially-applied state behind.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("caller {0} lacks administrative capability")]
    Unauthorized(VoterAddress),

    #[error("operation requires phase {required}, session is in {actual}")]
    InvalidPhase { required: Phase, actual: Phase },

    #[error("{0} is not on the voter whitelist")]
    NotAVoter(VoterAddress),

    #[error("{0} is whitelisted but not currently registered")]
    NotRegistered(VoterAddress),

    #[error("{0} is already registered")]
    AlreadyRegistered(VoterAddress),

    #[error("{0} is already unregistered")]
    AlreadyUnregistered(VoterAddress),

    #[error("{0} has already voted this session")]
    AlreadyVoted(VoterAddress),

    #[error("no proposal with id {0}")]
    NoSuchProposal(ProposalId),

    #[error("{0} has no vote to change")]
    NoVoteToChange(VoterAddress),

    #[error("no proposal received any vote")]
    NoWinner,

    #[error("cannot restart with an empty voter list")]
    NoVotersToRestart,
}
