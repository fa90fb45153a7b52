//! Event sinks shipped with the session crate.

use ballot_types::{EventSink, SessionEvent};

/// An [`EventSink`] that maps each event to a structured log line.
///
/// For hosts that have no observer of their own wired up; anything
/// subscribed to the `tracing` output sees the full notification stream.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: SessionEvent) {
        match event {
            SessionEvent::PhaseChanged { previous, current } => {
                tracing::info!(%previous, %current, "phase changed");
            }
            SessionEvent::VoterRegistered(voter) => {
                tracing::info!(%voter, "voter registered");
            }
            SessionEvent::VoterUnregistered(voter) => {
                tracing::info!(%voter, "voter unregistered");
            }
            SessionEvent::VoterRemoved(voter) => {
                tracing::info!(%voter, "voter removed");
            }
            SessionEvent::ProposalRegistered(id) => {
                tracing::info!(proposal = %id, "proposal registered");
            }
            SessionEvent::VoteCast { voter, proposal } => {
                tracing::info!(%voter, proposal = %proposal, "vote cast");
            }
            SessionEvent::Draw {
                incumbent,
                challenger,
            } => {
                tracing::info!(%incumbent, %challenger, "tally draw");
            }
        }
    }
}
