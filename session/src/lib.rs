//! Single-session voting workflow.
//!
//! One session runs: whitelist voters → collect proposals → vote → tally.
//! [`SessionWorkflow`] is the phase machine that gates every operation and
//! composes the three registries:
//! - [`VoterRegistry`] — who may propose and vote, and whether they have.
//! - [`ProposalLedger`] — ordered proposals with vote counters.
//! - [`TallyEngine`] — deterministic winner selection with a pluggable
//!   tie-break.
//!
//! The authoritative state lives in one `SessionWorkflow` value and every
//! mutation takes `&mut self`, so a host that serializes mutating calls
//! (single-writer lock or command queue) gets atomic operations for free.
//! There is no I/O, blocking, or retry anywhere in the core; every failure
//! is a synchronous [`SessionError`].

pub mod error;
pub mod events;
pub mod proposal;
pub mod tally;
pub mod voter;
pub mod workflow;

pub use error::SessionError;
pub use events::TracingSink;
pub use proposal::{Proposal, ProposalLedger};
pub use tally::{KeepEarliest, TallyEngine, TieBreak, TieDecision};
pub use voter::{Voter, VoterRegistry};
pub use workflow::{RestartMode, SessionSnapshot, SessionWorkflow};
