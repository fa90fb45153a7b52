//! Proposal identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 1-based proposal id, assigned sequentially in registration order.
///
/// Id 0 is reserved: it never denotes a real proposal, and doubles as the
/// "no winner" result of a tally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProposalId(u32);

impl ProposalId {
    /// The reserved "no proposal" id.
    pub const NONE: Self = Self(0);

    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    /// Whether this is the reserved id 0.
    pub fn is_none(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
