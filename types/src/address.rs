//! Opaque voter identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A voter identity key.
///
/// Identities are opaque strings issued and authenticated by the host
/// process; the core never inspects their structure, only compares them.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VoterAddress(String);

impl VoterAddress {
    /// Create a voter address from a raw identity string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Return the raw identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VoterAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for VoterAddress {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for VoterAddress {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
