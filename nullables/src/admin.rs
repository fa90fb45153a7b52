//! Nullable admin gate — deterministic capability answers.

use ballot_types::{AdminGate, VoterAddress};

/// An admin gate with a fixed answer for every caller.
#[derive(Clone, Copy, Debug)]
pub struct NullAdmin {
    allow: bool,
}

impl NullAdmin {
    /// Every caller is an administrator.
    pub fn allow_all() -> Self {
        Self { allow: true }
    }

    /// No caller is an administrator.
    pub fn deny_all() -> Self {
        Self { allow: false }
    }
}

impl AdminGate for NullAdmin {
    fn is_administrator(&self, _caller: &VoterAddress) -> bool {
        self.allow
    }
}
