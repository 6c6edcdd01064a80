use serde::{Deserialize, Serialize};

/// Result of an access-token login as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginOutcome {
    pub authenticated: bool,
}
