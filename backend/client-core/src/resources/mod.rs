//! Typed, organization-scoped operations built on the dispatcher.
//!
//! Resource clients never see the backend. Each call checks the gate, validates
//! its input, builds one command and unwraps the payload it expects.

pub mod generators;
pub mod projects;
pub mod secrets;

pub use generators::GeneratorsClient;
pub use projects::ProjectsClient;
pub use secrets::SecretsClient;

use crate::codec::CommandKind;
use crate::error::DispatchError;

use sm_models::BatchDeleteResult;

use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;

/// A delete answer must report exactly one outcome for every distinct requested id.
#[track_caller]
pub(crate) fn check_delete_outcomes<Id>(
    kind: CommandKind,
    requested: &[Id],
    result: &BatchDeleteResult<Id>,
) -> Result<(), DispatchError>
where
    Id: Copy + Eq + Hash + Display,
{
    let requested: HashSet<Id> = requested.iter().copied().collect();
    let mut reported = HashSet::with_capacity(result.data.len());

    for outcome in &result.data {
        if !requested.contains(&outcome.id) {
            return Err(DispatchError::malformed(
                kind.as_str(),
                format!("outcome reported for unrequested id {}", outcome.id),
            ));
        }
        if !reported.insert(outcome.id) {
            return Err(DispatchError::malformed(
                kind.as_str(),
                format!("more than one outcome reported for id {}", outcome.id),
            ));
        }
    }

    if let Some(missing) = requested.iter().find(|id| !reported.contains(*id)) {
        return Err(DispatchError::malformed(
            kind.as_str(),
            format!("no outcome reported for requested id {missing}"),
        ));
    }

    Ok(())
}
