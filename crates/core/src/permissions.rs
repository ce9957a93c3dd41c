//! Ownership-based authorization policy.
//!
//! Every mutating operation on an owned resource asks [`authorize`] first.
//! The policy is deliberately narrow: the owner is allowed, everyone else
//! (including staff and anonymous callers) is denied.

use crate::error::CoreError;
use crate::types::DbId;

/// A resource that belongs to exactly one user.
pub trait Owned {
    /// The id of the owning user.
    fn owner_id(&self) -> DbId;
}

/// Outcome of a policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Convert a denial into [`CoreError::Forbidden`] naming the attempted action.
    pub fn into_result(self, action: &str) -> Result<(), CoreError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny => Err(CoreError::Forbidden(format!(
                "You do not have permission to {action}"
            ))),
        }
    }
}

/// Evaluate whether `actor` (a user id, or `None` for anonymous) may mutate `resource`.
pub fn authorize<R: Owned + ?Sized>(actor: Option<DbId>, resource: &R) -> Decision {
    match actor {
        Some(user_id) if user_id == resource.owner_id() => Decision::Allow,
        _ => Decision::Deny,
    }
}
