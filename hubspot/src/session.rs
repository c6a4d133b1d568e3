//! Owner-scoped call sessions
//!
//! A host embedding the CRM tool on behalf of a specific sales rep carries an
//! [`OwnerSession`]: the first call supplying an `ownerId` pins the session to
//! that owner, and later calls reuse it without repeating the id. The owner id
//! is visible session state, read once per call into an immutable
//! [`CallContext`](crate::request::CallContext) before any request is built.

use crate::error::HubSpotError;
use crate::request::CallContext;
use std::sync::{Mutex, PoisonError};

/// Session state pinning calls to a HubSpot owner
#[derive(Debug, Default)]
pub struct OwnerSession {
    owner_id: Mutex<Option<String>>,
}

impl OwnerSession {
    /// A session with no owner pinned yet
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A session pre-pinned to an owner id
    ///
    /// # Errors
    ///
    /// Returns `HubSpotError::InvalidOwnerId` when the id is not purely
    /// numeric.
    pub fn with_owner(owner_id: &str) -> Result<Self, HubSpotError> {
        let session = Self::new();
        session.pin(owner_id)?;
        Ok(session)
    }

    /// Pin the session to an owner id, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns `HubSpotError::InvalidOwnerId` when the id is not purely
    /// numeric.
    pub fn pin(&self, owner_id: &str) -> Result<(), HubSpotError> {
        let trimmed = owner_id.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(HubSpotError::InvalidOwnerId(owner_id.to_string()));
        }
        *self.lock() = Some(trimmed.to_string());
        Ok(())
    }

    /// The currently pinned owner id, if any
    #[must_use]
    pub fn owner_id(&self) -> Option<String> {
        self.lock().clone()
    }

    /// Snapshot the session into a per-call context
    #[must_use]
    pub fn context(&self) -> CallContext {
        CallContext {
            owner_id: self.owner_id(),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.owner_id.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_has_no_owner() {
        let session = OwnerSession::new();
        assert_eq!(session.owner_id(), None);
        assert_eq!(session.context(), CallContext::default());
    }

    #[test]
    fn test_pin_remembers_owner_for_later_calls() {
        let session = OwnerSession::new();
        session.pin("4472").unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(session.owner_id().as_deref(), Some("4472"));
        assert_eq!(session.context().owner_id.as_deref(), Some("4472"));
    }

    #[test]
    fn test_pin_trims_and_replaces() {
        let session = OwnerSession::with_owner("1").unwrap_or_else(|e| panic!("{e}"));
        session.pin(" 22 ").unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(session.owner_id().as_deref(), Some("22"));
    }

    #[test]
    fn test_non_numeric_owner_is_rejected() {
        let session = OwnerSession::new();
        let result = session.pin("owner-4472");
        assert!(matches!(result, Err(HubSpotError::InvalidOwnerId(id)) if id == "owner-4472"));
        assert_eq!(session.owner_id(), None);
    }
}
