//! Account/session collaborator contract.
//!
//! The shell only needs to know whether a user is signed in (launches are rejected otherwise) and
//! which name to show; credentials, billing, and sign-in flows stay with the session collaborator.

use std::{cell::RefCell, rc::Rc};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Session state visible to the shell.
pub struct SessionSnapshot {
    /// Whether a user is currently signed in.
    pub signed_in: bool,
    /// Display name of the signed-in user.
    pub display_name: Option<String>,
}

impl SessionSnapshot {
    /// Signed-in snapshot for `display_name`.
    pub fn signed_in(display_name: impl Into<String>) -> Self {
        Self {
            signed_in: true,
            display_name: Some(display_name.into()),
        }
    }
}

/// Host service exposing the current session.
pub trait SessionService {
    /// Returns the current session state.
    fn current_session(&self) -> SessionSnapshot;

    /// Ends the current session.
    fn sign_out(&self) -> Result<(), String>;
}

#[derive(Debug, Clone, Default)]
/// In-memory session collaborator.
pub struct MemorySessionService {
    inner: Rc<RefCell<SessionSnapshot>>,
}

impl MemorySessionService {
    /// Creates a collaborator that starts in `snapshot`.
    pub fn new(snapshot: SessionSnapshot) -> Self {
        Self {
            inner: Rc::new(RefCell::new(snapshot)),
        }
    }
}

impl SessionService for MemorySessionService {
    fn current_session(&self) -> SessionSnapshot {
        self.inner.borrow().clone()
    }

    fn sign_out(&self) -> Result<(), String> {
        *self.inner.borrow_mut() = SessionSnapshot::default();
        Ok(())
    }
}
