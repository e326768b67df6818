//! The identity captured for one request.

use trail_commons::{SessionKey, UserId};

/// Acting user and session for the current unit of execution.
///
/// Both halves are optional: an unauthenticated request still carries a
/// session key, and a request without a session layer carries neither.
/// Absence of the whole `Identity` (nothing in scope) means the save is
/// happening outside any request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    /// Authenticated user, `None` for anonymous requests.
    pub user: Option<UserId>,
    /// Session key, `None` when no session exists.
    pub session_key: Option<SessionKey>,
}

impl Identity {
    /// Identity of an authenticated user within a session.
    pub fn new(user: UserId, session_key: SessionKey) -> Self {
        Self {
            user: Some(user),
            session_key: Some(session_key),
        }
    }

    /// Identity with neither user nor session.
    pub fn anonymous() -> Self {
        Self {
            user: None,
            session_key: None,
        }
    }

    /// Anonymous identity that still carries a session key.
    pub fn with_session(session_key: SessionKey) -> Self {
        Self {
            user: None,
            session_key: Some(session_key),
        }
    }

    /// True when no authenticated user is attached.
    pub fn is_anonymous(&self) -> bool {
        self.user.is_none()
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::anonymous()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors() {
        let id = Identity::new(UserId::new("u1"), SessionKey::new("s1"));
        assert!(!id.is_anonymous());
        assert_eq!(id.session_key.as_ref().unwrap().as_str(), "s1");

        assert!(Identity::anonymous().is_anonymous());
        let sess_only = Identity::with_session(SessionKey::new("s2"));
        assert!(sess_only.is_anonymous());
        assert!(sess_only.session_key.is_some());
    }
}
