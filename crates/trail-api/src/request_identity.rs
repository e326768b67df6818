//! Request extension carrying the resolved identity.

use trail_commons::{SessionKey, UserId};
use trail_session::Identity;

/// What the upstream auth/session layer resolved for this request.
///
/// The application's authentication middleware inserts this into the request
/// extensions; [`crate::IdentityMiddleware`] reads it and scopes the
/// corresponding [`Identity`] for the rest of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestIdentity {
    pub user: Option<UserId>,
    pub session_key: Option<SessionKey>,
}

impl RequestIdentity {
    /// An authenticated user within a session.
    pub fn authenticated(user: UserId, session_key: SessionKey) -> Self {
        Self {
            user: Some(user),
            session_key: Some(session_key),
        }
    }

    /// An anonymous request that still carries a session.
    pub fn anonymous(session_key: SessionKey) -> Self {
        Self {
            user: None,
            session_key: Some(session_key),
        }
    }
}

impl From<RequestIdentity> for Identity {
    fn from(request_identity: RequestIdentity) -> Self {
        Identity {
            user: request_identity.user,
            session_key: request_identity.session_key,
        }
    }
}
