//! Attribution fields and the mixin trait that embeds them.

use serde::{Deserialize, Serialize};
use trail_commons::{SessionKey, UserId};
use trail_session::Identity;

/// The four attribution fields attached to an opting-in record type.
///
/// `created_*` is written once, on the first save; `modified_*` on every
/// save. All fields stay at their prior value when no identity is in scope:
/// a record saved from a background job keeps whatever attribution it had.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    #[serde(default)]
    pub created_by: Option<UserId>,
    #[serde(default)]
    pub created_with_session_key: Option<SessionKey>,
    #[serde(default)]
    pub modified_by: Option<UserId>,
    #[serde(default)]
    pub modified_with_session_key: Option<SessionKey>,
}

impl Attribution {
    /// Stamps the fields for one save event.
    ///
    /// The caller only invokes this when an identity is in scope; absence of
    /// identity must leave the struct untouched.
    pub fn record_save(&mut self, identity: &Identity, is_create: bool) {
        if is_create {
            self.created_by = identity.user.clone();
            self.created_with_session_key = identity.session_key.clone();
        }
        self.modified_by = identity.user.clone();
        self.modified_with_session_key = identity.session_key.clone();
    }
}

/// Record types carrying attribution fields.
///
/// Implementors typically embed an [`Attribution`] with
/// `#[serde(flatten)]` and forward [`crate::TrackedRecord::apply_attribution`]
/// to [`Attribution::record_save`].
pub trait Attributed {
    fn attribution(&self) -> &Attribution;
    fn attribution_mut(&mut self) -> &mut Attribution;
}
