use wardboard_auth::Identity;
use wardboard_core::UserId;

/// The authenticated operator behind a request.
///
/// Inserted by the auth middleware as a request extension and passed
/// explicitly to every handler and service call; there is no ambient
/// session global.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    identity: Identity,
}

impl CurrentUser {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn user_id(&self) -> UserId {
        self.identity.user_id
    }

    /// Display name stamped onto created/completed follow-up tasks.
    pub fn display_name(&self) -> &str {
        &self.identity.display_name
    }
}
