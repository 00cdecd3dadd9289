//! Explicit session value handed to mutating ledger operations.

use serde::{Deserialize, Serialize};

use recibo_core::UserId;

/// Proof of an authenticated user.
///
/// Immutable. Constructed by an [`IdentityProvider`](crate::IdentityProvider)
/// and passed by reference into each write operation; holding a `Session`
/// is the only way to invoke them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    user_id: UserId,
}

impl Session {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}
