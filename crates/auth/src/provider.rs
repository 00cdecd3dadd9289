//! Identity provider capability.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use recibo_core::{LedgerError, LedgerResult, UserId};

use crate::session::Session;

/// External identity collaborator.
///
/// Implementations may call out to a managed auth backend, hence the async
/// surface. The in-process [`FixedIdentity`] covers tests and development.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Currently signed-in user, if any.
    async fn current_user(&self) -> Option<UserId>;

    /// Resolve a [`Session`] for the current user.
    ///
    /// Fails with [`LedgerError::Unauthenticated`] when nobody is signed
    /// in. This is the single place that error surfaces: once a caller
    /// holds a `Session`, write operations cannot lose identity mid-flight.
    async fn session(&self) -> LedgerResult<Session> {
        match self.current_user().await {
            Some(user_id) => Ok(Session::new(user_id)),
            None => Err(LedgerError::Unauthenticated),
        }
    }
}

#[async_trait]
impl<P> IdentityProvider for Arc<P>
where
    P: IdentityProvider + ?Sized,
{
    async fn current_user(&self) -> Option<UserId> {
        (**self).current_user().await
    }

    async fn session(&self) -> LedgerResult<Session> {
        (**self).session().await
    }
}

/// In-memory provider holding an explicit signed-in user.
///
/// Intended for tests/dev. The signed-in user is a value callers own, not
/// ambient process state.
#[derive(Debug, Default)]
pub struct FixedIdentity {
    user: RwLock<Option<UserId>>,
}

impl FixedIdentity {
    /// Start signed out.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `user_id` already signed in.
    pub fn signed_in(user_id: UserId) -> Self {
        Self {
            user: RwLock::new(Some(user_id)),
        }
    }

    pub fn sign_in(&self, user_id: UserId) {
        if let Ok(mut user) = self.user.write() {
            *user = Some(user_id);
        }
    }

    pub fn sign_out(&self) {
        if let Ok(mut user) = self.user.write() {
            *user = None;
        }
    }
}

#[async_trait]
impl IdentityProvider for FixedIdentity {
    async fn current_user(&self) -> Option<UserId> {
        match self.user.read() {
            Ok(user) => *user,
            Err(_) => None,
        }
    }
}
