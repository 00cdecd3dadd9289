//! `recibo-auth` — identity boundary.
//!
//! Operations that mutate the ledger take an explicit [`Session`] produced
//! by an [`IdentityProvider`]. Nothing in this crate reads ambient process
//! state; this crate is intentionally decoupled from HTTP and storage.

pub mod provider;
pub mod session;

pub use provider::{FixedIdentity, IdentityProvider};
pub use session::Session;
