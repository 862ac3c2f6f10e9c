//! Admin authentication: session state, credential storage and guards

mod guard;
mod session;
mod store;
mod token;

pub use guard::{protected, public_only, GuardDecision};
pub use session::{AuthService, SessionState};
pub use store::{
    CredentialStore, FileStore, MemoryStore, LEGACY_USER_KEY, REFRESH_TOKEN_KEY, TOKEN_KEY,
    USER_KEY,
};
pub use token::{expires_at, is_expired};
