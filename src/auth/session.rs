//! Session state machine
//!
//! One [`AuthService`] owns the session. Everything else observes it
//! through a `watch` channel and never mutates it directly.

use tokio::sync::watch;

use super::store::{CredentialStore, REFRESH_TOKEN_KEY, TOKEN_KEY};
use super::token;
use crate::api::{AuthBackend, User};
use crate::error::{Error, Result};

/// Where the session currently stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Stored credentials are being verified
    Checking,
    Authenticated { user: User, token: String },
    Unauthenticated,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            SessionState::Authenticated { token, .. } => Some(token),
            _ => None,
        }
    }
}

/// Owner of the session state
pub struct AuthService<B, S> {
    backend: B,
    store: S,
    state: watch::Sender<SessionState>,
}

impl<B: AuthBackend, S: CredentialStore> AuthService<B, S> {
    /// Start in [`SessionState::Checking`]; call [`AuthService::check`] next
    pub fn new(backend: B, store: S) -> Self {
        let (state, _) = watch::channel(SessionState::Checking);
        Self {
            backend,
            store,
            state,
        }
    }

    /// Observe state changes
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn transition(&self, next: SessionState) {
        tracing::debug!("Session -> {}", session_label(&next));
        self.state.send_replace(next);
    }

    /// Verify stored credentials
    ///
    /// An expired token is exchanged through [`AuthService::refresh`] when a
    /// refresh token is stored. Missing, expired or rejected credentials are
    /// wiped from the store.
    pub async fn check(&self) -> SessionState {
        self.transition(SessionState::Checking);

        let (token, user) = match (self.store.token(), self.store.user()) {
            (Some(token), Some(user)) => (token, user),
            _ => {
                tracing::debug!("No stored credentials");
                return self.reset();
            }
        };

        if token::is_expired(&token) {
            tracing::info!("Stored token has expired");
            if self.store.refresh_token().is_none() {
                return self.reset();
            }
            if self.refresh().await.is_err() {
                return SessionState::Unauthenticated;
            }
            return self.state();
        }

        match self.backend.verify_token(&token).await {
            Ok(()) => {
                tracing::info!("Session restored for {}", user.username);
                let next = SessionState::Authenticated { user, token };
                self.transition(next.clone());
                next
            }
            Err(e) => {
                tracing::info!("Stored token rejected: {}", e);
                self.reset()
            }
        }
    }

    /// Log in and persist the credentials
    ///
    /// On failure the store is left as it was.
    pub async fn login(&self, username: &str, password: &str) -> Result<User> {
        let response = self.backend.login(username, password).await?;

        self.store.save_login(
            &response.token,
            response.refresh_token.as_deref(),
            &response.user,
        );
        tracing::info!("Logged in as {}", response.user.username);

        self.transition(SessionState::Authenticated {
            user: response.user.clone(),
            token: response.token,
        });
        Ok(response.user)
    }

    /// Drop every stored credential
    pub fn logout(&self) {
        tracing::info!("Logging out");
        self.reset();
    }

    /// Exchange the refresh token for a new bearer token
    ///
    /// Any failure ends the session.
    pub async fn refresh(&self) -> Result<String> {
        let Some(refresh_token) = self.store.refresh_token() else {
            self.reset();
            return Err(Error::Unauthorized);
        };

        match self.backend.refresh(&refresh_token).await {
            Ok(response) => {
                self.store.set(TOKEN_KEY, &response.token);
                if let Some(next_refresh) = &response.refresh_token {
                    self.store.set(REFRESH_TOKEN_KEY, next_refresh);
                }
                match self.store.user() {
                    Some(user) => self.transition(SessionState::Authenticated {
                        user,
                        token: response.token.clone(),
                    }),
                    None => {
                        self.reset();
                        return Err(Error::Unauthorized);
                    }
                }
                tracing::info!("Token refreshed");
                Ok(response.token)
            }
            Err(e) => {
                tracing::info!("Token refresh failed: {}", e);
                self.reset();
                Err(e)
            }
        }
    }

    fn reset(&self) -> SessionState {
        self.store.clear();
        self.transition(SessionState::Unauthenticated);
        SessionState::Unauthenticated
    }
}

fn session_label(state: &SessionState) -> &'static str {
    match state {
        SessionState::Checking => "checking",
        SessionState::Authenticated { .. } => "authenticated",
        SessionState::Unauthenticated => "unauthenticated",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{LoginResponse, RefreshResponse};
    use crate::auth::store::{MemoryStore, LEGACY_USER_KEY, USER_KEY};
    use crate::auth::token::tests::jwt;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeAuth {
        accept: bool,
        verify_calls: AtomicUsize,
        refresh_calls: AtomicUsize,
    }

    impl FakeAuth {
        fn accepting() -> Self {
            Self {
                accept: true,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl AuthBackend for FakeAuth {
        async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
            if self.accept && password == "correct" {
                Ok(LoginResponse {
                    token: "tok-1".to_string(),
                    refresh_token: Some("ref-1".to_string()),
                    user: user(username),
                })
            } else {
                Err(Error::Unauthorized)
            }
        }

        async fn verify_token(&self, _token: &str) -> Result<()> {
            self.verify_calls.fetch_add(1, Ordering::SeqCst);
            if self.accept {
                Ok(())
            } else {
                Err(Error::Unauthorized)
            }
        }

        async fn refresh(&self, _refresh_token: &str) -> Result<RefreshResponse> {
            self.refresh_calls.fetch_add(1, Ordering::SeqCst);
            if self.accept {
                Ok(RefreshResponse {
                    token: "tok-2".to_string(),
                    refresh_token: None,
                })
            } else {
                Err(Error::NetworkFailure("connection reset".to_string()))
            }
        }
    }

    fn user(name: &str) -> User {
        User {
            id: 7,
            username: name.to_string(),
            email: None,
            role: None,
        }
    }

    fn stored(token: &str) -> MemoryStore {
        let store = MemoryStore::new();
        store.save_login(token, Some("ref-1"), &user("admin"));
        store.set(LEGACY_USER_KEY, "{}");
        store
    }

    #[tokio::test]
    async fn test_check_without_credentials() {
        let service = AuthService::new(FakeAuth::accepting(), MemoryStore::new());
        assert_eq!(service.state(), SessionState::Checking);

        let state = service.check().await;
        assert_eq!(state, SessionState::Unauthenticated);
        assert_eq!(service.backend.verify_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_check_token_without_user_clears() {
        let store = MemoryStore::new();
        store.set(TOKEN_KEY, "orphan");
        let service = AuthService::new(FakeAuth::accepting(), store);

        assert_eq!(service.check().await, SessionState::Unauthenticated);
        assert!(service.store().is_empty());
    }

    #[tokio::test]
    async fn test_check_valid_token() {
        let service = AuthService::new(FakeAuth::accepting(), stored("opaque"));
        let state = service.check().await;

        assert!(state.is_authenticated());
        assert_eq!(state.token(), Some("opaque"));
        assert_eq!(state.user().map(|u| u.username.as_str()), Some("admin"));
    }

    #[tokio::test]
    async fn test_check_rejected_token_clears_storage() {
        let service = AuthService::new(FakeAuth::default(), stored("opaque"));

        assert_eq!(service.check().await, SessionState::Unauthenticated);
        assert!(service.store().is_empty());
        assert_eq!(service.backend.verify_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_check_expired_jwt_skips_network() {
        let store = stored(&jwt(-30));
        store.remove(REFRESH_TOKEN_KEY);
        let service = AuthService::new(FakeAuth::accepting(), store);

        assert_eq!(service.check().await, SessionState::Unauthenticated);
        assert_eq!(service.backend.verify_calls.load(Ordering::SeqCst), 0);
        assert_eq!(service.backend.refresh_calls.load(Ordering::SeqCst), 0);
        assert!(service.store().is_empty());
    }

    #[tokio::test]
    async fn test_check_expired_jwt_refreshes() {
        let service = AuthService::new(FakeAuth::accepting(), stored(&jwt(-30)));

        let state = service.check().await;
        assert_eq!(state.token(), Some("tok-2"));
        assert_eq!(state.user().map(|u| u.username.as_str()), Some("admin"));
        assert_eq!(service.store().token().as_deref(), Some("tok-2"));
        assert_eq!(service.backend.refresh_calls.load(Ordering::SeqCst), 1);
        assert_eq!(service.backend.verify_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_check_expired_jwt_failed_refresh_clears() {
        let service = AuthService::new(FakeAuth::default(), stored(&jwt(-30)));

        assert_eq!(service.check().await, SessionState::Unauthenticated);
        assert_eq!(service.backend.refresh_calls.load(Ordering::SeqCst), 1);
        assert!(service.store().is_empty());
    }

    #[tokio::test]
    async fn test_login_persists_and_notifies() {
        let service = AuthService::new(FakeAuth::accepting(), MemoryStore::new());
        let mut rx = service.subscribe();

        let user = service.login("admin", "correct").await.unwrap();
        assert_eq!(user.username, "admin");
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_authenticated());

        assert_eq!(service.store().token().as_deref(), Some("tok-1"));
        assert_eq!(service.store().refresh_token().as_deref(), Some("ref-1"));
        assert!(service.store().get(USER_KEY).is_some());
    }

    #[tokio::test]
    async fn test_failed_login_leaves_storage() {
        let service = AuthService::new(FakeAuth::accepting(), stored("previous"));

        let err = service.login("admin", "wrong").await.unwrap_err();
        assert!(matches!(err, Error::Unauthorized));
        assert_eq!(service.store().token().as_deref(), Some("previous"));
        assert_eq!(service.state(), SessionState::Checking);
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let service = AuthService::new(FakeAuth::accepting(), stored("opaque"));
        service.check().await;

        service.logout();
        assert_eq!(service.state(), SessionState::Unauthenticated);
        assert!(service.store().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_replaces_token() {
        let service = AuthService::new(FakeAuth::accepting(), stored("opaque"));

        let token = service.refresh().await.unwrap();
        assert_eq!(token, "tok-2");
        assert_eq!(service.store().token().as_deref(), Some("tok-2"));
        assert_eq!(service.store().refresh_token().as_deref(), Some("ref-1"));
        assert_eq!(service.state().token(), Some("tok-2"));
    }

    #[tokio::test]
    async fn test_refresh_failure_logs_out() {
        let service = AuthService::new(FakeAuth::default(), stored("opaque"));

        let err = service.refresh().await.unwrap_err();
        assert!(matches!(err, Error::NetworkFailure(_)));
        assert_eq!(service.state(), SessionState::Unauthenticated);
        assert!(service.store().is_empty());
    }
}
