//! CLI command handlers
//!
//! Handlers print their results and return `anyhow` errors for `main` to
//! report.

pub mod auth;
pub mod init;
pub mod newsletter;
pub mod posts;
pub mod taxonomy;
pub mod upload;

use anyhow::{bail, Result};

use crate::api::ApiClient;
use crate::auth::{protected, GuardDecision};
use crate::Desk;

/// API client carrying a verified admin token
///
/// Fails with a hint to log in when the stored session is missing or no
/// longer accepted.
pub async fn authorized_client(desk: &Desk) -> Result<ApiClient> {
    let auth = desk.auth()?;
    let state = auth.check().await;

    match protected(&state, &desk.config) {
        GuardDecision::Render => match state.token() {
            Some(token) => Ok(desk.client()?.with_token(token)),
            None => bail!("Session has no token. Run `blogdesk login` first."),
        },
        GuardDecision::Redirect(route) => {
            tracing::debug!("Guard redirects to {}", route);
            bail!("Not logged in. Run `blogdesk login` first.")
        }
        GuardDecision::Loading => bail!("Session check did not finish"),
    }
}
