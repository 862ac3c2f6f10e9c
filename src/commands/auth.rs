//! Login, logout and session status

use anyhow::Result;

use crate::auth::{expires_at, public_only, GuardDecision, SessionState};
use crate::Desk;

/// Log in and store the session
pub async fn login(desk: &Desk, username: &str, password: &str, force: bool) -> Result<()> {
    let auth = desk.auth()?;

    if !force {
        let state = auth.check().await;
        if let GuardDecision::Redirect(_) = public_only(&state, &desk.config) {
            if let Some(user) = state.user() {
                println!(
                    "Already logged in as {}. Use --force to log in again.",
                    user.username
                );
            }
            return Ok(());
        }
    }

    let user = auth.login(username, password).await?;
    println!("Logged in as {}", user.username);
    Ok(())
}

/// Forget the stored session
pub fn logout(desk: &Desk) -> Result<()> {
    let auth = desk.auth()?;
    auth.logout();
    println!("Logged out");
    Ok(())
}

/// Verify the stored session and print it
pub async fn status(desk: &Desk) -> Result<()> {
    let auth = desk.auth()?;
    println!("API: {}", desk.config.api_url);

    match auth.check().await {
        SessionState::Authenticated { user, token } => {
            println!("Logged in as {}", user.username);
            if let Some(role) = &user.role {
                println!("  role: {}", role);
            }
            if let Some(exp) = expires_at(&token) {
                if let Some(at) = chrono::DateTime::from_timestamp(exp, 0) {
                    println!("  token expires: {}", at.format("%Y-%m-%d %H:%M UTC"));
                }
            }
        }
        SessionState::Unauthenticated | SessionState::Checking => {
            println!("Not logged in");
        }
    }
    Ok(())
}
