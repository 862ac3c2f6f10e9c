//! Newsletter commands

use anyhow::Result;

use crate::services::newsletter;
use crate::Desk;

use super::authorized_client;

pub async fn subscribe(desk: &Desk, email: &str) -> Result<()> {
    let client = desk.client()?;
    let email = newsletter::subscribe(&client, email).await?;
    println!("Subscribed {}", email);
    Ok(())
}

pub async fn unsubscribe(desk: &Desk, email: &str) -> Result<()> {
    let client = desk.client()?;
    let email = newsletter::unsubscribe(&client, email).await?;
    println!("Unsubscribed {}", email);
    Ok(())
}

/// List subscribers
pub async fn subscribers(desk: &Desk) -> Result<()> {
    let client = authorized_client(desk).await?;
    let subscribers = newsletter::subscribers(&client).await?;

    println!("Subscribers ({}):", subscribers.len());
    for sub in subscribers {
        let since = sub
            .subscribed_at
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        println!("  {} [{}] {}", sub.email, sub.status, since);
    }
    Ok(())
}

pub async fn stats(desk: &Desk) -> Result<()> {
    let client = authorized_client(desk).await?;
    let stats = newsletter::stats(&client).await?;
    println!("Total: {}", stats.total);
    println!("Active: {}", stats.active);
    println!("Unsubscribed: {}", stats.unsubscribed);
    Ok(())
}
