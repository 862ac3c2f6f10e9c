//! Category and tag commands

use anyhow::Result;

use crate::api::TermInput;
use crate::services::taxonomy::{self, TermKind};
use crate::Desk;

use super::authorized_client;

/// List categories or tags with their post counts
pub async fn list(desk: &Desk, kind: TermKind) -> Result<()> {
    let client = authorized_client(desk).await?;
    let terms = taxonomy::list(&client, kind).await?;

    let heading = match kind {
        TermKind::Category => "Categories",
        TermKind::Tag => "Tags",
    };
    println!("{} ({}):", heading, terms.len());
    for term in terms {
        let color = term.color.as_deref().unwrap_or("-");
        println!(
            "  #{} {} [{}] {} ({} posts)",
            term.id, term.name, term.slug, color, term.posts_count
        );
    }
    Ok(())
}

/// Create a term with a slug derived from its name
pub async fn add(desk: &Desk, kind: TermKind, name: &str, color: Option<String>) -> Result<()> {
    let client = authorized_client(desk).await?;
    let input = TermInput::named(name).with_color(color);
    let term = taxonomy::create(&client, kind, &input).await?;
    println!("Created {} #{} ({})", kind, term.id, term.slug);
    Ok(())
}

/// Delete a term that has no posts
pub async fn delete(desk: &Desk, kind: TermKind, id: i64) -> Result<()> {
    let client = authorized_client(desk).await?;
    let term = taxonomy::delete_by_id(&client, kind, id).await?;
    println!("Deleted {} \"{}\"", kind, term.name);
    Ok(())
}
