//! Post commands
//!
//! Drafts are authored as YAML files:
//!
//! ```yaml
//! title: Abertura de empresas
//! excerpt: Passo a passo
//! status: draft
//! categoryId: 2
//! tagIds: [1, 3]
//! image: images/capa.png
//! blocks:
//!   - type: title
//!     content: Abertura de empresas
//!   - type: image
//!     content: images/fachada.jpg
//!     metadata:
//!       imageAlt: Fachada do escritório
//! ```
//!
//! Image paths relative to the draft file are uploaded before the post is
//! submitted and replaced by their public URL.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::{ApiClient, PostBackend};
use crate::content::{
    reading_time, BlockEditor, BlockPatch, BlockType, ContentBlock, MetadataPatch, PostDraft,
    PostStatus,
};
use crate::error::ValidationError;
use crate::helpers::{generate_slug, page, truncate};
use crate::media::{ImageFile, ImageUploader};
use crate::services::posts;
use crate::Desk;

use super::authorized_client;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DraftFile {
    title: String,
    #[serde(default)]
    excerpt: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    category_id: Option<i64>,
    #[serde(default)]
    status: PostStatus,
    #[serde(default)]
    tag_ids: BTreeSet<i64>,
    #[serde(default)]
    blocks: Vec<BlockEntry>,
}

#[derive(Debug, Deserialize)]
struct BlockEntry {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    metadata: Option<MetadataPatch>,
}

/// Parse a YAML draft file into a post draft
pub fn load_draft(path: &Path) -> Result<PostDraft> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read draft {:?}", path))?;
    parse_draft(&content).with_context(|| format!("Invalid draft {:?}", path))
}

fn parse_draft(content: &str) -> Result<PostDraft> {
    let file: DraftFile = serde_yaml::from_str(content)?;

    let mut editor = BlockEditor::new();
    for entry in file.blocks {
        let block_type: BlockType = entry
            .block_type
            .parse()
            .map_err(|_| ValidationError::UnsupportedBlockType(entry.block_type.clone()))?;
        let id = editor.add_block(block_type, None)?;
        editor.update_block(
            &id,
            BlockPatch {
                content: Some(entry.content.trim_end().to_string()),
                metadata: entry.metadata,
            },
        )?;
    }
    editor.stop_editing();

    Ok(PostDraft {
        title: file.title,
        excerpt: file.excerpt,
        image: file.image,
        category_id: file.category_id,
        status: file.status,
        tag_ids: file.tag_ids,
        content_blocks: editor.into_blocks(),
    })
}

/// Whether an image reference points at a file next to the draft
fn local_image(base: &Path, reference: &str) -> Option<PathBuf> {
    let reference = reference.trim();
    if reference.is_empty()
        || reference.starts_with("http://")
        || reference.starts_with("https://")
        || reference.starts_with("data:")
        || reference.starts_with('/')
    {
        return None;
    }
    let path = base.join(reference);
    path.is_file().then_some(path)
}

async fn upload_local_images(
    desk: &Desk,
    client: &ApiClient,
    base: &Path,
    draft: &mut PostDraft,
) -> Result<()> {
    let uploader = ImageUploader::new(client, desk.normalizer(), desk.media_urls());

    if let Some(path) = draft.image.as_deref().and_then(|r| local_image(base, r)) {
        draft.image = Some(upload_file(&uploader, &path).await?);
    }

    let mut editor = BlockEditor::from_blocks(std::mem::take(&mut draft.content_blocks));
    let pending: Vec<(String, PathBuf)> = editor
        .blocks()
        .iter()
        .filter(|b| b.block_type == BlockType::Image)
        .filter_map(|b| local_image(base, &b.content).map(|p| (b.id.clone(), p)))
        .collect();

    for (id, path) in pending {
        let url = upload_file(&uploader, &path).await?;
        editor.update_block(&id, BlockPatch::content(url))?;
    }

    draft.content_blocks = editor.into_blocks();
    Ok(())
}

async fn upload_file(uploader: &ImageUploader<'_, ApiClient>, path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read image {:?}", path))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image")
        .to_string();
    let uploaded = uploader
        .upload(&ImageFile::from_bytes(name, bytes))
        .await
        .with_context(|| format!("Failed to upload {:?}", path))?;
    println!("  uploaded {} -> {}", path.display(), uploaded.url);
    Ok(uploaded.url)
}

fn draft_dir(file: &Path) -> PathBuf {
    file.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// List posts
pub async fn list(desk: &Desk) -> Result<()> {
    let client = authorized_client(desk).await?;
    let posts = client.list_posts().await?;

    println!("Posts ({}):", posts.len());
    for post in posts {
        let date = post
            .updated_at
            .or(post.created_at)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "----------".to_string());
        println!("  #{} {} - {} [{}]", post.id, date, post.title, post.status);
    }
    Ok(())
}

/// Print one post with its block outline
pub async fn show(desk: &Desk, id: i64) -> Result<()> {
    let client = authorized_client(desk).await?;
    let post = client.get_post(id).await?;

    println!("#{} {}", post.summary.id, post.summary.title);
    println!("  slug: {}", post.summary.slug);
    println!("  status: {}", post.summary.status);
    if let Some(category) = post.summary.category_id {
        println!("  category: {}", category);
    }
    if !post.tag_ids.is_empty() {
        let tags: Vec<String> = post.tag_ids.iter().map(|t| t.to_string()).collect();
        println!("  tags: {}", tags.join(", "));
    }
    println!(
        "  reading time: {} min",
        reading_time(&post.content_blocks, desk.config.reading.words_per_minute)
    );

    let draft = post.into_draft();
    println!("Blocks ({}):", draft.content_blocks.len());
    for block in &draft.content_blocks {
        println!("{}", outline(block));
    }
    Ok(())
}

fn outline(block: &ContentBlock) -> String {
    format!(
        "  {:>2}. [{}] {}",
        block.order,
        block.block_type.label(),
        truncate(&block.content.replace('\n', " / "), 60, None)
    )
}

/// Create a post from a draft file
pub async fn create(desk: &Desk, file: &Path) -> Result<()> {
    let mut draft = load_draft(file)?;
    draft.validate()?;

    let client = authorized_client(desk).await?;
    upload_local_images(desk, &client, &draft_dir(file), &mut draft).await?;

    let post = posts::submit(&client, &draft, None).await?;
    println!("Created post #{} ({})", post.summary.id, post.summary.slug);
    Ok(())
}

/// Replace an existing post with a draft file
pub async fn edit(desk: &Desk, id: i64, file: &Path) -> Result<()> {
    let mut draft = load_draft(file)?;
    draft.validate()?;

    let client = authorized_client(desk).await?;
    upload_local_images(desk, &client, &draft_dir(file), &mut draft).await?;

    let post = posts::submit(&client, &draft, Some(id)).await?;
    println!("Updated post #{} ({})", post.summary.id, post.summary.slug);
    Ok(())
}

/// Delete posts, reporting each failure
pub async fn delete(desk: &Desk, ids: &[i64]) -> Result<()> {
    if ids.is_empty() {
        bail!("No post ids given");
    }
    let client = authorized_client(desk).await?;
    let summary = posts::delete_many(&client, ids).await;

    for id in &summary.succeeded {
        println!("Deleted post #{}", id);
    }
    for (id, err) in &summary.failed {
        println!("Failed to delete post #{}: {}", id, err);
    }

    if !summary.is_complete() {
        bail!(
            "{} of {} deletions failed",
            summary.failed.len(),
            summary.total()
        );
    }
    Ok(())
}

/// Render a draft file or a stored post to a preview HTML page
pub async fn render(
    desk: &Desk,
    file: Option<&Path>,
    id: Option<i64>,
    output: Option<&Path>,
) -> Result<()> {
    let draft = match (file, id) {
        (Some(file), _) => load_draft(file)?,
        (None, Some(id)) => {
            let client = authorized_client(desk).await?;
            client.get_post(id).await?.into_draft()
        }
        (None, None) => bail!("Give a draft file or --id"),
    };

    let html = render_page(desk, &draft);
    match output {
        Some(path) => {
            fs::write(path, html).with_context(|| format!("Failed to write {:?}", path))?;
            println!("Rendered {:?}", path);
        }
        None => print!("{}", html),
    }
    Ok(())
}

fn render_page(desk: &Desk, draft: &PostDraft) -> String {
    let minutes = reading_time(
        &draft.content_blocks,
        desk.config.reading.words_per_minute,
    );
    let body = desk.renderer().render_html(&draft.content_blocks);
    page(&draft.title, &format!("{} min read", minutes), &body)
}

/// Print the slug for a title, optionally avoiding existing post slugs
pub async fn slug(desk: &Desk, title: &str, unique: bool) -> Result<()> {
    let slug = if unique {
        let client = authorized_client(desk).await?;
        posts::suggest_slug(&client, title).await?
    } else {
        generate_slug(title)
    };
    println!("{}", slug);
    Ok(())
}
