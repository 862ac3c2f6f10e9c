//! Initialize a new desk folder

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const CONFIG_TEMPLATE: &str = r#"# blogdesk configuration

# API
api_url: http://localhost:3001
request_timeout_secs: 30

# Public site
public_url: https://example.com
uploads_path: /uploads/

# Session
session_file: .blogdesk/session.json
login_route: /admin/login
landing_route: /admin/dashboard

# Image uploads
image:
  max_bytes: 5242880
  max_width: 1200
  quality: 0.85

# Reading time
reading:
  words_per_minute: 200
"#;

const DRAFT_TEMPLATE: &str = r#"title: Como abrir sua empresa
excerpt: Um guia rápido para sair da informalidade.
status: draft
tagIds: []
blocks:
  - type: title
    content: Como abrir sua empresa
  - type: paragraph
    content: Escreva aqui o primeiro parágrafo do post.
  - type: list
    content: |
      Escolha o tipo de empresa
      Defina o regime tributário
      Registre o CNPJ
    metadata:
      listType: ordered
  - type: quote
    content: Planejamento é metade do caminho.
    metadata:
      quoteAuthor: Equipe
"#;

/// Initialize a new desk in the given directory
///
/// Existing files are left alone.
pub fn init_desk(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir.join("drafts"))
        .with_context(|| format!("Failed to create {:?}", target_dir))?;

    write_if_missing(&target_dir.join("_config.yml"), CONFIG_TEMPLATE)?;
    write_if_missing(&target_dir.join("drafts/example.yml"), DRAFT_TEMPLATE)?;
    write_if_missing(&target_dir.join(".gitignore"), ".blogdesk/\n")?;

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        tracing::debug!("Keeping existing {:?}", path);
        return Ok(());
    }
    fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::posts::load_draft;
    use crate::config::DeskConfig;

    #[test]
    fn test_init_desk() {
        let dir = tempfile::tempdir().unwrap();
        init_desk(dir.path()).unwrap();

        let config = DeskConfig::load(dir.path().join("_config.yml")).unwrap();
        assert_eq!(config.api_url, "http://localhost:3001");
        assert_eq!(config.image.max_width, 1200);

        let draft = load_draft(&dir.path().join("drafts/example.yml")).unwrap();
        assert_eq!(draft.content_blocks.len(), 4);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("_config.yml"), "api_url: https://api.example\n").unwrap();

        init_desk(dir.path()).unwrap();
        let config = DeskConfig::load(dir.path().join("_config.yml")).unwrap();
        assert_eq!(config.api_url, "https://api.example");
    }
}
