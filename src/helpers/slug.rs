//! Slug helper functions

/// Generate a URL-safe slug from a title
///
/// Accents are transliterated, anything that is not alphanumeric becomes a
/// single hyphen, and leading/trailing hyphens are dropped.
///
/// # Examples
/// ```ignore
/// generate_slug("Abertura de Empresas!") // -> "abertura-de-empresas"
/// ```
pub fn generate_slug(title: &str) -> String {
    ::slug::slugify(title)
}

const FALLBACK_SLUG: &str = "post";

/// Generate a slug that does not collide with any of `existing`
///
/// The first free candidate among `slug`, `slug-1`, `slug-2`, ... wins.
/// Titles without any alphanumerics use `post` as the base.
pub fn generate_unique_slug<S: AsRef<str>>(title: &str, existing: &[S]) -> String {
    let base = match generate_slug(title) {
        slug if slug.is_empty() => FALLBACK_SLUG.to_string(),
        slug => slug,
    };
    let taken = |candidate: &str| existing.iter().any(|s| s.as_ref() == candidate);

    if !taken(&base) {
        return base;
    }

    let mut n = 1usize;
    loop {
        let candidate = format!("{}-{}", base, n);
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_slug() {
        assert_eq!(generate_slug("Abertura de Empresas!"), "abertura-de-empresas");
        assert_eq!(generate_slug("  Imposto de Renda 2024  "), "imposto-de-renda-2024");
        assert_eq!(generate_slug("Contabilidade & Gestão"), "contabilidade-gestao");
    }

    #[test]
    fn test_generate_unique_slug() {
        assert_eq!(generate_unique_slug("Teste", &["teste"]), "teste-1");
        assert_eq!(generate_unique_slug("Teste", &["teste", "teste-1"]), "teste-2");
        assert_eq!(generate_unique_slug::<&str>("Teste", &[]), "teste");
    }

    #[test]
    fn test_unique_slug_without_alphanumerics() {
        assert_eq!(generate_slug("!!! ???"), "");
        assert_eq!(generate_unique_slug("!!! ???", &[""]), "post");
        assert_eq!(generate_unique_slug("***", &["post", "post-1"]), "post-2");
    }
}
