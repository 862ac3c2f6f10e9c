//! HTML helper functions

/// Generate a heading tag with a text alignment class
///
/// # Examples
/// ```ignore
/// heading(2, "center", "Services") // -> <h2 class="text-center">Services</h2>
/// ```
pub fn heading(level: u8, alignment: &str, text: &str) -> String {
    let level = level.clamp(1, 6);
    format!(
        r#"<h{level} class="text-{}">{}</h{level}>"#,
        html_escape(alignment),
        html_escape(text)
    )
}

/// Generate a paragraph tag
pub fn paragraph(text: &str) -> String {
    format!("<p>{}</p>", html_escape(text))
}

/// Generate a figure with an image and optional caption
///
/// # Examples
/// ```ignore
/// figure("/uploads/a.jpg", "Office", Some("Our team")) // -> <figure><img ...><figcaption>...
/// ```
pub fn figure(src: &str, alt: &str, caption: Option<&str>) -> String {
    let caption = caption
        .filter(|c| !c.trim().is_empty())
        .map(|c| format!("<figcaption>{}</figcaption>", html_escape(c)))
        .unwrap_or_default();

    format!(
        r#"<figure><img src="{}" alt="{}" loading="lazy">{}</figure>"#,
        html_escape(src),
        html_escape(alt),
        caption
    )
}

/// Generate an ordered or unordered list
pub fn list<S: AsRef<str>>(ordered: bool, items: &[S]) -> String {
    let tag = if ordered { "ol" } else { "ul" };
    let mut html = format!("<{}>", tag);
    for item in items {
        html.push_str(&format!("<li>{}</li>", html_escape(item.as_ref())));
    }
    html.push_str(&format!("</{}>", tag));
    html
}

/// Generate a blockquote with optional attribution
pub fn blockquote(text: &str, author: Option<&str>) -> String {
    match author.filter(|a| !a.trim().is_empty()) {
        Some(author) => format!(
            "<blockquote><p>{}</p><cite>{}</cite></blockquote>",
            html_escape(text),
            html_escape(author)
        ),
        None => format!("<blockquote><p>{}</p></blockquote>", html_escape(text)),
    }
}

/// Wrap rendered content in a standalone preview document
pub fn page(title: &str, meta: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<article>
<h1>{title}</h1>
<p class="post-meta">{meta}</p>
{body}
</article>
</body>
</html>
"#,
        title = html_escape(title),
        meta = html_escape(meta),
        body = body
    )
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Truncate a string to a specified length
pub fn truncate(s: &str, length: usize, omission: Option<&str>) -> String {
    let omission = omission.unwrap_or("...");

    if s.chars().count() <= length {
        s.to_string()
    } else {
        let truncated: String = s
            .chars()
            .take(length.saturating_sub(omission.len()))
            .collect();
        format!("{}{}", truncated.trim_end(), omission)
    }
}
