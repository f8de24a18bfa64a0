//! # Embed Rendering
//!
//! Matrix has no embed type, so embeds are flattened to markdown.
//! The colour is dropped; the timestamp becomes a footer line.

use crate::domain::types::Embed;

pub fn embed_to_markdown(embed: &Embed) -> String {
    let mut out = String::new();

    if !embed.title.is_empty() {
        out.push_str(&format!("### {}\n", embed.title));
    }
    if !embed.description.is_empty() {
        out.push_str(&embed.description);
        out.push('\n');
    }

    for field in &embed.fields {
        out.push('\n');
        out.push_str(&format!("**{}**", field.name));
        // Code fences must start on their own line.
        if field.inline && !field.value.starts_with("```") {
            out.push_str(&format!(": {}\n", field.value));
        } else {
            out.push('\n');
            out.push_str(&field.value);
            out.push('\n');
        }
    }

    if let Some(ts) = embed.timestamp {
        out.push_str(&format!("\n_{}_", ts.format("%Y-%m-%d %H:%M:%S UTC")));
    }

    out.trim_end().to_string()
}

/// Text and embed as one message body.
pub fn with_text(text: Option<&str>, embed: &Embed) -> String {
    match text {
        Some(text) if !text.is_empty() => format!("{text}\n\n{}", embed_to_markdown(embed)),
        _ => embed_to_markdown(embed),
    }
}
