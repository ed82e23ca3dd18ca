//! Minimal markdown-with-frontmatter reader/writer.
//!
//! `original_source` leans on a project-local `MarkdownFileWithMetadataImpl` helper; that
//! helper isn't part of this crate's dependency surface, so this is a small hand-rolled
//! equivalent covering exactly the `key: value` frontmatter shapes §6 requires (no nested YAML
//! structures are ever written into frontmatter by this engine).

use std::collections::BTreeMap;

pub fn write(fields: &[(&str, String)], body: &str) -> String {
    let mut out = String::from("---\n");
    for (key, value) in fields {
        out.push_str(&format!("{key}: {value}\n"));
    }
    out.push_str("---\n");
    out.push_str(body);
    out
}

/// Splits a frontmatter-prefixed document into its `key: value` map and body text. A document
/// with no `---` fences is treated as having an empty frontmatter map and itself as the body.
pub fn parse(content: &str) -> (BTreeMap<String, String>, String) {
    let mut lines = content.lines();
    if lines.next() != Some("---") {
        return (BTreeMap::new(), content.to_string());
    }
    let mut fields = BTreeMap::new();
    let mut rest = content.splitn(3, "---");
    // rest: ["", frontmatter_block, body] when the fences are present.
    let _ = rest.next();
    let frontmatter_block = rest.next().unwrap_or_default();
    let body = rest.next().unwrap_or_default().trim_start_matches('\n').to_string();
    for line in frontmatter_block.lines() {
        if let Some((key, value)) = line.split_once(':') {
            fields.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    (fields, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_simple_frontmatter() {
        let doc = write(&[("name", "foo".into()), ("summary", "a thing".into())], "body text");
        let (fields, body) = parse(&doc);
        assert_eq!(fields.get("name").map(String::as_str), Some("foo"));
        assert_eq!(fields.get("summary").map(String::as_str), Some("a thing"));
        assert_eq!(body, "body text");
    }

    #[test]
    fn content_without_fences_is_treated_as_plain_body() {
        let (fields, body) = parse("just some text");
        assert!(fields.is_empty());
        assert_eq!(body, "just some text");
    }
}
