//! Article body normalization.
//!
//! Article content arrives either as an HTML fragment or as plaintext with
//! blank-line separated paragraphs. Everything here is total: malformed
//! markup is passed through, never rejected.

use crate::template::html_escape;
use regex::Regex;
use std::sync::LazyLock;

static FIRST_IMG_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img\b[^>]*\bsrc\s*=\s*["']([^"']+)["']"#).unwrap()
});
static IMG_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<img\b[^>]*>").unwrap());
static PARAGRAPH_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<p\b").unwrap());
static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Whether the content mentions an `<img` tag at all (case-insensitive)
pub fn has_inline_image(content: &str) -> bool {
    content.to_lowercase().contains("<img")
}

/// Source of the first `<img>` tag, or an empty string
pub fn extract_hero(content: &str) -> String {
    FIRST_IMG_SRC
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Remove only the first `<img>` tag
pub fn strip_first_image(content: &str) -> String {
    IMG_TAG.replacen(content, 1, "").into_owned()
}

/// Replace every tag with a space, then trim and collapse whitespace
pub fn strip_tags(text: &str) -> String {
    let without_tags = ANY_TAG.replace_all(text, " ");
    collapse_whitespace(&without_tags)
}

pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

#[derive(Debug, PartialEq)]
enum Block {
    Paragraph(String),
    Rule,
}

/// Turn article content into the HTML fragment placed inside the page body.
///
/// Content that already has `<p>` markup is trusted and returned as is.
/// Plaintext is split on blank lines into escaped `<p>` blocks, and a line
/// made only of three or more hyphens, with blank lines (or the start or
/// end of the text) on both sides, becomes `<hr>`.
pub fn normalize(content: &str) -> String {
    if content.is_empty() {
        return String::new();
    }
    if PARAGRAPH_TAG.is_match(content) {
        return content.to_string();
    }

    let text = content.replace("\r\n", "\n").replace('\r', "\n");

    split_blocks(&text)
        .into_iter()
        .map(|block| match block {
            Block::Rule => "<hr>".to_string(),
            Block::Paragraph(p) => format!("<p>{}</p>", html_escape(&p)),
        })
        .collect()
}

fn split_blocks(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    let lines: Vec<&str> = text.split('\n').collect();
    let is_blank = |i: Option<usize>| {
        i.and_then(|i| lines.get(i))
            .is_none_or(|l| l.trim().is_empty())
    };

    for (i, line) in lines.iter().copied().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            flush_paragraph(&mut current, &mut blocks);
        } else if is_rule(trimmed) && is_blank(i.checked_sub(1)) && is_blank(Some(i + 1)) {
            flush_paragraph(&mut current, &mut blocks);
            blocks.push(Block::Rule);
        } else {
            current.push(line);
        }
    }
    flush_paragraph(&mut current, &mut blocks);

    blocks
}

fn flush_paragraph(lines: &mut Vec<&str>, blocks: &mut Vec<Block>) {
    let paragraph = lines.join("\n");
    let paragraph = paragraph.trim();
    if !paragraph.is_empty() {
        blocks.push(Block::Paragraph(paragraph.to_string()));
    }
    lines.clear();
}

fn is_rule(line: &str) -> bool {
    line.len() >= 3 && line.bytes().all(|b| b == b'-')
}
