/// Token used when a text reduces to nothing after slugging.
pub const FALLBACK_SLUG: &str = "story";

/// Derive a URL- and filesystem-safe slug from free text.
///
/// Lowercases, spells out `&` as `and`, and collapses every run of
/// characters outside `[a-z0-9]` into a single hyphen. Never returns an
/// empty string.
///
/// ```text
/// slugify("Markets & Money")  → "markets-and-money"
/// slugify("  --Hello, World!-- ") → "hello-world"
/// slugify("¿?")               → "story"
/// ```
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase().replace('&', " and ");

    let mut slug = String::with_capacity(lowered.len());
    let mut pending_hyphen = false;
    for c in lowered.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}
