/// HTML-escape a string for text nodes and quoted attributes
///
/// Escapes: & < > " '
pub fn html_escape(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&#x27;".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

/// Serialize structured data for an inline `<script>` element.
///
/// `</` is written as `<\/`, which is the same JSON string but cannot
/// terminate the surrounding script element.
pub fn script_json(value: &serde_json::Value) -> String {
    value.to_string().replace("</", "<\\/")
}

/// Values interpolated into the article page.
///
/// Everything except `body_html` and `json_ld` is plain text and gets
/// escaped by [`render_article`].
pub struct ArticlePage<'a> {
    pub site_name: &'a str,
    pub title: &'a str,
    pub category: &'a str,
    pub lastmod: &'a str,
    pub description: &'a str,
    pub url: &'a str,
    pub og_image: &'a str,
    /// Empty means no hero element in the body
    pub hero: &'a str,
    /// Trusted fragment from the content normalizer
    pub body_html: &'a str,
    pub json_ld: &'a str,
}

const PAGE_STYLE: &str = r#"<style>
  body{font-family:Arial,sans-serif;background:#0a1d3f;color:#fff;margin:0;padding:0}
  header{background:#081737;position:sticky;top:0;z-index:1000;padding:15px 20px;display:flex;justify-content:space-between;align-items:center}
  header a{color:#ffcc00;text-decoration:none;font-weight:800}
  footer{color:#8fa3c7;font-size:12px;text-align:center;padding:0 20px 30px}
  footer a{color:#ffcc00;text-decoration:none}
  .brand{font-weight:900;letter-spacing:.7px}
  .container{max-width:900px;margin:18px auto;padding:0 20px 40px}
  .card{background:#0f264f;border-radius:12px;padding:16px;border:1px solid rgba(255,255,255,.06)}
  h1{font-size:26px;line-height:1.25;margin:0 0 10px}
  .meta{color:#cfd8ea;font-size:12px;margin-bottom:10px}
  .hero{width:100%;border-radius:12px;margin:10px 0 14px;display:block}
  .content{line-height:1.7;font-size:15px}
  .content img{max-width:100%;border-radius:12px;margin:12px 0;display:block}
  .content hr{border:none;border-top:1px solid rgba(255,255,255,.18);margin:14px 0;opacity:.8}
</style>"#;

/// Render a complete standalone article document
pub fn render_article(page: &ArticlePage<'_>) -> String {
    let title = html_escape(page.title);
    let description = html_escape(page.description);
    let site_name = html_escape(page.site_name);
    let og_image = html_escape(page.og_image);
    let url = html_escape(page.url);

    let hero_html = if page.hero.is_empty() {
        String::new()
    } else {
        format!(
            "<img class='hero' decoding='async' src='{}' alt='{}'>",
            html_escape(page.hero),
            title
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>{title} • {site_name}</title>
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<meta name="description" content="{description}">

<link rel="canonical" href="{url}">

<meta property="og:title" content="{title}">
<meta property="og:description" content="{description}">
<meta property="og:type" content="article">
<meta property="og:url" content="{url}">
<meta property="og:image" content="{og_image}">

<meta name="twitter:card" content="summary_large_image">
<meta name="twitter:title" content="{title}">
<meta name="twitter:description" content="{description}">
<meta name="twitter:image" content="{og_image}">

<script type="application/ld+json">{json_ld}</script>

{style}
</head>
<body>

<header>
  <div class="brand">{brand}</div>
  <a href="/">← Home</a>
</header>

<div class="container">
  <div class="card">
    <h1>{title}</h1>
    <div class="meta">{category} • {lastmod}</div>
    {hero_html}
    <div class="content">{body}</div>
  </div>
</div>

<footer><a href="/">{site_name}</a></footer>

</body>
</html>
"#,
        json_ld = page.json_ld,
        style = PAGE_STYLE,
        brand = html_escape(&page.site_name.to_uppercase()),
        category = html_escape(page.category),
        lastmod = html_escape(page.lastmod),
        body = page.body_html,
    )
}
