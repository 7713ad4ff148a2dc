//! sitemaps.org XML rendering

/// Namespace of the sitemap protocol
pub const SITEMAP_NAMESPACE: &str = "https://www.sitemaps.org/schemas/sitemap/0.9";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Renders a `urlset` document with one `<url><loc>` entry per URL
///
/// URLs are written in the order given and entity-escaped, as the protocol
/// requires.
///
/// # Example
///
/// ```
/// use sitemapper::output::render_sitemap;
///
/// let xml = render_sitemap(["https://example.com"]);
/// assert!(xml.contains("<url><loc>https://example.com</loc></url>"));
/// ```
pub fn render_sitemap<'a, I>(urls: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut xml = String::new();
    xml.push_str(XML_DECLARATION);
    xml.push('\n');
    xml.push_str(&format!(r#"<urlset xmlns="{}">"#, SITEMAP_NAMESPACE));
    xml.push('\n');
    for url in urls {
        xml.push_str("  <url><loc>");
        xml.push_str(&escape_xml(url));
        xml.push_str("</loc></url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

/// Escapes the five XML special characters
fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
