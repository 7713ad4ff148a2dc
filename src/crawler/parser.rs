//! HTML link extraction
//!
//! Only the `href` of anchor elements is of interest. Resolution and
//! filtering happen later in the coordinator, so hrefs come back raw
//! (whitespace-trimmed), in document order, duplicates included.

use scraper::{Html, Selector};

/// Returns the `href` of every `<a>` element, in document order
///
/// # Example
///
/// ```
/// use sitemapper::crawler::extract_hrefs;
///
/// let html = r#"<p><a href=" /a ">A</a><a name="x">no href</a><a href="/a">again</a></p>"#;
/// assert_eq!(extract_hrefs(html), vec!["/a", "/a"]);
/// ```
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let mut hrefs = Vec::new();
    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                hrefs.push(href.trim().to_string());
            }
        }
    }

    hrefs
}
