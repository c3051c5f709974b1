//! HTML link extraction
//!
//! Pages are tokenized by `scraper` (html5ever), which never fails on
//! malformed markup: unterminated tags, stray closers and truncated documents
//! all produce a best-effort tree, so extraction yields whatever anchors were
//! recovered up to the point of damage.

use scraper::{Html, Selector};

/// Raw href values found on `<a>` open tags, in document order
///
/// Every href is collected when the page is parsed; the parsed tree borrows
/// the page text and is not `Send`, so it cannot outlive `extract_links`.
/// The sequence is finite, its length is known up front, and it is consumed
/// once. Values are untouched: resolving them is the normalizer's job.
#[derive(Debug, Clone)]
pub struct Links {
    hrefs: std::vec::IntoIter<String>,
}

impl Iterator for Links {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.hrefs.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.hrefs.size_hint()
    }
}

impl ExactSizeIterator for Links {}

/// Extracts anchor hrefs from an HTML byte stream
///
/// Bytes are decoded lossily as UTF-8. When a tag repeats the `href`
/// attribute, only the first occurrence is reported; the tokenizer discards
/// later duplicates.
///
/// # Example
///
/// ```
/// use hostcrawl::crawler::extract_links;
///
/// let html = br#"<a href="/one">1</a><p><a href="two" href="ignored">2</a>"#;
/// let links: Vec<String> = extract_links(html).collect();
/// assert_eq!(links, vec!["/one".to_string(), "two".to_string()]);
/// ```
pub fn extract_links(body: &[u8]) -> Links {
    let html = String::from_utf8_lossy(body);
    let document = Html::parse_document(&html);

    let hrefs = match Selector::parse("a[href]") {
        Ok(selector) => document
            .select(&selector)
            .filter_map(|element| element.value().attr("href"))
            .map(str::to_string)
            .collect::<Vec<_>>(),
        Err(_) => Vec::new(),
    };

    Links {
        hrefs: hrefs.into_iter(),
    }
}
