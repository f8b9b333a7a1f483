//! Profile page parsing
//!
//! Linktree profile pages are Next.js documents; the account and its links
//! live in the JSON of `<script id="__NEXT_DATA__">`.

use crate::error::{LinktreeError, Result};
use crate::schema::{NextData, PageProps};
use scraper::{Html, Selector};

const NEXT_DATA_SELECTOR: &str = r#"script[id="__NEXT_DATA__"]"#;

/// Extract and decode `props.pageProps` from a profile page
pub fn extract_page_props(html: &str) -> Result<PageProps> {
    let json = next_data_text(html)?;
    let data: NextData = serde_json::from_str(&json)
        .map_err(|e| LinktreeError::Parse(format!("invalid __NEXT_DATA__ payload: {}", e)))?;
    Ok(data.props.page_props)
}

fn next_data_text(html: &str) -> Result<String> {
    let doc = Html::parse_document(html);
    let selector = Selector::parse(NEXT_DATA_SELECTOR)
        .map_err(|e| LinktreeError::Parse(format!("bad selector: {}", e)))?;

    doc.select(&selector)
        .next()
        .map(|el| el.text().collect::<String>())
        .ok_or_else(|| LinktreeError::Parse("no __NEXT_DATA__ script in page".to_string()))
}
