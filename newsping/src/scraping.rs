use anyhow::{Context, Result};
use reqwest::Client;
use scraper::{Html, Selector};
use std::io::Cursor;
use std::time::Duration;
use tracing::{info, warn};

/// Sentinel body text used when no article content could be extracted.
/// Downstream summarization treats it as ordinary text.
pub const EXTRACTION_FAILED: &str = "본문 추출 실패";

/// Fetches an article page and extracts its body text.
///
/// Naver news keeps the body in `#dic_area`; when that selector misses
/// (other outlets, layout changes) we fall back to readability extraction.
pub async fn extract_article_text(url: &str, timeout_secs: u64) -> Result<String> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent("Newsping/0.1.0")
        .build()
        .context("failed to build reqwest client")?;

    let response = client.get(url).send().await.context("failed to fetch article page")?;

    let status = response.status();
    if !status.is_success() {
        return Err(anyhow::anyhow!("article fetch failed with status: {}", status));
    }

    let bytes = response.bytes().await.context("failed to read response body")?;
    let html = String::from_utf8_lossy(&bytes);

    if let Some(text) = select_body_text(&html) {
        info!("scraping: selector extracted {} chars from {}", text.len(), url);
        return Ok(text);
    }

    // Fallback: readability on the raw page, converted to plain text
    let url_obj = url::Url::parse(url).context("failed to parse article URL")?;
    let mut reader = Cursor::new(bytes.as_ref());

    match readability::extractor::extract(&mut reader, &url_obj) {
        Ok(product) => match html2text::from_read(product.content.as_bytes(), 80) {
            Ok(text) => {
                info!("scraping: readability extracted {} chars from {}", text.len(), url);
                Ok(text)
            }
            Err(e) => {
                warn!("scraping: failed to convert extracted HTML to text: {}", e);
                Ok(product.text)
            }
        },
        Err(e) => {
            warn!("scraping: readability failed for {}: {}", url, e);
            Ok(EXTRACTION_FAILED.to_string())
        }
    }
}

/// Joins the text of the `#dic_area` body container, if present and non-empty.
fn select_body_text(html: &str) -> Option<String> {
    let selector = Selector::parse("#dic_area").ok()?;
    let document = Html::parse_document(html);
    let element = document.select(&selector).next()?;
    let text = element
        .text()
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
