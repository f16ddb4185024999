use anyhow::{Context, Result};
use reqwest::Client;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

/// Category assigned when the ranking page gives no better information.
pub const DEFAULT_CATEGORY: &str = "일반";

/// One crawled news item. `link` is the unique identifier of an article
/// within a single pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub link: String,
    pub category: String,
    /// Legacy denormalization; the canonical summary lives in `SummaryResult`.
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Article {
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            category: category.into(),
            summary: String::new(),
            keywords: Vec::new(),
        }
    }
}

/// Crawler for a press ranking page (e.g. Naver press ranking).
pub struct RankingCrawler {
    base_url: String,
    user_agent: String,
    timeout: Duration,
}

impl RankingCrawler {
    pub fn new(
        base_url: impl Into<String>,
        user_agent: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            user_agent: user_agent.into(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Fetches the ranking page and returns up to `limit` headline articles.
    pub async fn fetch_articles(&self, limit: usize, ranking_type: &str) -> Result<Vec<Article>> {
        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()
            .context("failed to build reqwest client")?;

        let url = format!("{}?type={}", self.base_url, ranking_type);
        let response = client
            .get(&url)
            .send()
            .await
            .context("failed to fetch ranking page")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow::anyhow!("ranking fetch failed with status: {}", status));
        }

        let body = response.text().await.context("failed to read ranking page body")?;
        let articles = select_headlines(&body, limit, ranking_type)?;
        info!("crawling: {} headlines from {}", articles.len(), url);
        Ok(articles)
    }
}

/// Pulls headline/link pairs out of the ranking page markup.
fn select_headlines(html: &str, limit: usize, category: &str) -> Result<Vec<Article>> {
    let selector = Selector::parse("ul.press_ranking_list li.as_thumb a")
        .map_err(|e| anyhow::anyhow!("invalid headline selector: {}", e))?;

    let document = Html::parse_document(html);
    let articles = document
        .select(&selector)
        .filter_map(|element| {
            let link = element.value().attr("href")?;
            if link.is_empty() {
                return None;
            }
            let title = element.text().collect::<String>().trim().to_string();
            Some(Article::new(title, link, category))
        })
        .take(limit)
        .collect();

    Ok(articles)
}
