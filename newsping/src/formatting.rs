use anyhow::Result;
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::crawling::Article;
use crate::summarize::SummaryResult;

/// Downstream rendering template tag used when none is configured.
pub const DEFAULT_TEMPLATE_ID: &str = "news_summary";

/// How many keywords each article block shows at most.
const KEYWORDS_SHOWN: usize = 3;

/// The single rendered text block ready for delivery. `content` is plain
/// text with literal newline separators and no markup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedMessage {
    pub title: String,
    pub content: String,
    pub template_id: String,
}

/// Renders (article, summary) pairs into one outbound message.
pub struct MessageFormatter {
    template_id: String,
}

impl MessageFormatter {
    pub fn new() -> Self {
        Self::with_template_id(DEFAULT_TEMPLATE_ID)
    }

    pub fn with_template_id(template_id: impl Into<String>) -> Self {
        Self {
            template_id: template_id.into(),
        }
    }

    /// Formats paired articles and summaries (article[i] goes with results[i]).
    ///
    /// The line layout and the top-3 keyword cut are a presentation contract
    /// with existing message consumers; do not reorder.
    pub fn format(&self, articles: &[Article], results: &[SummaryResult]) -> Result<FormattedMessage> {
        if articles.len() != results.len() {
            anyhow::bail!(
                "article/summary count mismatch: {} articles, {} summaries",
                articles.len(),
                results.len()
            );
        }

        let now = Local::now().format("%Y년 %m월 %d일");
        let title = format!("📢 {} 오늘의 주요 뉴스", now);

        let mut parts: Vec<String> = Vec::new();
        for (i, (article, result)) in articles.iter().zip(results).enumerate() {
            parts.push(format!("{}. {}", i + 1, article.title));
            parts.push(format!("👉 요약: {}", result.summary));
            parts.push(format!("🔗 {}", article.link));

            if !result.keywords.is_empty() {
                parts.push("\n📘 오늘의 단어:".to_string());
                for keyword in result.keywords.iter().take(KEYWORDS_SHOWN) {
                    let explanation = result
                        .explanations
                        .get(keyword)
                        .map(String::as_str)
                        .unwrap_or("");
                    parts.push(format!("- '{}': {}", keyword, explanation));
                }
            }

            parts.push("---".to_string());
        }

        Ok(FormattedMessage {
            title,
            content: parts.join("\n"),
            template_id: self.template_id.clone(),
        })
    }
}

impl Default for MessageFormatter {
    fn default() -> Self {
        Self::new()
    }
}
