use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::crawling::{Article, RankingCrawler};
use crate::formatting::{FormattedMessage, MessageFormatter, DEFAULT_TEMPLATE_ID};
use crate::kakao::KakaoSender;
use crate::scraping;
use crate::summarize::{Summarizer, SummaryResult};

/// One full run: crawl headlines, summarize each article, render a single
/// message, deliver it. A failed summarization skips that article; a failed
/// crawl aborts the run.
pub async fn run_once(
    config: &common::Config,
    summarizer: &dyn Summarizer,
    sender: Option<&KakaoSender>,
) -> Result<()> {
    let message = build_message(config, summarizer).await?;
    info!("pipeline: message preview:\n{}", message.content);

    let Some(sender) = sender else {
        info!("pipeline: delivery disabled, stopping after preview");
        return Ok(());
    };

    let receiver_uuids = config
        .kakao
        .as_ref()
        .map(|k| k.receiver_uuids.clone())
        .unwrap_or_default();

    let delivered = if receiver_uuids.is_empty() {
        info!("pipeline: no receiver uuids configured, sending to self");
        sender.send_to_me(&message).await?
    } else {
        sender.send_message(&message, &receiver_uuids).await?
    };

    if delivered {
        info!("pipeline: message delivered");
    } else {
        warn!("pipeline: delivery rejected by the messaging API");
    }
    Ok(())
}

/// Crawls, summarizes and formats without sending. Shared by the normal run
/// and preview-only mode.
pub async fn build_message(
    config: &common::Config,
    summarizer: &dyn Summarizer,
) -> Result<FormattedMessage> {
    let timeout = config.fetch_timeout_seconds();
    let user_agent = config
        .crawler
        .user_agent
        .as_deref()
        .unwrap_or("Mozilla/5.0");
    let limit = config.crawler.limit.unwrap_or(3);
    let ranking_type = config.crawler.category.as_deref().unwrap_or("popular");

    let crawler = RankingCrawler::new(&config.crawler.base_url, user_agent, timeout);
    let articles = crawler
        .fetch_articles(limit, ranking_type)
        .await
        .context("headline crawl failed")?;

    if articles.is_empty() {
        info!("pipeline: ranking page yielded no articles");
    }

    let mut kept: Vec<Article> = Vec::new();
    let mut results: Vec<SummaryResult> = Vec::new();

    for article in articles {
        info!("pipeline: processing '{}' ({})", article.title, article.link);

        let text = match scraping::extract_article_text(&article.link, timeout).await {
            Ok(text) => text,
            Err(e) => {
                warn!("pipeline: body extraction failed for {}: {}", article.link, e);
                scraping::EXTRACTION_FAILED.to_string()
            }
        };

        match summarizer.summarize(&text).await {
            Ok(result) => {
                kept.push(article);
                results.push(result);
            }
            Err(e) => {
                warn!("pipeline: summarization failed for {}, skipping: {}", article.link, e);
            }
        }
    }

    let template_id = config
        .kakao
        .as_ref()
        .and_then(|k| k.template_id.as_deref())
        .unwrap_or(DEFAULT_TEMPLATE_ID);

    MessageFormatter::with_template_id(template_id).format(&kept, &results)
}
