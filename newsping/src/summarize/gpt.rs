use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::debug;

use super::{parser, Summarizer, SummaryResult};
use crate::llm::{LlmProvider, LlmRequest};

const SYSTEM_PROMPT: &str = "You are a helpful news summarizer.";

/// LLM-backed summarizer: drives a chat-completion provider with a fixed
/// Korean prompt and parses the free-text reply.
pub struct GptSummarizer {
    provider: Arc<dyn LlmProvider>,
    max_summary_length: usize,
    max_keywords: usize,
    max_tokens: usize,
}

impl GptSummarizer {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            max_summary_length: 200,
            max_keywords: 5,
            max_tokens: 700,
        }
    }

    /// Overrides the advisory limits woven into the prompt.
    pub fn with_limits(mut self, max_summary_length: usize, max_keywords: usize) -> Self {
        self.max_summary_length = max_summary_length;
        self.max_keywords = max_keywords;
        self
    }

    fn build_prompt(&self, text: &str) -> String {
        format!(
            "다음 뉴스 기사를 요약해주세요:\n\
             \n\
             {text}\n\
             \n\
             다음 형식으로 응답해주세요:\n\
             1. {max_len}자 이내의 요약\n\
             2. 중요한 키워드 {max_kw}개\n\
             3. 각 키워드에 대한 간단한 설명\n\
             \n\
             형식:\n\
             요약: [요약문]\n\
             키워드: [키워드1, 키워드2, ...]\n\
             단어설명:\n\
             - 키워드1: 설명\n\
             - 키워드2: 설명\n",
            text = text,
            max_len = self.max_summary_length,
            max_kw = self.max_keywords,
        )
    }
}

#[async_trait::async_trait]
impl Summarizer for GptSummarizer {
    async fn summarize(&self, text: &str) -> Result<SummaryResult> {
        let request = LlmRequest {
            system: Some(SYSTEM_PROMPT.to_string()),
            prompt: self.build_prompt(text),
            max_tokens: Some(self.max_tokens),
            temperature: Some(0.7),
            timeout_seconds: None,
        };

        let response = self
            .provider
            .generate(request)
            .await
            .context("summarization request failed")?;

        debug!(
            "summarize: reply {} chars, {} tokens",
            response.content.len(),
            response.usage.total_tokens
        );

        Ok(parser::parse_reply(&response.content))
    }
}
