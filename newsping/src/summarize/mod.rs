use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod gpt;
pub mod parser;

pub use gpt::GptSummarizer;

/// Parsed, structured output of summarizing one article's body text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    /// Short summary; length limits are advisory and enforced only via the prompt.
    pub summary: String,
    /// Keywords in the order the reply listed them. Duplicates are kept.
    pub keywords: Vec<String>,
    /// Explanation per keyword. A keyword the reply never explained is absent
    /// here, not present with an empty value.
    pub explanations: HashMap<String, String>,
}

/// Capability converting raw article text into a `SummaryResult`.
#[async_trait::async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<SummaryResult>;
}

/// Offline summarizer returning a fixed result regardless of input.
/// Used for integration testing and local runs; never performs network I/O.
pub struct DummySummarizer;

#[async_trait::async_trait]
impl Summarizer for DummySummarizer {
    async fn summarize(&self, _text: &str) -> Result<SummaryResult> {
        let keywords = vec![
            "신탁".to_string(),
            "환율".to_string(),
            "금리".to_string(),
        ];
        let explanations = HashMap::from([
            ("신탁".to_string(), "제3자가 대신 보관하는 계약".to_string()),
            ("환율".to_string(), "외국 돈과 우리 돈의 교환 비율".to_string()),
            ("금리".to_string(), "돈을 빌릴 때 적용되는 이자율".to_string()),
        ]);

        Ok(SummaryResult {
            summary: "전세 사기 피해가 반복되고 있으며 정부는 대책을 논의 중이다.".to_string(),
            keywords,
            explanations,
        })
    }
}
