// Library interface for newsping modules
// This allows tests and other binaries to import modules

pub mod crawling;
pub mod formatting;
pub mod kakao;
pub mod llm;
pub mod pipeline;
pub mod scraping;
pub mod summarize;
