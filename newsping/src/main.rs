/*
newsping - single-binary main.rs
Crawls trending headlines, summarizes them and delivers one KakaoTalk briefing.
*/

use anyhow::{Context, Result};
use clap::Parser;
use common::Config;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use newsping::kakao::{self, KakaoSender};
use newsping::llm::remote::RemoteLlmProvider;
use newsping::pipeline;
use newsping::summarize::{DummySummarizer, GptSummarizer, Summarizer};

#[derive(Parser, Debug)]
#[command(name = "newsping", about = "Newsping news briefing bot")]
struct Args {
    /// Path to config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the number of headlines to process
    #[arg(long)]
    limit: Option<usize>,

    /// Format and preview the message without delivering it
    #[arg(long)]
    no_send: bool,

    /// Override log level (info, debug, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    // Resolve config paths
    let default_path = PathBuf::from("config.default.toml");

    let override_path = if let Some(p) = args.config {
        if !p.exists() {
            error!(path = ?p, "specified config file not found");
            return Err(anyhow::anyhow!("Config file not found: {}", p.display()));
        }
        Some(p)
    } else {
        let p = PathBuf::from("config.toml");
        if p.exists() { Some(p) } else { None }
    };

    // Load configuration with defaults
    let mut config = match Config::load_with_defaults(
        if default_path.exists() { Some(&default_path) } else { None },
        override_path.as_deref(),
    )
    .await
    {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(%e, "failed to load configuration");
            return Err(e);
        }
    };
    info!(default = ?default_path, config = ?override_path, "configuration loaded");

    if let Some(limit) = args.limit {
        config.crawler.limit = Some(limit);
    }

    let summarizer = create_summarizer(&config)?;

    let sender = if args.no_send {
        info!("Delivery disabled via CLI (--no-send)");
        None
    } else {
        Some(create_sender(&config)?)
    };

    pipeline::run_once(&config, summarizer.as_ref(), sender.as_ref()).await
}

/// Create a summarizer based on the configured adapter
fn create_summarizer(config: &Config) -> Result<Box<dyn Summarizer>> {
    let adapter = config
        .llm
        .as_ref()
        .and_then(|l| l.adapter.as_deref())
        .unwrap_or("dummy");

    match adapter {
        "dummy" => {
            info!("Using dummy summarizer (no LLM calls)");
            Ok(Box::new(DummySummarizer))
        }
        "remote" => {
            let remote_config = config
                .llm
                .as_ref()
                .and_then(|l| l.remote.as_ref())
                .context("Remote adapter selected but no [llm.remote] config found")?;

            // Fetch API key from env var
            let api_key_env = remote_config
                .api_key_env
                .as_deref()
                .context("Missing api_key_env in remote config")?;
            let api_key = std::env::var(api_key_env)
                .with_context(|| format!("LLM API key env var '{}' not set", api_key_env))?;

            let model = remote_config
                .model
                .clone()
                .unwrap_or_else(|| "gpt-4o-mini".to_string());
            let api_url = remote_config
                .api_url
                .clone()
                .unwrap_or_else(|| "https://api.openai.com/v1/chat/completions".to_string());
            let timeout_secs = remote_config.timeout_seconds.unwrap_or(30);
            let max_tokens = remote_config.max_tokens.unwrap_or(700);

            info!(model = %model, "Using remote LLM summarizer");
            let provider = RemoteLlmProvider::new(api_url, api_key, model)
                .with_defaults(timeout_secs, max_tokens, 0.7);

            let max_summary_length = config
                .message
                .as_ref()
                .and_then(|m| m.max_summary_length)
                .unwrap_or(200);
            let max_keywords = config
                .message
                .as_ref()
                .and_then(|m| m.max_keywords)
                .unwrap_or(5);

            Ok(Box::new(
                GptSummarizer::new(Arc::new(provider)).with_limits(max_summary_length, max_keywords),
            ))
        }
        _ => anyhow::bail!("Unknown LLM adapter type: {}", adapter),
    }
}

/// Create the Kakao sender from config and the token env var
fn create_sender(config: &Config) -> Result<KakaoSender> {
    let kakao_config = config.kakao.as_ref().context("Missing [kakao] config section")?;

    let token_env = kakao_config
        .token_env
        .as_deref()
        .context("Missing token_env in kakao config")?;
    let access_token = std::env::var(token_env)
        .with_context(|| format!("Kakao access token env var '{}' not set", token_env))?;

    let api_url = kakao_config
        .api_url
        .clone()
        .unwrap_or_else(|| kakao::DEFAULT_API_URL.to_string());
    let memo_api_url = kakao_config
        .memo_api_url
        .clone()
        .unwrap_or_else(|| kakao::DEFAULT_MEMO_API_URL.to_string());

    Ok(KakaoSender::new(access_token)
        .with_endpoints(api_url, memo_api_url)
        .with_timeout(config.fetch_timeout_seconds()))
}
