use anyhow::{bail, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;
use tokio_retry::strategy::ExponentialBackoff;
use tokio_retry::Retry;

pub mod gemini;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash-latest";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone)]
pub enum LLMProvider {
    Gemini {
        api_key: String,
        model: String,
        base_url: String,
    },
}

impl LLMProvider {
    pub fn gemini(api_key: impl Into<String>) -> Self {
        LLMProvider::Gemini {
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }
}

/// Sampling parameters forwarded to the model with every prompt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 2048,
        }
    }
}

impl GenerationConfig {
    pub const MAX_OUTPUT_TOKENS: u32 = 8192;

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            bail!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            );
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            bail!("top_p must be between 0.0 and 1.0, got {}", self.top_p);
        }
        if self.top_k == 0 {
            bail!("top_k must be at least 1");
        }
        if self.max_output_tokens == 0 || self.max_output_tokens > Self::MAX_OUTPUT_TOKENS {
            bail!(
                "max_output_tokens must be between 1 and {}, got {}",
                Self::MAX_OUTPUT_TOKENS,
                self.max_output_tokens
            );
        }
        Ok(())
    }
}

#[async_trait]
pub trait LLMService {
    async fn generate_text(&self, prompt: &str, config: &GenerationConfig) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LLMClientConfig {
    pub timeout: Duration,
    pub retry_config: RetryConfig,
}

impl Default for LLMClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(180),
            retry_config: RetryConfig::default(),
        }
    }
}

pub struct LLMClient {
    service: Box<dyn LLMService + Send + Sync>,
    config: LLMClientConfig,
}

impl LLMClient {
    pub fn new(provider: LLMProvider, config: Option<LLMClientConfig>) -> Self {
        let service: Box<dyn LLMService + Send + Sync> = match provider {
            LLMProvider::Gemini {
                api_key,
                model,
                base_url,
            } => Box::new(gemini::GeminiService::new(api_key, model, base_url)),
        };

        Self::with_service(service, config.unwrap_or_default())
    }

    pub fn with_service(
        service: Box<dyn LLMService + Send + Sync>,
        config: LLMClientConfig,
    ) -> Self {
        Self { service, config }
    }

    fn retry_strategy(&self) -> impl Iterator<Item = Duration> {
        let retry = &self.config.retry_config;
        ExponentialBackoff::from_millis(retry.base_delay.as_millis().max(1) as u64)
            .factor(2)
            .max_delay(Duration::from_secs(30))
            .take(retry.max_retries as usize)
    }

    async fn execute_with_retry<F, Fut, T>(&self, operation_name: &str, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let max_retries = self.config.retry_config.max_retries;
        let timeout_duration = self.config.timeout;
        let mut attempt = 0u32;

        Retry::spawn(self.retry_strategy(), || {
            attempt += 1;
            let current = attempt;
            let fut = operation();
            async move {
                let outcome = match timeout(timeout_duration, fut).await {
                    Ok(result) => result,
                    Err(_) => Err(anyhow::anyhow!(
                        "{} timed out after {:?}",
                        operation_name,
                        timeout_duration
                    )),
                };

                if let Err(e) = &outcome {
                    if current <= max_retries {
                        tracing::warn!(
                            "{} failed (attempt {}/{}): {}. Retrying...",
                            operation_name,
                            current,
                            max_retries + 1,
                            e
                        );
                    } else {
                        tracing::error!(
                            "{} failed after {} attempt(s): {}",
                            operation_name,
                            current,
                            e
                        );
                    }
                }
                outcome
            }
        })
        .await
    }

    pub async fn generate_text(&self, prompt: &str, config: &GenerationConfig) -> Result<String> {
        config.validate()?;

        self.execute_with_retry("Text generation", || {
            self.service.generate_text(prompt, config)
        })
        .await
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.config.retry_config = retry_config;
        self
    }
}
