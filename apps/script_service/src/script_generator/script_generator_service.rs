use std::sync::Arc;

use script_llm::{GenerationConfig, LLMClient};
use serde::Serialize;

use super::{form::ScriptForm, prompt::ScriptPrompt};

/// Average narration pace used for the duration estimate.
pub const WORDS_PER_MINUTE: usize = 150;

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedScript {
    pub script: String,
    pub word_count: usize,
    pub estimated_duration_minutes: usize,
    pub prompt: String,
}

impl GeneratedScript {
    fn new(script: String, prompt: String) -> Self {
        let word_count = word_count(&script);
        Self {
            script,
            word_count,
            estimated_duration_minutes: estimated_duration_minutes(word_count),
            prompt,
        }
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn estimated_duration_minutes(word_count: usize) -> usize {
    word_count / WORDS_PER_MINUTE
}

#[derive(Clone)]
pub struct ScriptGeneratorService {
    llm_client: Arc<LLMClient>,
}

impl ScriptGeneratorService {
    pub fn new(llm_client: Arc<LLMClient>) -> Self {
        Self { llm_client }
    }

    /// Model failures come back as an `Error: <message>` script rather than an `Err`.
    pub async fn generate(&self, form: &ScriptForm, config: &GenerationConfig) -> GeneratedScript {
        let prompt = ScriptPrompt::build(form);

        let script = match self.llm_client.generate_text(&prompt, config).await {
            Ok(text) => {
                tracing::info!(
                    template = %form.template,
                    words = word_count(&text),
                    "Generated script"
                );
                text
            }
            Err(e) => {
                tracing::error!("Error generating script: {:#}", e);
                format!("Error: {:#}", e)
            }
        };

        GeneratedScript::new(script, prompt)
    }
}
