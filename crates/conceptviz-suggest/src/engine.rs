use llm::builder::{LLMBackend, LLMBuilder};
use llm::chat::ChatMessage;

use conceptviz_core::AiSettings;

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// Provider name outside the supported backend table.
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    /// The client could not be configured (bad model, missing key).
    #[error("build LLM: {0}")]
    Build(String),

    /// Transport or API failure during the request.
    #[error("chat: {0}")]
    Chat(String),

    /// The model answered with whitespace only.
    #[error("LLM returned empty text")]
    EmptyResponse,

    #[error("LLM returned no text")]
    NoText,
}

fn map_backend(provider: &str) -> Result<LLMBackend, GenerateError> {
    match provider {
        "openai" => Ok(LLMBackend::OpenAI),
        "anthropic" => Ok(LLMBackend::Anthropic),
        "google" => Ok(LLMBackend::Google),
        "ollama" => Ok(LLMBackend::Ollama),
        "groq" => Ok(LLMBackend::Groq),
        "mistral" => Ok(LLMBackend::Mistral),
        "deepseek" => Ok(LLMBackend::DeepSeek),
        other => Err(GenerateError::UnknownProvider(other.to_string())),
    }
}

/// Single chat round-trip. No retries.
pub async fn generate(
    settings: &AiSettings,
    system: &str,
    user_msg: &str,
) -> Result<String, GenerateError> {
    let backend = map_backend(&settings.provider)?;

    let mut builder = LLMBuilder::new()
        .backend(backend)
        .model(&settings.model)
        .system(system);

    if !settings.api_key.is_empty() {
        builder = builder.api_key(&settings.api_key);
    }

    let llm = builder
        .build()
        .map_err(|e| GenerateError::Build(e.to_string()))?;

    let messages = vec![ChatMessage::user().content(user_msg).build()];

    let response = llm
        .chat(&messages)
        .await
        .map_err(|e| GenerateError::Chat(e.to_string()))?;

    match response.text() {
        Some(text) if !text.trim().is_empty() => Ok(text),
        Some(_) => Err(GenerateError::EmptyResponse),
        None => Err(GenerateError::NoText),
    }
}
