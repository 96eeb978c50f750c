pub mod engine;
mod prompt;
pub mod sanitize;

use conceptviz_core::{AiSettings, DiagramResponse};
use tracing::{debug, error, info};

pub use engine::GenerateError;
pub use sanitize::{
    clean_model_output, extract_diagram, fallback_diagram, is_diagram_start, is_valid_diagram,
    sanitize, sanitize_with_outcome, strip_fences, SanitizeOutcome,
};

/// Ask the configured model for a diagram of `topic`. Always returns a
/// renderable diagram: model errors and unusable output yield the fallback.
pub async fn generate_diagram(topic: &str, settings: &AiSettings) -> DiagramResponse {
    let system = prompt::system_prompt();
    let user_msg = prompt::user_message(topic);

    info!(provider = %settings.provider, model = %settings.model, topic, "generating diagram");

    let result = engine::generate(settings, &system, &user_msg).await;
    DiagramResponse {
        topic: topic.to_string(),
        mermaid_code: resolve_output(topic, result),
    }
}

/// Map the outcome of the model call to diagram source.
pub fn resolve_output(topic: &str, result: Result<String, GenerateError>) -> String {
    match result {
        Ok(raw) => {
            debug!(raw = %raw, "raw model output");
            let outcome = sanitize_with_outcome(&raw, topic);
            if !outcome.fallback {
                info!(diagram_type = %outcome.diagram_type, "generated diagram");
            }
            outcome.code
        }
        Err(e) => {
            error!(error = %e, "diagram generation failed, using fallback diagram");
            fallback_diagram(topic)
        }
    }
}
