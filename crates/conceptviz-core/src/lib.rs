pub mod rules;
pub mod telemetry;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// --- Errors ---

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("topic is required")]
    BlankTopic,

    #[error("topic must not exceed {max} characters (got {len})")]
    TopicTooLong { len: usize, max: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;

// --- Diagram types ---

/// Grammar family of a Mermaid snippet, identified by its first-line keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagramType {
    #[serde(rename = "graph")]
    Graph,
    #[serde(rename = "sequenceDiagram")]
    Sequence,
    #[serde(rename = "classDiagram")]
    Class,
    #[serde(rename = "stateDiagram")]
    State,
    #[serde(rename = "erDiagram")]
    Er,
    #[serde(rename = "journey")]
    Journey,
    #[serde(rename = "gantt")]
    Gantt,
    #[serde(rename = "gitGraph")]
    GitGraph,
}

impl DiagramType {
    /// Canonicalize a declaration line. `flowchart` folds into `graph`, every
    /// `stateDiagram` variant into `stateDiagram`, and anything unrecognized
    /// defaults to `graph`.
    pub fn from_declaration(line: &str) -> Self {
        if line.starts_with("graph") || line.starts_with("flowchart") {
            DiagramType::Graph
        } else if line.starts_with("sequenceDiagram") {
            DiagramType::Sequence
        } else if line.starts_with("classDiagram") {
            DiagramType::Class
        } else if line.starts_with("stateDiagram") {
            DiagramType::State
        } else if line.starts_with("erDiagram") {
            DiagramType::Er
        } else if line.starts_with("journey") {
            DiagramType::Journey
        } else if line.starts_with("gantt") {
            DiagramType::Gantt
        } else if line.starts_with("gitGraph") {
            DiagramType::GitGraph
        } else {
            DiagramType::Graph
        }
    }

    /// The canonical prefix. A later declaration that does not start with it
    /// belongs to a different diagram.
    pub fn canonical(&self) -> &'static str {
        match self {
            DiagramType::Graph => "graph",
            DiagramType::Sequence => "sequenceDiagram",
            DiagramType::Class => "classDiagram",
            DiagramType::State => "stateDiagram",
            DiagramType::Er => "erDiagram",
            DiagramType::Journey => "journey",
            DiagramType::Gantt => "gantt",
            DiagramType::GitGraph => "gitGraph",
        }
    }
}

impl fmt::Display for DiagramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical())
    }
}

// --- Request / response ---

pub const MAX_TOPIC_LEN: usize = 500;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramRequest {
    pub topic: String,
}

impl DiagramRequest {
    pub fn new(topic: impl Into<String>) -> Self {
        Self { topic: topic.into() }
    }

    /// Reject blank topics and topics longer than [`MAX_TOPIC_LEN`] characters.
    pub fn validate(&self) -> Result<()> {
        if self.topic.trim().is_empty() {
            return Err(CoreError::BlankTopic);
        }
        let len = self.topic.chars().count();
        if len > MAX_TOPIC_LEN {
            return Err(CoreError::TopicTooLong {
                len,
                max: MAX_TOPIC_LEN,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiagramResponse {
    pub topic: String,
    pub mermaid_code: String,
}

// --- AI Settings ---

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AiSettings {
    pub provider: String,
    pub api_key: String,
    pub model: String,
}

impl AiSettings {
    /// Apply `CONCEPTVIZ_API_KEY` on top of the stored key, if set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var("CONCEPTVIZ_API_KEY") {
            if !key.is_empty() {
                self.api_key = key;
            }
        }
        self
    }

    /// Settings as shown to a user. The API key is reduced to whether it is set.
    pub fn masked(&self) -> serde_json::Value {
        serde_json::json!({
            "provider": self.provider,
            "model": self.model,
            "hasKey": !self.api_key.is_empty(),
            "configured": ai_configured(self),
        })
    }
}

/// Resolve the config directory (`$CONCEPTVIZ_HOME`, else `~/.conceptviz/`).
pub fn config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("CONCEPTVIZ_HOME") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".conceptviz")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn read_settings() -> AiSettings {
    read_settings_from(&settings_path()).with_env_overrides()
}

/// Missing or unreadable settings fall back to defaults.
pub fn read_settings_from(path: &Path) -> AiSettings {
    if !path.exists() {
        return AiSettings::default();
    }
    fs::read_to_string(path)
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

pub fn write_settings(settings: &AiSettings) -> Result<()> {
    write_settings_to(&settings_path(), settings)
}

pub fn write_settings_to(path: &Path, settings: &AiSettings) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn ai_configured(settings: &AiSettings) -> bool {
    !settings.provider.is_empty()
        && !settings.model.is_empty()
        && (settings.provider == "ollama" || !settings.api_key.is_empty())
}
