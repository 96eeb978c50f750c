use std::sync::OnceLock;

use conceptviz_core::rules::DECLARATION_KEYWORDS;
use conceptviz_core::DiagramType;
use regex::Regex;
use tracing::{debug, warn};

/// Topics longer than this are cut (and suffixed with `...`) in the fallback.
pub const FALLBACK_TOPIC_MAX: usize = 50;

/// Substrings that betray a sloppy extraction: a leftover fence or chat filler.
const FILLER_ARTIFACTS: [&str; 3] = ["```", "Here is", "Here's"];

fn declaration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let alternation = DECLARATION_KEYWORDS
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!("^(?:{alternation})")).expect("valid regex")
    })
}

fn mermaid_fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"```mermaid\s*").expect("valid regex"))
}

fn bare_fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"```\s*").expect("valid regex"))
}

/// Result of running model output through the sanitizer.
#[derive(Debug, Clone, PartialEq)]
pub struct SanitizeOutcome {
    pub code: String,
    pub diagram_type: DiagramType,
    /// `true` when the model output was rejected and replaced.
    pub fallback: bool,
}

/// Whether `line` opens a diagram of a recognized type.
pub fn is_diagram_start(line: &str) -> bool {
    declaration_re().is_match(line)
}

/// Remove every ```` ```mermaid ```` opener and bare ```` ``` ```` fence,
/// together with any whitespace that follows them, then trim.
pub fn strip_fences(raw: &str) -> String {
    let without_openers = mermaid_fence_re().replace_all(raw, "");
    bare_fence_re()
        .replace_all(&without_openers, "")
        .trim()
        .to_string()
}

enum Scan {
    SeekingStart,
    InBody(DiagramType),
}

/// Pull the first declared diagram out of fence-free text.
///
/// Lines before the first declaration are dropped, as are blank lines. The
/// body ends at the first declaration of a different type. The declaration
/// line is kept trimmed, body lines keep their indentation.
pub fn extract_diagram(cleaned: &str) -> String {
    let mut out = String::with_capacity(cleaned.len());
    let mut scan = Scan::SeekingStart;

    for line in cleaned.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match scan {
            Scan::SeekingStart => {
                if is_diagram_start(trimmed) {
                    scan = Scan::InBody(DiagramType::from_declaration(trimmed));
                    out.push_str(trimmed);
                    out.push('\n');
                }
            }
            Scan::InBody(kind) => {
                if is_diagram_start(trimmed) && !trimmed.starts_with(kind.canonical()) {
                    debug!(locked = %kind, line = trimmed, "second diagram type, truncating");
                    break;
                }
                out.push_str(line);
                out.push('\n');
            }
        }
    }

    out.trim().to_string()
}

/// Fence stripping followed by extraction. Blank input yields an empty string.
pub fn clean_model_output(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    extract_diagram(&strip_fences(raw))
}

/// A candidate is valid when it opens with a recognized declaration, has a
/// body, and carries no fence or filler artifacts.
pub fn is_valid_diagram(code: &str) -> bool {
    if code.trim().is_empty() {
        return false;
    }

    let first_line = code.lines().next().map(str::trim).unwrap_or("");
    if !is_diagram_start(first_line) {
        return false;
    }

    if code.trim_end().lines().count() < 2 {
        return false;
    }

    !FILLER_ARTIFACTS.iter().any(|a| code.contains(a))
}

/// Topic label for the fallback: cut to [`FALLBACK_TOPIC_MAX`] characters, then
/// neutralize anything the validator would reject. Every rewrite maps one
/// character to one character.
fn fallback_label(topic: &str) -> String {
    let mut label: String = if topic.chars().count() > FALLBACK_TOPIC_MAX {
        let mut cut: String = topic.chars().take(FALLBACK_TOPIC_MAX).collect();
        cut.push_str("...");
        cut
    } else {
        topic.to_string()
    };

    if label.contains(['\n', '\r', '`']) {
        label = label
            .chars()
            .map(|c| match c {
                '\n' | '\r' => ' ',
                '`' => '\'',
                other => other,
            })
            .collect();
    }

    label.replace("Here is", "here is").replace("Here's", "here's")
}

/// The placeholder served whenever model output cannot be used.
///
/// The topic label is cut to 50 characters, and line breaks, backticks and
/// `Here is`/`Here's` are rewritten so the result always validates.
pub fn fallback_diagram(topic: &str) -> String {
    let label = fallback_label(topic);
    format!(
        "graph TD\n    \
         A[{label}] --> B[Understanding]\n    \
         B --> C[Analysis]\n    \
         C --> D[Implementation]\n    \
         D --> E[Results]\n    \
         E --> F[Evaluation]"
    )
}

/// Sanitize and report what happened.
pub fn sanitize_with_outcome(raw: &str, topic: &str) -> SanitizeOutcome {
    let cleaned = clean_model_output(raw);

    if is_valid_diagram(&cleaned) {
        let diagram_type = DiagramType::from_declaration(cleaned.lines().next().unwrap_or(""));
        SanitizeOutcome {
            code: cleaned,
            diagram_type,
            fallback: false,
        }
    } else {
        warn!(topic, "model output failed validation, using fallback diagram");
        SanitizeOutcome {
            code: fallback_diagram(topic),
            diagram_type: DiagramType::Graph,
            fallback: true,
        }
    }
}

/// Turn untrusted model output into renderable Mermaid source. Never fails:
/// unusable output is replaced by [`fallback_diagram`].
pub fn sanitize(raw: &str, topic: &str) -> String {
    sanitize_with_outcome(raw, topic).code
}
