use conceptviz_suggest::{fallback_diagram, is_valid_diagram, sanitize, sanitize_with_outcome};

const TOPIC: &str = "Binary search";

#[test]
fn fenced_output_is_unwrapped() {
    let raw = "```mermaid\ngraph TD\n  A-->B\n```";
    let outcome = sanitize_with_outcome(raw, TOPIC);
    assert_eq!(outcome.code, "graph TD\n  A-->B");
    assert!(!outcome.fallback);
}

#[test]
fn leading_prose_is_dropped_and_not_held_against_the_diagram() {
    let raw = "Sure! Here is your diagram:\ngraph TD\n  A-->B";
    assert_eq!(sanitize(raw, TOPIC), "graph TD\n  A-->B");
}

#[test]
fn empty_output_falls_back() {
    let out = sanitize("", TOPIC);
    assert_eq!(out, fallback_diagram(TOPIC));
    assert!(is_valid_diagram(&out));
}

#[test]
fn bare_declaration_falls_back() {
    assert_eq!(sanitize("classDiagram", TOPIC), fallback_diagram(TOPIC));
}

#[test]
fn filler_inside_body_falls_back() {
    let raw = "graph TD\n  A-->B\nHere is the rest of it";
    assert_eq!(sanitize(raw, TOPIC), fallback_diagram(TOPIC));
}

#[test]
fn second_diagram_is_discarded() {
    let raw = "```mermaid\ngraph TD\n  A-->B\n```\n\nAnd a sequence view:\n\n```mermaid\nsequenceDiagram\n  Alice->>Bob: hi\n```";
    let out = sanitize(raw, TOPIC);
    assert!(out.starts_with("graph TD"));
    assert!(!out.contains("sequenceDiagram"));
    assert!(!out.contains("Alice"));
}

#[test]
fn trailing_prose_before_a_second_diagram_is_kept_as_body() {
    // Only a conflicting declaration ends the body; plain lines ride along.
    let raw = "graph TD\n  A-->B\nThat covers it.";
    assert_eq!(sanitize(raw, TOPIC), "graph TD\n  A-->B\nThat covers it.");
}

#[test]
fn output_never_contains_fences() {
    let inputs = [
        "```mermaid\ngantt\n  title Plan\n```",
        "```\n```\n```mermaid\n```",
        "`````mermaid\njourney\n  title Day\n`````",
        "no fences at all",
        "````\nerDiagram\n  A ||--o{ B : has\n````",
    ];
    for raw in inputs {
        let out = sanitize(raw, TOPIC);
        assert!(!out.contains("```"), "{raw:?} -> {out:?}");
        assert!(is_valid_diagram(&out), "{raw:?} -> {out:?}");
    }
}

#[test]
fn state_v1_declaration_is_not_recognized() {
    let raw = "stateDiagram\n  [*] --> Idle";
    assert_eq!(sanitize(raw, TOPIC), fallback_diagram(TOPIC));
}

#[test]
fn crlf_output_is_accepted() {
    let raw = "```mermaid\r\nsequenceDiagram\r\n  Alice->>Bob: hi\r\n```\r\n";
    assert_eq!(sanitize(raw, TOPIC), "sequenceDiagram\n  Alice->>Bob: hi");
}

#[test]
fn fallback_truncation_law() {
    let long = "Distributed consensus algorithms in partially synchronous networks";
    assert!(long.chars().count() > 50);
    let expected = format!("A[{}...]", &long[..50]);
    assert!(fallback_diagram(long).contains(&expected));

    let short = "Raft";
    assert!(fallback_diagram(short).contains("A[Raft] --> B[Understanding]"));
}

#[test]
fn fallback_rewrites_artifacts_in_short_topics() {
    let out = fallback_diagram("Here is `git`\nrebase");
    assert!(out.contains("A[here is 'git' rebase] --> B[Understanding]"));
    assert!(is_valid_diagram(&out));
}
