/// Keywords that may open a diagram. A line declares a diagram when it starts
/// with one of these, case-sensitive, followed by anything.
///
/// Plain `stateDiagram` is not a declaration, only `stateDiagram-v2` is,
/// although both canonicalize to `stateDiagram`.
pub const DECLARATION_KEYWORDS: [&str; 9] = [
    "graph",
    "flowchart",
    "sequenceDiagram",
    "classDiagram",
    "stateDiagram-v2",
    "erDiagram",
    "journey",
    "gantt",
    "gitGraph",
];

/// Diagram-type guidance for the generation prompt.
pub const DIAGRAM_GUIDANCE: &str = "\
- graph TD or graph LR: For processes, workflows, hierarchies, general concepts\n\
- sequenceDiagram: For API calls, interactions, communications between entities\n\
- classDiagram: For OOP concepts, data structures, class relationships\n\
- stateDiagram-v2: For state machines, lifecycles, state transitions\n\
- erDiagram: For database schemas, entity relationships\n\
- journey: For user journeys, customer experiences\n\
- gantt: For timelines, project schedules, roadmaps";
