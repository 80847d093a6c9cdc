//! Master prompt assembly.

use crate::tooling::ToolRegistry;

/// Re-prompt text appended as a user message after a malformed reply.
pub const CORRECTIVE_INSTRUCTION: &str =
    "You must provide a command, a thought, a canvas output, or a final answer.";

/// Compose the system instructions for one run: the operator's base prompt
/// (when configured), the JSON reply contract, and the tool catalog.
pub fn master_prompt(base: Option<&str>, registry: &ToolRegistry) -> String {
    let mut lines = Vec::new();

    if let Some(base) = base {
        let base = base.trim();
        if !base.is_empty() {
            lines.push(base.to_string());
        }
    }

    lines.push(
        "You are an autonomous agent that solves the user's objective step by step."
            .to_string(),
    );
    lines.push(
        "Every reply must be a single JSON object. Do not add commentary or code fences."
            .to_string(),
    );
    lines.push(
        "The object may contain: \"thought\" (your reasoning, string), \"command\" \
         (a tool call: {\"name\": \"tool_name\", \"params\": {...}}), \"canvas\" \
         (content to display: {\"content\": \"...\", \"contentType\": \
         \"html\"|\"markdown\"|\"text\"|\"url\"}), or \"answer\" (your final \
         answer, string)."
            .to_string(),
    );
    lines.push(
        "Use \"thought\" alone to plan, \"command\" to act, and \"answer\" only when \
         the objective is complete. A canvas output or an answer ends the run."
            .to_string(),
    );

    if registry.is_empty() {
        lines.push("No tools are currently available.".to_string());
    } else {
        lines.push("Available tools:".to_string());
        lines.push(registry.catalog());
    }

    lines.join("\n")
}
