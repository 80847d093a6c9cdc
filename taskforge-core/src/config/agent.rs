//! Agent loop tuning knobs.
//!
//! The repetition-similarity threshold and the malformed retry limit are
//! empirically tuned values, so they are settings rather than constants.

use std::time::Duration;

use serde::Deserialize;

/// Settings that bound one agent run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Hard cap on loop iterations (each iteration is at most one LLM call).
    pub max_iterations: usize,
    /// Consecutive malformed model replies tolerated before giving up.
    pub malformed_limit: u32,
    /// Depth of the behavior-fingerprint ring used for loop detection.
    pub max_behavior_history: usize,
    /// Consecutive near-identical steps tolerated before the run is stopped.
    pub loop_detection_threshold: u32,
    /// Token-overlap similarity at or above which two fingerprints match.
    pub similarity_threshold: f64,
    /// History length that triggers compaction at the end of a run.
    pub history_max_length: usize,
    /// Upper bound on one LLM call, in seconds.
    pub llm_timeout_secs: u64,
    /// Upper bound on one tool execution, in seconds.
    pub tool_timeout_secs: u64,
    /// Tool outputs longer than this are truncated before entering history.
    pub tool_output_cap: usize,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            malformed_limit: 3,
            max_behavior_history: 5,
            loop_detection_threshold: 2,
            similarity_threshold: 0.9,
            history_max_length: 1000,
            llm_timeout_secs: 120,
            tool_timeout_secs: 300,
            tool_output_cap: 5000,
        }
    }
}

impl AgentSettings {
    /// Messages kept verbatim when compaction replaces the older prefix.
    /// One slot is reserved for the summary message, so a compacted history
    /// lands exactly on `history_max_length`.
    pub fn keep_tail(&self) -> usize {
        self.history_max_length.saturating_sub(1)
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }

    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }
}
