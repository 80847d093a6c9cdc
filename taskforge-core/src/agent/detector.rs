//! Behavior loop detection.
//!
//! Each dispatched step is reduced to a fingerprint; when consecutive
//! fingerprints stay near-identical past a threshold, the run is stuck and
//! gets terminated instead of burning iterations on the same action.

use std::collections::{HashSet, VecDeque};

use tracing::warn;

use super::intent::Command;
use crate::config::AgentSettings;

/// Per-run repetition tracker. Never persisted; a new run starts clean.
pub struct LoopDetector {
    fingerprints: VecDeque<String>,
    max_history: usize,
    similarity_threshold: f64,
    repetition_limit: u32,
    consecutive_repeats: u32,
}

impl LoopDetector {
    pub fn new(settings: &AgentSettings) -> Self {
        Self {
            fingerprints: VecDeque::with_capacity(settings.max_behavior_history),
            max_history: settings.max_behavior_history,
            similarity_threshold: settings.similarity_threshold,
            repetition_limit: settings.loop_detection_threshold,
            consecutive_repeats: 0,
        }
    }

    /// Record one step; returns true when the run should terminate for
    /// repetition.
    pub fn observe(&mut self, thought: Option<&str>, command: Option<&Command>) -> bool {
        let fingerprint = fingerprint(thought, command);

        if let Some(previous) = self.fingerprints.back() {
            let similarity = token_similarity(previous, &fingerprint);
            if similarity >= self.similarity_threshold {
                self.consecutive_repeats += 1;
            } else {
                self.consecutive_repeats = 0;
            }
        }

        if self.fingerprints.len() == self.max_history {
            self.fingerprints.pop_front();
        }
        self.fingerprints.push_back(fingerprint);

        if self.consecutive_repeats > self.repetition_limit {
            warn!(
                repeats = self.consecutive_repeats,
                "Repetitive behavior detected, stopping the run"
            );
            return true;
        }
        false
    }
}

/// Normalized text identity of one step. Canonical JSON for params so key
/// order cannot defeat the comparison.
fn fingerprint(thought: Option<&str>, command: Option<&Command>) -> String {
    let mut parts = Vec::new();
    if let Some(thought) = thought {
        parts.push(thought.trim().to_lowercase());
    }
    if let Some(command) = command {
        parts.push(command.name.clone());
        // serde_json::Map preserves insertion order; sort keys for a
        // canonical form.
        let mut entries: Vec<_> = command.params.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        for (key, value) in entries {
            parts.push(format!("{key}={value}"));
        }
    }
    parts.join(" ")
}

/// Jaccard overlap over whitespace tokens.
fn token_similarity(a: &str, b: &str) -> f64 {
    let tokens_a: HashSet<&str> = a.split_whitespace().collect();
    let tokens_b: HashSet<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() && tokens_b.is_empty() {
        return 1.0;
    }
    let intersection = tokens_a.intersection(&tokens_b).count();
    let union = tokens_a.union(&tokens_b).count();
    intersection as f64 / union as f64
}
