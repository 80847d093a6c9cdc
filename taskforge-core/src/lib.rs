//! # taskforge-core
//!
//! The orchestration core of an LLM-driven task agent. Given a user
//! objective, the [`agent::Agent`] loop repeatedly queries a model through a
//! ranked provider hierarchy, interprets each reply as a thought, tool call,
//! canvas directive, or final answer, executes the requested side effect, and
//! feeds the outcome back into the conversation until a terminal condition is
//! reached.
//!
//! The web server, job queue, concrete tool implementations, and UI are
//! external collaborators consumed through narrow interfaces:
//! [`model::ModelClient`], [`tooling::Tool`], [`agent::InterruptChannel`],
//! and `taskforge_session::SessionStore`.

pub mod agent;
pub mod config;
pub mod model;
pub mod tooling;

pub use taskforge_session as session;

use tracing_subscriber::{EnvFilter, fmt};

/// Initialize tracing once for binaries and tests. Safe to call repeatedly.
pub fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_level(true)
            .init();
    });
}
