//! Agent-level errors.
//!
//! Almost everything that goes wrong inside a run is data the loop feeds back
//! to the model. The variants here are the exceptions that genuinely abort.

use thiserror::Error;

use super::compactor::CompactionError;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("no model providers are configured")]
    NoProviders,
    #[error(transparent)]
    Compaction(#[from] CompactionError),
}
