//! The agent: orchestration loop and its supporting pieces.

pub mod compactor;
pub mod detector;
pub mod errors;
pub mod events;
pub mod intent;
pub mod interrupt;
pub mod parser;
pub mod prompt;
pub mod runner;

pub use compactor::{CompactionError, HistoryCompactor};
pub use detector::LoopDetector;
pub use errors::AgentError;
pub use events::{AgentEvent, EventSink};
pub use intent::{CanvasDirective, Command, ParsedIntent};
pub use interrupt::{InterruptChannel, InterruptToken, spawn_interrupt_listener};
pub use prompt::{CORRECTIVE_INSTRUCTION, master_prompt};
pub use runner::{Agent, RunOutcome, Termination};
