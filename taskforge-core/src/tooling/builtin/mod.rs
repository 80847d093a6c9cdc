//! Tools that ship with the core.

pub mod summarize;

pub use summarize::{SUMMARIZE_TOOL_NAME, SummarizeTool};
