//! Tool layer: the capability contract, the registry the master prompt is
//! built from, and the dispatcher that turns model commands into outcomes.

pub mod builtin;
pub mod context;
pub mod dispatcher;
pub mod interface;
pub mod registry;

pub use context::ToolContext;
pub use dispatcher::ToolDispatcher;
pub use interface::{ParamKind, ParamSpec, Tool, ToolError, ToolOutcome};
pub use registry::{RegistryError, ToolRegistry};
