//! # Session Data Model
//!
//! Conversation state shared between the agent loop and its callers. A
//! [`Session`] owns an ordered message history plus the name of the model
//! provider that last served it. The loop appends messages and updates the
//! active provider; it never deletes a session — loading and saving belong
//! to the owning [`SessionStore`].

mod message;
mod session;
mod store;

pub use message::{CanvasContentType, Message, MessagePayload};
pub use session::{Identity, Session};
pub use store::{MemoryStore, SessionStore, StoreError};
