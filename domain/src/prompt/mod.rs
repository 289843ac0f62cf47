//! Prompt domain
//!
//! Fixed system prompts and user-prompt builders for each debate phase.

mod message;
mod template;

pub use message::{Message, Role};
pub use template::PromptTemplate;
