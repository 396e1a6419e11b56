//! Language-model side of the bridge
//!
//! GameState -> prompt (`context`) -> raw reply (`client`) -> JSON text (`parser`)

pub mod client;
pub mod context;
pub mod parser;

pub use client::{generate_or_empty, ActionModel, OllamaClient};
pub use context::{build_prompt, PromptLanguage};
pub use parser::extract_json_array;
