//! Tactics LLM Bridge - lets a local language model play the enemy side
//! of a turn-based tactics game

pub mod core;
pub mod llm;
pub mod turn;
