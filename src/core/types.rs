//! Core type definitions shared by the prompt builder and the planner

use serde::{Deserialize, Serialize};
use std::fmt;

/// Grid coordinate pair as written by the game (`[x, y]`)
pub type GridPos = [i32; 2];

/// Snapshot of the battlefield handed over by the game engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub allies: Vec<AllyUnit>,
    pub enemies: Vec<EnemyUnit>,
}

/// A player-controlled unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllyUnit {
    pub id: String,
    pub x: i32,
    pub y: i32,
    pub hp: i32,
}

/// A unit whose turn the model decides
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyUnit {
    pub id: String,
    pub x: i32,
    pub y: i32,
}

impl GameState {
    pub fn unit_count(&self) -> usize {
        self.allies.len() + self.enemies.len()
    }
}

/// Kind of action a unit takes
///
/// Anything other than `move` or `attack` is kept verbatim so that
/// decoding never rejects a verb the model made up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionKind {
    Move,
    Attack,
    Other(String),
}

impl From<String> for ActionKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "move" => Self::Move,
            "attack" => Self::Attack,
            _ => Self::Other(value),
        }
    }
}

impl From<ActionKind> for String {
    fn from(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Move => "move".into(),
            ActionKind::Attack => "attack".into(),
            ActionKind::Other(verb) => verb,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move => f.write_str("move"),
            Self::Attack => f.write_str("attack"),
            Self::Other(verb) => f.write_str(verb),
        }
    }
}

/// One unit action decided by the model
///
/// Not checked against the game state: `target` may name a unit that
/// does not exist. Fields the model adds beyond the known ones are kept
/// in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionCommand {
    pub unit: String,
    pub action: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<GridPos>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl fmt::Display for ActionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.unit, self.action)?;
        if let Some([x, y]) = self.to {
            write!(f, " -> ({},{})", x, y)?;
        }
        if let Some(target) = &self.target {
            write!(f, " -> {}", target)?;
        }
        Ok(())
    }
}
