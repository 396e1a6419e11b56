//! Build the enemy-turn prompt from the game state
//!
//! The prompt lists every unit on the board and pins down the exact JSON
//! shape the game engine parses. Ids and coordinates are inserted as-is;
//! the game writes well-formed ids so nothing is escaped.

use crate::core::types::GameState;
use std::fmt;
use std::str::FromStr;

/// Language of the fixed prompt text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PromptLanguage {
    /// The game's native language
    #[default]
    Japanese,
    English,
}

impl FromStr for PromptLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ja" | "jp" | "japanese" => Ok(Self::Japanese),
            "en" | "english" => Ok(Self::English),
            other => Err(format!("unknown prompt language: {:?} (expected ja or en)", other)),
        }
    }
}

impl fmt::Display for PromptLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Japanese => f.write_str("ja"),
            Self::English => f.write_str("en"),
        }
    }
}

/// Fixed text blocks for one language
struct PromptText {
    preamble: &'static str,
    state_heading: &'static str,
    enemies_heading: &'static str,
    allies_heading: &'static str,
    position: &'static str,
    format_heading: &'static str,
    format_instruction: &'static str,
    example_label: &'static str,
    answer_cue: &'static str,
}

static JAPANESE: PromptText = PromptText {
    preamble: "あなたはファイアーエムブレム風の戦術シミュレーションゲームのAIです。\n\
               以下の敵ユニットと味方ユニットの情報に基づいて、敵ユニットの行動（移動・攻撃）を決定してください。\n\
               出力は**必ずJSON形式のみ**とし、余計な説明や前後のテキストは一切含めないでください。\n\
               複数の行動がある場合はJSON配列としてください。\n",
    state_heading: "### 現在のゲーム状態 ###",
    enemies_heading: "敵ユニット:",
    allies_heading: "味方ユニット:",
    position: "位置",
    format_heading: "### 出力形式の指示 ###",
    format_instruction: "以下のようなJSON配列の形式で、敵ユニットの行動を出力してください。\
                         **これ以外のテキストは含めないでください。**",
    example_label: "例: ",
    answer_cue: "あなたの回答:",
};

static ENGLISH: PromptText = PromptText {
    preamble: "You are the AI of a Fire Emblem style tactics simulation game.\n\
               Decide the actions (move or attack) of the enemy units based on the enemy and ally units below.\n\
               Output **JSON only**. Do not include any explanation or text before or after it.\n\
               If there are several actions, output them as a JSON array.\n",
    state_heading: "### Current game state ###",
    enemies_heading: "Enemy units:",
    allies_heading: "Ally units:",
    position: "position",
    format_heading: "### Output format ###",
    format_instruction: "Output the enemy unit actions as a JSON array like the one below. \
                         **Do not include any other text.**",
    example_label: "Example: ",
    answer_cue: "Your answer:",
};

/// Example block shown to the model; this is the shape the game parses
pub const EXAMPLE_ACTIONS: &str = r#"```json
[
  {"unit": "enemy1", "action": "move", "to": [6,3]},
  {"unit": "enemy1", "action": "attack", "target": "ally1"}
]
```"#;

impl PromptLanguage {
    fn text(self) -> &'static PromptText {
        match self {
            Self::Japanese => &JAPANESE,
            Self::English => &ENGLISH,
        }
    }
}

/// Build the instruction prompt for one enemy turn
///
/// Enemies are listed before allies, each in input order.
pub fn build_prompt(state: &GameState, language: PromptLanguage) -> String {
    let text = language.text();
    let mut s = String::new();

    s.push_str(text.preamble);
    s.push('\n');

    s.push_str(text.state_heading);
    s.push('\n');

    s.push_str(text.enemies_heading);
    s.push('\n');
    for enemy in &state.enemies {
        s.push_str(&format!(
            "- id: {}, {}: ({},{})\n",
            enemy.id, text.position, enemy.x, enemy.y
        ));
    }

    s.push_str(text.allies_heading);
    s.push('\n');
    for ally in &state.allies {
        s.push_str(&format!(
            "- id: {}, {}: ({},{}), HP: {}\n",
            ally.id, text.position, ally.x, ally.y, ally.hp
        ));
    }

    s.push('\n');
    s.push_str(text.format_heading);
    s.push('\n');
    s.push_str(text.format_instruction);
    s.push('\n');
    s.push_str(text.example_label);
    s.push('\n');
    s.push_str(EXAMPLE_ACTIONS);
    s.push('\n');

    s.push('\n');
    s.push_str(text.answer_cue);
    s.push('\n');

    s
}
