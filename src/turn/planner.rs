//! Enemy turn planning - game state file in, action JSON out
//!
//! Every step returns a `Result`; only `render_outcome` collapses an
//! error into the empty action list the game expects.

use crate::core::config::BridgeConfig;
use crate::core::error::{BridgeError, Result};
use crate::core::types::GameState;
use crate::llm::client::{generate_or_empty, ActionModel, OllamaClient};
use crate::llm::context::{build_prompt, PromptLanguage};
use crate::llm::parser::{extract_json_array, parse_actions, EMPTY_ACTIONS};
use serde_json::Value;
use std::io::Write;
use std::panic::{self, UnwindSafe};
use std::path::Path;

/// Drives one enemy turn through prompt, model and extraction
pub struct TurnPlanner<M> {
    model: M,
    language: PromptLanguage,
}

impl<M: ActionModel> TurnPlanner<M> {
    pub fn new(model: M, language: PromptLanguage) -> Self {
        Self { model, language }
    }

    /// Plan a turn for the game state stored at `path`
    pub async fn plan_from_file(&self, path: &Path) -> Result<Value> {
        let state = load_game_state(path)?;
        self.plan(&state).await
    }

    /// Plan a turn for an already loaded game state
    ///
    /// A failed model call is not an error here: it degrades to an empty
    /// reply, which extracts to `[]`.
    pub async fn plan(&self, state: &GameState) -> Result<Value> {
        let prompt = build_prompt(state, self.language);
        tracing::debug!(prompt = %prompt, "Built prompt");

        tracing::debug!("Calling model...");
        let raw = generate_or_empty(&self.model, &prompt).await;
        tracing::debug!(raw = %raw, "Model raw response");

        let candidate = extract_json_array(&raw);
        tracing::debug!(candidate = %candidate, "Extracted JSON");

        let actions: Value = serde_json::from_str(&candidate).map_err(|e| {
            BridgeError::InvalidActions(format!("{} - extracted text: {}", e, candidate))
        })?;

        log_actions(&candidate);
        Ok(actions)
    }
}

/// Read and parse the game-state file
pub fn load_game_state(path: &Path) -> Result<GameState> {
    if !path.exists() {
        return Err(BridgeError::InputNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), input = %content, "Read game state");

    let state: GameState =
        serde_json::from_str(&content).map_err(BridgeError::InvalidGameState)?;
    tracing::debug!(
        units = state.unit_count(),
        allies = state.allies.len(),
        enemies = state.enemies.len(),
        "Parsed game state"
    );

    Ok(state)
}

/// Collapse a planning outcome into the single line printed for the game
pub fn render_outcome(outcome: Result<Value>) -> String {
    match outcome {
        Ok(actions) => {
            serde_json::to_string(&actions).unwrap_or_else(|_| EMPTY_ACTIONS.to_string())
        }
        Err(e) => {
            tracing::error!(error = %e, "Turn planning failed, sending no actions");
            EMPTY_ACTIONS.to_string()
        }
    }
}

/// Plan one turn with the live model client described by `config`
///
/// Never fails: whatever goes wrong ends up as `[]`.
pub fn run(config: &BridgeConfig) -> String {
    render_outcome(plan_with_config(config))
}

/// Run `plan`, turning a panic into the empty action list
pub fn run_guarded<F>(plan: F) -> String
where
    F: FnOnce() -> String + UnwindSafe,
{
    match panic::catch_unwind(plan) {
        Ok(line) => line,
        Err(_) => {
            tracing::error!("Turn planning panicked, sending no actions");
            EMPTY_ACTIONS.to_string()
        }
    }
}

/// Write the output line for the game
///
/// A closed or broken stdout is logged instead of aborting the process.
pub fn write_line<W: Write>(out: &mut W, line: &str) {
    if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
        tracing::error!(error = %e, "Could not write actions to stdout");
    }
}

fn plan_with_config(config: &BridgeConfig) -> Result<Value> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let client = OllamaClient::from_config(config)?;
    tracing::info!(
        input = %config.input_path.display(),
        endpoint = %client.endpoint(),
        model = %client.model(),
        "Planning enemy turn"
    );
    let planner = TurnPlanner::new(client, config.language);

    runtime.block_on(planner.plan_from_file(&config.input_path))
}

fn log_actions(candidate: &str) {
    match parse_actions(candidate) {
        Ok(commands) => {
            tracing::info!(count = commands.len(), "Model decided actions");
            for command in &commands {
                tracing::debug!("  {}", command);
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Actions do not match the expected command shape");
        }
    }
}
