//! Enemy turn pipeline:
//! game state file -> prompt -> model reply -> extracted JSON -> stdout line

pub mod planner;

pub use planner::{load_game_state, render_outcome, run, run_guarded, write_line, TurnPlanner};
