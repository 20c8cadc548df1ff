//! Math Racers - a lane-based arithmetic racing quiz
//!
//! Core modules:
//! - `game`: Deterministic game core (questions, session state, sequencing)
//! - `audio`: Web Audio sound synthesis (wasm only)
//! - `settings`: Persisted player preferences

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod game;
pub mod settings;

pub use game::{Cue, CueSink, GameState, Question, Screen, TickInput, tick};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz is plenty for a UI-paced game)
    pub const TICK_HZ: u32 = 60;
    /// Timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Number of lanes (and answer options) on the road
    pub const LANE_COUNT: usize = 3;
    /// Lane the car starts in (middle)
    pub const DEFAULT_LANE: usize = 1;

    /// Lives at the start of a round
    pub const STARTING_LIVES: u8 = 3;
    /// Points awarded for a correct answer
    pub const CORRECT_REWARD: u32 = 10;

    /// Operand range for generated questions (inclusive)
    pub const OPERAND_MIN: i32 = 1;
    pub const OPERAND_MAX: i32 = 9;
    /// Distractors are drawn within this distance of the correct answer
    pub const DISTRACTOR_SPREAD: i32 = 4;
    /// Draws allowed before the distractor spread is widened
    pub const DISTRACTOR_RETRY_BUDGET: u32 = 32;

    /// Car-move phase duration (selection until the result is revealed)
    pub const MOVE_PHASE_MS: u32 = 600;
    /// Settle phase duration (result shown until the next question)
    pub const SETTLE_PHASE_MS: u32 = 800;

    /// Convert a millisecond duration to whole simulation ticks
    pub const fn ms_to_ticks(ms: u32) -> u32 {
        ms * TICK_HZ / 1000
    }

    /// Move phase in ticks
    pub const MOVE_PHASE_TICKS: u32 = ms_to_ticks(MOVE_PHASE_MS);
    /// Settle phase in ticks
    pub const SETTLE_PHASE_TICKS: u32 = ms_to_ticks(SETTLE_PHASE_MS);
}
