//! Deterministic game core
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (the timed feedback phases are tick counters)
//! - Seeded RNG only
//! - Feedback cues go through the `CueSink` capability, never a real device
//! - No rendering or platform dependencies

pub mod question;
pub mod state;
pub mod tick;

pub use question::{Op, Question};
pub use state::{AnswerPhase, AnswerStatus, Cue, CueSink, GameState, NullCues, Screen};
pub use tick::{TickInput, tick};
