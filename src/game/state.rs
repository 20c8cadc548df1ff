//! Session state and feedback cue capability
//!
//! All state that drives the presentation lives here. The state owns its RNG
//! so a whole session is reproducible from the logged seed.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::question::Question;
use crate::consts::*;

/// Which screen is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Title screen, entry point
    #[default]
    Welcome,
    /// Active round
    Playing,
    /// Run ended, lives exhausted
    GameOver,
}

/// Answer feedback sequencer state
///
/// `Idle -> Moving -> Settling -> Idle`. The result (score/lives update) is
/// applied on the Moving->Settling edge. While non-idle, further selections
/// are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnswerPhase {
    /// No answer in flight
    #[default]
    Idle,
    /// Car sliding to the chosen lane, result not yet revealed
    Moving { ticks_left: u32 },
    /// Result shown, waiting before the next question or game over
    Settling { ticks_left: u32 },
}

impl AnswerPhase {
    pub fn is_idle(&self) -> bool {
        matches!(self, AnswerPhase::Idle)
    }
}

/// Outcome of the most recent selection, kept for highlight rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerStatus {
    pub correct: bool,
    /// Lane that was selected
    pub lane: usize,
}

/// Audio feedback cue vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Button press
    Click,
    /// Car starts moving to a lane
    Move,
    /// Correct answer revealed
    Correct,
    /// Wrong answer revealed
    Incorrect,
    /// Lives exhausted
    GameOver,
}

/// Fire-and-forget sink for feedback cues
///
/// The core never learns whether a cue was actually played; any backend
/// (Web Audio, a recording Vec in tests, or nothing at all) can stand in.
pub trait CueSink {
    fn emit(&mut self, cue: Cue);
}

/// Recording sink for tests
impl CueSink for Vec<Cue> {
    fn emit(&mut self, cue: Cue) {
        self.push(cue);
    }
}

/// Sink that discards every cue
pub struct NullCues;

impl CueSink for NullCues {
    fn emit(&mut self, _cue: Cue) {}
}

/// Complete session state (deterministic)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Active screen
    pub screen: Screen,
    /// Current score
    pub score: u32,
    /// Remaining lives
    pub lives: u8,
    /// Current question, present while Playing
    pub question: Option<Question>,
    /// Lane the car occupies
    pub car_lane: usize,
    /// Feedback sequencer state
    pub phase: AnswerPhase,
    /// Outcome of the last selection, cleared on each new question
    pub last_answer: Option<AnswerStatus>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Session RNG
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a fresh session on the welcome screen
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            screen: Screen::Welcome,
            score: 0,
            lives: STARTING_LIVES,
            question: None,
            car_lane: DEFAULT_LANE,
            phase: AnswerPhase::Idle,
            last_answer: None,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// True while a feedback sequence is in flight
    pub fn is_animating(&self) -> bool {
        !self.phase.is_idle()
    }

    /// Reset score, lives and the feedback sequencer
    ///
    /// Setting the phase back to Idle also cancels any in-flight answer
    /// sequence; there are no host timers that could fire afterwards.
    pub fn reset_session(&mut self) {
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.car_lane = DEFAULT_LANE;
        self.phase = AnswerPhase::Idle;
        self.last_answer = None;
    }

    /// Replace the current question and clear the last answer highlight
    pub fn next_question(&mut self) {
        self.question = Some(Question::generate(&mut self.rng));
        self.last_answer = None;
    }
}
