//! Fixed timestep game tick
//!
//! Screen controller and answer sequencer. The two timed feedback phases
//! (car move, result settle) are tick counters in `AnswerPhase`, so tests
//! drive time by calling `tick` directly and no host timers exist that a
//! reset could race against.

use super::state::{AnswerPhase, AnswerStatus, Cue, CueSink, GameState, Screen};
use crate::consts::*;

/// Input actions for a single tick (one-shot, cleared by the caller)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Start a round from the welcome screen
    pub start: bool,
    /// Pick a lane/answer while playing
    pub select_lane: Option<usize>,
    /// Reset the current round in place
    pub restart_round: bool,
    /// Leave to the welcome screen
    pub exit_to_welcome: bool,
    /// Start a new round from the game-over screen
    pub play_again: bool,
}

/// Advance the game state by one fixed timestep
///
/// Timers advance before this tick's input is applied, so a phase started by
/// the input gets its full duration.
pub fn tick(state: &mut GameState, input: &TickInput, cues: &mut impl CueSink) {
    state.time_ticks += 1;
    advance_phase(state, cues);
    handle_input(state, input, cues);
}

/// Count down the in-flight feedback phase, if any
fn advance_phase(state: &mut GameState, cues: &mut impl CueSink) {
    match state.phase {
        AnswerPhase::Idle => {}
        AnswerPhase::Moving { ticks_left } => {
            let ticks_left = ticks_left - 1;
            if ticks_left == 0 {
                resolve_answer(state, cues);
            } else {
                state.phase = AnswerPhase::Moving { ticks_left };
            }
        }
        AnswerPhase::Settling { ticks_left } => {
            let ticks_left = ticks_left - 1;
            if ticks_left == 0 {
                settle_answer(state, cues);
            } else {
                state.phase = AnswerPhase::Settling { ticks_left };
            }
        }
    }
}

/// Apply screen-scoped actions
fn handle_input(state: &mut GameState, input: &TickInput, cues: &mut impl CueSink) {
    match state.screen {
        Screen::Welcome => {
            if input.start {
                cues.emit(Cue::Click);
                start_round(state);
            }
        }
        Screen::Playing => {
            if input.exit_to_welcome {
                cues.emit(Cue::Click);
                exit_to_welcome(state);
            } else if input.restart_round {
                cues.emit(Cue::Click);
                state.reset_session();
                state.next_question();
                log::info!("Round restarted");
            } else if let Some(lane) = input.select_lane {
                select_answer(state, lane, cues);
            }
        }
        Screen::GameOver => {
            if input.play_again {
                cues.emit(Cue::Click);
                start_round(state);
            } else if input.exit_to_welcome {
                cues.emit(Cue::Click);
                exit_to_welcome(state);
            }
        }
    }
}

/// Full session reset, then into a fresh round
fn start_round(state: &mut GameState) {
    state.reset_session();
    state.screen = Screen::Playing;
    state.next_question();
    log::info!("Round started (seed {})", state.seed);
}

/// Full session reset back to the title screen
fn exit_to_welcome(state: &mut GameState) {
    state.reset_session();
    state.question = None;
    state.screen = Screen::Welcome;
}

/// Accept a lane selection and begin the feedback sequence
///
/// Silent no-op while a sequence is in flight, with no question, or with an
/// out-of-range lane. The sole caller is a constrained UI, so robustness
/// beats strictness here.
fn select_answer(state: &mut GameState, lane: usize, cues: &mut impl CueSink) {
    if !state.phase.is_idle() || lane >= LANE_COUNT {
        return;
    }
    let Some(question) = &state.question else {
        return;
    };

    cues.emit(Cue::Move);
    state.car_lane = lane;
    let correct = question.options[lane] == question.answer;
    state.last_answer = Some(AnswerStatus { correct, lane });
    state.phase = AnswerPhase::Moving {
        ticks_left: MOVE_PHASE_TICKS,
    };
}

/// Moving phase expired: reveal the result and update the books
fn resolve_answer(state: &mut GameState, cues: &mut impl CueSink) {
    let Some(status) = state.last_answer else {
        // Cannot happen through the public flow; fail closed
        state.phase = AnswerPhase::Idle;
        return;
    };

    if status.correct {
        cues.emit(Cue::Correct);
        state.score += CORRECT_REWARD;
    } else {
        cues.emit(Cue::Incorrect);
        state.lives = state.lives.saturating_sub(1);
    }
    state.phase = AnswerPhase::Settling {
        ticks_left: SETTLE_PHASE_TICKS,
    };
}

/// Settling phase expired: continue the round or end the run
fn settle_answer(state: &mut GameState, cues: &mut impl CueSink) {
    if state.lives == 0 {
        cues.emit(Cue::GameOver);
        state.screen = Screen::GameOver;
        log::info!("Game over with score {}", state.score);
    } else {
        state.next_question();
    }
    state.phase = AnswerPhase::Idle;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(state: &mut GameState, ticks: u32, cues: &mut Vec<Cue>) {
        for _ in 0..ticks {
            tick(state, &TickInput::default(), cues);
        }
    }

    fn select(state: &mut GameState, lane: usize, cues: &mut Vec<Cue>) {
        let input = TickInput {
            select_lane: Some(lane),
            ..Default::default()
        };
        tick(state, &input, cues);
    }

    /// A state already started into Playing
    fn started(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &input, &mut Vec::new());
        assert_eq!(state.screen, Screen::Playing);
        state
    }

    fn correct_lane(state: &GameState) -> usize {
        state.question.as_ref().unwrap().correct_lane()
    }

    fn wrong_lane(state: &GameState) -> usize {
        (correct_lane(state) + 1) % LANE_COUNT
    }

    #[test]
    fn start_enters_playing_with_question() {
        let mut state = GameState::new(11);
        let mut cues = Vec::new();
        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &input, &mut cues);

        assert_eq!(state.screen, Screen::Playing);
        assert!(state.question.is_some());
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, STARTING_LIVES);
        assert_eq!(cues, vec![Cue::Click]);
    }

    #[test]
    fn select_moves_car_and_starts_sequence() {
        let mut state = started(12);
        let mut cues = Vec::new();
        let lane = correct_lane(&state);

        select(&mut state, lane, &mut cues);
        assert_eq!(state.car_lane, lane);
        assert!(state.is_animating());
        let status = state.last_answer.unwrap();
        assert!(status.correct);
        assert_eq!(status.lane, lane);
        assert_eq!(cues, vec![Cue::Move]);
    }

    #[test]
    fn second_select_during_animation_is_ignored() {
        let mut state = started(13);
        let mut cues = Vec::new();
        let first = correct_lane(&state);
        let second = (first + 1) % LANE_COUNT;

        select(&mut state, first, &mut cues);
        select(&mut state, second, &mut cues);

        assert_eq!(state.car_lane, first);
        assert_eq!(state.last_answer.unwrap().lane, first);
        // Only the first selection emitted a move cue
        assert_eq!(cues, vec![Cue::Move]);
    }

    #[test]
    fn correct_answer_awards_score_and_continues() {
        let mut state = started(14);
        let mut cues = Vec::new();

        let lane = correct_lane(&state);
        select(&mut state, lane, &mut cues);
        run(&mut state, MOVE_PHASE_TICKS, &mut cues);
        assert_eq!(state.score, CORRECT_REWARD);
        assert_eq!(state.lives, STARTING_LIVES);
        assert!(state.is_animating(), "still settling after the reveal");

        run(&mut state, SETTLE_PHASE_TICKS, &mut cues);
        assert!(!state.is_animating());
        assert_eq!(state.screen, Screen::Playing);
        assert!(state.last_answer.is_none());
        assert!(state.question.is_some());
        assert_eq!(cues, vec![Cue::Move, Cue::Correct]);
    }

    #[test]
    fn wrong_answer_costs_a_life() {
        let mut state = started(15);
        let mut cues = Vec::new();

        let lane = wrong_lane(&state);
        select(&mut state, lane, &mut cues);
        run(&mut state, MOVE_PHASE_TICKS, &mut cues);
        assert_eq!(state.lives, STARTING_LIVES - 1);
        assert_eq!(state.score, 0);

        run(&mut state, SETTLE_PHASE_TICKS, &mut cues);
        assert_eq!(state.screen, Screen::Playing);
        assert!(state.question.is_some());
        assert_eq!(cues, vec![Cue::Move, Cue::Incorrect]);
    }

    #[test]
    fn game_over_lands_exactly_at_settle_end() {
        let mut state = started(16);
        let mut cues = Vec::new();
        state.lives = 1;
        state.score = 20;

        let lane = wrong_lane(&state);
        select(&mut state, lane, &mut cues);
        run(&mut state, MOVE_PHASE_TICKS, &mut cues);
        assert_eq!(state.lives, 0);
        assert_eq!(state.screen, Screen::Playing, "not over before settling");

        run(&mut state, SETTLE_PHASE_TICKS - 1, &mut cues);
        assert_eq!(state.screen, Screen::Playing, "not over mid-settle");

        run(&mut state, 1, &mut cues);
        assert_eq!(state.screen, Screen::GameOver);
        assert!(!state.is_animating());
        assert_eq!(state.score, 20);
        assert_eq!(cues, vec![Cue::Move, Cue::Incorrect, Cue::GameOver]);
    }

    #[test]
    fn lives_never_drop_below_zero() {
        let mut state = started(17);
        state.lives = 0;
        state.phase = AnswerPhase::Moving { ticks_left: 1 };
        state.last_answer = Some(AnswerStatus {
            correct: false,
            lane: 0,
        });

        run(&mut state, 1, &mut Vec::new());
        assert_eq!(state.lives, 0);
    }

    #[test]
    fn restart_round_resets_in_place() {
        let mut state = started(18);
        state.score = 40;
        state.lives = 1;

        let input = TickInput {
            restart_round: true,
            ..Default::default()
        };
        tick(&mut state, &input, &mut Vec::new());

        assert_eq!(state.screen, Screen::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, STARTING_LIVES);
        assert!(!state.is_animating());
        assert!(state.last_answer.is_none());
        assert!(state.question.is_some());
    }

    #[test]
    fn restart_cancels_pending_sequence() {
        let mut state = started(19);
        let mut cues = Vec::new();

        let lane = wrong_lane(&state);
        select(&mut state, lane, &mut cues);
        run(&mut state, MOVE_PHASE_TICKS / 2, &mut cues);

        let input = TickInput {
            restart_round: true,
            ..Default::default()
        };
        tick(&mut state, &input, &mut cues);
        cues.clear();

        // The old resolution must never fire
        run(&mut state, MOVE_PHASE_TICKS + SETTLE_PHASE_TICKS, &mut cues);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, STARTING_LIVES);
        assert!(cues.is_empty());
    }

    #[test]
    fn exit_to_welcome_resets_session() {
        let mut state = started(20);
        state.score = 30;

        let input = TickInput {
            exit_to_welcome: true,
            ..Default::default()
        };
        tick(&mut state, &input, &mut Vec::new());

        assert_eq!(state.screen, Screen::Welcome);
        assert_eq!(state.score, 0);
        assert!(state.question.is_none());
    }

    #[test]
    fn play_again_restarts_from_game_over() {
        let mut state = started(21);
        let mut cues = Vec::new();
        state.lives = 1;
        let lane = wrong_lane(&state);
        select(&mut state, lane, &mut cues);
        run(&mut state, MOVE_PHASE_TICKS + SETTLE_PHASE_TICKS, &mut cues);
        assert_eq!(state.screen, Screen::GameOver);

        let input = TickInput {
            play_again: true,
            ..Default::default()
        };
        tick(&mut state, &input, &mut cues);

        assert_eq!(state.screen, Screen::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, STARTING_LIVES);
        assert!(state.question.is_some());
        assert!(!state.is_animating());
    }

    #[test]
    fn select_is_ignored_outside_playing() {
        let mut state = GameState::new(22);
        let mut cues = Vec::new();

        select(&mut state, 0, &mut cues);
        assert_eq!(state.screen, Screen::Welcome);
        assert!(!state.is_animating());
        assert!(cues.is_empty());

        state.screen = Screen::GameOver;
        select(&mut state, 0, &mut cues);
        assert!(!state.is_animating());
        assert!(cues.is_empty());
    }

    #[test]
    fn out_of_range_lane_is_ignored() {
        let mut state = started(23);
        let mut cues = Vec::new();

        select(&mut state, LANE_COUNT, &mut cues);
        assert!(!state.is_animating());
        assert!(state.last_answer.is_none());
        assert!(cues.is_empty());
    }

    #[test]
    fn same_seed_and_inputs_are_deterministic() {
        let mut a = started(99);
        let mut b = started(99);
        let mut cues_a = Vec::new();
        let mut cues_b = Vec::new();

        let lane = correct_lane(&a);
        select(&mut a, lane, &mut cues_a);
        select(&mut b, lane, &mut cues_b);
        run(&mut a, MOVE_PHASE_TICKS + SETTLE_PHASE_TICKS, &mut cues_a);
        run(&mut b, MOVE_PHASE_TICKS + SETTLE_PHASE_TICKS, &mut cues_b);

        assert_eq!(a.question, b.question);
        assert_eq!(a.score, b.score);
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(cues_a, cues_b);
    }
}
