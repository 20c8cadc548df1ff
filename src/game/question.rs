//! Arithmetic question generation
//!
//! Questions are simple single-digit addition/subtraction with three answer
//! options, one per lane. Subtraction operands are reordered so the answer is
//! never negative.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::consts::*;

/// Arithmetic operation for a question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
}

/// A single quiz question with one option per lane
///
/// Invariants: exactly one option equals `answer`; all options are
/// non-negative and pairwise distinct. Replaced wholesale on each new round,
/// never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Display text, e.g. `"7 + 3"`
    pub text: String,
    /// The correct answer
    pub answer: i32,
    /// Answer options, one per lane
    pub options: [i32; LANE_COUNT],
}

impl Question {
    /// Generate a fresh question from the session RNG
    pub fn generate(rng: &mut impl Rng) -> Self {
        let a = rng.random_range(OPERAND_MIN..=OPERAND_MAX);
        let b = rng.random_range(OPERAND_MIN..=OPERAND_MAX);
        let op = if rng.random_bool(0.5) { Op::Add } else { Op::Sub };
        Self::build(a, b, op, rng)
    }

    /// Build a question from fixed operands (seam for deterministic tests)
    pub(crate) fn build(a: i32, b: i32, op: Op, rng: &mut impl Rng) -> Self {
        let (text, answer) = match op {
            Op::Add => (format!("{a} + {b}"), a + b),
            // Larger operand first so the answer stays non-negative
            Op::Sub => {
                let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
                (format!("{hi} - {lo}"), hi - lo)
            }
        };

        let [d1, d2] = pick_distractors(answer, rng);
        let mut options = [answer, d1, d2];
        // rand's shuffle is an unbiased Fisher-Yates, so the correct lane
        // is uniform over the three slots
        options.shuffle(rng);

        Self { text, answer, options }
    }

    /// Lane index holding the correct answer
    pub fn correct_lane(&self) -> usize {
        self.options
            .iter()
            .position(|&o| o == self.answer)
            .unwrap_or(0)
    }
}

/// Pick two distractors near `answer`: non-negative, distinct from the answer
/// and from each other.
///
/// Draws a signed perturbation of magnitude 1..=DISTRACTOR_SPREAD. If the
/// retry budget runs out (cannot happen with the default operand ranges, but
/// guarded anyway), the spread widens so the search always terminates.
fn pick_distractors(answer: i32, rng: &mut impl Rng) -> [i32; 2] {
    let mut picked: [i32; 2] = [0; 2];
    let mut count = 0;
    let mut spread = DISTRACTOR_SPREAD;
    let mut attempts = 0;

    while count < 2 {
        attempts += 1;
        if attempts > DISTRACTOR_RETRY_BUDGET {
            spread += DISTRACTOR_SPREAD;
            attempts = 0;
        }

        let mut delta = rng.random_range(1..=spread);
        if rng.random_bool(0.5) {
            delta = -delta;
        }
        let candidate = answer + delta;
        if candidate >= 0 && candidate != answer && !picked[..count].contains(&candidate) {
            picked[count] = candidate;
            count += 1;
        }
    }

    picked
}
