//! Answer-block assembly for a round
//!
//! Builds the candidate set (correct answer plus distractors), shuffles it so
//! the correct block's slot is uniformly random, and lays the blocks out in
//! evenly spaced slots across the board.

use glam::Vec2;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;

use crate::consts::BOARD_PADDING;
use crate::difficulty::DISTRACTOR_COUNT;
use crate::problem::{self, MathProblem};
use crate::sim::state::AnswerBlock;

/// Build the full answer-block set for `problem`.
///
/// The returned blocks carry consecutive ids starting at `first_id` and sit
/// centered in their slots at `start_y`. Exactly one block is marked correct.
pub fn build_answer_blocks(
    problem: &MathProblem,
    board_width: f32,
    block_width: f32,
    start_y: f32,
    first_id: u32,
    rng: &mut Pcg32,
) -> Vec<AnswerBlock> {
    let mut candidates = vec![(problem.answer.clone(), true)];
    for answer in problem::distractors_for(problem, DISTRACTOR_COUNT, rng) {
        candidates.push((answer, false));
    }
    candidates.shuffle(rng);

    let count = candidates.len();
    let usable = board_width - 2.0 * BOARD_PADDING;
    let slot_width = usable / count as f32;
    let min_x = BOARD_PADDING + block_width / 2.0;
    let max_x = board_width - BOARD_PADDING - block_width / 2.0;

    candidates
        .into_iter()
        .enumerate()
        .map(|(i, (answer, is_correct))| {
            let x = (BOARD_PADDING + slot_width * (i as f32 + 0.5)).clamp(min_x, max_x);
            AnswerBlock {
                id: first_id + i as u32,
                answer,
                is_correct,
                pos: Vec2::new(x, start_y),
            }
        })
        .collect()
}
