//! Checkpoint score distribution

use crate::constants::TOTAL_CHECKPOINT_SCORE;

/// Split the total score across `count` checkpoints
///
/// Every checkpoint gets the same share rounded down; the last one absorbs
/// the remainder so the scores always sum to [`TOTAL_CHECKPOINT_SCORE`].
pub fn split_scores(count: usize) -> Vec<i32> {
    if count == 0 {
        return Vec::new();
    }

    let share = TOTAL_CHECKPOINT_SCORE / count as i32;
    let last = TOTAL_CHECKPOINT_SCORE - share * (count as i32 - 1);

    let mut scores = vec![share; count - 1];
    scores.push(last);
    scores
}
