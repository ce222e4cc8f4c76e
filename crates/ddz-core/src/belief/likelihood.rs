use crate::eval::hand_strength;
use crate::model::combo::Combo;
use crate::model::packed::PackedHand;
use crate::movegen;

/// Per-alternative discount applied to a recorded move.
pub const LIKELIHOOD_DECAY: f64 = 0.95;

/// Value of playing `play` out of `hand`: what goes down plus what stays behind.
pub fn play_score(hand: PackedHand, play: PackedHand) -> f64 {
    hand_strength(play) + hand_strength(hand - play)
}

/// Relative chance that a seat holding `hand` chose `played` against `obligation`.
///
/// Every other legal move scoring at least as well as `played` multiplies the result by
/// [`LIKELIHOOD_DECAY`]. `None` when `played` is not in the legal set at all.
pub fn move_likelihood(hand: PackedHand, obligation: &Combo, played: PackedHand) -> Option<f64> {
    let moves = movegen::legal_moves(hand, obligation, true);
    if !moves.contains(&played) {
        return None;
    }
    let recorded = play_score(hand, played);
    let better = moves
        .iter()
        .filter(|mv| **mv != played)
        .filter(|mv| play_score(hand, **mv) >= recorded)
        .count();
    Some(LIKELIHOOD_DECAY.powi(better as i32))
}
