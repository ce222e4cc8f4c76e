use crate::model::packed::PackedHand;
use crate::model::rank::Rank;

/// Every `k`-element subset of `0..n` as a bitmask, in increasing numeric order.
///
/// Steps with Gosper's "next integer with the same popcount", so each of the C(n, k)
/// subsets is produced exactly once.
#[derive(Debug, Clone)]
pub struct SameWeightSubsets {
    next: Option<u64>,
    limit: u64,
}

impl SameWeightSubsets {
    pub fn new(n: usize, k: usize) -> Self {
        debug_assert!(n < 64, "subset universe of {n} does not fit a u64 mask");
        let limit = 1u64 << n;
        let next = if k > n { None } else { Some((1u64 << k) - 1) };
        Self { next, limit }
    }
}

impl Iterator for SameWeightSubsets {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let current = self.next?;
        self.next = if current == 0 {
            None
        } else {
            let lowest = current & current.wrapping_neg();
            let ripple = current + lowest;
            let successor = ((current ^ ripple) >> (lowest.trailing_zeros() + 2)) | ripple;
            (successor < self.limit).then_some(successor)
        };
        Some(current)
    }
}

/// Ranks that may serve as kickers for a primary run ending at `end` spanning `span` ranks.
fn eligible_ranks(hand: PackedHand, end: Rank, span: usize, arity: u8) -> Vec<Rank> {
    Rank::ORDERED
        .into_iter()
        .filter(|rank| hand.count(*rank) >= arity)
        .filter(|rank| rank.index() > end.index() || rank.index() + span <= end.index())
        .collect()
}

/// All kicker attachments for a run of `span` ranks ending at `end`.
///
/// Each run rank carries `groups` kicker groups of `arity` cards, every group on a distinct
/// rank outside the run. Returns nothing when the hand cannot supply enough groups.
pub fn kicker_sets(
    hand: PackedHand,
    end: Rank,
    span: usize,
    groups: usize,
    arity: u8,
) -> Vec<PackedHand> {
    let eligible = eligible_ranks(hand, end, span, arity);
    let needed = span * groups;
    if needed == 0 || eligible.len() < needed {
        return Vec::new();
    }

    SameWeightSubsets::new(eligible.len(), needed)
        .map(|mask| {
            eligible
                .iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1u64 << bit) != 0)
                .fold(PackedHand::EMPTY, |acc, (_, rank)| acc.add(*rank, arity))
        })
        .collect()
}
