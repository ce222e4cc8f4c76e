use crate::model::packed::PackedHand;
use crate::model::rank::Rank;

/// Initial hands of the two opponents, named relative to the querying seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hypothesis {
    next: PackedHand,
    previous: PackedHand,
}

impl Hypothesis {
    pub const fn new(next: PackedHand, previous: PackedHand) -> Self {
        Self { next, previous }
    }

    /// Opponent acting right after the querying seat.
    pub const fn next(&self) -> PackedHand {
        self.next
    }

    /// Opponent acting right before the querying seat.
    pub const fn previous(&self) -> PackedHand {
        self.previous
    }
}

/// Every way to hand the `unknown` cards to the two opponents so that each ends up with
/// exactly `sizes` initial cards on top of what it is already `known` to hold.
///
/// Ranks are assigned weakest first; branches that can no longer reach the next opponent's
/// size are cut. Returns nothing when the sizes cannot be met at all.
pub fn enumerate_hypotheses(
    unknown: PackedHand,
    known: [PackedHand; 2],
    sizes: [usize; 2],
) -> Vec<Hypothesis> {
    let [known_next, known_previous] = known;
    let (Some(need_next), Some(need_previous)) = (
        sizes[0].checked_sub(known_next.len()),
        sizes[1].checked_sub(known_previous.len()),
    ) else {
        return Vec::new();
    };
    if need_next + need_previous != unknown.len() {
        return Vec::new();
    }

    let counts = unknown.counts();
    let mut suffix = [0usize; Rank::COUNT + 1];
    for index in (0..Rank::COUNT).rev() {
        suffix[index] = suffix[index + 1] + counts[index] as usize;
    }

    let mut splits = Vec::new();
    assign(&counts, &suffix, 0, need_next, PackedHand::EMPTY, &mut splits);

    splits
        .into_iter()
        .map(|split| Hypothesis::new(known_next + split, known_previous + (unknown - split)))
        .collect()
}

fn assign(
    counts: &[u8; Rank::COUNT],
    suffix: &[usize; Rank::COUNT + 1],
    index: usize,
    need: usize,
    taken: PackedHand,
    out: &mut Vec<PackedHand>,
) {
    if need == 0 {
        out.push(taken);
        return;
    }
    let Some(rank) = Rank::from_index(index) else {
        return;
    };
    if suffix[index] < need {
        return;
    }
    let most = (counts[index] as usize).min(need) as u8;
    for take in 0..=most {
        assign(
            counts,
            suffix,
            index + 1,
            need - take as usize,
            taken.add(rank, take),
            out,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::enumerate_hypotheses;
    use crate::model::packed::PackedHand;
    use crate::model::rank::Rank;
    use std::collections::HashSet;

    fn hand(parts: &[(Rank, u8)]) -> PackedHand {
        parts
            .iter()
            .fold(PackedHand::EMPTY, |acc, (rank, n)| acc.add(*rank, *n))
    }

    #[test]
    fn splits_partition_the_unknown_cards() {
        let unknown = hand(&[(Rank::Nine, 2), (Rank::Ten, 1), (Rank::Jack, 3), (Rank::RedJoker, 1)]);
        let known_next = hand(&[(Rank::Two, 1)]);
        let known_previous = hand(&[(Rank::Ace, 2)]);
        let hypotheses = enumerate_hypotheses(unknown, [known_next, known_previous], [4, 6]);

        assert!(!hypotheses.is_empty());
        let unique: HashSet<_> = hypotheses.iter().copied().collect();
        assert_eq!(unique.len(), hypotheses.len());
        for h in &hypotheses {
            assert_eq!(h.next().len(), 4);
            assert_eq!(h.previous().len(), 6);
            assert!(h.next().contains(known_next));
            assert!(h.previous().contains(known_previous));
            let split_next = h.next() - known_next;
            let split_previous = h.previous() - known_previous;
            assert_eq!(split_next + split_previous, unknown);
        }
    }

    #[test]
    fn counts_match_direct_enumeration() {
        // Three distinct ranks with two copies each, three cards to the next opponent:
        // choose (a, b, c) with a + b + c = 3 and each in 0..=2, which has 7 solutions.
        let unknown = hand(&[(Rank::Nine, 2), (Rank::Ten, 2), (Rank::Jack, 2)]);
        let hypotheses =
            enumerate_hypotheses(unknown, [PackedHand::EMPTY, PackedHand::EMPTY], [3, 3]);
        assert_eq!(hypotheses.len(), 7);
    }

    #[test]
    fn impossible_sizes_yield_nothing() {
        let unknown = hand(&[(Rank::Nine, 2)]);
        assert!(enumerate_hypotheses(unknown, [PackedHand::EMPTY; 2], [3, 0]).is_empty());
        assert!(enumerate_hypotheses(unknown, [hand(&[(Rank::Two, 2)]), PackedHand::EMPTY], [1, 1]).is_empty());
    }

    #[test]
    fn empty_unknown_has_one_split() {
        let known = [hand(&[(Rank::Ten, 1)]), hand(&[(Rank::Jack, 1)])];
        let hypotheses = enumerate_hypotheses(PackedHand::EMPTY, known, [1, 1]);
        assert_eq!(hypotheses.len(), 1);
        assert_eq!(hypotheses[0].next(), known[0]);
    }
}
