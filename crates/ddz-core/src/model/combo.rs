use crate::model::packed::PackedHand;
use crate::model::rank::Rank;
use crate::model::seat::Seat;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Shape of the primary run of a combo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Category {
    Pass = 0,
    Single = 1,
    Pair = 2,
    Triplet = 3,
    Quadruple = 4,
    Rocket = 5,
}

impl Category {
    pub const fn from_multiplicity(n: u8) -> Option<Self> {
        match n {
            1 => Some(Category::Single),
            2 => Some(Category::Pair),
            3 => Some(Category::Triplet),
            4 => Some(Category::Quadruple),
            _ => None,
        }
    }

    /// Cards per rank in the primary run.
    pub const fn multiplicity(self) -> u8 {
        match self {
            Category::Pass | Category::Rocket => 0,
            Category::Single => 1,
            Category::Pair => 2,
            Category::Triplet => 3,
            Category::Quadruple => 4,
        }
    }

    /// Shortest run that counts as a chain.
    pub const fn chain_min_length(self) -> usize {
        match self {
            Category::Pass => 0,
            Category::Single => 5,
            Category::Pair => 3,
            Category::Triplet | Category::Quadruple => 2,
            Category::Rocket => 1,
        }
    }

    /// Kicker groups attached to each rank of the primary run.
    pub const fn kicker_groups(self) -> usize {
        match self {
            Category::Triplet => 1,
            Category::Quadruple => 2,
            _ => 0,
        }
    }
}

/// Structured view of a packed combo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Combo {
    cards: PackedHand,
    category: Category,
    start: Rank,
    length: usize,
    kicker: u8,
}

impl Combo {
    pub const PASS: Combo = Combo {
        cards: PackedHand::EMPTY,
        category: Category::Pass,
        start: Rank::Three,
        length: 0,
        kicker: 0,
    };

    /// Classifies a hand that already has the shape of a single combo.
    ///
    /// The primary run is the set of ranks sharing the highest count; everything else is
    /// treated as kickers. Arbitrary histograms are not re-validated.
    pub fn classify(cards: PackedHand) -> Combo {
        let mut max_count = 0u8;
        let mut start = Rank::Three;
        let mut length = 0usize;
        let mut lowest: Option<Rank> = None;
        let mut total = 0usize;

        for (rank, n) in cards.ranks() {
            total += n as usize;
            if lowest.is_none() {
                lowest = Some(rank);
            }
            if n > max_count {
                max_count = n;
                start = rank;
                length = 1;
            } else if n == max_count {
                length += 1;
            }
        }

        let Some(category) = Category::from_multiplicity(max_count) else {
            return Combo::PASS;
        };

        if lowest == Some(Rank::BlackJoker) && total == 2 {
            return Combo {
                cards,
                category: Category::Rocket,
                start: Rank::BlackJoker,
                length: 2,
                kicker: 0,
            };
        }

        let extra_per_unit = total / length - max_count as usize;
        let kicker = match category.kicker_groups() {
            0 => extra_per_unit,
            groups => extra_per_unit / groups,
        } as u8;

        Combo {
            cards,
            category,
            start,
            length,
            kicker,
        }
    }

    pub const fn cards(&self) -> PackedHand {
        self.cards
    }

    pub const fn category(&self) -> Category {
        self.category
    }

    pub const fn start(&self) -> Rank {
        self.start
    }

    /// Last rank of the primary run.
    pub fn end(&self) -> Rank {
        Rank::from_index(self.start.index() + self.length.saturating_sub(1)).unwrap_or(self.start)
    }

    pub const fn length(&self) -> usize {
        self.length
    }

    /// Cards per kicker group: 0 (none), 1 (singles) or 2 (pairs).
    pub const fn kicker(&self) -> u8 {
        self.kicker
    }

    pub const fn is_pass(&self) -> bool {
        matches!(self.category, Category::Pass)
    }

    pub const fn is_single(&self) -> bool {
        matches!(self.category, Category::Single) && self.length == 1
    }

    pub const fn is_pair(&self) -> bool {
        matches!(self.category, Category::Pair) && self.length == 1
    }

    pub const fn is_bomb(&self) -> bool {
        matches!(self.category, Category::Quadruple) && self.length == 1 && self.kicker == 0
    }

    pub const fn is_rocket(&self) -> bool {
        matches!(self.category, Category::Rocket)
    }

    /// Lone triplet or quadruple, with or without kickers.
    pub const fn is_triplet_or_quadruple(&self) -> bool {
        matches!(self.category, Category::Triplet | Category::Quadruple) && self.length == 1
    }

    pub const fn has_kickers(&self) -> bool {
        self.kicker > 0
    }

    pub const fn is_chain(&self) -> bool {
        match self.category {
            Category::Single | Category::Pair | Category::Triplet | Category::Quadruple => {
                self.length >= self.category.chain_min_length()
            }
            Category::Pass | Category::Rocket => false,
        }
    }
}

impl fmt::Display for Combo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}(start={}, len={}, kicker={}) {}",
            self.category, self.start, self.length, self.kicker, self.cards
        )
    }
}

/// The combo a seat has to beat, together with the seat that played it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Obligation {
    combo: Combo,
    owner: Option<Seat>,
}

impl Obligation {
    /// Free lead.
    pub const FREE: Obligation = Obligation {
        combo: Combo::PASS,
        owner: None,
    };

    pub fn new(cards: PackedHand, owner: Seat) -> Self {
        if cards.is_empty() {
            return Self::FREE;
        }
        Self {
            combo: Combo::classify(cards),
            owner: Some(owner),
        }
    }

    pub const fn combo(&self) -> &Combo {
        &self.combo
    }

    pub const fn owner(&self) -> Option<Seat> {
        self.owner
    }

    pub const fn is_free(&self) -> bool {
        self.combo.is_pass()
    }

    /// Obligation faced by `mover.next()` once `mover` has played `cards` against `self`.
    ///
    /// A pass carries the standing combo forward unless it would come back to its owner,
    /// who then leads freely.
    pub fn after(&self, mover: Seat, cards: PackedHand) -> Obligation {
        if !cards.is_empty() {
            return Obligation::new(cards, mover);
        }
        match self.owner {
            Some(owner) if owner != mover.next() => *self,
            _ => Obligation::FREE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(parts: &[(Rank, u8)]) -> PackedHand {
        parts
            .iter()
            .fold(PackedHand::EMPTY, |acc, (rank, n)| acc.add(*rank, *n))
    }

    #[test]
    fn empty_hand_is_pass() {
        let combo = Combo::classify(PackedHand::EMPTY);
        assert!(combo.is_pass());
        assert!(!combo.is_chain());
    }

    #[test]
    fn jokers_form_rocket() {
        let combo = Combo::classify(hand(&[(Rank::BlackJoker, 1), (Rank::RedJoker, 1)]));
        assert!(combo.is_rocket());
        let lone = Combo::classify(hand(&[(Rank::RedJoker, 1)]));
        assert!(lone.is_single());
        assert_eq!(lone.start(), Rank::RedJoker);
    }

    #[test]
    fn bomb_requires_no_kickers() {
        let bomb = Combo::classify(hand(&[(Rank::Jack, 4)]));
        assert!(bomb.is_bomb());
        let four_with_two = Combo::classify(hand(&[(Rank::Jack, 4), (Rank::Nine, 1), (Rank::Ten, 1)]));
        assert!(!four_with_two.is_bomb());
        assert!(four_with_two.is_triplet_or_quadruple());
        assert_eq!(four_with_two.kicker(), 1);
    }

    #[test]
    fn four_with_two_pairs_has_pair_kickers() {
        let combo = Combo::classify(hand(&[(Rank::Jack, 4), (Rank::Nine, 2), (Rank::Ten, 2)]));
        assert_eq!(combo.category(), Category::Quadruple);
        assert_eq!(combo.kicker(), 2);
    }

    #[test]
    fn triplet_kickers_are_measured_per_unit() {
        let single = Combo::classify(hand(&[(Rank::Queen, 3), (Rank::Nine, 1)]));
        assert_eq!(single.category(), Category::Triplet);
        assert_eq!(single.start(), Rank::Queen);
        assert_eq!(single.kicker(), 1);

        let airplane = Combo::classify(hand(&[
            (Rank::Nine, 3),
            (Rank::Ten, 3),
            (Rank::King, 2),
            (Rank::Two, 2),
        ]));
        assert_eq!(airplane.start(), Rank::Nine);
        assert_eq!(airplane.length(), 2);
        assert_eq!(airplane.kicker(), 2);
        assert!(airplane.is_chain());
        assert_eq!(airplane.end(), Rank::Ten);
    }

    #[test]
    fn chain_minimums_follow_category() {
        let four_singles = Combo::classify(hand(&[
            (Rank::Nine, 1),
            (Rank::Ten, 1),
            (Rank::Jack, 1),
            (Rank::Queen, 1),
        ]));
        assert!(!four_singles.is_chain());
        let five_singles = Combo::classify(hand(&[
            (Rank::Nine, 1),
            (Rank::Ten, 1),
            (Rank::Jack, 1),
            (Rank::Queen, 1),
            (Rank::King, 1),
        ]));
        assert!(five_singles.is_chain());
        let three_pairs = Combo::classify(hand(&[(Rank::Nine, 2), (Rank::Ten, 2), (Rank::Jack, 2)]));
        assert!(three_pairs.is_chain());
        assert_eq!(three_pairs.category(), Category::Pair);
    }

    #[test]
    fn obligation_passes_forward_until_owner_returns() {
        let nine = PackedHand::single(Rank::Nine, 1);
        let after_lead = Obligation::FREE.after(Seat::Landlord, nine);
        assert_eq!(after_lead.owner(), Some(Seat::Landlord));

        let after_first_pass = after_lead.after(Seat::FirstPeasant, PackedHand::EMPTY);
        assert_eq!(after_first_pass.combo().cards(), nine);

        let after_second_pass = after_first_pass.after(Seat::SecondPeasant, PackedHand::EMPTY);
        assert!(after_second_pass.is_free());
    }

    #[test]
    fn obligation_after_free_pass_stays_free() {
        let ob = Obligation::FREE.after(Seat::FirstPeasant, PackedHand::EMPTY);
        assert!(ob.is_free());
    }
}
