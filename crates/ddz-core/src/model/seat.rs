use core::fmt;
use serde::{Deserialize, Serialize};

/// Table position. The landlord always leads the first play and turns rotate in index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Seat {
    Landlord = 0,
    /// Peasant playing right after the landlord.
    FirstPeasant = 1,
    /// Peasant playing right before the landlord.
    SecondPeasant = 2,
}

impl Seat {
    pub const LOOP: [Seat; 3] = [Seat::Landlord, Seat::FirstPeasant, Seat::SecondPeasant];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Seat::Landlord),
            1 => Some(Seat::FirstPeasant),
            2 => Some(Seat::SecondPeasant),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn next(self) -> Seat {
        match self {
            Seat::Landlord => Seat::FirstPeasant,
            Seat::FirstPeasant => Seat::SecondPeasant,
            Seat::SecondPeasant => Seat::Landlord,
        }
    }

    pub const fn previous(self) -> Seat {
        match self {
            Seat::Landlord => Seat::SecondPeasant,
            Seat::FirstPeasant => Seat::Landlord,
            Seat::SecondPeasant => Seat::FirstPeasant,
        }
    }

    pub const fn is_landlord(self) -> bool {
        matches!(self, Seat::Landlord)
    }

    /// The cooperating peasant, if any.
    pub const fn partner(self) -> Option<Seat> {
        match self {
            Seat::Landlord => None,
            Seat::FirstPeasant => Some(Seat::SecondPeasant),
            Seat::SecondPeasant => Some(Seat::FirstPeasant),
        }
    }

    pub const fn same_side(self, other: Seat) -> bool {
        self.is_landlord() == other.is_landlord()
    }

    /// Seat expected to act at global turn `turn` (zero-based).
    pub const fn for_turn(turn: usize) -> Seat {
        Seat::LOOP[turn % 3]
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Seat::Landlord => "Landlord",
            Seat::FirstPeasant => "FirstPeasant",
            Seat::SecondPeasant => "SecondPeasant",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::Seat;

    #[test]
    fn next_wraps_around() {
        assert_eq!(Seat::SecondPeasant.next(), Seat::Landlord);
        assert_eq!(Seat::Landlord.previous(), Seat::SecondPeasant);
    }

    #[test]
    fn sides_pair_the_peasants() {
        assert!(Seat::FirstPeasant.same_side(Seat::SecondPeasant));
        assert!(!Seat::Landlord.same_side(Seat::FirstPeasant));
        assert_eq!(Seat::FirstPeasant.partner(), Some(Seat::SecondPeasant));
        assert_eq!(Seat::Landlord.partner(), None);
    }

    #[test]
    fn index_roundtrip() {
        for (i, seat) in Seat::LOOP.iter().enumerate() {
            assert_eq!(Seat::from_index(i), Some(*seat));
            assert_eq!(seat.index(), i);
            assert_eq!(Seat::for_turn(i + 3), *seat);
        }
    }
}
