use crate::model::rank::Rank;
use core::fmt;
use serde::{Deserialize, Serialize};

/// A physical card identified by `0..54`.
///
/// Identifiers run four per rank from the Three upward, so `id / 4` is the rank index; 52 is
/// the black joker and 53 the red joker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Card(u8);

impl Card {
    pub const COUNT: u8 = 54;

    pub const fn from_id(id: u8) -> Option<Self> {
        if id < Self::COUNT { Some(Self(id)) } else { None }
    }

    pub const fn id(self) -> u8 {
        self.0
    }

    pub const fn rank(self) -> Rank {
        let index = (self.0 >> 2) as usize + (self.0 == 53) as usize;
        Rank::ORDERED[index]
    }

    /// All cards of `rank`, lowest identifier first.
    pub fn of_rank(rank: Rank) -> impl Iterator<Item = Card> {
        let (first, count) = match rank {
            Rank::BlackJoker => (52, 1),
            Rank::RedJoker => (53, 1),
            other => ((other.index() * 4) as u8, 4),
        };
        (first..first + count).map(Card)
    }
}

impl TryFrom<u8> for Card {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Card::from_id(value).ok_or_else(|| format!("card identifier {value} is out of range"))
    }
}

impl From<Card> for u8 {
    fn from(card: Card) -> Self {
        card.0
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rank = self.rank();
        if rank.is_joker() {
            return write!(f, "{rank}");
        }
        let suit = ['C', 'D', 'H', 'S'][(self.0 & 3) as usize];
        write!(f, "{rank}{suit}")
    }
}
