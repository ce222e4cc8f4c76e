//! Rank histograms packed four bits per rank into a `u64`.
//!
//! Field `i` (bits `4i..4i+3`) holds the number of cards of rank index `i`. Sums and
//! differences of two packed hands are plain integer arithmetic, which is only meaningful
//! while every field stays within the rank's cap. No carry or borrow checks happen here;
//! debug builds assert the caller's obligation.

use crate::model::card::Card;
use crate::model::rank::Rank;
use core::fmt;
use core::ops::{Add, AddAssign, Sub, SubAssign};
use serde::{Deserialize, Serialize};

const FIELD_BITS: usize = 4;
const FIELD_MASK: u64 = 0xf;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PackedHand(u64);

impl PackedHand {
    pub const EMPTY: Self = Self(0);

    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    pub fn from_counts(counts: &[u8; Rank::COUNT]) -> Self {
        let mut packed = Self::EMPTY;
        for rank in Rank::ORDERED {
            packed = packed.add(rank, counts[rank.index()]);
        }
        packed
    }

    pub fn counts(self) -> [u8; Rank::COUNT] {
        let mut counts = [0u8; Rank::COUNT];
        for rank in Rank::ORDERED {
            counts[rank.index()] = self.count(rank);
        }
        counts
    }

    pub fn from_cards<'a>(cards: impl IntoIterator<Item = &'a Card>) -> Self {
        cards
            .into_iter()
            .fold(Self::EMPTY, |packed, card| packed.add(card.rank(), 1))
    }

    pub const fn single(rank: Rank, n: u8) -> Self {
        Self((n as u64) << (rank.index() * FIELD_BITS))
    }

    pub const fn count(self, rank: Rank) -> u8 {
        ((self.0 >> (rank.index() * FIELD_BITS)) & FIELD_MASK) as u8
    }

    pub fn add(self, rank: Rank, n: u8) -> Self {
        debug_assert!(
            self.count(rank) + n <= rank.cap(),
            "adding {n} x {rank} overflows the field"
        );
        Self(self.0 + Self::single(rank, n).0)
    }

    pub fn remove(self, rank: Rank, n: u8) -> Self {
        debug_assert!(
            self.count(rank) >= n,
            "removing {n} x {rank} borrows from the next field"
        );
        Self(self.0 - Self::single(rank, n).0)
    }

    pub fn len(self) -> usize {
        Rank::ORDERED
            .iter()
            .map(|rank| self.count(*rank) as usize)
            .sum()
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when every field of `other` fits inside `self`.
    pub fn contains(self, other: PackedHand) -> bool {
        Rank::ORDERED
            .iter()
            .all(|rank| self.count(*rank) >= other.count(*rank))
    }

    /// Ranks holding at least one card, weakest first.
    pub fn ranks(self) -> impl Iterator<Item = (Rank, u8)> {
        Rank::ORDERED
            .into_iter()
            .map(move |rank| (rank, self.count(rank)))
            .filter(|(_, n)| *n > 0)
    }
}

impl Add for PackedHand {
    type Output = PackedHand;

    fn add(self, rhs: PackedHand) -> PackedHand {
        PackedHand(self.0 + rhs.0)
    }
}

impl AddAssign for PackedHand {
    fn add_assign(&mut self, rhs: PackedHand) {
        self.0 += rhs.0;
    }
}

impl Sub for PackedHand {
    type Output = PackedHand;

    fn sub(self, rhs: PackedHand) -> PackedHand {
        debug_assert!(self.contains(rhs), "{rhs} is not a subset of {self}");
        PackedHand(self.0 - rhs.0)
    }
}

impl SubAssign for PackedHand {
    fn sub_assign(&mut self, rhs: PackedHand) {
        *self = *self - rhs;
    }
}

impl fmt::Display for PackedHand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("[pass]");
        }
        f.write_str("[")?;
        let mut first = true;
        for (rank, n) in self.ranks() {
            for _ in 0..n {
                if !first {
                    f.write_str(" ")?;
                }
                write!(f, "{rank}")?;
                first = false;
            }
        }
        f.write_str("]")
    }
}
