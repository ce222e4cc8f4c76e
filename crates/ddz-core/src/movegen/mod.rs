//! Legal move generation over packed hands.
//!
//! Callers hand in the seat's current cards and the combo it has to beat. Free leads produce
//! every single, pair, triplet and chain the hand can form; must-beat positions only produce
//! combos of the same shape with a strictly higher start. Bombs and the rocket always come
//! last, and nothing answers a rocket.

mod kickers;

pub use kickers::{SameWeightSubsets, kicker_sets};

use crate::model::combo::{Category, Combo};
use crate::model::packed::PackedHand;
use crate::model::rank::Rank;

const MULTIPLICITIES: [u8; 4] = [1, 2, 3, 4];

fn rocket() -> PackedHand {
    PackedHand::single(Rank::BlackJoker, 1) + PackedHand::single(Rank::RedJoker, 1)
}

fn holds_rocket(hand: PackedHand) -> bool {
    hand.count(Rank::BlackJoker) == 1 && hand.count(Rank::RedJoker) == 1
}

fn bombs(hand: PackedHand) -> impl Iterator<Item = PackedHand> {
    Rank::Three
        .span_to(Rank::Two)
        .filter(move |rank| hand.count(*rank) == 4)
        .map(|rank| PackedHand::single(rank, 4))
}

/// Ranks strictly above `rank` up to `last`.
fn above(rank: Rank, last: Rank) -> impl Iterator<Item = Rank> {
    rank.successor()
        .into_iter()
        .flat_map(move |next| next.span_to(last))
}

fn push_with_kickers(
    out: &mut Vec<PackedHand>,
    hand: PackedHand,
    primary: PackedHand,
    end: Rank,
    span: usize,
    groups: usize,
    arity: u8,
) {
    out.extend(
        kicker_sets(hand, end, span, groups, arity)
            .into_iter()
            .map(|kicker| primary + kicker),
    );
}

/// Every combo the hand can open with.
///
/// Bare triplets are offered even when `kickers` is set, next to their kicker
/// variants. Leads that keep the kicker cards back therefore count toward the `0.95^k`
/// likelihood as well.
fn free_lead(hand: PackedHand, kickers: bool, out: &mut Vec<PackedHand>) {
    for rank in Rank::ORDERED {
        for n in 1..=hand.count(rank).min(2) {
            out.push(PackedHand::single(rank, n));
        }
    }

    for rank in Rank::Three.span_to(Rank::Two) {
        let held = hand.count(rank);
        if held >= 3 {
            out.push(PackedHand::single(rank, 3));
        }
        if !kickers {
            continue;
        }
        for n in 3..=held {
            let category = Category::from_multiplicity(n).unwrap_or(Category::Triplet);
            for arity in 1..=2 {
                push_with_kickers(
                    out,
                    hand,
                    PackedHand::single(rank, n),
                    rank,
                    1,
                    category.kicker_groups(),
                    arity,
                );
            }
        }
    }

    // Per multiplicity: length of the run ending at the current rank and its cards.
    let mut run = [0usize; 5];
    let mut window = [PackedHand::EMPTY; 5];
    for rank in Rank::Three.span_to(Rank::Ace) {
        let held = hand.count(rank);
        for m in MULTIPLICITIES {
            let slot = m as usize;
            if held >= m {
                run[slot] += 1;
                window[slot] = window[slot].add(rank, m);
            } else {
                run[slot] = 0;
                window[slot] = PackedHand::EMPTY;
            }
        }

        for m in MULTIPLICITIES {
            let slot = m as usize;
            let Some(category) = Category::from_multiplicity(m) else {
                continue;
            };
            let min = category.chain_min_length();
            if run[slot] < min {
                continue;
            }
            let mut chain = window[slot];
            let mut length = run[slot];
            while length >= min {
                out.push(chain);
                if kickers && m >= 3 {
                    for arity in 1..=2 {
                        push_with_kickers(
                            out,
                            hand,
                            chain,
                            rank,
                            length,
                            category.kicker_groups(),
                            arity,
                        );
                    }
                }
                if let Some(head) = Rank::from_index(rank.index() + 1 - length) {
                    chain = chain.remove(head, m);
                }
                length -= 1;
            }
        }
    }
}

fn must_beat(hand: PackedHand, obligation: &Combo, kickers: bool, out: &mut Vec<PackedHand>) {
    let m = obligation.category().multiplicity();
    let start = obligation.start();
    let carried = obligation.has_kickers();

    if obligation.is_single() || obligation.is_pair() {
        out.extend(
            above(start, Rank::RedJoker)
                .filter(|rank| hand.count(*rank) >= m)
                .map(|rank| PackedHand::single(rank, m)),
        );
    } else if obligation.is_triplet_or_quadruple() {
        for rank in above(start, Rank::Two).filter(|rank| hand.count(*rank) >= m) {
            let primary = PackedHand::single(rank, m);
            if carried {
                if kickers {
                    push_with_kickers(
                        out,
                        hand,
                        primary,
                        rank,
                        1,
                        obligation.category().kicker_groups(),
                        obligation.kicker(),
                    );
                }
            } else if obligation.category() == Category::Triplet {
                out.push(primary);
            }
        }
    } else if obligation.is_chain() {
        let length = obligation.length();
        let mut run = 0usize;
        let mut window = PackedHand::EMPTY;
        for rank in above(start, Rank::Ace) {
            if hand.count(rank) < m {
                run = 0;
                window = PackedHand::EMPTY;
                continue;
            }
            run += 1;
            window = window.add(rank, m);
            if run > length {
                if let Some(head) = Rank::from_index(rank.index() - length) {
                    window = window.remove(head, m);
                }
            }
            if run < length {
                continue;
            }
            if !carried {
                out.push(window);
            } else if kickers {
                push_with_kickers(
                    out,
                    hand,
                    window,
                    rank,
                    length,
                    obligation.category().kicker_groups(),
                    obligation.kicker(),
                );
            }
        }
    }
}

/// Every non-pass combo from `hand` that answers `obligation`.
///
/// `kickers` controls whether triplet and quadruple shapes carry kicker variants. With it off,
/// an obligation that carries kickers has no same-shape answer. Empty against a rocket.
pub fn responses(hand: PackedHand, obligation: &Combo, kickers: bool) -> Vec<PackedHand> {
    let mut out = Vec::new();

    if obligation.is_rocket() {
        return out;
    }
    if obligation.is_bomb() {
        let floor = obligation.cards().bits();
        out.extend(bombs(hand).filter(|bomb| bomb.bits() > floor));
        if holds_rocket(hand) {
            out.push(rocket());
        }
        return out;
    }

    if obligation.is_pass() {
        free_lead(hand, kickers, &mut out);
    } else {
        must_beat(hand, obligation, kickers, &mut out);
    }

    out.extend(bombs(hand));
    if holds_rocket(hand) {
        out.push(rocket());
    }
    out
}

/// The full legal set: pass first whenever there is something to beat, then the responses.
pub fn legal_moves(hand: PackedHand, obligation: &Combo, kickers: bool) -> Vec<PackedHand> {
    if obligation.is_pass() {
        return responses(hand, obligation, kickers);
    }
    let mut moves = vec![PackedHand::EMPTY];
    moves.extend(responses(hand, obligation, kickers));
    moves
}
