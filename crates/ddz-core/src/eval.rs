use crate::model::packed::PackedHand;
use crate::model::rank::Rank;
use crate::model::seat::Seat;

const PLAY_COST: f64 = 10.0;
const ROCKET_VALUE: f64 = 130.0;
const BLACK_JOKER_VALUE: f64 = 40.0;
const RED_JOKER_VALUE: f64 = 48.0;
const BOMB_BONUS: f64 = 30.0;

/// Static value of a hand: high cards and big shapes add value, and every play the hand would
/// need to empty itself costs [`PLAY_COST`]. Triplets absorb one single or pair each as a
/// kicker before those are counted as plays of their own.
pub fn hand_strength(hand: PackedHand) -> f64 {
    let mut value = 0.0;
    let mut plays = 0u32;
    let mut kicker_credits = 0u32;

    match (hand.count(Rank::BlackJoker), hand.count(Rank::RedJoker)) {
        (1, 1) => {
            value += ROCKET_VALUE;
            plays += 1;
        }
        (1, _) => {
            value += BLACK_JOKER_VALUE;
            plays += 1;
        }
        (_, 1) => {
            value += RED_JOKER_VALUE;
            plays += 1;
        }
        _ => {}
    }

    for rank in Rank::Three.span_to(Rank::Two) {
        let i = rank.index() as f64;
        match hand.count(rank) {
            3 => {
                value += 6.0 * i;
                kicker_credits += 1;
                plays += 1;
            }
            4 => {
                value += 7.0 * i + BOMB_BONUS;
                plays += 1;
            }
            _ => {}
        }
    }

    for rank in Rank::Three.span_to(Rank::Two) {
        let i = rank.index() as f64;
        let per_rank = match hand.count(rank) {
            1 => 2.0,
            2 => 3.0,
            _ => continue,
        };
        if kicker_credits > 0 {
            kicker_credits -= 1;
        } else {
            value += per_rank * i;
            plays += 1;
        }
    }

    value - PLAY_COST * plays as f64
}

/// Balance of the table from `seat`'s side, with the two peasants averaged.
pub fn table_strength(hands: &[PackedHand; 3], seat: Seat) -> f64 {
    let strength = |s: Seat| hand_strength(hands[s.index()]);
    let landlord = strength(Seat::Landlord);
    match seat.partner() {
        None => landlord - 0.5 * (strength(Seat::FirstPeasant) + strength(Seat::SecondPeasant)),
        Some(partner) => 0.5 * (strength(seat) + strength(partner)) - landlord,
    }
}
