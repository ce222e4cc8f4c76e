use criterion::{Criterion, black_box, criterion_group, criterion_main};
use ddz_core::model::card::Card;
use ddz_core::model::combo::Combo;
use ddz_core::model::deck::{Deck, Variant};
use ddz_core::model::packed::PackedHand;
use ddz_core::model::rank::Rank;
use ddz_core::movegen::responses;

fn dealt_hand(variant: Variant, seed: u64) -> PackedHand {
    let deck = Deck::shuffled_with_seed(variant, seed);
    let cards: Vec<Card> = deck.cards().iter().take(variant.hand_size() + 3).copied().collect();
    PackedHand::from_cards(&cards)
}

fn movegen_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("movegen");
    for (variant, seed) in [
        (Variant::Mini, 7u64),
        (Variant::Classic, 7u64),
        (Variant::Classic, 1145u64),
    ] {
        let hand = dealt_hand(variant, seed);
        group.bench_function(format!("free_lead_{variant:?}_{seed}"), |b| {
            b.iter(|| black_box(responses(black_box(hand), &Combo::PASS, true)))
        });
        let obligation = Combo::classify(PackedHand::single(Rank::Nine, 1));
        group.bench_function(format!("beat_single_{variant:?}_{seed}"), |b| {
            b.iter(|| black_box(responses(black_box(hand), &obligation, true)))
        });
    }
    group.finish();
}

criterion_group!(benches, movegen_bench);
criterion_main!(benches);
