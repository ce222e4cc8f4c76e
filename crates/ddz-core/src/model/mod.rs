pub mod card;
pub mod combo;
pub mod deck;
pub mod hand;
pub mod packed;
pub mod rank;
pub mod seat;
