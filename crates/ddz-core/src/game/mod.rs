mod round;

pub use round::Round;
