use crate::config::SEAT_COUNT;

/// Cyclic seatings: rotation `r` puts agent `(seat + r) % 3` in each seat, landlord first.
pub struct SeatRotations {
    rotations: Vec<[usize; SEAT_COUNT]>,
}

impl SeatRotations {
    pub fn new(count: usize) -> Self {
        let rotations = (0..count.min(SEAT_COUNT))
            .map(|shift| std::array::from_fn(|seat| (seat + shift) % SEAT_COUNT))
            .collect();
        Self { rotations }
    }

    pub fn as_slice(&self) -> &[[usize; SEAT_COUNT]] {
        &self.rotations
    }
}
