use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

/// Minutes, `[15, 45)`.
pub(crate) const DELIVERY_TIME_RANGE: std::ops::Range<u32> = 15..45;
/// Whole currency units, `[1, 5)`.
pub(crate) const DELIVERY_FEE_RANGE: std::ops::Range<i64> = 1..5;
/// Whole currency units, `[10, 25)`.
pub(crate) const MIN_ORDER_RANGE: std::ops::Range<i64> = 10..25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OperationalFields {
    pub(crate) delivery_time: u32,
    pub(crate) delivery_fee: Decimal,
    pub(crate) min_order: Decimal,
}

/// Draws operational fields for `count` restaurants from a single seeded stream,
/// so a given seed and row order always produce the same values.
pub(crate) fn operational_fields(seed: u64, count: usize) -> Vec<OperationalFields> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| OperationalFields {
            delivery_time: rng.gen_range(DELIVERY_TIME_RANGE),
            delivery_fee: Decimal::from(rng.gen_range(DELIVERY_FEE_RANGE)),
            min_order: Decimal::from(rng.gen_range(MIN_ORDER_RANGE)),
        })
        .collect()
}

pub(crate) fn fresh_seed() -> u64 {
    rand::random()
}
