//! Rounding of fractional stock quantities.

/// Round to the nearest integer, sending exact halves to the even neighbour.
///
/// `0.5 -> 0`, `1.5 -> 2`, `2.5 -> 2`, `-1.5 -> -2`. NaN and infinities are
/// returned unchanged.
pub fn round_half_even(value: f64) -> f64 {
    value.round_ties_even()
}
