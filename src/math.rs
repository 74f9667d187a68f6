/// Rounds half-way cases towards positive infinity, so `round(-2.5) == -2`.
///
/// This is not [`f64::round`], which rounds half-way cases away from zero. Rectangle placement
/// straddles the left and top edges with negative offsets, where the two disagree.
#[inline]
pub fn round(v: f64) -> i32 {
    (v + 0.5).floor() as i32
}

/// `round(numerator / denominator)` for integer operands.
pub fn round_div(numerator: i32, denominator: i32) -> i32 {
    round(f64::from(numerator) / f64::from(denominator))
}

/// Scales `value` by a percentage and rounds the result.
pub fn percent(value: i32, percent: u32) -> i32 {
    round(f64::from(value) * (f64::from(percent) / 100.0))
}
