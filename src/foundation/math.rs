/// Linear interpolation between `a` and `b` at `t`.
pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// `round(num * k / den)` with round-half-up, computed in integers.
pub(crate) fn scaled_round(k: u64, num: u64, den: u64) -> u64 {
    let n = u128::from(k) * u128::from(num) * 2 + u128::from(den);
    (n / (u128::from(den) * 2)) as u64
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
