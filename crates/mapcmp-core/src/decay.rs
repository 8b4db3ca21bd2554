//! Distance-decay presets for map comparison.
//!
//! A decay function turns a raw distance into a similarity-like weight,
//! 1 at distance zero and non-increasing from there. Any `Fn(f64) -> f64`
//! is accepted by the comparison driver; these are the two common presets.

/// Exponential decay that halves every `halving` cells: `0.5^(d / halving)`.
pub fn exponential_decay(halving: f64) -> impl Fn(f64) -> f64 + Copy + Send + Sync {
    move |d| 0.5f64.powf(d / halving)
}

/// Step decay crediting only the immediate neighbourhood: 1 at distance 0,
/// `value` at distance 1, 0 beyond.
pub fn one_neighbour(value: f64) -> impl Fn(f64) -> f64 + Copy + Send + Sync {
    move |d| {
        if d < 0.9 {
            1.0
        } else if d < 1.1 {
            value
        } else {
            0.0
        }
    }
}
