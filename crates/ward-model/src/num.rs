//! Shared numeric helpers.

/// Round to `dp` decimal places, half away from zero.
pub fn round_dp(value: f64, dp: u32) -> f64 {
    let scale = 10f64.powi(dp as i32);
    (value * scale).round() / scale
}
