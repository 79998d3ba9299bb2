//! Scalar helpers.

use num_traits::Float;


/// Restricts `value` to the closed interval `[min_value, max_value]`.
///
/// Equivalent to `min(max(value, min_value), max_value)`, so a `NaN` input yields `min_value`
/// rather than propagating.
///
/// # Arguments
/// - `value` - The number to restrict.
/// - `min_value` - Lower bound (inclusive).
/// - `max_value` - Upper bound (inclusive).
pub fn clamp<F: Float>(value: F, min_value: F, max_value: F) -> F {
    value.max(min_value).min(max_value)
}
