//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Floor a f64 and clamp it to the i64 range, returning 0 for non-finite values.
#[must_use]
pub fn floor_f64_to_i64(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    let min = cast::<i64, f64>(i64::MIN).unwrap_or(f64::MIN);
    let max = cast::<i64, f64>(i64::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(min, max).floor();
    cast::<f64, i64>(clamped).unwrap_or(0)
}

/// Floor a f64 into a `usize` index strictly below `len`.
///
/// Used to turn a `[0, 1)` draw into a catalog index; out-of-range or
/// non-finite values collapse onto the nearest valid slot.
#[must_use]
pub fn index_from_unit(value: f64, len: usize) -> usize {
    if len == 0 || !value.is_finite() || value <= 0.0 {
        return 0;
    }
    let scaled = value * usize_to_f64(len);
    cast::<f64, usize>(scaled.floor())
        .unwrap_or(0)
        .min(len - 1)
}

/// Round half toward positive infinity and clamp to the i32 range.
///
/// Matches the rounding used by the rival simulation, where `-12.5` becomes
/// `-12` rather than `-13`.
#[must_use]
pub fn round_half_up_to_i32(value: f64) -> i32 {
    if value.is_nan() {
        return 0;
    }
    let min = cast::<i32, f64>(i32::MIN).unwrap_or(f64::MIN);
    let max = cast::<i32, f64>(i32::MAX).unwrap_or(f64::MAX);
    let rounded = (value + 0.5).floor().clamp(min, max);
    cast::<f64, i32>(rounded).unwrap_or(0)
}

/// Scale an integer amount by `multiplier`, flooring the product.
#[must_use]
pub fn scale_floor(amount: i64, multiplier: f64) -> i64 {
    floor_f64_to_i64(i64_to_f64(amount) * multiplier)
}

/// Convert i64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn i64_to_f64(value: i64) -> f64 {
    cast::<i64, f64>(value).unwrap_or(0.0)
}

/// Convert usize to f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Narrow a count into u32, saturating on overflow.
#[must_use]
pub fn usize_to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
