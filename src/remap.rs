//! Linear range remapping.

/// Map `value` from `[min_val, max_val]` onto `[out_min, out_max]`.
///
/// Values outside the source range extrapolate linearly (no clamping).
/// The source range must not be degenerate.
pub fn modulate(value: f32, min_val: f32, max_val: f32, out_min: f32, out_max: f32) -> f32 {
    debug_assert!(
        max_val != min_val,
        "modulate called with degenerate source range [{min_val}, {max_val}]"
    );
    let fraction = (value - min_val) / (max_val - min_val);
    out_min + fraction * (out_max - out_min)
}
