//! Completion percentage derived from the wizard position.

/// Percentage complete once `position` is the active step, using the
/// inclusive form `round(100 * (position + 1) / total)`. The first step
/// reports a non-zero share and the last step exactly 100.
pub fn percent(position: usize, total: usize) -> u8 {
    debug_assert!(total >= 1, "wizard needs at least one step");
    debug_assert!(position < total, "position out of range");
    let ratio = 100.0 * (position as f64 + 1.0) / total as f64;
    ratio.round() as u8
}
