//! Sample quantiles by linear interpolation between order statistics.

/// Quantile `p` of `values`, interpolating linearly between the two closest
/// order statistics (position `(n - 1) * p` in the sorted sample).
///
/// Returns `None` for an empty sample or `p` outside `[0, 1]`.
pub fn quantile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=1.0).contains(&p) {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    Some(sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo]))
}
