//! Percentiles with linear interpolation between closest ranks.

/// Quantile `q` (0..=1) of `values`, interpolating linearly between ranks.
///
/// For sorted values `v` of length `n`, the rank is `q * (n - 1)`; a
/// fractional rank interpolates between its two neighbours. Returns `None`
/// for an empty slice.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(percentile_sorted(&sorted, q))
}

/// Same as [`percentile`] for a non-empty, already sorted slice.
pub(crate) fn percentile_sorted(sorted: &[f64], q: f64) -> f64 {
    let rank = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
