//! Pure numeric helpers shared by the curve model.
//!
//! Everything here works on plain `f64` slices and treats `NaN` as the
//! missing-sample marker.

use std::ops::Range;

// ---------------------------------------------------------------------------
// Reductions
// ---------------------------------------------------------------------------

/// Arithmetic mean. Propagates `NaN`; returns `NaN` for an empty slice.
pub fn mean(a: &[f64]) -> f64 {
    if a.is_empty() {
        return f64::NAN;
    }
    a.iter().sum::<f64>() / a.len() as f64
}

/// Median of the slice (average of the two middle values for even lengths).
pub fn median(a: &[f64]) -> f64 {
    if a.is_empty() {
        return f64::NAN;
    }
    let mut sorted = a.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        0.5 * (sorted[mid - 1] + sorted[mid])
    } else {
        sorted[mid]
    }
}

/// Median ignoring `NaN`.
pub fn nanmedian(a: &[f64]) -> f64 {
    let finite: Vec<f64> = a.iter().copied().filter(|v| !v.is_nan()).collect();
    median(&finite)
}

/// Mean ignoring `NaN`.
pub fn nanmean(a: &[f64]) -> f64 {
    let (sum, n) = a
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        f64::NAN
    } else {
        sum / n as f64
    }
}

/// Population standard deviation ignoring `NaN`.
pub fn nanstd(a: &[f64]) -> f64 {
    let m = nanmean(a);
    if m.is_nan() {
        return f64::NAN;
    }
    let (ss, n) = a
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, n), v| (s + (v - m).powi(2), n + 1));
    (ss / n as f64).sqrt()
}

/// Minimum ignoring `NaN`.
pub fn nanmin(a: &[f64]) -> f64 {
    a.iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(f64::NAN, |acc, v| if acc.is_nan() || v < acc { v } else { acc })
}

/// Maximum ignoring `NaN`.
pub fn nanmax(a: &[f64]) -> f64 {
    a.iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(f64::NAN, |acc, v| if acc.is_nan() || v > acc { v } else { acc })
}

// ---------------------------------------------------------------------------
// Missing-sample handling
// ---------------------------------------------------------------------------

/// Index range spanning the first to the last non-`NaN` sample, or `None`
/// when every sample is missing.
pub fn top_and_tail(a: &[f64]) -> Option<Range<usize>> {
    let first = a.iter().position(|v| !v.is_nan())?;
    let last = a.iter().rposition(|v| !v.is_nan())?;
    Some(first..last + 1)
}

/// Continue the first and last valid samples up and down the array.
pub fn extrapolate(a: &[f64]) -> Vec<f64> {
    let mut out = a.to_vec();
    if let Some(range) = top_and_tail(a) {
        let (head, tail) = (a[range.start], a[range.end - 1]);
        out[..range.start].iter_mut().for_each(|v| *v = head);
        out[range.end..].iter_mut().for_each(|v| *v = tail);
    }
    out
}

/// Fill `NaN` gaps in place by linear interpolation over sample index.
/// Leading and trailing gaps take the nearest valid sample. A slice with no
/// valid samples is left untouched.
pub fn interpolate_nans(a: &mut [f64]) {
    let valid: Vec<usize> = (0..a.len()).filter(|&i| !a[i].is_nan()).collect();
    let (Some(&lo), Some(&hi)) = (valid.first(), valid.last()) else {
        return;
    };
    let (head, tail) = (a[lo], a[hi]);
    a[..lo].iter_mut().for_each(|v| *v = head);
    a[hi + 1..].iter_mut().for_each(|v| *v = tail);

    for pair in valid.windows(2) {
        let (i, j) = (pair[0], pair[1]);
        if j - i < 2 {
            continue;
        }
        let (y0, y1) = (a[i], a[j]);
        for k in i + 1..j {
            let frac = (k - i) as f64 / (j - i) as f64;
            a[k] = linear(y0, y1, frac);
        }
    }
}

// ---------------------------------------------------------------------------
// Searching
// ---------------------------------------------------------------------------

/// Linear blend between `a` and `b` at fractional distance `frac`.
pub fn linear(a: f64, b: f64, frac: f64) -> f64 {
    a + (b - a) * frac
}

/// Index of the last position in the ascending `basis` at or before `value`,
/// plus the fractional distance to the next position.
///
/// Queries before the first position clamp to `(0, 0.0)`; queries at or past
/// the last position clamp to `(len - 1, 0.0)`.
pub fn find_previous(basis: &[f64], value: f64) -> (usize, f64) {
    let n = basis.len();
    if n == 0 || value.is_nan() || value <= basis[0] {
        return (0, 0.0);
    }
    let i = basis.partition_point(|&b| b <= value).saturating_sub(1);
    if i + 1 >= n {
        return (n - 1, 0.0);
    }
    let frac = (value - basis[i]) / (basis[i + 1] - basis[i]);
    (i, frac)
}

/// Positions where the value changes, starting with 0, and the value at each
/// of those positions. `NaN` runs count as a single value.
pub fn find_edges(a: &[f64]) -> (Vec<usize>, Vec<f64>) {
    let same = |x: f64, y: f64| x == y || (x.is_nan() && y.is_nan());
    let mut tops = Vec::new();
    for i in 0..a.len() {
        if i == 0 || !same(a[i - 1], a[i]) {
            tops.push(i);
        }
    }
    let values = tops.iter().map(|&i| a[i]).collect();
    (tops, values)
}

/// Zone index of `x` against the ascending `bins`.
///
/// With `right == false` a zone includes its left edge (`bins[i-1] <= x <
/// bins[i]`); with `right == true` it includes its right edge
/// (`bins[i-1] < x <= bins[i]`). `NaN` stays `NaN`.
pub fn digitize(x: f64, bins: &[f64], right: bool) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    let zone = if right {
        bins.iter().filter(|&&b| b < x).count()
    } else {
        bins.iter().filter(|&&b| b <= x).count()
    };
    zone as f64
}

/// Whether every successive difference matches the mean difference within an
/// absolute tolerance of `1e-8`.
pub fn evenly_spaced(diffs: &[f64]) -> bool {
    let m = mean(diffs);
    diffs.iter().all(|d| (d - m).abs() <= 1e-8)
}

/// Successive differences `a[i+1] - a[i]`.
pub fn diff(a: &[f64]) -> Vec<f64> {
    a.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Piecewise-linear interpolation of `(xp, fp)` at `x`, clamping to the end
/// values outside `xp`. `xp` must be ascending.
pub fn interp(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    let n = xp.len().min(fp.len());
    if n == 0 {
        return f64::NAN;
    }
    if x <= xp[0] {
        return fp[0];
    }
    if x >= xp[n - 1] {
        return fp[n - 1];
    }
    let (i, frac) = find_previous(&xp[..n], x);
    linear(fp[i], fp[i + 1], frac)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn median_handles_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert!(median(&[]).is_nan());
    }

    #[test]
    fn nan_aware_stats_skip_missing() {
        let a = [1.0, f64::NAN, 3.0];
        assert_eq!(nanmean(&a), 2.0);
        assert_eq!(nanmin(&a), 1.0);
        assert_eq!(nanmax(&a), 3.0);
        assert_abs_diff_eq!(nanstd(&a), 1.0, epsilon = 1e-12);
        assert!(nanmean(&[f64::NAN]).is_nan());
    }

    #[test]
    fn interpolate_nans_fills_interior_and_ends() {
        let mut a = [f64::NAN, 1.0, f64::NAN, f64::NAN, 4.0, f64::NAN];
        interpolate_nans(&mut a);
        assert_eq!(a, [1.0, 1.0, 2.0, 3.0, 4.0, 4.0]);
    }

    #[test]
    fn extrapolate_and_top_and_tail() {
        let a = [f64::NAN, 2.0, 3.0, f64::NAN];
        assert_eq!(top_and_tail(&a), Some(1..3));
        assert_eq!(extrapolate(&a), vec![2.0, 2.0, 3.0, 3.0]);
        assert_eq!(top_and_tail(&[f64::NAN]), None);
    }

    #[test]
    fn find_previous_clamps_at_edges() {
        let basis = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(find_previous(&basis, -1.0), (0, 0.0));
        assert_eq!(find_previous(&basis, 1.25), (1, 0.25));
        assert_eq!(find_previous(&basis, 3.0), (3, 0.0));
        assert_eq!(find_previous(&basis, 10.0), (3, 0.0));
    }

    #[test]
    fn find_edges_marks_value_changes() {
        let (tops, vals) = find_edges(&[0.0, 0.0, 1.0, 1.0, 0.0]);
        assert_eq!(tops, vec![0, 2, 4]);
        assert_eq!(vals, vec![0.0, 1.0, 0.0]);

        let (tops, _) = find_edges(&[f64::NAN, f64::NAN, 2.0]);
        assert_eq!(tops, vec![0, 2]);
    }

    #[test]
    fn digitize_respects_right_edge() {
        assert_eq!(digitize(3.0, &[3.0], false), 1.0);
        assert_eq!(digitize(3.0, &[3.0], true), 0.0);
        assert_eq!(digitize(5.0, &[2.0, 4.0], false), 2.0);
        assert!(digitize(f64::NAN, &[1.0], false).is_nan());
    }

    #[test]
    fn spacing_check() {
        assert!(evenly_spaced(&diff(&[0.0, 0.5, 1.0, 1.5])));
        assert!(!evenly_spaced(&diff(&[0.0, 1.0, 2.0, 4.0, 5.0])));
    }

    #[test]
    fn interp_clamps_outside() {
        let xp = [0.0, 1.0, 2.0];
        let fp = [0.0, 10.0, 20.0];
        assert_eq!(interp(0.5, &xp, &fp), 5.0);
        assert_eq!(interp(-1.0, &xp, &fp), 0.0);
        assert_eq!(interp(5.0, &xp, &fp), 20.0);
    }
}
