// ---------------------------------------------------------------------------
// Basis geometry: where sample i sits along the depth/time axis
// ---------------------------------------------------------------------------

/// Tolerance used when snapping a step ratio onto a whole number of steps.
const STEP_SNAP: f64 = 1e-9;

/// Last basis position of an `n`-sample curve.
pub fn stop(start: f64, step: f64, n: usize) -> f64 {
    start + n.saturating_sub(1) as f64 * step
}

/// The `n` evenly spaced positions from `start` to `stop`, both included.
///
/// The final position is written as `stop` itself rather than accumulated,
/// so the endpoint is exact.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let delta = (stop - start) / (n - 1) as f64;
            let mut out: Vec<f64> = (0..n).map(|i| start + i as f64 * delta).collect();
            out[n - 1] = stop;
            out
        }
    }
}

/// Basis of an `n`-sample curve described by `(start, step)`.
pub fn basis(start: f64, step: f64, n: usize) -> Vec<f64> {
    linspace(start, stop(start, step, n), n)
}

/// Whole number of steps needed to cover `[start, stop]`, rounding up so
/// the endpoint is always reached. Ratios within `1e-9` of an integer are
/// snapped to it first.
pub fn step_count(start: f64, stop: f64, step: f64) -> usize {
    let ratio = (stop - start) / step;
    if !ratio.is_finite() || ratio <= 0.0 {
        return 0;
    }
    let nearest = ratio.round();
    if (ratio - nearest).abs() < STEP_SNAP {
        nearest as usize
    } else {
        ratio.ceil() as usize
    }
}

/// Positions produced by `arange(start, stop, step)`: `start + i * step` for
/// every `i` with the result strictly below `stop`.
pub fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    let n = ((stop - start) / step).ceil();
    if !n.is_finite() || n <= 0.0 {
        return Vec::new();
    }
    (0..n as usize).map(|i| start + i as f64 * step).collect()
}
