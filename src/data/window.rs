// ---------------------------------------------------------------------------
// Rolling window engine
// ---------------------------------------------------------------------------

/// Apply `reduction` to a window centred on every sample.
///
/// * `window_length` is forced odd (even lengths grow by one), so each
///   window is symmetric around its sample.
/// * Missing samples are read as `0.0` while windowing, and the series is
///   edge-padded by `step * (window_length / 2)` copies of its first and last
///   values.
/// * Each window holds `window_length` samples spaced `step` apart.
/// * Samples that were missing in `samples` are missing in the output.
///
/// The output has the same length as the input.
pub fn rolling_window<F>(samples: &[f64], window_length: usize, reduction: F, step: usize) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    if samples.is_empty() {
        return Vec::new();
    }
    let window_length = if window_length % 2 == 0 {
        window_length + 1
    } else {
        window_length
    };
    let step = step.max(1);
    let pad = step * (window_length / 2);

    let cleaned = samples.iter().map(|&v| if v.is_nan() { 0.0 } else { v });
    let (head, tail) = (clean(samples[0]), clean(samples[samples.len() - 1]));
    let padded: Vec<f64> = std::iter::repeat(head)
        .take(pad)
        .chain(cleaned)
        .chain(std::iter::repeat(tail).take(pad))
        .collect();

    let mut window = vec![0.0; window_length];
    samples
        .iter()
        .enumerate()
        .map(|(i, original)| {
            if original.is_nan() {
                return f64::NAN;
            }
            for (k, slot) in window.iter_mut().enumerate() {
                *slot = padded[i + k * step];
            }
            reduction(&window)
        })
        .collect()
}

fn clean(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{mean, median};

    #[test]
    fn output_has_input_length() {
        let out = rolling_window(&[1.0, 2.0, 3.0, 4.0], 3, mean, 1);
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn edges_are_replicated() {
        let out = rolling_window(&[1.0, 2.0, 3.0], 3, |w| w.iter().sum(), 1);
        // [1, 1, 2], [1, 2, 3], [2, 3, 3]
        assert_eq!(out, vec![4.0, 6.0, 8.0]);
    }

    #[test]
    fn even_window_is_made_odd() {
        let out = rolling_window(&[1.0, 2.0, 3.0], 2, |w| w.len() as f64, 1);
        assert_eq!(out, vec![3.0, 3.0, 3.0]);
    }

    #[test]
    fn missing_samples_stay_missing() {
        let out = rolling_window(&[1.0, f64::NAN, 3.0], 3, |w| w.iter().sum(), 1);
        assert!(out[1].is_nan());
        // The gap reads as zero for its neighbours: [1, 1, 0] and [0, 3, 3].
        assert_eq!(out[0], 2.0);
        assert_eq!(out[2], 6.0);
    }

    #[test]
    fn strided_windows_skip_samples() {
        let a = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let out = rolling_window(&a, 3, |w| w.iter().sum(), 2);
        // Centre 3 sees samples 1, 3 and 5.
        assert_eq!(out[3], 9.0);
        // Centre 0 sees [pad, 0, 2] with the pad replicating sample 0.
        assert_eq!(out[0], 2.0);
    }

    #[test]
    fn median_filter_removes_single_spike() {
        let out = rolling_window(&[1.0, 1.0, 50.0, 1.0, 1.0], 3, median, 1);
        assert_eq!(out, vec![1.0; 5]);
    }
}
