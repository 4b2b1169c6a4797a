use log::warn;

use super::basis;
use super::model::{Curve, CurveMeta};
use crate::error::{CurveError, CurveResult};
use crate::utils;

/// Padding added past the last depth when rebuilding an irregular basis, so
/// the final position survives the half-open `arange`.
const STOP_PAD: f64 = 1e-5;

// ---------------------------------------------------------------------------
// RawCurve – what a loader hands over before normalization
// ---------------------------------------------------------------------------

/// Raw samples plus whatever geometry the source provided.
///
/// Geometry is resolved in this order: an explicit `depth` array (possibly
/// irregular), then a `basis` array, then `start` with `step` or `stop`.
#[derive(Debug, Clone, Default)]
pub struct RawCurve {
    pub samples: Vec<f64>,
    /// Measured positions of each sample, as read from the file.
    pub depth: Option<Vec<f64>>,
    /// A uniform basis; only its first two positions are consulted.
    pub basis: Option<Vec<f64>>,
    pub start: Option<f64>,
    pub stop: Option<f64>,
    /// `0.0` means "unknown"; `stop` is then required.
    pub step: f64,
    pub meta: CurveMeta,
}

impl RawCurve {
    pub fn new(samples: Vec<f64>, meta: CurveMeta) -> Self {
        Self {
            samples,
            meta,
            ..Self::default()
        }
    }

    pub fn with_depth(mut self, depth: Vec<f64>) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn with_basis(mut self, basis: Vec<f64>) -> Self {
        self.basis = Some(basis);
        self
    }

    pub fn with_start(mut self, start: f64) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_stop(mut self, stop: f64) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Resolve geometry and build the curve.
    ///
    /// An unevenly spaced `depth` array is not an error: the samples are
    /// linearly resampled onto a uniform basis stepping by the median
    /// spacing, and a warning is logged.
    pub fn build(self) -> CurveResult<Curve> {
        let RawCurve {
            mut samples,
            depth,
            basis: explicit_basis,
            mut start,
            stop,
            mut step,
            meta,
        } = self;

        if samples.is_empty() {
            return Err(CurveError::EmptySamples);
        }

        match depth.as_deref() {
            Some(depth) if depth.len() != samples.len() => {
                return Err(CurveError::LengthMismatch {
                    samples: samples.len(),
                    basis: depth.len(),
                });
            }
            Some([only]) => {
                start = Some(*only);
                if step == 0.0 && stop.is_none() {
                    step = 1.0;
                }
            }
            _ => {}
        }

        if let Some(depth) = depth.filter(|d| d.len() >= 2) {
            let diffs = utils::diff(&depth);
            step = utils::nanmedian(&diffs);
            if utils::evenly_spaced(&diffs) {
                start = Some(depth[0]);
            } else {
                warn!(
                    "{}: irregular sampling in depth is not supported; \
                     interpolating to a regular basis with step {step}",
                    meta.mnemonic.as_deref().unwrap_or("curve"),
                );
                let (resampled_start, resampled) = regularize(&depth, &samples, step)?;
                start = Some(resampled_start);
                step = step.abs();
                samples = resampled;
            }
        }

        let start = match (start, explicit_basis.as_deref()) {
            (Some(s), _) => s,
            (None, Some(b)) if !b.is_empty() => {
                if b.len() >= 2 {
                    step = b[1] - b[0];
                }
                b[0]
            }
            _ => return Err(CurveError::MissingStart),
        };

        if step == 0.0 {
            let stop = stop.ok_or(CurveError::MissingStep)?;
            step = if samples.len() > 1 {
                (stop - start) / (samples.len() - 1) as f64
            } else {
                1.0
            };
        }

        Curve::new(samples, start, step, meta)
    }
}

/// Resample `(depth, samples)` onto `arange(first, last + pad, step)`.
///
/// Descending depth arrays are flipped first so interpolation sees an
/// ascending axis; the returned start is the shallowest position.
fn regularize(depth: &[f64], samples: &[f64], step: f64) -> CurveResult<(f64, Vec<f64>)> {
    let (xp, fp): (Vec<f64>, Vec<f64>) = if step < 0.0 {
        (
            depth.iter().rev().copied().collect(),
            samples.iter().rev().copied().collect(),
        )
    } else {
        (depth.to_vec(), samples.to_vec())
    };
    let step = step.abs();
    if !step.is_finite() || step == 0.0 {
        return Err(CurveError::InvalidStep(step));
    }
    let first = xp[0];
    let last = xp[xp.len() - 1];
    let positions = basis::arange(first, last + STOP_PAD, step);
    let resampled = positions
        .iter()
        .map(|&x| utils::interp(x, &xp, &fp))
        .collect();
    Ok((first, resampled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn uniform_depth_takes_median_step() {
        let c = RawCurve::new(vec![1.0, 2.0, 3.0], CurveMeta::named("GR"))
            .with_depth(vec![10.0, 10.5, 11.0])
            .build()
            .unwrap();
        assert_eq!(c.start(), 10.0);
        assert_eq!(c.step(), 0.5);
        assert_eq!(c.values(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn irregular_depth_is_resampled() {
        let c = RawCurve::new(vec![0.0, 10.0, 20.0, 40.0, 50.0], CurveMeta::named("GR"))
            .with_depth(vec![0.0, 1.0, 2.0, 4.0, 5.0])
            .build()
            .unwrap();
        assert_eq!(c.step(), 1.0);
        assert_eq!(c.start(), 0.0);
        assert_eq!(c.len(), 6);
        assert_abs_diff_eq!(c[3], 30.0, epsilon = 1e-12);
        assert_eq!(c.stop(), 5.0);
    }

    #[test]
    fn start_and_stop_derive_step() {
        let c = RawCurve::new(vec![1.0, 2.0, 3.0, 4.0, 5.0], CurveMeta::default())
            .with_start(100.0)
            .with_stop(102.0)
            .build()
            .unwrap();
        assert_eq!(c.step(), 0.5);
    }

    #[test]
    fn basis_supplies_start_and_step() {
        let c = RawCurve::new(vec![1.0, 2.0, 3.0], CurveMeta::default())
            .with_basis(vec![5.0, 5.25, 5.5])
            .build()
            .unwrap();
        assert_eq!((c.start(), c.step()), (5.0, 0.25));
    }

    #[test]
    fn missing_geometry_is_fatal() {
        let err = RawCurve::new(vec![1.0, 2.0], CurveMeta::default())
            .with_step(1.0)
            .build()
            .unwrap_err();
        assert_eq!(err, CurveError::MissingStart);

        let err = RawCurve::new(vec![1.0, 2.0], CurveMeta::default())
            .with_start(0.0)
            .build()
            .unwrap_err();
        assert_eq!(err, CurveError::MissingStep);
    }

    #[test]
    fn single_depth_gives_start() {
        let c = RawCurve::new(vec![42.0], CurveMeta::named("GR"))
            .with_depth(vec![1500.0])
            .build()
            .unwrap();
        assert_eq!((c.start(), c.step(), c.len()), (1500.0, 1.0, 1));

        let c = RawCurve::new(vec![42.0], CurveMeta::named("GR"))
            .with_depth(vec![1500.0])
            .with_step(0.1524)
            .build()
            .unwrap();
        assert_eq!((c.start(), c.step()), (1500.0, 0.1524));
    }

    #[test]
    fn depth_length_must_match() {
        let err = RawCurve::new(vec![1.0, 2.0], CurveMeta::default())
            .with_depth(vec![0.0])
            .build()
            .unwrap_err();
        assert_eq!(err, CurveError::LengthMismatch { samples: 2, basis: 1 });
    }

    #[test]
    fn descending_uniform_depth_is_normalized() {
        let c = RawCurve::new(vec![1.0, 2.0, 3.0], CurveMeta::default())
            .with_depth(vec![3.0, 2.0, 1.0])
            .build()
            .unwrap();
        assert_eq!((c.start(), c.step()), (1.0, 1.0));
        assert_eq!(c.values(), &[1.0, 2.0, 3.0]);
    }
}
