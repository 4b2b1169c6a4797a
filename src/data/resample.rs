use std::str::FromStr;

use log::debug;

use super::basis;
use super::model::Curve;
use crate::error::{CurveError, CurveResult};
use crate::utils;

// ---------------------------------------------------------------------------
// Interpolation kinds
// ---------------------------------------------------------------------------

/// How values between (or at) known positions are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    #[default]
    Linear,
    /// Closest position; a query exactly halfway takes the lower one.
    Nearest,
    /// Closest position; a query exactly halfway takes the upper one.
    NearestUp,
    /// Last position at or before the query (piecewise constant).
    Previous,
    /// First position at or after the query (piecewise constant).
    Next,
}

impl FromStr for Interpolation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" | "slinear" => Ok(Self::Linear),
            "nearest" => Ok(Self::Nearest),
            "nearest-up" => Ok(Self::NearestUp),
            "previous" | "zero" => Ok(Self::Previous),
            "next" => Ok(Self::Next),
            other => Err(format!("unknown interpolation kind {other:?}")),
        }
    }
}

impl Interpolation {
    /// Evaluate the interpolant of `(xp, fp)` at `x`.
    ///
    /// `xp` is ascending. Queries outside `[xp[0], xp[last]]` return
    /// `undefined`; nothing is extrapolated.
    pub fn evaluate(self, xp: &[f64], fp: &[f64], x: f64, undefined: f64) -> f64 {
        let n = xp.len().min(fp.len());
        if n == 0 || x.is_nan() || x < xp[0] || x > xp[n - 1] {
            return undefined;
        }
        if n == 1 {
            return fp[0];
        }
        let xp = &xp[..n];
        match self {
            Self::Linear => {
                let (i, frac) = utils::find_previous(xp, x);
                if i + 1 >= n {
                    fp[n - 1]
                } else {
                    utils::linear(fp[i], fp[i + 1], frac)
                }
            }
            Self::Previous => fp[xp.partition_point(|&b| b <= x) - 1],
            Self::Next => fp[xp.partition_point(|&b| b < x)],
            Self::Nearest | Self::NearestUp => {
                let i = xp.partition_point(|&b| b <= x).saturating_sub(1);
                if i + 1 >= n {
                    return fp[n - 1];
                }
                let mid = 0.5 * (xp[i] + xp[i + 1]);
                let upper = match self {
                    Self::NearestUp => x >= mid,
                    _ => x > mid,
                };
                if upper {
                    fp[i + 1]
                } else {
                    fp[i]
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Resampling
// ---------------------------------------------------------------------------

/// Target geometry for [`Curve::to_basis`].
///
/// Explicit `start`/`stop`/`step` win over values read from `basis`, which
/// win over the curve's own geometry.
#[derive(Debug, Clone, Default)]
pub struct ResampleSpec {
    pub basis: Option<Vec<f64>>,
    pub start: Option<f64>,
    pub stop: Option<f64>,
    pub step: Option<f64>,
    /// Fill value outside the curve's range. `None` means `NaN`.
    pub undefined: Option<f64>,
    pub kind: Interpolation,
}

impl ResampleSpec {
    pub fn onto(basis: Vec<f64>) -> Self {
        Self {
            basis: Some(basis),
            ..Self::default()
        }
    }

    pub fn step(step: f64) -> Self {
        Self {
            step: Some(step),
            ..Self::default()
        }
    }

    pub fn with_start(mut self, start: f64) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_stop(mut self, stop: f64) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn with_undefined(mut self, undefined: f64) -> Self {
        self.undefined = Some(undefined);
        self
    }

    pub fn with_kind(mut self, kind: Interpolation) -> Self {
        self.kind = kind;
        self
    }
}

/// Where [`Curve::to_basis_like`] takes its target geometry from.
#[derive(Debug, Clone, Copy)]
pub enum BasisSource<'a> {
    /// A bare basis; out-of-range samples become `NaN`.
    Basis(&'a [f64]),
    /// Another curve; out-of-range samples take that curve's null value.
    Curve(&'a Curve),
}

/// How [`Curve::read_at`] turns a position into a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadMode {
    #[default]
    Linear,
    /// The sample at or before the position, without interpolation.
    None,
}

impl Curve {
    /// Resample onto a new basis, returning a new curve.
    ///
    /// The target holds `ceil((stop - start) / step) + 1` evenly spaced
    /// positions from `start` to `stop`, so the endpoint is always present.
    /// When `step` does not divide the range, the stored step is that
    /// spacing rather than the requested one.
    pub fn to_basis(&self, spec: &ResampleSpec) -> CurveResult<Curve> {
        let (base_start, base_stop, base_step) = match spec.basis.as_deref() {
            Some(b @ [first, second, ..]) => (*first, b[b.len() - 1], second - first),
            Some([only]) => (*only, *only, self.step()),
            _ => (self.start(), self.stop(), self.step()),
        };
        let new_start = spec.start.unwrap_or(base_start);
        let new_stop = spec.stop.unwrap_or(base_stop);
        let new_step = spec.step.unwrap_or(base_step);
        if !new_step.is_finite() || new_step == 0.0 {
            return Err(CurveError::InvalidStep(new_step));
        }

        let steps = basis::step_count(new_start, new_stop, new_step);
        let positions = basis::linspace(new_start, new_stop, steps + 1);
        // An off-grid stop stretches the step so the basis matches `positions`.
        let new_step = if steps > 0 {
            (new_stop - new_start) / steps as f64
        } else {
            new_step
        };
        let undefined = spec.undefined.unwrap_or(f64::NAN);

        debug!(
            "resampling {} onto {new_start}..{new_stop} step {new_step} ({} samples, {:?})",
            self.mnemonic().unwrap_or("curve"),
            positions.len(),
            spec.kind
        );

        let xp = self.basis();
        let data = positions
            .iter()
            .map(|&x| spec.kind.evaluate(&xp, self.values(), x, undefined))
            .collect();
        self.derive(data, new_start, new_step)
    }

    /// Resample onto the basis of another curve or a bare basis.
    pub fn to_basis_like(&self, source: BasisSource<'_>) -> CurveResult<Curve> {
        let spec = match source {
            BasisSource::Basis(b) => ResampleSpec::onto(b.to_vec()),
            BasisSource::Curve(other) => {
                ResampleSpec::onto(other.basis()).with_undefined(other.meta().null)
            }
        };
        self.to_basis(&spec)
    }

    /// Value at position `d`.
    ///
    /// Positions before `start` or at/after `stop` read the edge sample.
    pub fn read_at(&self, d: f64, mode: ReadMode) -> f64 {
        let (i, frac) = utils::find_previous(&self.basis(), d);
        match mode {
            ReadMode::None => self[i],
            ReadMode::Linear => match self.get(i + 1) {
                Some(next) => utils::linear(self[i], next, frac),
                None => self[i],
            },
        }
    }

    /// [`Curve::read_at`] for each position in `ds`.
    pub fn read_at_many(&self, ds: &[f64], mode: ReadMode) -> Vec<f64> {
        ds.iter().map(|&d| self.read_at(d, mode)).collect()
    }

    /// Index of the sample at or before position `d`, clamped to the curve.
    pub fn index_at(&self, d: f64) -> usize {
        utils::find_previous(&self.basis(), d).0
    }

    /// [`Curve::index_at`] for each position in `ds`.
    pub fn index_at_many(&self, ds: &[f64]) -> Vec<usize> {
        let basis = self.basis();
        ds.iter().map(|&d| utils::find_previous(&basis, d).0).collect()
    }
}
