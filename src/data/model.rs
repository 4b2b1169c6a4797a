use std::fmt;
use std::ops::{Index, IndexMut, Range};

use serde::{Deserialize, Serialize};

use super::basis;
use crate::error::{CurveError, CurveResult};
use crate::utils;

/// Missing-value sentinel used by most well-log writers.
pub const DEFAULT_NULL: f64 = -999.25;

// ---------------------------------------------------------------------------
// CurveMeta – descriptive fields carried through every transform
// ---------------------------------------------------------------------------

/// Descriptive metadata of a curve.
///
/// Transforms copy this struct as a whole; none of them override a field
/// here (geometry lives on [`Curve`] itself).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveMeta {
    /// Channel name, e.g. `GR` or `RHOB`. Primary key for alias and QC lookup.
    pub mnemonic: Option<String>,
    pub description: Option<String>,
    pub units: Option<String>,
    pub run: i64,
    /// Sentinel the source used for missing samples. Inside a curve missing
    /// samples are always `NaN`.
    pub null: f64,
    pub service_company: Option<String>,
    pub date: Option<String>,
    pub code: Option<String>,
    pub basis_units: Option<String>,
}

impl Default for CurveMeta {
    fn default() -> Self {
        Self {
            mnemonic: None,
            description: None,
            units: None,
            run: 0,
            null: DEFAULT_NULL,
            service_company: None,
            date: None,
            code: None,
            basis_units: None,
        }
    }
}

impl CurveMeta {
    /// Metadata with only the mnemonic set.
    pub fn named(mnemonic: impl Into<String>) -> Self {
        Self {
            mnemonic: Some(mnemonic.into()),
            ..Self::default()
        }
    }

    /// Builder-style setter for the units.
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }
}

// ---------------------------------------------------------------------------
// CurveStats – read-only summary for reports and renderers
// ---------------------------------------------------------------------------

/// Summary statistics of a curve, ignoring missing samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurveStats {
    pub samples: usize,
    pub nulls: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

// ---------------------------------------------------------------------------
// Curve – samples on a uniform basis
// ---------------------------------------------------------------------------

/// A measurement series sampled at a uniform interval along depth or time.
///
/// `stop` and `basis` are derived from `(start, step, len)` on demand.
/// `step` is always positive and finite, and there is at least one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    samples: Vec<f64>,
    start: f64,
    step: f64,
    meta: CurveMeta,
}

impl Curve {
    /// Build a curve from samples and a `(start, step)` pair.
    ///
    /// A negative step describes a descending basis: geometry is flipped to
    /// run min-to-max, samples are kept in their given order.
    pub fn new(samples: Vec<f64>, start: f64, step: f64, meta: CurveMeta) -> CurveResult<Self> {
        if samples.is_empty() {
            return Err(CurveError::EmptySamples);
        }
        let (start, step) = normalize(start, step, samples.len())?;
        Ok(Self {
            samples,
            start,
            step,
            meta,
        })
    }

    /// Build a curve from samples and an explicit, uniform basis.
    ///
    /// Only the first two positions are used to derive the step. A
    /// single-sample curve gets a unit step.
    pub fn from_basis(samples: Vec<f64>, basis: &[f64], meta: CurveMeta) -> CurveResult<Self> {
        if samples.len() != basis.len() {
            return Err(CurveError::LengthMismatch {
                samples: samples.len(),
                basis: basis.len(),
            });
        }
        match basis {
            [] => Err(CurveError::EmptySamples),
            [only] => Self::new(samples, *only, 1.0, meta),
            [a, b, ..] if a > b => {
                let n = basis.len();
                Self::new(samples, basis[n - 1], basis[n - 2] - basis[n - 1], meta)
            }
            [a, b, ..] => Self::new(samples, *a, b - a, meta),
        }
    }

    /// New curve with this curve's metadata and the given geometry.
    pub(crate) fn derive(&self, samples: Vec<f64>, start: f64, step: f64) -> CurveResult<Self> {
        Self::new(samples, start, step, self.meta.clone())
    }

    /// New curve with this curve's geometry and metadata but new samples.
    /// `samples` must have the same length.
    pub(crate) fn with_samples(&self, samples: Vec<f64>) -> Self {
        debug_assert_eq!(samples.len(), self.samples.len());
        Self {
            samples,
            start: self.start,
            step: self.step,
            meta: self.meta.clone(),
        }
    }

    // -- Accessors --

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always `false`: a curve holds at least one sample.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.samples
    }

    /// Mutable view of the samples for in-place windowed writes.
    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.samples
    }

    pub fn get(&self, i: usize) -> Option<f64> {
        self.samples.get(i).copied()
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Position of the last sample.
    pub fn stop(&self) -> f64 {
        basis::stop(self.start, self.step, self.len())
    }

    /// Position of every sample, `start` to `stop` inclusive.
    pub fn basis(&self) -> Vec<f64> {
        basis::basis(self.start, self.step, self.len())
    }

    pub fn meta(&self) -> &CurveMeta {
        &self.meta
    }

    pub fn meta_mut(&mut self) -> &mut CurveMeta {
        &mut self.meta
    }

    pub fn mnemonic(&self) -> Option<&str> {
        self.meta.mnemonic.as_deref()
    }

    /// Count, missing count, mean, min and max of the samples.
    pub fn describe(&self) -> CurveStats {
        CurveStats {
            samples: self.len(),
            nulls: self.samples.iter().filter(|v| v.is_nan()).count(),
            mean: utils::nanmean(&self.samples),
            min: utils::nanmin(&self.samples),
            max: utils::nanmax(&self.samples),
        }
    }

    // -- Slicing --

    /// Every `stride`-th sample of `range` as a new curve. The new start is
    /// the basis position of `range.start`, the new step is `step * stride`.
    pub fn slice(&self, range: Range<usize>, stride: usize) -> CurveResult<Self> {
        if stride == 0 {
            return Err(CurveError::InvalidStride);
        }
        if range.start >= range.end || range.end > self.len() {
            return Err(CurveError::SliceOutOfRange {
                start: range.start,
                end: range.end,
                len: self.len(),
            });
        }
        let start = self.start + range.start as f64 * self.step;
        let samples = self.samples[range].iter().step_by(stride).copied().collect();
        self.derive(samples, start, self.step * stride as f64)
    }

    // -- Missing samples --

    /// Fill missing samples in place by linear interpolation. Leading and
    /// trailing gaps take the nearest valid sample.
    pub fn interpolate(&mut self) -> &mut Self {
        utils::interpolate_nans(&mut self.samples);
        self
    }

    /// Remove samples matching `condition` and interpolate across the gaps.
    pub fn interpolate_where<F>(&mut self, _condition: F) -> CurveResult<&mut Self>
    where
        F: Fn(f64) -> bool,
    {
        Err(CurveError::NotImplemented("interpolate_where"))
    }

    /// Copy with leading and trailing gaps filled from the first and last
    /// valid samples.
    pub fn extrapolate(&self) -> Self {
        self.with_samples(utils::extrapolate(&self.samples))
    }

    /// Copy without leading and trailing missing samples. `None` if every
    /// sample is missing.
    pub fn top_and_tail(&self) -> Option<Self> {
        let range = utils::top_and_tail(&self.samples)?;
        self.slice(range, 1).ok()
    }
}

/// Validate a step and flip a descending geometry to run min-to-max.
fn normalize(start: f64, step: f64, n: usize) -> CurveResult<(f64, f64)> {
    if !step.is_finite() || step == 0.0 {
        return Err(CurveError::InvalidStep(step));
    }
    if step < 0.0 {
        Ok((basis::stop(start, step, n), -step))
    } else {
        Ok((start, step))
    }
}

impl Index<usize> for Curve {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        &self.samples[i]
    }
}

impl IndexMut<usize> for Curve {
    fn index_mut(&mut self, i: usize) -> &mut f64 {
        &mut self.samples[i]
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.mnemonic().unwrap_or("<unnamed>");
        let units = self.meta.units.as_deref().unwrap_or("-");
        write!(
            f,
            "{name} [{units}] {:.4} : {:.4} : {:.4} ({} samples)",
            self.start,
            self.stop(),
            self.step,
            self.len()
        )
    }
}
