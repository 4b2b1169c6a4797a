use log::debug;

use super::basis;
use super::model::Curve;
use super::window::rolling_window;
use crate::error::{CurveError, CurveResult};
use crate::utils;

/// Default despiking window, about 5 m at the usual 0.1524 m sampling.
pub const DESPIKE_WINDOW: usize = 33;

/// Default despiking threshold in standard deviations.
pub const DESPIKE_Z: f64 = 2.0;

/// A reduction of one window (or one zone) to a single value.
pub type Reduction<'a> = &'a dyn Fn(&[f64]) -> f64;

// ---------------------------------------------------------------------------
// Window lengths
// ---------------------------------------------------------------------------

/// Length of a smoothing window, in samples or in basis units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Window {
    Samples(usize),
    /// Converted to samples by dividing by the curve's step and flooring.
    Units(f64),
}

impl Window {
    pub fn samples(self, step: f64) -> usize {
        match self {
            Window::Samples(n) => n,
            Window::Units(len) => {
                let n = (len / step).floor();
                if n.is_finite() && n > 0.0 {
                    n as usize
                } else {
                    0
                }
            }
        }
    }
}

impl Default for Window {
    fn default() -> Self {
        Window::Samples(DESPIKE_WINDOW)
    }
}

// ---------------------------------------------------------------------------
// Smoothing and despiking
// ---------------------------------------------------------------------------

impl Curve {
    /// Run `reduction` over a window centred on every sample.
    pub fn apply<F>(&self, window: Window, reduction: F) -> Curve
    where
        F: Fn(&[f64]) -> f64,
    {
        let n = window.samples(self.step());
        self.with_samples(rolling_window(self.values(), n, reduction, 1))
    }

    /// Moving average over `window`.
    pub fn smooth(&self, window: Window) -> Curve {
        self.apply(window, utils::mean)
    }

    /// Clamp samples that stray more than `z` standard deviations from the
    /// moving median.
    ///
    /// The threshold uses the standard deviation of the whole curve. Spikes
    /// are clipped to `median ± threshold`, not removed.
    pub fn despike(&self, window: Window, z: f64) -> Curve {
        let threshold = z * utils::nanstd(self.values());
        let n = window.samples(self.step());
        let medians = rolling_window(self.values(), n, utils::median, 1);

        let mut clipped = 0usize;
        let out = self
            .values()
            .iter()
            .zip(&medians)
            .map(|(&x, &m)| {
                if x - m > threshold {
                    clipped += 1;
                    m + threshold
                } else if m - x > threshold {
                    clipped += 1;
                    m - threshold
                } else {
                    x
                }
            })
            .collect();
        debug!(
            "despike {}: clipped {clipped} samples (threshold {threshold})",
            self.mnemonic().unwrap_or("curve")
        );
        self.with_samples(out)
    }

    /// [`Curve::despike`] with a 33-sample window and `z = 2`.
    pub fn despike_default(&self) -> Curve {
        self.despike(Window::default(), DESPIKE_Z)
    }
}

// ---------------------------------------------------------------------------
// Blocking
// ---------------------------------------------------------------------------

/// How a curve is cut into zones.
///
/// Cutoffs come from `cutoffs`, else from all but the first of `values`,
/// else from `n_bins` equal-width bins over `[min, max]` (interior edges
/// only), else from the curve's mean.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockSpec {
    pub cutoffs: Option<Vec<f64>>,
    /// Value for every zone; one more than the number of cutoffs.
    pub values: Option<Vec<f64>>,
    pub n_bins: usize,
    /// Zones include their right edge instead of their left one.
    pub right: bool,
}

impl BlockSpec {
    pub fn cutoffs(cutoffs: Vec<f64>) -> Self {
        Self {
            cutoffs: Some(cutoffs),
            ..Self::default()
        }
    }

    pub fn values(values: Vec<f64>) -> Self {
        Self {
            values: Some(values),
            ..Self::default()
        }
    }

    pub fn bins(n_bins: usize) -> Self {
        Self {
            n_bins,
            ..Self::default()
        }
    }

    pub fn with_values(mut self, values: Vec<f64>) -> Self {
        self.values = Some(values);
        self
    }

    pub fn with_right(mut self, right: bool) -> Self {
        self.right = right;
        self
    }

    fn resolve_cutoffs(&self, samples: &[f64]) -> Vec<f64> {
        let mut cutoffs = match (&self.cutoffs, &self.values) {
            (Some(c), _) => c.clone(),
            (None, Some(v)) => v.iter().skip(1).copied().collect(),
            (None, None) if self.n_bins == 0 => vec![utils::nanmean(samples)],
            (None, None) => {
                let edges = basis::linspace(
                    utils::nanmin(samples),
                    utils::nanmax(samples),
                    self.n_bins + 1,
                );
                edges[1..self.n_bins].to_vec()
            }
        };
        cutoffs.sort_by(f64::total_cmp);
        cutoffs
    }
}

impl Curve {
    /// Discretize the curve into zones.
    ///
    /// Without `values` or `function` the result holds zone indices
    /// `0..=cutoffs.len()`. With `values`, every sample of a zone becomes the
    /// value for that zone index. With only `function`, every sample of a
    /// contiguous zone becomes `function` applied to the original samples of
    /// that zone. Missing samples stay missing.
    pub fn block(&self, spec: &BlockSpec, function: Option<Reduction<'_>>) -> CurveResult<Curve> {
        let cutoffs = spec.resolve_cutoffs(self.values());
        let zones: Vec<f64> = self
            .values()
            .iter()
            .map(|&x| utils::digitize(x, &cutoffs, spec.right))
            .collect();

        if function.is_none() && spec.values.is_none() {
            return Ok(self.with_samples(zones));
        }

        if let Some(values) = &spec.values {
            let needed = cutoffs.len() + 1;
            if values.len() < needed {
                return Err(CurveError::BlockValues {
                    needed,
                    got: values.len(),
                });
            }
        }

        let (tops, codes) = utils::find_edges(&zones);
        let mut out = zones.clone();
        for (k, (&top, &code)) in tops.iter().zip(&codes).enumerate() {
            let base = tops.get(k + 1).copied().unwrap_or(zones.len());
            let fill = if code.is_nan() {
                f64::NAN
            } else if let Some(values) = &spec.values {
                values[code as usize]
            } else if let Some(f) = function {
                f(&self.values()[top..base])
            } else {
                code
            };
            out[top..base].iter_mut().for_each(|v| *v = fill);
        }
        Ok(self.with_samples(out))
    }
}
