//! Ready-made quality tests for [`TestMap`](super::quality::TestMap)
//! registries.

use super::model::Curve;
use super::quality::{QualityTest, SampleFlags, TestOutcome};
use super::transform::Window;
use crate::utils;

/// Number of identical consecutive samples that counts as a flat zone.
pub const FLAT_RUN: usize = 5;

// ---------------------------------------------------------------------------
// Curve-level tests
// ---------------------------------------------------------------------------

/// Passes when no sample is missing.
pub fn no_nans() -> QualityTest<TestOutcome> {
    QualityTest::new("no_nans", |c: &Curve| -> TestOutcome {
        c.values().iter().all(|v| !v.is_nan()).into()
    })
}

/// Passes when there are no missing samples between the first and last
/// valid ones.
pub fn no_gaps() -> QualityTest<TestOutcome> {
    QualityTest::new("no_gaps", |c: &Curve| -> TestOutcome {
        match utils::top_and_tail(c.values()) {
            Some(range) => c.values()[range].iter().all(|v| !v.is_nan()),
            None => false,
        }
        .into()
    })
}

/// Passes when at least one sample is present.
pub fn not_empty() -> QualityTest<TestOutcome> {
    QualityTest::new("not_empty", |c: &Curve| -> TestOutcome {
        c.values().iter().any(|v| !v.is_nan()).into()
    })
}

/// Passes when no run of [`FLAT_RUN`] identical valid samples exists.
pub fn no_flat() -> QualityTest<TestOutcome> {
    QualityTest::new("no_flat", |c: &Curve| -> TestOutcome {
        let flat = c
            .values()
            .windows(FLAT_RUN)
            .any(|w| !w[0].is_nan() && w.iter().all(|&v| v == w[0]));
        (!flat).into()
    })
}

/// Passes when every valid sample is strictly positive.
pub fn all_positive() -> QualityTest<TestOutcome> {
    QualityTest::new("all_positive", |c: &Curve| -> TestOutcome {
        c.values()
            .iter()
            .filter(|v| !v.is_nan())
            .all(|&v| v > 0.0)
            .into()
    })
}

/// Passes when every valid sample lies in `[lo, hi]`.
pub fn all_between(lo: f64, hi: f64) -> QualityTest<TestOutcome> {
    QualityTest::new("all_between", move |c: &Curve| -> TestOutcome {
        c.values()
            .iter()
            .filter(|v| !v.is_nan())
            .all(|&v| (lo..=hi).contains(&v))
            .into()
    })
}

/// Passes unless the valid samples only ever increase or only ever
/// decrease, which usually means an index channel rather than a measurement.
pub fn no_monotonic() -> QualityTest<TestOutcome> {
    QualityTest::new("no_monotonic", |c: &Curve| -> TestOutcome {
        let valid: Vec<f64> = c.values().iter().copied().filter(|v| !v.is_nan()).collect();
        let diffs = utils::diff(&valid);
        if diffs.is_empty() {
            return true.into();
        }
        let rising = diffs.iter().all(|&d| d > 0.0);
        let falling = diffs.iter().all(|&d| d < 0.0);
        (!(rising || falling)).into()
    })
}

/// Fraction of samples present, as a score in `[0, 1]`.
pub fn fraction_present() -> QualityTest<TestOutcome> {
    QualityTest::new("fraction_present", |c: &Curve| {
        let stats = c.describe();
        TestOutcome::Score((stats.samples - stats.nulls) as f64 / stats.samples as f64)
    })
}

// ---------------------------------------------------------------------------
// Per-sample flags
// ---------------------------------------------------------------------------

/// `true` where the sample is present.
pub fn flag_nans() -> QualityTest<SampleFlags> {
    QualityTest::new("flag_nans", |c: &Curve| -> SampleFlags {
        c.values().iter().map(|v| !v.is_nan()).collect()
    })
}

/// `true` where despiking with `window` and `z` leaves the sample alone.
pub fn flag_spikes(window: Window, z: f64) -> QualityTest<SampleFlags> {
    QualityTest::new("flag_spikes", move |c: &Curve| -> SampleFlags {
        let despiked = c.despike(window, z);
        c.values()
            .iter()
            .zip(despiked.values())
            .map(|(a, b)| a == b || (a.is_nan() && b.is_nan()))
            .collect()
    })
}
