//! Uniformly sampled well-log curves.
//!
//! A [`Curve`] is a 1-D array of samples on a regular basis described by
//! `start` and `step`. Curves can be resampled, smoothed, despiked, blocked
//! into zones, and scored against registries of quality tests.

pub mod config;
pub mod data;
pub mod error;
pub mod utils;

pub use config::IngestOptions;
pub use data::dataset::CurveSet;
pub use data::ingest::RawCurve;
pub use data::model::{Curve, CurveMeta, CurveStats};
pub use data::quality::{AliasMap, QualityTest, SampleFlags, TestMap, TestOutcome};
pub use data::resample::{BasisSource, Interpolation, ReadMode, ResampleSpec};
pub use data::transform::{BlockSpec, Window};
pub use data::window::rolling_window;
pub use error::{CurveError, CurveResult};
