/// Data layer: curves, their geometry, conditioning, and quality control.
///
/// Architecture:
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawCurve per column
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  ingest   │  resolve geometry, regularize depth → Curve
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ CurveSet  │  curves of one well, keyed by mnemonic
///   └──────────┘
///        │
///        ├──▶ resample   to_basis, read_at, index_at
///        ├──▶ transform  smooth, despike, block
///        └──▶ quality    alias-aware test registries → scores / flags
/// ```

pub mod basis;
pub mod checks;
pub mod dataset;
pub mod ingest;
pub mod loader;
pub mod model;
pub mod quality;
pub mod resample;
pub mod transform;
pub mod window;
