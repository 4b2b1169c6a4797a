use std::path::Path;

use anyhow::{bail, Context, Result};
use log::info;
use serde::Deserialize;

use super::dataset::CurveSet;
use super::ingest::RawCurve;
use super::model::CurveMeta;
use crate::config::IngestOptions;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the curves of one well from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – first column is the basis, every other column a curve
/// * `.json` – `{ "depth": [...], "curves": [{ "mnemonic": ..., "data": [...] }] }`
pub fn load_file(path: &Path, options: &IngestOptions) -> Result<CurveSet> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let set = match ext.as_str() {
        "csv" | "txt" => load_csv(path, options),
        "json" => load_json(path, options),
        other => bail!("Unsupported file extension: .{other}"),
    }?;
    info!("loaded {} curves from {}", set.len(), path.display());
    Ok(set)
}

fn meta_for(mnemonic: &str, units: Option<String>, options: &IngestOptions) -> CurveMeta {
    CurveMeta {
        mnemonic: Some(mnemonic.to_string()),
        units,
        run: options.run,
        null: options.null,
        service_company: options.service_company.clone(),
        date: options.date.clone(),
        basis_units: options.basis_units.clone(),
        ..CurveMeta::default()
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row, basis in the first column.
///
/// ```text
/// DEPT,GR [API],RHOB [g/cc]
/// 1500.0,65.2,2.41
/// 1500.1524,-999.25,2.43
/// ```
///
/// A bracketed suffix on a header is taken as the units. Empty cells and the
/// null sentinel become missing samples.
pub fn load_csv(path: &Path, options: &IngestOptions) -> Result<CurveSet> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<(String, Option<String>)> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(split_units)
        .collect();

    if headers.len() < 2 {
        bail!("CSV needs a basis column and at least one curve column");
    }

    let mut depth = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); headers.len() - 1];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.len() != headers.len() {
            bail!(
                "CSV row {row_no}: expected {} fields, found {}",
                headers.len(),
                record.len()
            );
        }
        let d = parse_cell(&record[0], row_no, &headers[0].0)?;
        if d.is_nan() {
            bail!("CSV row {row_no}: missing basis value");
        }
        depth.push(d);
        for (col, column) in columns.iter_mut().enumerate() {
            let v = parse_cell(&record[col + 1], row_no, &headers[col + 1].0)?;
            column.push(if options.is_null(v) { f64::NAN } else { v });
        }
    }

    let basis_units = headers[0].1.clone();
    let mut curves = Vec::with_capacity(columns.len());
    for ((mnemonic, units), samples) in headers.into_iter().skip(1).zip(columns) {
        let mut meta = meta_for(&mnemonic, units, options);
        if meta.basis_units.is_none() {
            meta.basis_units = basis_units.clone();
        }
        let curve = RawCurve::new(samples, meta)
            .with_depth(depth.clone())
            .with_step(options.step)
            .build()
            .with_context(|| format!("building curve {mnemonic}"))?;
        curves.push(curve);
    }

    Ok(CurveSet::from_curves(curves))
}

/// `"GR [API]"` → `("GR", Some("API"))`.
fn split_units(header: &str) -> (String, Option<String>) {
    let header = header.trim();
    match (header.find('['), header.ends_with(']')) {
        (Some(open), true) => {
            let name = header[..open].trim().to_string();
            let units = header[open + 1..header.len() - 1].trim();
            let units = (!units.is_empty()).then(|| units.to_string());
            (name, units)
        }
        _ => (header.to_string(), None),
    }
}

fn parse_cell(s: &str, row: usize, col: &str) -> Result<f64> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("nan") {
        return Ok(f64::NAN);
    }
    s.parse::<f64>()
        .with_context(|| format!("Row {row}, {col}: '{s}' is not a number"))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct JsonLog {
    depth: Option<Vec<f64>>,
    start: Option<f64>,
    stop: Option<f64>,
    step: Option<f64>,
    basis_units: Option<String>,
    curves: Vec<JsonCurve>,
}

#[derive(Debug, Deserialize)]
struct JsonCurve {
    mnemonic: String,
    units: Option<String>,
    description: Option<String>,
    code: Option<String>,
    /// `null` entries are missing samples.
    data: Vec<Option<f64>>,
}

/// Expected JSON schema:
///
/// ```json
/// {
///   "depth": [1500.0, 1500.1524, ...],
///   "basis_units": "m",
///   "curves": [
///     { "mnemonic": "GR", "units": "API", "data": [65.2, null, ...] }
///   ]
/// }
/// ```
///
/// `depth` may be replaced by `start` plus `step` or `stop`.
pub fn load_json(path: &Path, options: &IngestOptions) -> Result<CurveSet> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let doc: JsonLog = serde_json::from_str(&text).context("parsing JSON")?;

    let mut curves = Vec::with_capacity(doc.curves.len());
    for jc in doc.curves {
        let samples: Vec<f64> = jc
            .data
            .iter()
            .map(|v| match v {
                Some(x) if !options.is_null(*x) => *x,
                _ => f64::NAN,
            })
            .collect();

        let mut meta = meta_for(&jc.mnemonic, jc.units, options);
        meta.description = jc.description;
        meta.code = jc.code;
        if doc.basis_units.is_some() {
            meta.basis_units = doc.basis_units.clone();
        }

        let mut raw = RawCurve::new(samples, meta).with_step(doc.step.unwrap_or(0.0));
        if let Some(depth) = &doc.depth {
            raw = raw.with_depth(depth.clone());
        }
        raw.start = doc.start;
        raw.stop = doc.stop;
        if raw.depth.is_none() && raw.stop.is_none() && raw.step == 0.0 {
            raw.step = options.step;
        }
        let curve = raw
            .build()
            .with_context(|| format!("building curve {}", jc.mnemonic))?;
        curves.push(curve);
    }

    Ok(CurveSet::from_curves(curves))
}
