use std::collections::BTreeMap;

use log::warn;

use super::basis;
use super::model::Curve;
use super::quality::{AliasMap, TestMap, TestOutcome};
use super::resample::ResampleSpec;
use crate::error::CurveResult;

// ---------------------------------------------------------------------------
// CurveSet – the curves of one well
// ---------------------------------------------------------------------------

/// Curves of a single well keyed by mnemonic, in load order.
#[derive(Debug, Clone, Default)]
pub struct CurveSet {
    curves: BTreeMap<String, Curve>,
    /// Mnemonics in the order they were loaded.
    pub mnemonics: Vec<String>,
}

impl CurveSet {
    /// Index curves by mnemonic. Unnamed curves become `CURVE<n>`; a
    /// repeated mnemonic replaces the earlier curve.
    pub fn from_curves(curves: Vec<Curve>) -> Self {
        let mut set = CurveSet::default();
        for (i, curve) in curves.into_iter().enumerate() {
            let key = curve
                .mnemonic()
                .map(str::to_string)
                .unwrap_or_else(|| format!("CURVE{i}"));
            if set.curves.insert(key.clone(), curve).is_some() {
                warn!("duplicate curve {key}; keeping the last one");
            } else {
                set.mnemonics.push(key);
            }
        }
        set
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn get(&self, mnemonic: &str) -> Option<&Curve> {
        self.curves.get(mnemonic)
    }

    /// Curves in load order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Curve)> {
        self.mnemonics
            .iter()
            .filter_map(|m| self.curves.get(m).map(|c| (m.as_str(), c)))
    }

    /// Resolve `mnemonic` through `alias`: an alias group name picks the
    /// first of its members present here; anything else must match
    /// directly.
    pub fn get_mnemonic<'a>(&'a self, mnemonic: &'a str, alias: Option<&'a AliasMap>) -> Option<&'a str> {
        let candidates: Vec<&str> = match alias.and_then(|a| a.get(mnemonic)) {
            Some(members) => members.iter().map(String::as_str).collect(),
            None => vec![mnemonic],
        };
        candidates
            .into_iter()
            .find(|m| self.curves.contains_key(*m))
    }

    /// [`CurveSet::get`] after alias resolution.
    pub fn get_curve(&self, mnemonic: &str, alias: Option<&AliasMap>) -> Option<&Curve> {
        self.get_mnemonic(mnemonic, alias).and_then(|m| self.get(m))
    }

    // -- Quality control --

    /// Quality results for every curve, keyed by mnemonic.
    pub fn qc_data(
        &self,
        tests: &TestMap<TestOutcome>,
        alias: Option<&AliasMap>,
    ) -> BTreeMap<String, BTreeMap<String, TestOutcome>> {
        self.iter()
            .map(|(m, c)| (m.to_string(), c.quality(tests, alias)))
            .collect()
    }

    /// Quality score for every curve, keyed by mnemonic.
    pub fn qc_scores(&self, tests: &TestMap<TestOutcome>, alias: Option<&AliasMap>) -> BTreeMap<String, f64> {
        self.iter()
            .map(|(m, c)| (m.to_string(), c.quality_score(tests, alias)))
            .collect()
    }

    // -- Basis --

    /// Basis covering every curve: shallowest start, deepest stop, finest
    /// step. `None` for an empty set.
    pub fn survey_basis(&self) -> Option<Vec<f64>> {
        let mut curves = self.curves.values();
        let first = curves.next()?;
        let (start, stop, step) = curves.fold(
            (first.start(), first.stop(), first.step()),
            |(start, stop, step), c| (start.min(c.start()), stop.max(c.stop()), step.min(c.step())),
        );
        let n = basis::step_count(start, stop, step) + 1;
        Some(basis::linspace(start, stop, n))
    }

    /// Resample every curve onto `basis`, or onto [`CurveSet::survey_basis`]
    /// when none is given.
    pub fn unify_basis(&self, basis: Option<&[f64]>) -> CurveResult<CurveSet> {
        let target = match basis {
            Some(b) => b.to_vec(),
            None => match self.survey_basis() {
                Some(b) => b,
                None => return Ok(self.clone()),
            },
        };
        let spec = ResampleSpec::onto(target);
        let mut curves = BTreeMap::new();
        for (m, c) in self.iter() {
            curves.insert(m.to_string(), c.to_basis(&spec)?);
        }
        Ok(CurveSet {
            curves,
            mnemonics: self.mnemonics.clone(),
        })
    }
}
