use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use log::debug;

use super::model::Curve;

// ---------------------------------------------------------------------------
// Alias groups
// ---------------------------------------------------------------------------

/// Alias group name → mnemonics considered equivalent, e.g.
/// `"Gamma" → ["GR", "GRC", "SGR"]`.
pub type AliasMap = BTreeMap<String, Vec<String>>;

/// Every alias group that lists `mnemonic`, in map order. Empty when none do.
pub fn get_alias(mnemonic: &str, alias: &AliasMap) -> Vec<String> {
    alias
        .iter()
        .filter(|(_, members)| members.iter().any(|m| m == mnemonic))
        .map(|(group, _)| group.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Quality tests
// ---------------------------------------------------------------------------

/// Keys whose tests apply to every curve, matched case-insensitively.
pub const WILDCARDS: [&str; 2] = ["each", "all"];

/// A named check run against a whole curve.
///
/// `T` is [`TestOutcome`] for curve-level tests and [`SampleFlags`] for
/// per-sample flagging.
pub struct QualityTest<T> {
    name: String,
    func: Arc<dyn Fn(&Curve) -> T + Send + Sync>,
}

impl<T> QualityTest<T> {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Curve) -> T + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn run(&self, curve: &Curve) -> T {
        (self.func)(curve)
    }
}

impl<T> Clone for QualityTest<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            func: Arc::clone(&self.func),
        }
    }
}

impl<T> fmt::Debug for QualityTest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QualityTest").field("name", &self.name).finish()
    }
}

/// Result of a curve-level test: pass/fail or a numeric score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TestOutcome {
    Pass(bool),
    Score(f64),
}

impl TestOutcome {
    /// `1.0`/`0.0` for pass/fail, the score itself otherwise.
    pub fn value(self) -> f64 {
        match self {
            TestOutcome::Pass(true) => 1.0,
            TestOutcome::Pass(false) => 0.0,
            TestOutcome::Score(s) => s,
        }
    }
}

impl From<bool> for TestOutcome {
    fn from(b: bool) -> Self {
        TestOutcome::Pass(b)
    }
}

impl From<f64> for TestOutcome {
    fn from(s: f64) -> Self {
        TestOutcome::Score(s)
    }
}

/// Per-sample pass flags, one per curve sample.
pub type SampleFlags = Vec<bool>;

/// Key (mnemonic, alias group, or wildcard) → tests registered under it.
///
/// A key mapped to an empty list is an explicit "run nothing" for that
/// mnemonic, see [`quality`].
pub type TestMap<T> = BTreeMap<String, Vec<QualityTest<T>>>;

/// Collect the tests that apply to a curve called `mnemonic`:
///
/// 1. tests under any wildcard key (`each`, `all`, any case),
/// 2. tests under the mnemonic itself,
/// 3. tests under every alias group listing the mnemonic.
///
/// Duplicates reachable by several paths are kept.
pub fn resolve_tests<'a, T>(
    tests: &'a TestMap<T>,
    mnemonic: Option<&str>,
    alias: Option<&AliasMap>,
) -> Vec<&'a QualityTest<T>> {
    let wildcard = tests
        .iter()
        .filter(|(key, _)| WILDCARDS.iter().any(|w| key.eq_ignore_ascii_case(w)))
        .flat_map(|(_, list)| list.iter());

    let direct = mnemonic
        .and_then(|m| tests.get(m))
        .into_iter()
        .flat_map(|list| list.iter());

    let groups = match (mnemonic, alias) {
        (Some(m), Some(a)) => get_alias(m, a),
        _ => Vec::new(),
    };
    let aliased = groups
        .iter()
        .filter_map(|g| tests.get(g))
        .flat_map(|list| list.iter());

    wildcard.chain(direct).chain(aliased).collect()
}

fn run_all<T>(curve: &Curve, resolved: Vec<&QualityTest<T>>) -> BTreeMap<String, T> {
    let mut results = BTreeMap::new();
    for test in resolved {
        results.insert(test.name().to_string(), test.run(curve));
    }
    results
}

/// Run every test that applies to `curve`, keyed by test name.
///
/// If `tests` registers an empty list under the curve's own mnemonic, no
/// tests run at all, whatever the wildcard and alias keys hold.
pub fn quality(
    curve: &Curve,
    tests: &TestMap<TestOutcome>,
    alias: Option<&AliasMap>,
) -> BTreeMap<String, TestOutcome> {
    let mnemonic = curve.mnemonic();
    let suppressed = mnemonic
        .and_then(|m| tests.get(m))
        .is_some_and(|list| list.is_empty());
    if suppressed {
        debug!("{}: tests explicitly disabled", mnemonic.unwrap_or_default());
        return BTreeMap::new();
    }
    let resolved = resolve_tests(tests, mnemonic, alias);
    debug!(
        "{}: running {} quality tests",
        mnemonic.unwrap_or("curve"),
        resolved.len()
    );
    run_all(curve, resolved)
}

/// Run per-sample tests that apply to `curve`.
///
/// Resolution matches [`quality`] except that an empty list under the
/// mnemonic does not disable the wildcard and alias tests.
pub fn qflags<T>(curve: &Curve, tests: &TestMap<T>, alias: Option<&AliasMap>) -> BTreeMap<String, T> {
    run_all(curve, resolve_tests(tests, curve.mnemonic(), alias))
}

/// Same as [`qflags`].
pub fn qflag<T>(curve: &Curve, tests: &TestMap<T>, alias: Option<&AliasMap>) -> BTreeMap<String, T> {
    qflags(curve, tests, alias)
}

/// Fraction of tests passed: `1.0` all, `0.0` none, `-1.0` if no test
/// applied to the curve.
pub fn quality_score(curve: &Curve, tests: &TestMap<TestOutcome>, alias: Option<&AliasMap>) -> f64 {
    let results = quality(curve, tests, alias);
    if results.is_empty() {
        return -1.0;
    }
    results.values().map(|r| r.value()).sum::<f64>() / results.len() as f64
}

impl Curve {
    /// Alias groups this curve's mnemonic belongs to.
    pub fn get_alias(&self, alias: &AliasMap) -> Vec<String> {
        self.mnemonic()
            .map(|m| get_alias(m, alias))
            .unwrap_or_default()
    }

    pub fn quality(
        &self,
        tests: &TestMap<TestOutcome>,
        alias: Option<&AliasMap>,
    ) -> BTreeMap<String, TestOutcome> {
        quality(self, tests, alias)
    }

    pub fn quality_score(&self, tests: &TestMap<TestOutcome>, alias: Option<&AliasMap>) -> f64 {
        quality_score(self, tests, alias)
    }

    pub fn qflags<T>(&self, tests: &TestMap<T>, alias: Option<&AliasMap>) -> BTreeMap<String, T> {
        qflags(self, tests, alias)
    }

    pub fn qflag<T>(&self, tests: &TestMap<T>, alias: Option<&AliasMap>) -> BTreeMap<String, T> {
        qflag(self, tests, alias)
    }
}
