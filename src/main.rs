use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;

use rusty_curve::config::{load_alias_map, IngestOptions};
use rusty_curve::data::{checks, loader};
use rusty_curve::{TestMap, TestOutcome};

const USAGE: &str = "usage: rusty-curve <log.csv|log.json> [alias.json] [options.json]";

/// Checks run against every curve.
fn default_tests() -> TestMap<TestOutcome> {
    let mut tests = TestMap::new();
    tests.insert(
        "each".to_string(),
        vec![
            checks::not_empty(),
            checks::no_gaps(),
            checks::no_flat(),
            checks::no_monotonic(),
            checks::fraction_present(),
        ],
    );
    tests
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let path = PathBuf::from(args.next().context(USAGE)?);
    let alias = args
        .next()
        .map(|p| load_alias_map(&PathBuf::from(p)))
        .transpose()?;
    let options = match args.next() {
        Some(p) => IngestOptions::from_file(&PathBuf::from(p))?,
        None => IngestOptions::default(),
    };

    let set = loader::load_file(&path, &options)
        .with_context(|| format!("loading {}", path.display()))?;
    let tests = default_tests();
    let scores = set.qc_scores(&tests, alias.as_ref());

    for (mnemonic, curve) in set.iter() {
        let stats = curve.describe();
        println!("{curve}");
        println!(
            "    min {:.4}  max {:.4}  mean {:.4}  nulls {}/{}",
            stats.min, stats.max, stats.mean, stats.nulls, stats.samples
        );
        let score = scores.get(mnemonic).copied().unwrap_or(-1.0);
        println!("    qc score {score:.3}");
    }
    info!("checked {} curves", set.len());
    Ok(())
}
