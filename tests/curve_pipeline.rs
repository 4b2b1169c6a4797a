use approx::assert_abs_diff_eq;

use rusty_curve::data::{basis, checks};
use rusty_curve::{
    BasisSource, BlockSpec, Curve, CurveMeta, Interpolation, RawCurve, ReadMode, ResampleSpec,
    TestMap, Window,
};

fn gr(samples: Vec<f64>) -> Curve {
    Curve::new(samples, 0.0, 1.0, CurveMeta::named("GR").with_units("API")).unwrap()
}

#[test]
fn basis_geometry_holds_for_many_shapes() {
    for &(start, step, n) in &[(0.0, 1.0, 5), (1500.0, 0.1524, 1000), (-3.5, 0.25, 1), (12.0, 2.5, 2)] {
        let b = basis::basis(start, step, n);
        assert_eq!(b.len(), n);
        assert_eq!(b[0], start);
        assert_eq!(b[n - 1], basis::stop(start, step, n));
        assert_abs_diff_eq!(b[n - 1], start + (n - 1) as f64 * step, epsilon = 1e-9);
    }
}

#[test]
fn five_sample_curve() {
    let c = gr(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    assert_eq!(c.basis(), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    assert_eq!(c.stop(), 4.0);
    assert_eq!(c.to_string(), "GR [API] 0.0000 : 4.0000 : 1.0000 (5 samples)");
}

#[test]
fn identity_resampling_reproduces_samples() {
    let samples: Vec<f64> = (0..200).map(|i| (i as f64 * 0.1).sin() * 40.0 + 80.0).collect();
    let c = Curve::new(samples.clone(), 1500.0, 0.1524, CurveMeta::named("GR")).unwrap();
    let same = c.to_basis(&ResampleSpec::onto(c.basis())).unwrap();
    assert_eq!(same.len(), c.len());
    assert_abs_diff_eq!(same.start(), c.start(), epsilon = 1e-9);
    assert_abs_diff_eq!(same.step(), c.step(), epsilon = 1e-9);
    for (a, b) in same.values().iter().zip(&samples) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-9);
    }
}

#[test]
fn resampling_to_a_coarser_step_and_out_of_range() {
    let c = gr(vec![0.0, 10.0, 20.0, 30.0, 40.0]);
    let coarse = c.to_basis(&ResampleSpec::step(2.0)).unwrap();
    assert_eq!(coarse.values(), &[0.0, 20.0, 40.0]);
    assert_eq!(coarse.step(), 2.0);

    let wide = c
        .to_basis(&ResampleSpec::step(1.0).with_start(-1.0).with_stop(5.0).with_undefined(-1.0))
        .unwrap();
    assert_eq!(wide.values(), &[-1.0, 0.0, 10.0, 20.0, 30.0, 40.0, -1.0]);

    let stepped = c
        .to_basis(&ResampleSpec::step(0.5).with_kind(Interpolation::Previous))
        .unwrap();
    assert_eq!(stepped[1], 0.0);
    assert_eq!(stepped[3], 10.0);
}

#[test]
fn resampling_like_another_curve_uses_its_null() {
    let c = gr(vec![0.0, 10.0, 20.0]);
    let other = Curve::new(vec![0.0; 4], 1.0, 1.0, CurveMeta::named("RHOB")).unwrap();
    let like = c.to_basis_like(BasisSource::Curve(&other)).unwrap();
    assert_eq!(like.start(), 1.0);
    assert_eq!(like.values(), &[10.0, 20.0, -999.25, -999.25]);
    assert_eq!(like.mnemonic(), Some("GR"));
}

#[test]
fn reading_values_by_position() {
    let c = gr(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    assert_eq!(c.read_at(1.5, ReadMode::Linear), 2.5);
    assert_eq!(c.read_at(1.5, ReadMode::None), 2.0);
    assert_eq!(c.read_at(4.0, ReadMode::Linear), 5.0);
    assert_eq!(c.read_at(10.0, ReadMode::Linear), 5.0);
    assert_eq!(c.read_at(-3.0, ReadMode::Linear), 1.0);
    assert_eq!(c.read_at_many(&[0.25, 3.0], ReadMode::Linear), vec![1.25, 4.0]);
    assert_eq!(c.index_at_many(&[-1.0, 2.9, 99.0]), vec![0, 2, 4]);
}

#[test]
fn blocking_with_a_single_cutoff() {
    let c = gr(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    let left = c.block(&BlockSpec::cutoffs(vec![3.0]), None).unwrap();
    assert_eq!(left.values(), &[0.0, 0.0, 1.0, 1.0, 1.0]);
    let right = c
        .block(&BlockSpec::cutoffs(vec![3.0]).with_right(true), None)
        .unwrap();
    assert_eq!(right.values(), &[0.0, 0.0, 0.0, 1.0, 1.0]);
}

#[test]
fn reblocking_a_blocked_curve_is_stable() {
    let c = gr(vec![5.0, 12.0, 25.0, 31.0, 18.0, 2.0]);
    let spec = BlockSpec::values(vec![10.0, 20.0, 30.0]);
    let once = c.block(&spec, None).unwrap();
    let twice = once.block(&spec, None).unwrap();
    assert_eq!(once.values(), twice.values());
    assert_eq!(once.values(), &[10.0, 10.0, 20.0, 30.0, 10.0, 10.0]);
}

#[test]
fn reblocking_zone_indices_in_index_space() {
    let c = gr(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    let zones = c.block(&BlockSpec::cutoffs(vec![2.5, 4.5]), None).unwrap();
    assert_eq!(zones.values(), &[0.0, 0.0, 1.0, 1.0, 2.0]);

    // Zone codes are integers, so cutoffs halfway between them keep every code.
    let index_cutoffs = BlockSpec::cutoffs(vec![0.5, 1.5]);
    let again = zones.block(&index_cutoffs, None).unwrap();
    assert_eq!(again.values(), zones.values());
    assert_eq!(again.block(&index_cutoffs, None).unwrap().values(), zones.values());

    // The raw-value cutoffs do not carry over to zone codes.
    let raw_again = zones.block(&BlockSpec::cutoffs(vec![2.5, 4.5]), None).unwrap();
    assert_eq!(raw_again.values(), &[0.0; 5]);
}

#[test]
fn despiking_clips_only_the_spike() {
    let c = gr(vec![1.0, 1.0, 1.0, 100.0, 1.0, 1.0, 1.0]);
    let d = c.despike(Window::Samples(5), 1.0);
    let threshold = rusty_curve::utils::nanstd(c.values());
    assert_abs_diff_eq!(d[3], 1.0 + threshold, epsilon = 1e-9);
    for i in [0, 1, 2, 4, 5, 6] {
        assert_eq!(d[i], 1.0);
    }
}

#[test]
fn irregular_depth_becomes_uniform() {
    let c = RawCurve::new(vec![0.0, 1.0, 2.0, 4.0, 5.0], CurveMeta::named("GR"))
        .with_depth(vec![0.0, 1.0, 2.0, 4.0, 5.0])
        .build()
        .unwrap();
    assert_eq!(c.step(), 1.0);
    assert_eq!(c.basis(), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    assert_abs_diff_eq!(c[3], 3.0, epsilon = 1e-12);
}

#[test]
fn quality_scores() {
    let c = gr(vec![1.0, 2.0, 3.0]);
    assert_eq!(c.quality_score(&TestMap::new(), None), -1.0);

    let mut tests = TestMap::new();
    tests.insert("each".to_string(), vec![checks::no_nans(), checks::not_empty()]);
    assert_eq!(c.quality_score(&tests, None), 1.0);

    let gappy = gr(vec![1.0, f64::NAN, 3.0]);
    assert_eq!(gappy.quality_score(&tests, None), 0.5);
}

#[test]
fn conditioning_chain_keeps_geometry() {
    let samples: Vec<f64> = (0..100)
        .map(|i| if i % 17 == 0 { 400.0 } else { 60.0 + (i % 7) as f64 })
        .collect();
    let c = Curve::new(samples, 1000.0, 0.5, CurveMeta::named("GR")).unwrap();
    let conditioned = c
        .despike_default()
        .smooth(Window::Units(2.0))
        .block(&BlockSpec::bins(3), None)
        .unwrap();
    assert_eq!(conditioned.len(), c.len());
    assert_eq!(conditioned.start(), c.start());
    assert_eq!(conditioned.step(), c.step());
    assert!(conditioned.values().iter().all(|&z| (0.0..=2.0).contains(&z)));
}
