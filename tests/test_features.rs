use ictal::{encode, Band, FeatureMode, Label, Segment, Skip};
use ndarray::Array2;

fn constant_segment(v: f32) -> Segment {
    Band::ALL
        .iter()
        .fold(Segment::new(), |seg, &b| seg.with_band(b, Array2::from_elem((23, 512), v)))
}

#[test]
fn constant_bands_give_value_value_zero() {
    for mode in [FeatureMode::AllBands, FeatureMode::ThetaAlpha] {
        let fv = encode(&constant_segment(-3.25), mode, Label::NonSeizure, "f.edf").unwrap();
        assert_eq!(fv.values.len(), mode.vector_len());
        for stats in fv.values.chunks(3) {
            approx::assert_abs_diff_eq!(stats[0], -3.25, epsilon = 1e-9);
            approx::assert_abs_diff_eq!(stats[1], -3.25, epsilon = 1e-9);
            approx::assert_abs_diff_eq!(stats[2], 0.0, epsilon = 1e-12);
        }
        assert_eq!(fv.label, Label::NonSeizure);
    }
}

#[test]
fn full_mode_is_fifteen_reduced_is_six() {
    let seg = constant_segment(1.0);
    assert_eq!(encode(&seg, FeatureMode::AllBands, Label::Seizure, "f").unwrap().values.len(), 15);
    assert_eq!(encode(&seg, FeatureMode::ThetaAlpha, Label::Seizure, "f").unwrap().values.len(), 6);
}

#[test]
fn bands_appear_in_canonical_order() {
    let seg = Band::ALL
        .iter()
        .enumerate()
        .fold(Segment::new(), |seg, (i, &b)| seg.with_band(b, Array2::from_elem((2, 4), i as f32)));

    let full = encode(&seg, FeatureMode::AllBands, Label::Seizure, "f").unwrap();
    let means: Vec<f64> = full.values.iter().step_by(3).copied().collect();
    assert_eq!(means, vec![0.0, 1.0, 2.0, 3.0, 4.0]);

    let reduced = encode(&seg, FeatureMode::ThetaAlpha, Label::Seizure, "f").unwrap();
    assert_eq!(reduced.values[0], 1.0); // Theta
    assert_eq!(reduced.values[3], 2.0); // Alpha
}

#[test]
fn reduced_mode_ignores_unselected_bands() {
    let seg = Segment::new()
        .with_band(Band::Theta, Array2::from_elem((2, 4), 1.0))
        .with_band(Band::Alpha, Array2::from_elem((2, 4), 2.0));
    assert!(encode(&seg, FeatureMode::ThetaAlpha, Label::Seizure, "f").is_ok());
    let err = encode(&seg, FeatureMode::AllBands, Label::Seizure, "f").unwrap_err();
    assert!(matches!(err, Skip::Backend { .. }));
}

#[test]
fn statistics_match_numpy_on_ramp() {
    // 0..10 over two channels: mean 4.5, median 4.5, var 8.25 (ddof = 0).
    let data = Array2::from_shape_fn((2, 5), |(c, t)| (c * 5 + t) as f32);
    let seg = Segment::new()
        .with_band(Band::Theta, data.clone())
        .with_band(Band::Alpha, data.mapv(|v| v * 2.0));
    let fv = encode(&seg, FeatureMode::ThetaAlpha, Label::Seizure, "f").unwrap();
    let expected = [4.5, 4.5, 8.25, 9.0, 9.0, 33.0];
    for (got, exp) in fv.values.iter().zip(expected) {
        approx::assert_abs_diff_eq!(*got, exp, epsilon = 1e-9);
    }
}
