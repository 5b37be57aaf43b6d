mod common;
use common::{index_with, MockBackend};
use ictal::{Band, DatasetBuilder, DatasetConfig, FeatureMode, Label, SubjectId};

fn cfg(first: u32, last: u32, parallel: bool) -> DatasetConfig {
    DatasetConfig { first_subject: first, last_subject: last, parallel, seed: 11, ..DatasetConfig::default() }
}

#[test]
fn two_file_cohort_end_to_end() {
    let backend = MockBackend::default().with_index(index_with(
        1,
        &[("chb01_03.edf", &[(100, 140)], 400), ("chb01_01.edf", &[], 900)],
    ));
    for mode in [FeatureMode::AllBands, FeatureMode::ThetaAlpha] {
        let config = DatasetConfig { mode, ..cfg(1, 1, false) };
        let ds = DatasetBuilder::new(config, &backend).build();

        assert_eq!(ds.seizure.len(), 1);
        assert_eq!(ds.non_seizure.len(), 3, "all thirds of 900 s are feasible");
        assert!(ds.vectors().all(|v| v.values.len() == mode.vector_len()));
        assert!(ds.seizure.iter().all(|v| v.label == Label::Seizure));
        assert!(ds.non_seizure.iter().all(|v| v.label == Label::NonSeizure));
        assert!(ds.report.diagnostics.is_empty());
        assert_eq!(ds.report.processed, vec![SubjectId(1)]);
    }
}

#[test]
fn excluded_subjects_never_contribute() {
    let mut backend = MockBackend::default();
    for s in 1..=19 {
        backend = backend.with_index(index_with(s, &[("a.edf", &[(500, 560)], 3600)]));
    }
    let ds = DatasetBuilder::new(cfg(1, 19, true), &backend).build();

    let excluded = [6.0, 8.0, 10.0, 12.0, 13.0, 15.0];
    // Mock segments carry the subject id as their value, so the first mean
    // identifies the producing subject.
    for v in ds.vectors() {
        assert!(!excluded.contains(&v.values[0]), "excluded subject {} contributed", v.values[0]);
    }
    assert_eq!(ds.seizure.len(), 13);
    assert!(ds.report.processed.iter().all(|s| ![6, 8, 10, 12, 13, 15].contains(&s.0)));

    let narrow = DatasetBuilder::new(cfg(6, 8, false), &backend).build();
    assert_eq!(narrow.report.processed, vec![SubjectId(7)]);
    assert!(narrow.vectors().all(|v| v.values[0] == 7.0));
}

#[test]
fn parallel_and_sequential_runs_agree() {
    let mut backend = MockBackend::default();
    for s in [1, 2, 3, 4, 5] {
        backend = backend.with_index(index_with(
            s,
            &[("s.edf", &[(300, 350), (1200, 1260)], 3600), ("n1.edf", &[], 3600), ("n2.edf", &[], 1800)],
        ));
    }
    let seq = DatasetBuilder::new(cfg(1, 5, false), &backend).build();
    let par = DatasetBuilder::new(cfg(1, 5, true), &backend).build();

    assert_eq!(seq.seizure, par.seizure);
    assert_eq!(seq.non_seizure, par.non_seizure);
    assert_eq!(seq.report.processed, par.report.processed);
    assert_eq!(seq.seizure.len(), 10);
    assert_eq!(seq.non_seizure.len(), 30);
    // Cohort order is kept at merge time.
    let owners: Vec<f64> = seq.seizure.iter().map(|v| v.values[0]).collect();
    assert_eq!(owners, vec![1.0, 1.0, 2.0, 2.0, 3.0, 3.0, 4.0, 4.0, 5.0, 5.0]);
}

#[test]
fn skips_are_recorded_and_do_not_stop_the_run() {
    let mut index = index_with(
        2,
        &[
            ("early.edf", &[(10, 40)], 3600),      // onset too early
            ("short.edf", &[(100, 140)], 200),     // recording too short
            ("broken.edf", &[(600, 650)], 3600),   // backend failure
            ("ok.edf", &[(900, 950)], 3600),
            ("tiny.edf", &[], 300),                // no feasible third
        ],
    );
    // Present in the annotations but absent on disk.
    index.file_records.push(ictal::FileRecord::non_seizure("gone.edf"));

    let backend = MockBackend { failing_files: vec!["broken.edf".into()], ..MockBackend::default() }
        .with_index(index);
    let ds = DatasetBuilder::new(cfg(1, 3, false), &backend).build();

    assert_eq!(ds.seizure.len(), 1);
    assert!(ds.non_seizure.is_empty());
    let r = &ds.report;
    assert_eq!(r.count("window_infeasible"), 2 + 3);
    assert_eq!(r.count("backend"), 1);
    assert_eq!(r.count("missing_file"), 1);
    assert_eq!(r.processed, vec![SubjectId(2)]);
    // Subjects 1 and 3 have no index at all.
    let failed: Vec<u32> = r.failed.iter().map(|f| f.subject.0).collect();
    assert_eq!(failed, vec![1, 3]);
}

#[test]
fn missing_band_drops_whole_vector() {
    let backend = MockBackend { missing_band: Some(Band::Gamma), ..MockBackend::default() }
        .with_index(index_with(1, &[("a.edf", &[(500, 560)], 3600)]));

    let full = DatasetBuilder::new(cfg(1, 1, false), &backend).build();
    assert!(full.seizure.is_empty());
    assert_eq!(full.report.count("backend"), 1);

    // Gamma is not needed in the reduced mode.
    let reduced = DatasetBuilder::new(DatasetConfig { mode: FeatureMode::ThetaAlpha, ..cfg(1, 1, false) }, &backend).build();
    assert_eq!(reduced.seizure.len(), 1);
    assert_eq!(reduced.seizure[0].values.len(), 6);
}

#[test]
fn different_seeds_move_non_seizure_windows() {
    use ictal::window::non_seizure_windows;
    let b1 = DatasetBuilder::new(DatasetConfig { seed: 1, ..DatasetConfig::default() }, MockBackend::default());
    let b2 = DatasetBuilder::new(DatasetConfig { seed: 2, ..DatasetConfig::default() }, MockBackend::default());
    let w1 = non_seizure_windows("f.edf", 3600, &mut b1.subject_rng(SubjectId(1)));
    let w2 = non_seizure_windows("f.edf", 3600, &mut b2.subject_rng(SubjectId(1)));
    assert_ne!(w1, w2);
}
