mod common;

use approx::assert_abs_diff_eq;
use camino::Utf8PathBuf;
use common::{synthetic_cows3, write_synthetic_tables, TEST_GPS};
use cows3::{
    cows3::Cows3,
    cows3_errors::Cows3Error,
    detector_states::{extract_detector_velocities, TimestampSet},
    detectors::DetectorId,
    ephemeris::ephemeris_source::{EphemerisVersion, EPHEMERIS_DIR_ENV},
};

fn l1_h1_timestamps() -> Vec<(&'static str, Vec<f64>)> {
    vec![
        ("L1", vec![1238166018.0, 1238166021.0, 1238166024.0]),
        (
            "H1",
            vec![
                1238166018.0,
                1238166020.0,
                1238166022.0,
                1238166024.0,
                1238166026.0,
            ],
        ),
    ]
}

#[test]
fn test_network_shapes() {
    let (_dir, cows3) = synthetic_cows3();
    let states = cows3
        .get_multi_detector_states(l1_h1_timestamps(), 1800.0, Some(0.0))
        .unwrap();

    assert_eq!(states.len(), 2);
    assert_eq!(states.data[0].detector.prefix(), "L1");
    assert_eq!(states.data[1].detector.prefix(), "H1");
    assert_eq!(states.data[0].len(), 3);
    assert_eq!(states.data[1].len(), 5);

    for series in states.iter() {
        assert_eq!(series.delta_t, 1800.0);
    }

    // zero offset: the states sit exactly on the input seconds
    for (series, (_, timestamps)) in states.iter().zip(l1_h1_timestamps()) {
        for (state, t) in series.data.iter().zip(timestamps) {
            assert_eq!(state.t_gps.seconds, t as i64);
            assert_eq!(state.t_gps.nanoseconds, 0);
        }
    }
}

#[test]
fn test_default_offset() {
    let (_dir, cows3) = synthetic_cows3();
    let states = cows3
        .get_multi_detector_states([("V1", vec![TEST_GPS])], 1800.0, None)
        .unwrap();
    assert_eq!(states.data[0].data[0].t_gps.seconds, TEST_GPS as i64 + 900);
}

#[test]
fn test_velocities_extraction() {
    let (_dir, cows3) = synthetic_cows3();
    let states = cows3
        .get_multi_detector_states(l1_h1_timestamps(), 1800.0, None)
        .unwrap();
    let velocities = extract_detector_velocities(&states);

    let mut keys = velocities.keys().copied().collect::<Vec<_>>();
    keys.sort();
    assert_eq!(keys, vec![DetectorId::H1, DetectorId::L1]);
    assert_eq!(velocities[&DetectorId::L1].shape(), (3, 3));
    assert_eq!(velocities[&DetectorId::H1].shape(), (3, 5));

    // orbital speed of the Earth dominates, about 1e-4 c
    for column in velocities[&DetectorId::H1].column_iter() {
        assert_abs_diff_eq!(column.norm(), 9.9e-5, epsilon = 2e-6);
    }
}

#[test]
fn test_invalid_detector() {
    let (_dir, cows3) = synthetic_cows3();
    let err = cows3
        .get_multi_detector_states([("AB", vec![TEST_GPS])], 1800.0, None)
        .unwrap_err();
    assert_eq!(err, Cows3Error::InvalidDetector("AB".into()));
}

#[test]
fn test_invalid_inputs() {
    let (_dir, cows3) = synthetic_cows3();

    let err = cows3
        .get_multi_detector_states([("H1", vec![TEST_GPS])], 0.0, None)
        .unwrap_err();
    assert_eq!(err, Cows3Error::InvalidTsft(0.0));

    let err = cows3
        .get_multi_detector_states([("H1", vec![TEST_GPS])], 1800.0, Some(f64::INFINITY))
        .unwrap_err();
    assert_eq!(err, Cows3Error::InvalidTimeOffset(f64::INFINITY));

    let err = cows3
        .get_multi_detector_states([("H1", vec![TEST_GPS + 1e8])], 1800.0, None)
        .unwrap_err();
    assert!(matches!(err, Cows3Error::EphemerisOutOfRange { .. }));
}

#[test]
fn test_huge_finite_inputs() {
    let (_dir, cows3) = synthetic_cows3();

    let err = cows3
        .get_multi_detector_states([("H1", vec![1e300])], 1800.0, None)
        .unwrap_err();
    assert!(matches!(err, Cows3Error::EphemerisOutOfRange { .. }));

    let err = cows3
        .get_multi_detector_states([("H1", vec![TEST_GPS])], 1800.0, Some(1e300))
        .unwrap_err();
    assert!(matches!(err, Cows3Error::EphemerisOutOfRange { .. }));
}

#[test]
fn test_idempotence() {
    let (_dir, cows3) = synthetic_cows3();
    let first = cows3
        .get_multi_detector_states(l1_h1_timestamps(), 1800.0, None)
        .unwrap();
    let second = cows3
        .get_multi_detector_states(l1_h1_timestamps(), 1800.0, None)
        .unwrap();
    assert_eq!(first, second);

    let builder = cows3
        .detector_states(TimestampSet::from_pairs(l1_h1_timestamps()).unwrap(), 1800.0)
        .unwrap();
    assert_eq!(builder.compute(None).unwrap(), first);
}

#[test]
fn test_named_source_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let dir_path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    let version = EphemerisVersion::DE405;
    write_synthetic_tables(&dir_path, &version.earth_file_name(), &version.sun_file_name());

    std::env::set_var(EPHEMERIS_DIR_ENV, dir_path.as_str());
    let cows3 = Cows3::new("DE405").unwrap();
    let ephemeris = cows3.get_ephemeris().unwrap();
    std::env::remove_var(EPHEMERIS_DIR_ENV);

    assert_eq!(ephemeris.earth().len(), 240);
    assert!(ephemeris.start_gps() < TEST_GPS && TEST_GPS < ephemeris.end_gps());
}
