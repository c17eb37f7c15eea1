mod common;

use approx::assert_relative_eq;
use common::{synthetic_cows3, TEST_GPS};
use cows3::{
    cows3_errors::Cows3Error,
    noise_weights::{NoiseModel, NoiseWeights},
    snr::{AmplitudeParams, SignalToNoiseRatio},
};

fn one_day(detector: &'static str) -> (&'static str, Vec<f64>) {
    (detector, (0..48).map(|i| TEST_GPS + 1800.0 * i as f64).collect())
}

#[test]
fn test_snr_end_to_end() {
    let (_dir, cows3) = synthetic_cows3();
    let states = cows3
        .get_multi_detector_states([one_day("H1"), one_day("L1")], 1800.0, None)
        .unwrap();
    let snr = cows3
        .signal_to_noise_ratio(states, NoiseModel::AssumedSqrtSX(1e-23))
        .unwrap();

    let amplitude = AmplitudeParams::from_options(Some(1e-24), Some(0.5), None, None).unwrap();
    let rho2 = snr.compute_snr2(1.2, 0.4, 0.1, 0.0, &amplitude).unwrap();
    assert!(rho2 > 0.0);

    let two_f = snr.compute_two_f(1.2, 0.4, 0.1, 0.0, &amplitude).unwrap();
    assert_eq!(two_f.expected, 4.0 + rho2);
    assert_eq!(two_f.stdev, (8.0 + 4.0 * rho2).sqrt());

    let h0 = snr.compute_h0_from_snr2(1.2, 0.4, 0.1, 0.0, 0.5, 100.0).unwrap();
    let target = AmplitudeParams::H0Cosi { h0, cosi: 0.5 };
    assert_relative_eq!(
        snr.compute_snr2(1.2, 0.4, 0.1, 0.0, &target).unwrap(),
        100.0,
        max_relative = 1e-10
    );
}

#[test]
fn test_more_data_more_snr() {
    let (_dir, cows3) = synthetic_cows3();
    let amplitude = AmplitudeParams::H0Cosi { h0: 1e-24, cosi: 0.0 };

    let single = cows3
        .get_multi_detector_states([one_day("H1")], 1800.0, None)
        .unwrap();
    let network = cows3
        .get_multi_detector_states([one_day("H1"), one_day("L1"), one_day("V1")], 1800.0, None)
        .unwrap();

    let rho2_single = SignalToNoiseRatio::new(single, NoiseModel::AssumedSqrtSX(1e-23))
        .unwrap()
        .compute_snr2(0.3, -0.6, 0.2, 0.0, &amplitude)
        .unwrap();
    let rho2_network = SignalToNoiseRatio::new(network, NoiseModel::AssumedSqrtSX(1e-23))
        .unwrap()
        .compute_snr2(0.3, -0.6, 0.2, 0.0, &amplitude)
        .unwrap();

    assert!(rho2_network > rho2_single);
}

#[test]
fn test_noisier_detector_weighs_less() {
    let (_dir, cows3) = synthetic_cows3();
    let states = cows3
        .get_multi_detector_states([one_day("H1"), one_day("L1")], 1800.0, None)
        .unwrap();

    // L1 four times noisier in power
    let psd = vec![vec![1e-46; 48], vec![4e-46; 48]];
    let weights = NoiseWeights::from_psd(&psd, 1800.0).unwrap();
    assert!(weights.data[0][0] > weights.data[1][0]);

    let snr = SignalToNoiseRatio::from_options(states, Some(weights), None).unwrap();
    let mmunu = snr.compute_mmunu(2.0, 0.3).unwrap();
    assert_relative_eq!(mmunu.sinv_tsft, 1800.0 * 0.625e46, max_relative = 1e-12);
}

#[test]
fn test_snr_rejects_bad_options() {
    let (_dir, cows3) = synthetic_cows3();
    let states = cows3
        .get_multi_detector_states([one_day("H1")], 1800.0, None)
        .unwrap();

    let weights = NoiseWeights::new(vec![vec![1.0; 48]], 1.0).unwrap();
    assert_eq!(
        SignalToNoiseRatio::from_options(states.clone(), Some(weights), Some(1e-23)).unwrap_err(),
        Cows3Error::NoiseSpecification
    );

    let short = NoiseWeights::new(vec![vec![1.0; 10]], 1.0).unwrap();
    assert!(matches!(
        SignalToNoiseRatio::from_options(states, Some(short), None),
        Err(Cows3Error::NoiseWeightsShape(_))
    ));

    assert_eq!(
        AmplitudeParams::from_options(Some(1e-24), Some(0.5), Some(1e-24), Some(0.5)).unwrap_err(),
        Cows3Error::AmplitudeSpecification
    );
}
