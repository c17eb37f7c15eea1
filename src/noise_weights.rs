//! Background noise description used by the SNR estimator.
use serde::{Deserialize, Serialize};

use crate::{
    cows3_errors::Cows3Error, detector_states::timestamps::check_tsft,
    detector_states::MultiDetectorStateSeries,
};

/// Per-detector per-timestamp noise weights.
///
/// The weights are normalized so that they sum to the total number of timestamps, the
/// overall noise level being carried by `sinv_tsft`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseWeights {
    pub data: Vec<Vec<f64>>,
    /// Coverage duration over the mean noise power spectral density, `Tsft · ⟨1/S⟩`.
    pub sinv_tsft: f64,
}

impl NoiseWeights {
    /// Wrap already normalized weights.
    ///
    /// Return
    /// ----------
    /// * The weights, or [`Cows3Error::NoiseWeightsShape`] for an empty layout and
    ///   [`Cows3Error::InvalidNoiseFloor`] for a negative or non-finite value.
    pub fn new(data: Vec<Vec<f64>>, sinv_tsft: f64) -> Result<Self, Cows3Error> {
        if data.is_empty() || data.iter().any(Vec::is_empty) {
            return Err(Cows3Error::NoiseWeightsShape(
                "every detector needs at least one weight".into(),
            ));
        }
        if let Some(&w) = data.iter().flatten().find(|w| !(w.is_finite() && **w >= 0.0)) {
            return Err(Cows3Error::InvalidNoiseFloor(w));
        }
        if !(sinv_tsft.is_finite() && sinv_tsft > 0.0) {
            return Err(Cows3Error::InvalidNoiseFloor(sinv_tsft));
        }
        Ok(NoiseWeights { data, sinv_tsft })
    }

    /// Weights from the single-sided noise power spectral density at each timestamp.
    ///
    /// ```text
    /// w_i = (1 / S_i) / ⟨1/S⟩
    /// sinv_tsft = Tsft · ⟨1/S⟩
    /// ```
    ///
    /// Arguments
    /// -----------------
    /// * `psd`: power spectral density per detector per timestamp, 1/Hz.
    /// * `tsft`: coverage duration of each timestamp, seconds.
    pub fn from_psd(psd: &[Vec<f64>], tsft: f64) -> Result<Self, Cows3Error> {
        let tsft = check_tsft(tsft)?;
        if psd.is_empty() || psd.iter().any(Vec::is_empty) {
            return Err(Cows3Error::NoiseWeightsShape(
                "every detector needs at least one noise estimate".into(),
            ));
        }
        if let Some(&s) = psd.iter().flatten().find(|s| !(s.is_finite() && **s > 0.0)) {
            return Err(Cows3Error::InvalidNoiseFloor(s));
        }

        let total = psd.iter().map(Vec::len).sum::<usize>() as f64;
        let mean_inv = psd.iter().flatten().map(|s| s.recip()).sum::<f64>() / total;

        let data = psd
            .iter()
            .map(|det| det.iter().map(|s| s.recip() / mean_inv).collect())
            .collect();

        Ok(NoiseWeights {
            data,
            sinv_tsft: tsft * mean_inv,
        })
    }

    /// Check that the weights line up with the detector states.
    pub fn check_shape(&self, states: &MultiDetectorStateSeries) -> Result<(), Cows3Error> {
        if self.data.len() != states.len() {
            return Err(Cows3Error::NoiseWeightsShape(format!(
                "{} weight vectors for {} detectors",
                self.data.len(),
                states.len()
            )));
        }
        for (weights, series) in self.data.iter().zip(states.iter()) {
            if weights.len() != series.len() {
                return Err(Cows3Error::NoiseWeightsShape(format!(
                    "{} weights for {} timestamps of {}",
                    weights.len(),
                    series.len(),
                    series.detector.prefix()
                )));
            }
        }
        Ok(())
    }
}

/// Noise description: explicit weights, or one assumed amplitude spectral density for every
/// detector and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NoiseModel {
    Weights(NoiseWeights),
    /// Single-sided amplitude spectral density, 1/√Hz.
    AssumedSqrtSX(f64),
}

impl NoiseModel {
    /// Build the model from two co-optional settings, exactly one of which must be given.
    pub fn from_options(
        noise_weights: Option<NoiseWeights>,
        assume_sqrt_sx: Option<f64>,
    ) -> Result<Self, Cows3Error> {
        match (noise_weights, assume_sqrt_sx) {
            (Some(weights), None) => Ok(NoiseModel::Weights(weights)),
            (None, Some(sqrt_sx)) => Ok(NoiseModel::AssumedSqrtSX(sqrt_sx)),
            _ => Err(Cows3Error::NoiseSpecification),
        }
    }
}

#[cfg(test)]
mod noise_weights_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_psd() {
        let psd = vec![vec![1.0, 2.0], vec![4.0]];
        let weights = NoiseWeights::from_psd(&psd, 10.0).unwrap();

        // <1/S> = (1 + 0.5 + 0.25) / 3
        let mean_inv = 1.75 / 3.0;
        assert_relative_eq!(weights.sinv_tsft, 10.0 * mean_inv, epsilon = 1e-15);
        assert_relative_eq!(weights.data[0][0], 1.0 / mean_inv, epsilon = 1e-15);
        assert_relative_eq!(weights.data[1][0], 0.25 / mean_inv, epsilon = 1e-15);

        let sum = weights.data.iter().flatten().sum::<f64>();
        assert_relative_eq!(sum, 3.0, epsilon = 1e-14);
    }

    #[test]
    fn test_from_psd_errors() {
        assert_eq!(
            NoiseWeights::from_psd(&[vec![1.0, 0.0]], 10.0).unwrap_err(),
            Cows3Error::InvalidNoiseFloor(0.0)
        );
        assert_eq!(
            NoiseWeights::from_psd(&[vec![1.0]], 0.0).unwrap_err(),
            Cows3Error::InvalidTsft(0.0)
        );
        assert!(matches!(
            NoiseWeights::from_psd(&[vec![1.0], vec![]], 10.0),
            Err(Cows3Error::NoiseWeightsShape(_))
        ));
    }

    #[test]
    fn test_new_validation() {
        assert!(NoiseWeights::new(vec![vec![1.0, 0.5]], 2.0).is_ok());
        assert_eq!(
            NoiseWeights::new(vec![vec![1.0, -0.5]], 2.0).unwrap_err(),
            Cows3Error::InvalidNoiseFloor(-0.5)
        );
        assert_eq!(
            NoiseWeights::new(vec![vec![1.0]], f64::INFINITY).unwrap_err(),
            Cows3Error::InvalidNoiseFloor(f64::INFINITY)
        );
    }

    #[test]
    fn test_noise_model_options() {
        let weights = NoiseWeights::new(vec![vec![1.0]], 1.0).unwrap();

        assert_eq!(
            NoiseModel::from_options(None, Some(1e-23)).unwrap(),
            NoiseModel::AssumedSqrtSX(1e-23)
        );
        assert!(matches!(
            NoiseModel::from_options(Some(weights.clone()), None),
            Ok(NoiseModel::Weights(_))
        ));
        assert_eq!(
            NoiseModel::from_options(Some(weights), Some(1e-23)).unwrap_err(),
            Cows3Error::NoiseSpecification
        );
        assert_eq!(
            NoiseModel::from_options(None, None).unwrap_err(),
            Cows3Error::NoiseSpecification
        );
    }
}
