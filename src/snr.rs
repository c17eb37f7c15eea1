//! # Optimal signal-to-noise ratio of a continuous wave
//!
//! The squared SNR of a CW signal expected in Gaussian noise, defined such that the expected
//! value of twice the F-statistic of a perfectly matched template is
//!
//! ```text
//! ⟨2F⟩ = 4 + ρ²
//! ```
//!
//! It combines the antenna-pattern matrix `Mμν` of the network at the source sky position with
//! the JKS amplitude vector `Aμ`, a function of the physical amplitudes `(a₊, aₓ, ψ, φ₀)`:
//!
//! ```text
//! ρ² = Sinv_Tsft · [ A (A1² + A3²) + B (A2² + A4²) + 2 C (A1 A2 + A3 A4) ]
//! ```
//!
//! ## See also
//! ------------
//! * [`crate::antenna_pattern`] – construction of `Mμν`.
//! * [`crate::noise_weights`] – the noise model.
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    antenna_pattern::{compute_multi_am_coeffs, AntennaPatternMatrix, SkyPosition},
    constants::Radian,
    cows3_errors::Cows3Error,
    detector_states::MultiDetectorStateSeries,
    noise_weights::{NoiseModel, NoiseWeights},
};

/// Amplitude of the wave, either as `(h0, cos ι)` or as the two polarization amplitudes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AmplitudeParams {
    H0Cosi { h0: f64, cosi: f64 },
    PlusCross { a_plus: f64, a_cross: f64 },
}

impl AmplitudeParams {
    /// Build the parameters from co-optional settings.
    ///
    /// Exactly one complete pair, `(h0, cosi)` or `(a_plus, a_cross)`, must be given.
    /// A lone member of a pair does not count as a pair.
    pub fn from_options(
        h0: Option<f64>,
        cosi: Option<f64>,
        a_plus: Option<f64>,
        a_cross: Option<f64>,
    ) -> Result<Self, Cows3Error> {
        match ((h0, cosi), (a_plus, a_cross)) {
            ((Some(h0), Some(cosi)), (None, _) | (_, None)) => {
                Ok(AmplitudeParams::H0Cosi { h0, cosi })
            }
            ((None, _) | (_, None), (Some(a_plus), Some(a_cross))) => {
                Ok(AmplitudeParams::PlusCross { a_plus, a_cross })
            }
            _ => Err(Cows3Error::AmplitudeSpecification),
        }
    }

    /// `(a₊, aₓ)`.
    pub fn plus_cross(&self) -> (f64, f64) {
        match *self {
            AmplitudeParams::H0Cosi { h0, cosi } => h0_cosi_to_plus_cross(h0, cosi),
            AmplitudeParams::PlusCross { a_plus, a_cross } => (a_plus, a_cross),
        }
    }
}

/// `a₊ = h0 (1 + cos²ι) / 2`, `aₓ = h0 cos ι`.
pub fn h0_cosi_to_plus_cross(h0: f64, cosi: f64) -> (f64, f64) {
    (0.5 * h0 * (1.0 + cosi * cosi), h0 * cosi)
}

/// Physical amplitude parameters of a CW signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PulsarAmplitudeParams {
    pub a_plus: f64,
    pub a_cross: f64,
    /// Polarization angle.
    pub psi: Radian,
    /// Initial phase.
    pub phi0: Radian,
}

impl PulsarAmplitudeParams {
    pub fn new(amplitude: &AmplitudeParams, psi: Radian, phi0: Radian) -> Self {
        let (a_plus, a_cross) = amplitude.plus_cross();
        PulsarAmplitudeParams {
            a_plus,
            a_cross,
            psi,
            phi0,
        }
    }

    /// JKS amplitude vector `(A1, A2, A3, A4)`.
    pub fn amplitude_vector(&self) -> [f64; 4] {
        let (s2psi, c2psi) = (2.0 * self.psi).sin_cos();
        let (sphi, cphi) = self.phi0.sin_cos();
        let (ap, ac) = (self.a_plus, self.a_cross);

        [
            ap * c2psi * cphi - ac * s2psi * sphi,
            ap * s2psi * cphi + ac * c2psi * sphi,
            -ap * c2psi * sphi - ac * s2psi * cphi,
            -ap * s2psi * sphi + ac * c2psi * cphi,
        ]
    }
}

/// Squared optimal SNR from an antenna-pattern matrix.
pub fn optimal_snr2_from_mmunu(params: &PulsarAmplitudeParams, mmunu: &AntennaPatternMatrix) -> f64 {
    let [a1, a2, a3, a4] = params.amplitude_vector();

    let x = mmunu.ad * (a1 * a1 + a3 * a3)
        + mmunu.bd * (a2 * a2 + a4 * a4)
        + 2.0 * mmunu.cd * (a1 * a2 + a3 * a4)
        + 2.0 * mmunu.ed * (a1 * a4 - a2 * a3);

    mmunu.sinv_tsft * x
}

/// Mean and standard deviation of 2F, a non-central χ² with four degrees of freedom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TwoFStats {
    pub expected: f64,
    pub stdev: f64,
}

impl TwoFStats {
    pub fn from_snr2(snr2: f64) -> Self {
        TwoFStats {
            expected: snr2 + 4.0,
            stdev: (8.0 + 4.0 * snr2).sqrt(),
        }
    }
}

/// Optimal SNR estimator of a detector network with a given noise model.
#[derive(Debug, Clone)]
pub struct SignalToNoiseRatio {
    detector_states: MultiDetectorStateSeries,
    noise_model: NoiseModel,
    tsft: f64,
    /// Fixed `Tsft / Sₙ` of an assumed noise floor.
    sinv_tsft: Option<f64>,
}

impl SignalToNoiseRatio {
    /// Arguments
    /// -----------------
    /// * `detector_states`: states of the network, Tsft is read from the first detector.
    /// * `noise_model`: weights aligned with the states, or one assumed floor.
    ///
    /// Return
    /// ----------
    /// * The estimator, or [`Cows3Error::EmptyDetectorStates`],
    ///   [`Cows3Error::NoiseWeightsShape`] and [`Cows3Error::InvalidNoiseFloor`].
    pub fn new(
        detector_states: MultiDetectorStateSeries,
        noise_model: NoiseModel,
    ) -> Result<Self, Cows3Error> {
        let tsft = detector_states
            .data
            .first()
            .map(|series| series.delta_t)
            .ok_or(Cows3Error::EmptyDetectorStates)?;

        let sinv_tsft = match &noise_model {
            NoiseModel::Weights(weights) => {
                weights.check_shape(&detector_states)?;
                None
            }
            NoiseModel::AssumedSqrtSX(sqrt_sx) => {
                if !(sqrt_sx.is_finite() && *sqrt_sx > 0.0) {
                    return Err(Cows3Error::InvalidNoiseFloor(*sqrt_sx));
                }
                Some(tsft / (sqrt_sx * sqrt_sx))
            }
        };

        Ok(SignalToNoiseRatio {
            detector_states,
            noise_model,
            tsft,
            sinv_tsft,
        })
    }

    /// Build the estimator from co-optional noise settings, exactly one of which must be
    /// given.
    pub fn from_options(
        detector_states: MultiDetectorStateSeries,
        noise_weights: Option<NoiseWeights>,
        assume_sqrt_sx: Option<f64>,
    ) -> Result<Self, Cows3Error> {
        SignalToNoiseRatio::new(
            detector_states,
            NoiseModel::from_options(noise_weights, assume_sqrt_sx)?,
        )
    }

    pub fn detector_states(&self) -> &MultiDetectorStateSeries {
        &self.detector_states
    }

    pub fn noise_model(&self) -> &NoiseModel {
        &self.noise_model
    }

    pub fn tsft(&self) -> f64 {
        self.tsft
    }

    /// Antenna-pattern matrix of the network at `(alpha, delta)`.
    ///
    /// With an assumed noise floor, unit weights are used and `sinv_tsft` is the one of the
    /// floor.
    pub fn compute_mmunu(&self, alpha: Radian, delta: Radian) -> Result<AntennaPatternMatrix, Cows3Error> {
        let weights = match &self.noise_model {
            NoiseModel::Weights(weights) => Some(weights),
            NoiseModel::AssumedSqrtSX(_) => None,
        };

        let mut mmunu = compute_multi_am_coeffs(
            &self.detector_states,
            weights,
            &SkyPosition::new(alpha, delta),
        )?
        .mmunu;

        if let Some(sinv_tsft) = self.sinv_tsft {
            mmunu.sinv_tsft = sinv_tsft;
        }
        Ok(mmunu)
    }

    /// Squared optimal SNR of a CW signal.
    ///
    /// Arguments
    /// -----------------
    /// * `alpha`, `delta`: equatorial sky position, radians.
    /// * `psi`: polarization angle.
    /// * `phi0`: initial phase.
    /// * `amplitude`: `(h0, cos ι)` or `(a₊, aₓ)`.
    #[instrument(level = "debug", skip(self))]
    pub fn compute_snr2(
        &self,
        alpha: Radian,
        delta: Radian,
        psi: Radian,
        phi0: Radian,
        amplitude: &AmplitudeParams,
    ) -> Result<f64, Cows3Error> {
        let mmunu = self.compute_mmunu(alpha, delta)?;
        let params = PulsarAmplitudeParams::new(amplitude, psi, phi0);
        let snr2 = optimal_snr2_from_mmunu(&params, &mmunu);
        debug!(snr2, "optimal SNR computed");
        Ok(snr2)
    }

    /// Amplitude `h0` giving the squared SNR `snr2` for the given source orientation.
    ///
    /// `ρ²` scales as `h0²`, so `h0 = √(snr2 / ρ²(h0 = 1))`.
    pub fn compute_h0_from_snr2(
        &self,
        alpha: Radian,
        delta: Radian,
        psi: Radian,
        phi0: Radian,
        cosi: f64,
        snr2: f64,
    ) -> Result<f64, Cows3Error> {
        let unit = self.compute_snr2(
            alpha,
            delta,
            psi,
            phi0,
            &AmplitudeParams::H0Cosi { h0: 1.0, cosi },
        )?;
        Ok((snr2 / unit).sqrt())
    }

    /// Expected 2F and its standard deviation for the given signal.
    pub fn compute_two_f(
        &self,
        alpha: Radian,
        delta: Radian,
        psi: Radian,
        phi0: Radian,
        amplitude: &AmplitudeParams,
    ) -> Result<TwoFStats, Cows3Error> {
        let snr2 = self.compute_snr2(alpha, delta, psi, phi0, amplitude)?;
        Ok(TwoFStats::from_snr2(snr2))
    }
}
