//! # Antenna pattern
//!
//! Amplitude-modulation coefficients `a(t)`, `b(t)` of a detector network for a source at a
//! given sky position, and the antenna-pattern matrix `Mμν` built from their sums.
//!
//! For a source at equatorial coordinates `(α, δ)` the wave-frame basis is
//!
//! ```text
//! ξ = (−sin α, cos α, 0)
//! η = (sin δ cos α, sin δ sin α, −cos δ)
//! ```
//!
//! and with `d` the detector tensor at time `t`:
//!
//! ```text
//! a(t) = d : (ξ⊗ξ − η⊗η)
//! b(t) = d : (ξ⊗η + η⊗ξ)
//! ```
//!
//! Noise weights `w` scale each coefficient by `√w`. The network sums are
//! `A = Σa²`, `B = Σb²`, `C = Σab` and `D = AB − C²`.
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    constants::{Radian, DPI},
    cows3_errors::Cows3Error,
    detector_states::{DetectorStateSeries, MultiDetectorStateSeries},
    noise_weights::NoiseWeights,
    time::normalize_angle,
};

/// Equatorial sky position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyPosition {
    /// Right ascension, radians.
    pub alpha: Radian,
    /// Declination, radians.
    pub delta: Radian,
}

impl SkyPosition {
    pub fn new(alpha: Radian, delta: Radian) -> Self {
        SkyPosition { alpha, delta }
    }

    /// Same direction with `alpha ∈ [0, 2π)` and `delta ∈ [−π/2, π/2]`.
    ///
    /// A declination past a pole is folded back and the right ascension turned by π.
    pub fn normalized(&self) -> Self {
        let half_pi = std::f64::consts::FRAC_PI_2;
        let pi = std::f64::consts::PI;

        let mut alpha = self.alpha;
        let mut delta = if (-pi..pi).contains(&self.delta) {
            self.delta
        } else {
            (self.delta + pi).rem_euclid(DPI) - pi
        };

        if delta > half_pi {
            delta = pi - delta;
            alpha += pi;
        } else if delta < -half_pi {
            delta = -pi - delta;
            alpha += pi;
        }

        SkyPosition {
            alpha: normalize_angle(alpha),
            delta,
        }
    }

    /// `(ξ, η)` wave-frame basis vectors.
    fn wave_frame(&self) -> (Vector3<f64>, Vector3<f64>) {
        let (sin_a, cos_a) = self.alpha.sin_cos();
        let (sin_d, cos_d) = self.delta.sin_cos();
        (
            Vector3::new(-sin_a, cos_a, 0.0),
            Vector3::new(sin_d * cos_a, sin_d * sin_a, -cos_d),
        )
    }
}

/// Coefficients of one detector at each of its timestamps, and their sums.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmCoeffs {
    pub a: Vec<f64>,
    pub b: Vec<f64>,
    pub ad: f64,
    pub bd: f64,
    pub cd: f64,
    pub dd: f64,
}

impl AmCoeffs {
    fn from_coefficients(a: Vec<f64>, b: Vec<f64>) -> Self {
        let ad = a.iter().map(|x| x * x).sum::<f64>();
        let bd = b.iter().map(|x| x * x).sum::<f64>();
        let cd = a.iter().zip(&b).map(|(x, y)| x * y).sum::<f64>();
        AmCoeffs {
            a,
            b,
            ad,
            bd,
            cd,
            dd: ad * bd - cd * cd,
        }
    }

    /// Scale `a` and `b` by the square root of `weights`, and refresh the sums.
    fn weighted(self, weights: &[f64]) -> Self {
        let scale = |values: Vec<f64>| {
            values
                .into_iter()
                .zip(weights)
                .map(|(x, w)| x * w.sqrt())
                .collect::<Vec<_>>()
        };
        AmCoeffs::from_coefficients(scale(self.a), scale(self.b))
    }
}

/// Antenna-pattern matrix of a network.
///
/// `ed` is the antisymmetric term, zero in the long-wavelength limit used here.
/// `sinv_tsft` is the inverse noise spectral density times the coverage duration,
/// it converts the sums into an SNR.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AntennaPatternMatrix {
    pub ad: f64,
    pub bd: f64,
    pub cd: f64,
    pub dd: f64,
    pub ed: f64,
    pub sinv_tsft: f64,
}

/// Coefficients of every detector of a network and the network matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiAmCoeffs {
    pub data: Vec<AmCoeffs>,
    pub mmunu: AntennaPatternMatrix,
}

/// `a(t)` and `b(t)` of one detector for a source at `sky`, unweighted.
pub fn compute_am_coeffs(series: &DetectorStateSeries, sky: &SkyPosition) -> AmCoeffs {
    let (xi, eta) = sky.wave_frame();
    let plus: Matrix3<f64> = xi * xi.transpose() - eta * eta.transpose();
    let cross: Matrix3<f64> = xi * eta.transpose() + eta * xi.transpose();

    let (a, b) = series
        .data
        .iter()
        .map(|state| {
            (
                state.det_tensor.component_mul(&plus).sum(),
                state.det_tensor.component_mul(&cross).sum(),
            )
        })
        .unzip();

    AmCoeffs::from_coefficients(a, b)
}

/// Coefficients of a network, optionally noise weighted, and their antenna-pattern matrix.
///
/// Arguments
/// -----------------
/// * `states`: detector states of the network.
/// * `weights`: per-detector per-timestamp noise weights aligned with `states`; unit weights
///   when `None`.
/// * `sky`: source position, normalized before use.
///
/// Return
/// ----------
/// * The coefficients. `mmunu.sinv_tsft` comes from `weights`, and is zero without them.
#[instrument(level = "debug", skip(states, weights))]
pub fn compute_multi_am_coeffs(
    states: &MultiDetectorStateSeries,
    weights: Option<&NoiseWeights>,
    sky: &SkyPosition,
) -> Result<MultiAmCoeffs, Cows3Error> {
    if states.is_empty() {
        return Err(Cows3Error::EmptyDetectorStates);
    }
    if let Some(weights) = weights {
        weights.check_shape(states)?;
    }

    let sky = sky.normalized();
    let data = states
        .iter()
        .enumerate()
        .map(|(x, series)| {
            let coeffs = compute_am_coeffs(series, &sky);
            match weights {
                Some(weights) => coeffs.weighted(&weights.data[x]),
                None => coeffs,
            }
        })
        .collect::<Vec<_>>();

    let ad = data.iter().map(|c| c.ad).sum::<f64>();
    let bd = data.iter().map(|c| c.bd).sum::<f64>();
    let cd = data.iter().map(|c| c.cd).sum::<f64>();

    let mmunu = AntennaPatternMatrix {
        ad,
        bd,
        cd,
        dd: ad * bd - cd * cd,
        ed: 0.0,
        sinv_tsft: weights.map_or(0.0, |w| w.sinv_tsft),
    };

    Ok(MultiAmCoeffs { data, mmunu })
}
