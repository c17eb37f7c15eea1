//! # Cows3: ephemeris context and entry points
//!
//! This module defines [`Cows3`], the façade wiring together:
//!
//! 1. **Ephemeris access**: a lazily loaded, shared [`EphemerisData`] resolved from an
//!    [`EphemerisSource`] descriptor, or an ephemeris already in memory.
//! 2. **Earth rotation**: an optional UT1 provider used for sidereal time.
//! 3. **Entry points**: the detector-state builder and the SNR estimator, both bound to the
//!    context's ephemeris.
//!
//! The ephemeris tables are read on first use through a [`OnceCell`], then reused by every
//! computation. Nothing here is global: two contexts with different ephemerides can coexist.
//!
//! ## Typical usage
//!
//! ```rust, no_run
//! use cows3::cows3::Cows3;
//! use cows3::noise_weights::NoiseModel;
//! use cows3::snr::AmplitudeParams;
//!
//! let cows3 = Cows3::new("DE405")?;
//!
//! let states = cows3.get_multi_detector_states(
//!     [("H1", vec![1238166018.0, 1238167818.0]), ("L1", vec![1238166018.0])],
//!     1800.0,
//!     None,
//! )?;
//!
//! let snr = cows3.signal_to_noise_ratio(states, NoiseModel::AssumedSqrtSX(1e-23))?;
//! let two_f = snr.compute_two_f(
//!     1.0, 0.5, 0.0, 0.0,
//!     &AmplitudeParams::H0Cosi { h0: 1e-24, cosi: 0.0 },
//! )?;
//! # Ok::<(), cows3::cows3_errors::Cows3Error>(())
//! ```
//!
//! ## See also
//! ------------
//! * [`EphemerisSource`] – descriptor syntax and search directories.
//! * [`MultiDetectorStates`] – detector-state builder.
//! * [`SignalToNoiseRatio`] – SNR estimator.
use std::sync::Arc;

use hifitime::ut1::Ut1Provider;
use once_cell::sync::OnceCell;

use crate::{
    constants::GpsSeconds,
    cows3_errors::Cows3Error,
    detector_states::{MultiDetectorStateSeries, MultiDetectorStates, TimestampSet},
    ephemeris::{ephemeris_source::EphemerisSource, EphemerisData},
    noise_weights::NoiseModel,
    snr::SignalToNoiseRatio,
};

#[derive(Debug, Clone)]
pub struct Cows3 {
    ephemeris_source: Option<EphemerisSource>,
    ephemeris: OnceCell<Arc<EphemerisData>>,
    ut1_provider: Option<Ut1Provider>,
}

impl Cows3 {
    /// Construct a context from an ephemeris descriptor.
    ///
    /// The tables are **not** read yet, see [`Cows3::get_ephemeris`].
    ///
    /// Arguments
    /// -----------------
    /// * `ephemeris`: `"DE405"` (or another version) or `"files:<earth>,<sun>"`.
    ///
    /// Return
    /// ----------
    /// * The context, or [`Cows3Error::InvalidEphemerisSource`].
    pub fn new(ephemeris: &str) -> Result<Self, Cows3Error> {
        Ok(Cows3 {
            ephemeris_source: Some(ephemeris.try_into()?),
            ephemeris: OnceCell::new(),
            ut1_provider: None,
        })
    }

    /// Construct a context around an ephemeris already in memory.
    pub fn from_ephemeris(ephemeris: Arc<EphemerisData>) -> Self {
        Cows3 {
            ephemeris_source: None,
            ephemeris: OnceCell::with_value(ephemeris),
            ut1_provider: None,
        }
    }

    /// Use UT1 instead of UTC for sidereal time.
    pub fn with_ut1_provider(mut self, ut1_provider: Ut1Provider) -> Self {
        self.ut1_provider = Some(ut1_provider);
        self
    }

    pub fn get_ut1_provider(&self) -> Option<&Ut1Provider> {
        self.ut1_provider.as_ref()
    }

    pub fn ephemeris_source(&self) -> Option<&EphemerisSource> {
        self.ephemeris_source.as_ref()
    }

    /// Get the lazily loaded ephemeris.
    ///
    /// The first call resolves the source and reads both tables; later calls return the
    /// cached handle. A failed load is not cached.
    ///
    /// Return
    /// ----------
    /// * The shared ephemeris, or the resolution / parsing error.
    pub fn get_ephemeris(&self) -> Result<&Arc<EphemerisData>, Cows3Error> {
        self.ephemeris.get_or_try_init(|| {
            let source = self.ephemeris_source.clone().unwrap_or_default();
            EphemerisData::from_source(&source).map(Arc::new)
        })
    }

    /// Detector-state builder bound to this context's ephemeris.
    pub fn detector_states(
        &self,
        timestamps: TimestampSet,
        tsft: f64,
    ) -> Result<MultiDetectorStates, Cows3Error> {
        MultiDetectorStates::new(timestamps, tsft, Arc::clone(self.get_ephemeris()?))
    }

    /// Detector states of a network in one call.
    ///
    /// Arguments
    /// -----------------
    /// * `timestamps`: `(detector code, GPS timestamps)` pairs, in output order.
    /// * `tsft`: coverage duration of each timestamp, seconds.
    /// * `time_offset`: seconds added to every timestamp, `None` for half of `tsft`.
    ///
    /// Return
    /// ----------
    /// * One series per detector. Codes are validated before the ephemeris is loaded.
    pub fn get_multi_detector_states<I, S>(
        &self,
        timestamps: I,
        tsft: f64,
        time_offset: Option<f64>,
    ) -> Result<MultiDetectorStateSeries, Cows3Error>
    where
        I: IntoIterator<Item = (S, Vec<GpsSeconds>)>,
        S: AsRef<str>,
    {
        let builder = self.detector_states(TimestampSet::from_pairs(timestamps)?, tsft)?;
        match &self.ut1_provider {
            Some(provider) => builder.compute_with_ut1(time_offset, provider),
            None => builder.compute(time_offset),
        }
    }

    /// SNR estimator over already computed detector states.
    pub fn signal_to_noise_ratio(
        &self,
        detector_states: MultiDetectorStateSeries,
        noise_model: NoiseModel,
    ) -> Result<SignalToNoiseRatio, Cows3Error> {
        SignalToNoiseRatio::new(detector_states, noise_model)
    }
}

#[cfg(test)]
mod cows3_test {
    use super::*;
    use crate::{
        ephemeris::ephemeris_source::EphemerisVersion,
        unit_test_global::{SYNTHETIC_EPHEMERIS, TEST_GPS},
    };

    #[test]
    fn test_new_parses_source() {
        let cows3 = Cows3::new("DE421").unwrap();
        assert_eq!(
            cows3.ephemeris_source(),
            Some(&EphemerisSource::Named(EphemerisVersion::DE421))
        );
        assert!(cows3.get_ut1_provider().is_none());

        assert!(matches!(
            Cows3::new("horizon:DE440"),
            Err(Cows3Error::InvalidEphemerisSource(_))
        ));
    }

    #[test]
    fn test_missing_files_not_cached() {
        let cows3 = Cows3::new("files:/nonexistent/earth.dat,/nonexistent/sun.dat").unwrap();
        assert!(matches!(
            cows3.get_ephemeris(),
            Err(Cows3Error::EphemerisFileNotFound(_))
        ));
        assert!(cows3.get_ephemeris().is_err());
    }

    #[test]
    fn test_from_ephemeris_shares_handle() {
        let cows3 = Cows3::from_ephemeris(Arc::clone(&SYNTHETIC_EPHEMERIS));
        let ephemeris = cows3.get_ephemeris().unwrap();
        assert!(Arc::ptr_eq(ephemeris, &SYNTHETIC_EPHEMERIS));
    }

    #[test]
    fn test_invalid_code_before_loading() {
        // the ephemeris cannot be loaded, the detector code is reported first
        let cows3 = Cows3::new("files:/nonexistent/earth.dat,/nonexistent/sun.dat").unwrap();
        let err = cows3
            .get_multi_detector_states([("AB", vec![TEST_GPS])], 1800.0, None)
            .unwrap_err();
        assert_eq!(err, Cows3Error::InvalidDetector("AB".into()));
    }

    #[test]
    fn test_entry_points() {
        let cows3 = Cows3::from_ephemeris(Arc::clone(&SYNTHETIC_EPHEMERIS));
        let states = cows3
            .get_multi_detector_states(
                [("H1", vec![TEST_GPS, TEST_GPS + 1800.0]), ("V1", vec![TEST_GPS])],
                1800.0,
                None,
            )
            .unwrap();
        assert_eq!(states.len(), 2);

        let snr = cows3
            .signal_to_noise_ratio(states, NoiseModel::AssumedSqrtSX(1e-23))
            .unwrap();
        assert_eq!(snr.tsft(), 1800.0);
    }
}
