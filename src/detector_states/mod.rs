//! # Detector states
//!
//! Position, velocity, local sidereal time and response tensor of each detector of a network
//! at each of its timestamps, in equatorial J2000 coordinates relative to the solar-system
//! barycenter.
//!
//! ## Overview
//!
//! - [`MultiDetectorStates`]: the builder. It owns the validated [`TimestampSet`], the
//!   coverage duration (Tsft) and the marshalled [`MultiTimestamps`], and evaluates the states
//!   on demand against a shared [`EphemerisData`].
//! - [`get_detector_states`] / [`get_multi_detector_states`]: the evaluation itself.
//! - [`extract_detector_velocities`] / [`extract_detector_positions`]: reshape a computed
//!   network into one `3 × N` matrix per detector.
//!
//! ## Evaluation of one state
//!
//! With `t = timestamp + offset`, `M` the Earth-fixed → J2000 rotation of the Earth state at
//! `t`, `s` the vertex location in light-seconds and `ω` the Earth rotation vector:
//!
//! ```text
//! r   = r_earth + M s
//! v   = v_earth + M (ω × s)
//! D   = M D_fixed Mᵀ
//! lmst = gmst + λ  (mod 2π)
//! ```
//!
//! The default offset is half of the coverage duration, so each state describes the
//! midpoint of its data segment.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cows3::detector_states::{MultiDetectorStates, TimestampSet};
//! use cows3::ephemeris::{ephemeris_source::EphemerisSource, EphemerisData};
//!
//! let ephemeris = Arc::new(EphemerisData::from_source(&EphemerisSource::default())?);
//! let timestamps = TimestampSet::from_pairs([
//!     ("L1", vec![1238166018.0, 1238166021.0]),
//!     ("H1", vec![1238166018.0]),
//! ])?;
//!
//! let builder = MultiDetectorStates::new(timestamps, 1800.0, ephemeris)?;
//! let states = builder.compute(None)?;
//! assert_eq!(states.len(), 2);
//! # Ok::<(), cows3::cows3_errors::Cows3Error>(())
//! ```
pub mod timestamps;

use std::{collections::HashMap, sync::Arc};

use hifitime::ut1::Ut1Provider;
use nalgebra::{Matrix3, Matrix3xX, Vector3};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    constants::{C_SI, EARTH_ROTATION_RATE},
    cows3_errors::Cows3Error,
    detectors::{Detector, DetectorId, MultiDetector},
    ephemeris::{earth_state::EarthState, EphemerisData},
    time::{lmst, GpsTime},
};

pub use timestamps::{MultiTimestamps, TimestampSet, TimestampVector};

use timestamps::check_tsft;

/// State of one detector at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorState {
    /// Instant of the state, timestamp plus offset.
    pub t_gps: GpsTime,
    /// Barycentric position of the vertex, light-seconds.
    pub r_detector: Vector3<f64>,
    /// Barycentric velocity of the vertex, units of c.
    pub v_detector: Vector3<f64>,
    /// Local mean sidereal time of the vertex, `[0, 2π)`.
    pub lmst: f64,
    /// Response tensor in equatorial J2000.
    pub det_tensor: Matrix3<f64>,
    pub earth_state: EarthState,
}

/// States of one detector, one per timestamp in timestamp order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectorStateSeries {
    pub detector: Detector,
    /// Coverage duration of each state (Tsft), seconds.
    pub delta_t: f64,
    pub data: Vec<DetectorState>,
}

impl DetectorStateSeries {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// States of a detector network, in detector order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiDetectorStateSeries {
    pub data: Vec<DetectorStateSeries>,
}

impl MultiDetectorStateSeries {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DetectorStateSeries> {
        self.data.iter()
    }

    pub fn get(&self, id: DetectorId) -> Option<&DetectorStateSeries> {
        self.data.iter().find(|series| series.detector.id == id)
    }

    pub fn detectors(&self) -> Vec<DetectorId> {
        self.data.iter().map(|series| series.detector.id).collect()
    }

    /// Total number of states over all detectors.
    pub fn total_len(&self) -> usize {
        self.data.iter().map(DetectorStateSeries::len).sum()
    }
}

/// Evaluate the state of `detector` at `timestamp + time_offset`.
pub fn get_detector_state(
    ephemeris: &EphemerisData,
    detector: &Detector,
    timestamp: &GpsTime,
    time_offset: f64,
    ut1_provider: Option<&Ut1Provider>,
) -> Result<DetectorState, Cows3Error> {
    let t_gps = timestamp.checked_add_seconds(time_offset).ok_or_else(|| {
        Cows3Error::EphemerisOutOfRange {
            body: "earth",
            gps: timestamp.as_f64() + time_offset,
            start: ephemeris.earth().first_gps(),
            end: ephemeris.earth().last_gps(),
        }
    })?;
    let earth_state = ephemeris.earth_state(&t_gps, ut1_provider)?;
    let rot = &earth_state.rot_terrestrial_to_j2000;

    let site = detector.location() / C_SI;
    let omega = Vector3::new(0.0, 0.0, EARTH_ROTATION_RATE);

    let r_detector = earth_state.pos_now + rot * site;
    let v_detector = earth_state.vel_now + rot * omega.cross(&site);
    let det_tensor = rot * detector.response() * rot.transpose();
    let lmst = lmst(earth_state.gmst, detector.vertex_longitude());

    Ok(DetectorState {
        t_gps,
        r_detector,
        v_detector,
        lmst,
        det_tensor,
        earth_state,
    })
}

/// Evaluate the states of one detector at every timestamp of `timestamps`.
///
/// Arguments
/// -----------------
/// * `ephemeris`: Earth and Sun tables covering every `timestamp + time_offset`.
/// * `detector`: the interferometer.
/// * `timestamps`: the timestamps with their coverage duration.
/// * `time_offset`: seconds added to each timestamp, must be finite.
/// * `ut1_provider`: optional UT1 corrections for sidereal time.
///
/// Return
/// ----------
/// * The series, with `delta_t` copied from `timestamps`.
pub fn get_detector_states(
    ephemeris: &EphemerisData,
    detector: &Detector,
    timestamps: &TimestampVector,
    time_offset: f64,
    ut1_provider: Option<&Ut1Provider>,
) -> Result<DetectorStateSeries, Cows3Error> {
    if !time_offset.is_finite() {
        return Err(Cows3Error::InvalidTimeOffset(time_offset));
    }

    let data = timestamps
        .data
        .iter()
        .map(|ts| get_detector_state(ephemeris, detector, ts, time_offset, ut1_provider))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DetectorStateSeries {
        detector: detector.clone(),
        delta_t: timestamps.delta_t,
        data,
    })
}

/// Evaluate the states of a network, `timestamps` aligned with `detectors`.
pub fn get_multi_detector_states(
    ephemeris: &EphemerisData,
    detectors: &MultiDetector,
    timestamps: &MultiTimestamps,
    time_offset: f64,
    ut1_provider: Option<&Ut1Provider>,
) -> Result<MultiDetectorStateSeries, Cows3Error> {
    if detectors.len() != timestamps.len() {
        return Err(Cows3Error::DetectorCountMismatch {
            detectors: detectors.len(),
            timestamps: timestamps.len(),
        });
    }

    let data = detectors
        .iter()
        .zip(&timestamps.data)
        .map(|(det, ts)| get_detector_states(ephemeris, det, ts, time_offset, ut1_provider))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(MultiDetectorStateSeries { data })
}

/// Builder of the detector states of a network.
///
/// The timestamps and the coverage duration are validated and marshalled once, at
/// construction or through the setters; [`MultiDetectorStates::compute`] only evaluates.
#[derive(Debug, Clone)]
pub struct MultiDetectorStates {
    ephemeris: Arc<EphemerisData>,
    timestamps: TimestampSet,
    tsft: f64,
    detectors: MultiDetector,
    multi_timestamps: MultiTimestamps,
}

impl MultiDetectorStates {
    /// Arguments
    /// -----------------
    /// * `timestamps`: GPS timestamps of each detector.
    /// * `tsft`: coverage duration of each timestamp, seconds.
    /// * `ephemeris`: shared Earth and Sun tables.
    ///
    /// Return
    /// ----------
    /// * The builder, or [`Cows3Error::InvalidTsft`].
    pub fn new(
        timestamps: TimestampSet,
        tsft: f64,
        ephemeris: Arc<EphemerisData>,
    ) -> Result<Self, Cows3Error> {
        let tsft = check_tsft(tsft)?;
        let detectors = MultiDetector::from_ids(&timestamps.detectors())?;
        let multi_timestamps = MultiTimestamps::new(&timestamps, tsft);

        Ok(MultiDetectorStates {
            ephemeris,
            timestamps,
            tsft,
            detectors,
            multi_timestamps,
        })
    }

    /// Replace the timestamps; the current coverage duration is applied to the new vectors.
    pub fn set_timestamps(&mut self, timestamps: TimestampSet) -> Result<(), Cows3Error> {
        self.detectors = MultiDetector::from_ids(&timestamps.detectors())?;
        self.multi_timestamps = MultiTimestamps::new(&timestamps, self.tsft);
        self.timestamps = timestamps;
        Ok(())
    }

    /// Replace the coverage duration of every timestamp vector.
    pub fn set_tsft(&mut self, tsft: f64) -> Result<(), Cows3Error> {
        self.tsft = check_tsft(tsft)?;
        self.multi_timestamps.set_delta_t(self.tsft);
        Ok(())
    }

    pub fn tsft(&self) -> f64 {
        self.tsft
    }

    pub fn timestamps(&self) -> &TimestampSet {
        &self.timestamps
    }

    pub fn detectors(&self) -> &MultiDetector {
        &self.detectors
    }

    pub fn multi_timestamps(&self) -> &MultiTimestamps {
        &self.multi_timestamps
    }

    pub fn ephemeris(&self) -> &Arc<EphemerisData> {
        &self.ephemeris
    }

    /// Offset actually applied for `time_offset`: `None` is half of Tsft.
    pub fn resolve_time_offset(&self, time_offset: Option<f64>) -> Result<f64, Cows3Error> {
        match time_offset {
            None => Ok(0.5 * self.tsft),
            Some(offset) if offset.is_finite() => Ok(offset),
            Some(offset) => Err(Cows3Error::InvalidTimeOffset(offset)),
        }
    }

    /// Evaluate the detector states at `timestamp + time_offset`.
    ///
    /// Arguments
    /// -----------------
    /// * `time_offset`: seconds added to every timestamp, `None` for half of Tsft.
    ///   `Some(0.0)` evaluates exactly at the timestamps.
    ///
    /// Return
    /// ----------
    /// * One series per detector in insertion order, or the first evaluation error
    ///   (typically [`Cows3Error::EphemerisOutOfRange`]).
    pub fn compute(&self, time_offset: Option<f64>) -> Result<MultiDetectorStateSeries, Cows3Error> {
        self.compute_inner(time_offset, None)
    }

    /// Same as [`MultiDetectorStates::compute`], with UT1 used for sidereal time.
    pub fn compute_with_ut1(
        &self,
        time_offset: Option<f64>,
        ut1_provider: &Ut1Provider,
    ) -> Result<MultiDetectorStateSeries, Cows3Error> {
        self.compute_inner(time_offset, Some(ut1_provider))
    }

    #[instrument(
        level = "debug",
        skip_all,
        fields(detectors = self.detectors.len(), timestamps = self.timestamps.total_len())
    )]
    fn compute_inner(
        &self,
        time_offset: Option<f64>,
        ut1_provider: Option<&Ut1Provider>,
    ) -> Result<MultiDetectorStateSeries, Cows3Error> {
        let offset = self.resolve_time_offset(time_offset)?;
        let states = get_multi_detector_states(
            &self.ephemeris,
            &self.detectors,
            &self.multi_timestamps,
            offset,
            ut1_provider,
        )?;
        debug!(offset, tsft = self.tsft, "detector states computed");
        Ok(states)
    }
}

fn extract_columns(
    states: &MultiDetectorStateSeries,
    column: impl Fn(&DetectorState) -> Vector3<f64>,
) -> HashMap<DetectorId, Matrix3xX<f64>> {
    states
        .iter()
        .map(|series| {
            let columns = series.data.iter().map(&column).collect::<Vec<_>>();
            (series.detector.id, Matrix3xX::from_columns(&columns))
        })
        .collect()
}

/// Velocities of every detector as a `3 × N` matrix, one column per timestamp.
pub fn extract_detector_velocities(
    states: &MultiDetectorStateSeries,
) -> HashMap<DetectorId, Matrix3xX<f64>> {
    extract_columns(states, |state| state.v_detector)
}

/// Positions of every detector as a `3 × N` matrix, one column per timestamp.
pub fn extract_detector_positions(
    states: &MultiDetectorStateSeries,
) -> HashMap<DetectorId, Matrix3xX<f64>> {
    extract_columns(states, |state| state.r_detector)
}
