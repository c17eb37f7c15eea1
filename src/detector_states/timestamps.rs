//! Detector timestamps, as given by the caller and as marshalled for the state computation.
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{constants::GpsSeconds, cows3_errors::Cows3Error, detectors::DetectorId, time::GpsTime};

/// Insertion-ordered mapping from detector to its GPS timestamps.
///
/// The timestamps of one detector need not be sorted nor uniformly spaced, but they must be
/// finite and there must be at least one per detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimestampSet {
    entries: Vec<(DetectorId, Vec<GpsSeconds>)>,
}

impl TimestampSet {
    /// Build a set from `(detector code, timestamps)` pairs.
    ///
    /// Every code is parsed before anything else is checked, so an unknown code is always
    /// the reported error.
    ///
    /// Arguments
    /// -----------------
    /// * `pairs`: detector codes such as `"H1"` with their GPS timestamps in seconds.
    ///
    /// Return
    /// ----------
    /// * The set, or the first of [`Cows3Error::InvalidDetector`], then one of
    ///   [`Cows3Error::EmptyTimestamps`], [`Cows3Error::DuplicateDetector`],
    ///   [`Cows3Error::EmptyDetectorTimestamps`], [`Cows3Error::NonFiniteTimestamp`].
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, Cows3Error>
    where
        I: IntoIterator<Item = (S, Vec<GpsSeconds>)>,
        S: AsRef<str>,
    {
        let pairs = pairs.into_iter().collect::<Vec<_>>();
        let ids = pairs
            .iter()
            .map(|(name, _)| name.as_ref().parse::<DetectorId>())
            .collect::<Result<Vec<_>, _>>()?;

        TimestampSet::new(
            ids.into_iter()
                .zip(pairs.into_iter().map(|(_, ts)| ts))
                .collect(),
        )
    }

    /// Build a set from already validated detector identifiers.
    pub fn new(entries: Vec<(DetectorId, Vec<GpsSeconds>)>) -> Result<Self, Cows3Error> {
        if entries.is_empty() {
            return Err(Cows3Error::EmptyTimestamps);
        }

        if let Some(id) = entries.iter().map(|(id, _)| id).duplicates().next() {
            return Err(Cows3Error::DuplicateDetector(id.to_string()));
        }

        for (id, timestamps) in &entries {
            if timestamps.is_empty() {
                return Err(Cows3Error::EmptyDetectorTimestamps(id.to_string()));
            }
            if let Some(index) = timestamps.iter().position(|t| !t.is_finite()) {
                return Err(Cows3Error::NonFiniteTimestamp {
                    detector: id.to_string(),
                    index,
                });
            }
        }

        Ok(TimestampSet { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Detectors in insertion order.
    pub fn detectors(&self) -> Vec<DetectorId> {
        self.entries.iter().map(|(id, _)| *id).collect()
    }

    pub fn get(&self, id: DetectorId) -> Option<&[GpsSeconds]> {
        self.entries
            .iter()
            .find(|(key, _)| *key == id)
            .map(|(_, ts)| ts.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (DetectorId, &[GpsSeconds])> {
        self.entries.iter().map(|(id, ts)| (*id, ts.as_slice()))
    }

    /// Total number of timestamps over all detectors.
    pub fn total_len(&self) -> usize {
        self.entries.iter().map(|(_, ts)| ts.len()).sum()
    }
}

/// Timestamps of one detector with their common coverage duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimestampVector {
    pub data: Vec<GpsTime>,
    /// Coverage duration of each timestamp (Tsft), seconds.
    pub delta_t: f64,
}

impl TimestampVector {
    /// Split each GPS time with [`GpsTime::from_f64`].
    pub fn from_gps_seconds(timestamps: &[GpsSeconds], delta_t: f64) -> Self {
        TimestampVector {
            data: timestamps.iter().map(|&t| GpsTime::from_f64(t)).collect(),
            delta_t,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// One [`TimestampVector`] per detector, aligned with the detector list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiTimestamps {
    pub data: Vec<TimestampVector>,
}

impl MultiTimestamps {
    pub fn new(timestamps: &TimestampSet, tsft: f64) -> Self {
        MultiTimestamps {
            data: timestamps
                .iter()
                .map(|(_, ts)| TimestampVector::from_gps_seconds(ts, tsft))
                .collect(),
        }
    }

    /// Apply `tsft` to every vector.
    pub fn set_delta_t(&mut self, tsft: f64) {
        self.data.iter_mut().for_each(|ts| ts.delta_t = tsft);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Coverage durations must be finite and strictly positive.
pub(crate) fn check_tsft(tsft: f64) -> Result<f64, Cows3Error> {
    if tsft.is_finite() && tsft > 0.0 {
        Ok(tsft)
    } else {
        Err(Cows3Error::InvalidTsft(tsft))
    }
}
