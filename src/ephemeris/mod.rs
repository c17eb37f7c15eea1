//! # Solar-system ephemeris
//!
//! Earth and Sun barycentric tables in the LAL ephemeris format, and their evaluation at a
//! GPS instant.
//!
//! ## Overview
//!
//! - [`EphemerisTable`]: uniformly sampled position/velocity/acceleration records of one body.
//! - [`EphemerisData`]: the Earth and Sun tables used together, immutable once built and meant
//!   to be shared (`Arc<EphemerisData>`) by every detector-state computation.
//! - [`ephemeris_source::EphemerisSource`]: where to find the table files.
//! - [`earth_state::EarthState`]: Earth position, velocity and orientation at one instant.
//!
//! ## Interpolation
//!
//! A table is evaluated from its record nearest in time, `i = floor((t - t0) / dt + 0.5)`, with
//! a second-order Taylor step:
//!
//! ```text
//! r(t) = r_i + v_i τ + a_i τ² / 2
//! v(t) = v_i + a_i τ                   with τ = t - t_i
//! ```
//!
//! A time whose nearest record falls outside the table is an error.
pub mod earth_state;
pub mod ephemeris_reader;
pub mod ephemeris_source;

use camino::Utf8Path;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{constants::GpsSeconds, cows3_errors::Cows3Error};

use ephemeris_reader::read_ephemeris_file;
use ephemeris_source::EphemerisSource;

/// One ephemeris record: GPS time, position (light-s), velocity (c), acceleration (1/s).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PosVelAcc {
    pub gps: GpsSeconds,
    pub pos: Vector3<f64>,
    pub vel: Vector3<f64>,
    pub acc: Vector3<f64>,
}

/// Uniformly sampled ephemeris of one body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EphemerisTable {
    gps_year: f64,
    dt: f64,
    entries: Vec<PosVelAcc>,
}

impl EphemerisTable {
    /// Build a table from its header values and records.
    ///
    /// Arguments
    /// -----------------
    /// * `gps_year`: header tag of the file (kept for reference only).
    /// * `dt`: spacing of the records, seconds.
    /// * `entries`: records ordered in time.
    ///
    /// Return
    /// ----------
    /// * The table, or [`Cows3Error::EphemerisParsing`] if it is empty, `dt` is not strictly
    ///   positive, or consecutive records are not `dt` apart.
    pub fn new(gps_year: f64, dt: f64, entries: Vec<PosVelAcc>) -> Result<Self, Cows3Error> {
        if entries.is_empty() {
            return Err(Cows3Error::EphemerisParsing("empty ephemeris table".into()));
        }
        if !(dt.is_finite() && dt > 0.0) {
            return Err(Cows3Error::EphemerisParsing(format!(
                "invalid table spacing: {dt}"
            )));
        }

        let tolerance = 1e-6 * dt;
        if let Some(pair) = entries
            .windows(2)
            .find(|pair| ((pair[1].gps - pair[0].gps) - dt).abs() > tolerance)
        {
            return Err(Cows3Error::EphemerisParsing(format!(
                "non-uniform spacing between GPS {} and {} (expected {dt} s)",
                pair[0].gps, pair[1].gps
            )));
        }

        Ok(EphemerisTable {
            gps_year,
            dt,
            entries,
        })
    }

    pub fn gps_year(&self) -> f64 {
        self.gps_year
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn entries(&self) -> &[PosVelAcc] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first_gps(&self) -> GpsSeconds {
        self.entries[0].gps
    }

    pub fn last_gps(&self) -> GpsSeconds {
        self.entries[self.entries.len() - 1].gps
    }

    /// Position and velocity of the body at GPS time `t`.
    ///
    /// Arguments
    /// -----------------
    /// * `body`: name used in the out-of-range error.
    /// * `t`: GPS seconds.
    ///
    /// Return
    /// ----------
    /// * `(position, velocity)` in light-seconds and units of c.
    pub fn interpolate(
        &self,
        body: &'static str,
        t: GpsSeconds,
    ) -> Result<(Vector3<f64>, Vector3<f64>), Cows3Error> {
        let t0 = t - self.first_gps();
        let index = (t0 / self.dt + 0.5).floor();

        if !(index >= 0.0 && index < self.entries.len() as f64) {
            return Err(Cows3Error::EphemerisOutOfRange {
                body,
                gps: t,
                start: self.first_gps(),
                end: self.last_gps(),
            });
        }

        let entry = &self.entries[index as usize];
        let tau = t0 - index * self.dt;

        let pos = entry.pos + entry.vel * tau + entry.acc * (0.5 * tau * tau);
        let vel = entry.vel + entry.acc * tau;
        Ok((pos, vel))
    }
}

/// Earth and Sun ephemerides, shared read-only by all computations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EphemerisData {
    earth: EphemerisTable,
    sun: EphemerisTable,
}

impl EphemerisData {
    pub fn new(earth: EphemerisTable, sun: EphemerisTable) -> Self {
        EphemerisData { earth, sun }
    }

    /// Load the Earth and Sun tables from two LAL-format files.
    pub fn from_files(earth: &Utf8Path, sun: &Utf8Path) -> Result<Self, Cows3Error> {
        let data = EphemerisData::new(read_ephemeris_file(earth)?, read_ephemeris_file(sun)?);
        info!(
            earth = %earth,
            sun = %sun,
            start = data.start_gps(),
            end = data.end_gps(),
            "ephemeris loaded"
        );
        Ok(data)
    }

    /// Resolve `source` to a pair of files and load them.
    pub fn from_source(source: &EphemerisSource) -> Result<Self, Cows3Error> {
        let (earth, sun) = source.resolve()?;
        EphemerisData::from_files(&earth, &sun)
    }

    pub fn earth(&self) -> &EphemerisTable {
        &self.earth
    }

    pub fn sun(&self) -> &EphemerisTable {
        &self.sun
    }

    /// First GPS time covered by both tables.
    pub fn start_gps(&self) -> GpsSeconds {
        self.earth.first_gps().max(self.sun.first_gps())
    }

    /// Last GPS time covered by both tables.
    pub fn end_gps(&self) -> GpsSeconds {
        self.earth.last_gps().min(self.sun.last_gps())
    }
}

#[cfg(test)]
mod ephemeris_test {
    use super::*;
    use approx::assert_relative_eq;

    fn linear_table() -> EphemerisTable {
        let entries = (0..4)
            .map(|i| {
                let gps = 1000.0 + 100.0 * i as f64;
                PosVelAcc {
                    gps,
                    pos: Vector3::new(gps, 0.0, 0.0),
                    vel: Vector3::new(1.0, 0.0, 0.0),
                    acc: Vector3::zeros(),
                }
            })
            .collect();
        EphemerisTable::new(2000.0, 100.0, entries).unwrap()
    }

    #[test]
    fn test_interpolate_linear() {
        let table = linear_table();
        for t in [1000.0, 1049.0, 1051.0, 1234.5, 1349.0] {
            let (pos, vel) = table.interpolate("earth", t).unwrap();
            assert_relative_eq!(pos.x, t, epsilon = 1e-9);
            assert_eq!(vel, Vector3::new(1.0, 0.0, 0.0));
        }
    }

    #[test]
    fn test_interpolate_quadratic() {
        // constant acceleration: the Taylor step is exact
        let acc = Vector3::new(0.0, 2e-3, 0.0);
        let entries = (0..3)
            .map(|i| {
                let t = 50.0 * i as f64;
                PosVelAcc {
                    gps: t,
                    pos: acc * (0.5 * t * t),
                    vel: acc * t,
                    acc,
                }
            })
            .collect();
        let table = EphemerisTable::new(2000.0, 50.0, entries).unwrap();

        let (pos, vel) = table.interpolate("sun", 70.0).unwrap();
        assert_relative_eq!(pos.y, 0.5 * 2e-3 * 70.0 * 70.0, epsilon = 1e-12);
        assert_relative_eq!(vel.y, 2e-3 * 70.0, epsilon = 1e-12);
    }

    #[test]
    fn test_interpolate_out_of_range() {
        let table = linear_table();

        let err = table.interpolate("earth", 949.0).unwrap_err();
        assert_eq!(
            err,
            Cows3Error::EphemerisOutOfRange {
                body: "earth",
                gps: 949.0,
                start: 1000.0,
                end: 1300.0
            }
        );

        // nearest record of 1349.0 is the last one, 1351.0 is past it
        assert!(table.interpolate("earth", 1349.0).is_ok());
        assert!(table.interpolate("earth", 1351.0).is_err());
        assert!(table.interpolate("earth", f64::NAN).is_err());
    }

    #[test]
    fn test_empty_table() {
        let err = EphemerisTable::new(2000.0, 100.0, vec![]).unwrap_err();
        assert!(matches!(err, Cows3Error::EphemerisParsing(_)));
    }

    #[test]
    fn test_data_range() {
        let earth = linear_table();
        let mut sun_entries = earth.entries().to_vec();
        sun_entries.remove(0);
        let sun = EphemerisTable::new(2000.0, 100.0, sun_entries).unwrap();

        let data = EphemerisData::new(earth, sun);
        assert_eq!(data.start_gps(), 1100.0);
        assert_eq!(data.end_gps(), 1300.0);
    }
}
