//! Earth position, velocity and orientation at a GPS instant.
use hifitime::ut1::Ut1Provider;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::{
    constants::{Radian, MJD},
    cows3_errors::Cows3Error,
    earth_orientation::{equequ, terrestrial_to_j2000},
    time::{gmst, normalize_angle, GpsTime},
};

use super::EphemerisData;

/// State of the Earth at one instant, equatorial J2000 barycentric coordinates.
///
/// Units
/// -----
/// * `pos_now`, `sun_earth`: light-seconds.
/// * `vel_now`, `sun_earth_rate`: units of c.
/// * angles: radians.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarthState {
    /// Barycentric position of the geocenter.
    pub pos_now: Vector3<f64>,
    /// Barycentric velocity of the geocenter.
    pub vel_now: Vector3<f64>,
    /// Vector from the Sun to the Earth.
    pub sun_earth: Vector3<f64>,
    /// Time derivative of `sun_earth`.
    pub sun_earth_rate: Vector3<f64>,
    /// Greenwich mean sidereal time.
    pub gmst: Radian,
    /// Equation of the equinoxes (GAST − GMST).
    pub equation_of_equinoxes: Radian,
    /// Date in TT used for precession and nutation.
    pub mjd_tt: MJD,
    /// Rotation from the Earth-fixed frame to equatorial J2000.
    pub rot_terrestrial_to_j2000: Matrix3<f64>,
}

impl EarthState {
    /// Greenwich apparent sidereal time.
    pub fn gast(&self) -> Radian {
        normalize_angle(self.gmst + self.equation_of_equinoxes)
    }
}

impl EphemerisData {
    /// Evaluate the Earth state at `t`.
    ///
    /// Arguments
    /// -----------------
    /// * `t`: GPS instant.
    /// * `ut1_provider`: optional UT1 corrections for sidereal time; UTC is used without it.
    ///
    /// Return
    /// ----------
    /// * The [`EarthState`], or [`Cows3Error::EphemerisOutOfRange`] if `t` is not covered by
    ///   the Earth or Sun table.
    pub fn earth_state(
        &self,
        t: &GpsTime,
        ut1_provider: Option<&Ut1Provider>,
    ) -> Result<EarthState, Cows3Error> {
        let gps = t.as_f64();
        let (pos_now, vel_now) = self.earth().interpolate("earth", gps)?;
        let (sun_pos, sun_vel) = self.sun().interpolate("sun", gps)?;

        let mjd_tt = t.to_mjd_tt();
        let gmst = gmst(t.to_mjd_rotation(ut1_provider));
        let equation_of_equinoxes = equequ(mjd_tt);

        let rot_terrestrial_to_j2000 =
            terrestrial_to_j2000(gmst + equation_of_equinoxes, mjd_tt);

        Ok(EarthState {
            pos_now,
            vel_now,
            sun_earth: pos_now - sun_pos,
            sun_earth_rate: vel_now - sun_vel,
            gmst,
            equation_of_equinoxes,
            mjd_tt,
            rot_terrestrial_to_j2000,
        })
    }
}
