//! # GPS time handling
//!
//! Timestamps enter the crate as floating-point GPS seconds and are stored as a
//! [`GpsTime`] pair of integer seconds and integer nanoseconds. Conversions to the
//! time scales needed by the Earth orientation models (UTC/UT1 for sidereal time, TT for
//! precession and nutation) go through [`hifitime::Epoch`].
use hifitime::ut1::Ut1Provider;
use hifitime::{Epoch, Unit};
use serde::{Deserialize, Serialize};

use crate::constants::{Radian, DPI, MJD, NANOS_PER_SECOND, SIDEREAL_RATIO, T2000};

/// GPS instant as integer seconds and nanoseconds, `0 <= nanoseconds < 1e9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GpsTime {
    pub seconds: i64,
    pub nanoseconds: i32,
}

impl GpsTime {
    pub fn new(seconds: i64, nanoseconds: i32) -> Self {
        GpsTime::normalized(seconds, i64::from(nanoseconds))
    }

    /// Split floating-point GPS seconds into integer seconds and nanoseconds.
    ///
    /// The decomposition is floor-based on both levels:
    ///
    /// ```text
    /// s  = floor(t)
    /// ns = floor(1e9 * (t - s))
    /// ```
    ///
    /// so anything below the nanosecond is truncated, and the fractional part carries the
    /// usual `f64` representation error of large GPS times. Reference detector states are
    /// produced with exactly this split, do not replace it by a rounding scheme.
    /// Seconds beyond the `i64` range saturate.
    ///
    /// Arguments
    /// -----------------
    /// * `t`: GPS time in seconds, must be finite.
    ///
    /// Return
    /// ----------
    /// * The corresponding [`GpsTime`].
    pub fn from_f64(t: f64) -> Self {
        let seconds = t.floor();
        let nanoseconds = (1e9 * (t - seconds)).floor();
        GpsTime::normalized(seconds as i64, nanoseconds as i64)
    }

    /// GPS time as floating-point seconds.
    pub fn as_f64(&self) -> f64 {
        self.seconds as f64 + 1e-9 * f64::from(self.nanoseconds)
    }

    /// Shift this instant by `dt` seconds.
    ///
    /// The offset is split with a rounded nanosecond part and carried into the seconds,
    /// so that `t + 0.5 * 1800.0` stays an exact integer shift.
    ///
    /// Return
    /// ----------
    /// * The shifted instant, or `None` if `dt` is not finite or the result does not fit in
    ///   `i64` seconds.
    pub fn checked_add_seconds(&self, dt: f64) -> Option<Self> {
        let whole = dt.floor();
        // i64::MAX as f64 rounds up to 2^63, which is already out of range
        if !(whole >= i64::MIN as f64 && whole < i64::MAX as f64) {
            return None;
        }
        let nanos = ((dt - whole) * 1e9).round() as i64;
        let seconds = self.seconds.checked_add(whole as i64)?;
        let nanoseconds = i64::from(self.nanoseconds) + nanos;
        let carry = nanoseconds.div_euclid(NANOS_PER_SECOND);
        Some(GpsTime {
            seconds: seconds.checked_add(carry)?,
            nanoseconds: nanoseconds.rem_euclid(NANOS_PER_SECOND) as i32,
        })
    }

    fn normalized(seconds: i64, nanoseconds: i64) -> Self {
        let carry = nanoseconds.div_euclid(NANOS_PER_SECOND);
        let nanoseconds = nanoseconds.rem_euclid(NANOS_PER_SECOND);
        GpsTime {
            seconds: seconds.saturating_add(carry),
            nanoseconds: nanoseconds as i32,
        }
    }

    /// Convert to a [`hifitime::Epoch`] in the GPS time scale.
    pub fn to_epoch(&self) -> Epoch {
        Epoch::from_gpst_seconds(self.seconds as f64) + Unit::Nanosecond * i64::from(self.nanoseconds)
    }

    /// Modified Julian Date in the TT time scale.
    pub fn to_mjd_tt(&self) -> MJD {
        self.to_epoch().to_mjd_tt_days()
    }

    /// Modified Julian Date used for Earth rotation.
    ///
    /// With a UT1 provider the date is given in UT1, otherwise UTC is used
    /// (|UT1 - UTC| < 0.9 s).
    pub fn to_mjd_rotation(&self, ut1_provider: Option<&Ut1Provider>) -> MJD {
        let epoch = self.to_epoch();
        match ut1_provider {
            // hifitime returns the UT1 epoch expressed in the TAI container
            Some(provider) => epoch.to_ut1(provider).to_mjd_tai_days(),
            None => epoch.to_mjd_utc_days(),
        }
    }
}

impl std::fmt::Display for GpsTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:09}", self.seconds, self.nanoseconds)
    }
}

/// Compute the Greenwich Mean Sidereal Time (GMST) in radians
/// for a given Modified Julian Date (UT1 time scale).
///
/// This function implements the IAU 1982 polynomial formula
/// for the mean sidereal time at 0h UT1, plus the fractional-day
/// correction term due to Earth's rotation rate.
///
/// # Arguments
/// * `tjm` - Modified Julian Date (MJD, UT1 time scale)
///
/// # Returns
/// * GMST angle in radians, normalized to the interval [0, 2π).
///
/// # References
/// * IAU 1982, IERS Conventions 1996.
pub fn gmst(tjm: f64) -> Radian {
    // Polynomial coefficients for GMST at 0h UT1 (in seconds)
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    // Extract the integer MJD (0h UT1) and compute centuries since J2000.0
    let itjm = tjm.floor();
    let t = (itjm - T2000) / 36525.0;

    // GMST at 0h UT1, seconds then radians
    let mut gmst0 = ((C3 * t + C2) * t + C1) * t + C0;
    gmst0 *= DPI / 86400.0;

    // Rotation accumulated during the current day
    let h = (tjm - itjm) * DPI;
    normalize_angle(gmst0 + h * SIDEREAL_RATIO)
}

/// Local mean sidereal time for a site at east longitude `longitude`.
pub fn lmst(gmst: Radian, longitude: Radian) -> Radian {
    normalize_angle(gmst + longitude)
}

/// Wrap an angle into `[0, 2π)`.
pub fn normalize_angle(angle: Radian) -> Radian {
    let wrapped = angle.rem_euclid(DPI);
    // rem_euclid can round up to exactly 2π for tiny negative inputs
    if wrapped >= DPI {
        0.0
    } else {
        wrapped
    }
}
