//! # Earth orientation
//!
//! Rotations between the Earth-fixed frame in which detector sites are defined and the
//! equatorial J2000 frame of the solar-system ephemeris:
//!
//! ```text
//! Earth-fixed --(GAST)--> true equator of date --(nutation)--> mean equator of date --(precession)--> J2000
//! ```
//!
//! All matrices built here are *active* rotations composed with [`rotmt`].
//! Precession follows IAU 1976; nutation uses the low-precision two-term series of the
//! Astronomical Almanac.
use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::constants::{ArcSec, Radian, RADEG, RADSEC, T2000};

/// Principal axis of a rotation built by [`rotmt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Construct a right-handed 3×3 rotation matrix around one of the principal axes (X, Y, or Z).
///
/// The matrix is an **active rotation** of a vector by `alpha` around the chosen axis,
/// counter-clockwise when looking from the tip of the axis toward the origin.
///
/// # Arguments
///
/// * `alpha` - Rotation angle in **radians**.
/// * `axis` - Axis of rotation.
pub fn rotmt(alpha: f64, axis: Axis) -> Matrix3<f64> {
    let axis = match axis {
        Axis::X => Vector3::x_axis(),
        Axis::Y => Vector3::y_axis(),
        Axis::Z => Vector3::z_axis(),
    };

    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Compute the mean obliquity of the ecliptic at a given epoch (IAU 1976 model).
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (TT scale).
///
/// Returns
/// --------
/// * Mean obliquity of the ecliptic in radians.
pub fn obleq(tjm: f64) -> Radian {
    let ob0 = ((23.0 * 3600.0 + 26.0 * 60.0) + 21.448) * RADSEC;
    let ob1 = -46.815 * RADSEC;
    let ob2 = -0.0006 * RADSEC;
    let ob3 = 0.00181 * RADSEC;

    let t = (tjm - T2000) / 36525.0;

    ((ob3 * t + ob2) * t + ob1) * t + ob0
}

/// Nutation in longitude and obliquity, `(Δψ, Δε)` in arcseconds.
///
/// Two dominant terms of the IAU 1980 series (lunar node and twice the Moon's mean
/// longitude), as tabulated in the Astronomical Almanac:
///
/// ```text
/// Δψ = -0.0048° sin(125.0° - 0.05295° d) - 0.0004° sin(200.9° + 1.97129° d)
/// Δε =  0.0026° cos(125.0° - 0.05295° d) + 0.0002° cos(200.9° + 1.97129° d)
/// ```
///
/// with `d` the number of days since J2000.0. Accuracy is about 1 arcsecond.
pub fn nutation_angles(tjm: f64) -> (ArcSec, ArcSec) {
    let d = tjm - T2000;
    let node = (125.0 - 0.05295 * d) * RADEG;
    let lunar = (200.9 + 1.97129 * d) * RADEG;

    let dpsi = -0.0048 * node.sin() - 0.0004 * lunar.sin();
    let deps = 0.0026 * node.cos() + 0.0002 * lunar.cos();

    (dpsi * 3600.0, deps * 3600.0)
}

/// Nutation matrix `N` such that `x_true = N · x_mean` (both of date).
pub fn nutation_matrix(tjm: f64) -> Matrix3<f64> {
    let epsm = obleq(tjm);
    let (dpsi, deps) = nutation_angles(tjm);
    let epst = epsm + deps * RADSEC;

    rotmt(epst, Axis::X) * rotmt(dpsi * RADSEC, Axis::Z) * rotmt(-epsm, Axis::X)
}

/// Equation of the equinoxes `Δψ cos ε` in radians (GAST − GMST).
pub fn equequ(tjm: f64) -> Radian {
    let (dpsi, _deps) = nutation_angles(tjm);
    RADSEC * dpsi * obleq(tjm).cos()
}

/// Precession matrix `P` such that `x_mean(tjm) = P · x_J2000` (IAU 1976).
///
/// ```text
/// ζ(T) = (0.6406161 + 0.0000839·T + 0.0000050·T²) · T  [deg]
/// θ(T) = (0.5567530 - 0.0001185·T - 0.0000116·T²) · T  [deg]
/// z(T) = (0.6406161 + 0.0003041·T + 0.0000051·T²) · T  [deg]
/// ```
pub fn precession_matrix(tjm: f64) -> Matrix3<f64> {
    let t = (tjm - T2000) / 36525.0;

    let zeta = ((0.0000050 * t + 0.0000839) * t + 0.6406161) * t * RADEG;
    let z = ((0.0000051 * t + 0.0003041) * t + 0.6406161) * t * RADEG;
    let theta = ((-0.0000116 * t - 0.0001185) * t + 0.5567530) * t * RADEG;

    rotmt(z, Axis::Z) * rotmt(-theta, Axis::Y) * rotmt(zeta, Axis::Z)
}

/// Rotation from the Earth-fixed frame to equatorial J2000.
///
/// Arguments
/// -----------------
/// * `gast`: Greenwich apparent sidereal time, radians.
/// * `tjm_tt`: date of the transformation, MJD in TT.
///
/// Return
/// ----------
/// * `M = Pᵀ · Nᵀ · R_z(GAST)`, so that `x_J2000 = M · x_earth_fixed`.
pub fn terrestrial_to_j2000(gast: Radian, tjm_tt: f64) -> Matrix3<f64> {
    precession_matrix(tjm_tt).transpose() * nutation_matrix(tjm_tt).transpose() * rotmt(gast, Axis::Z)
}
