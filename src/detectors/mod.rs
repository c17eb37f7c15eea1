//! # Detectors & site geometry
//!
//! This module gathers the **interferometer registry** used by the detector-state builder:
//!
//! - [`DetectorId`]: the validated set of known two-character detector codes. Every code
//!   entering the crate is parsed into this enum at the boundary, so unknown codes fail
//!   before any computation with [`Cows3Error::InvalidDetector`].
//! - [`Detector`]: the site geometry of one interferometer with **precomputed Earth-fixed**
//!   vertex location, arm directions and response tensor.
//! - [`MultiDetector`]: an ordered network of detectors.
//!
//! ## Frames & conventions
//!
//! - **Earth-fixed**: geocentric, x toward (0°, 0°), z toward the North pole. Vertex locations
//!   are in meters, computed on the WGS84 ellipsoid.
//! - Arm azimuths are measured clockwise from local North, altitudes from the local
//!   horizontal (see [`sites`]).
//! - The response tensor is `D = (u⊗u − v⊗v) / 2` with `u`, `v` the unit vectors along the
//!   x and y arms.
//!
//! ## See also
//! ------------
//! * [`crate::detector_states`] – rotates these Earth-fixed quantities into equatorial J2000.
//! * [`lat_alt_to_parallax`] – geodetic latitude/elevation → (ρ·cosφ, ρ·sinφ).
pub mod sites;

use std::{fmt::Display, str::FromStr};

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{
    constants::{Meter, Radian, EARTH_MAJOR_AXIS, EARTH_MINOR_AXIS},
    cows3_errors::Cows3Error,
};

use sites::SiteGeometry;

/// Known ground-based detectors, by their two-character prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DetectorId {
    /// LIGO Hanford 4 km
    H1,
    /// LIGO Hanford 2 km
    H2,
    /// LIGO Livingston 4 km
    L1,
    /// Virgo
    V1,
    /// GEO600
    G1,
    /// TAMA300
    T1,
    /// KAGRA
    K1,
}

impl DetectorId {
    pub const ALL: [DetectorId; 7] = [
        DetectorId::H1,
        DetectorId::H2,
        DetectorId::L1,
        DetectorId::V1,
        DetectorId::G1,
        DetectorId::T1,
        DetectorId::K1,
    ];

    pub fn prefix(&self) -> &'static str {
        match self {
            DetectorId::H1 => "H1",
            DetectorId::H2 => "H2",
            DetectorId::L1 => "L1",
            DetectorId::V1 => "V1",
            DetectorId::G1 => "G1",
            DetectorId::T1 => "T1",
            DetectorId::K1 => "K1",
        }
    }

    pub fn site(&self) -> &'static SiteGeometry {
        match self {
            DetectorId::H1 => &sites::LHO_4K,
            DetectorId::H2 => &sites::LHO_2K,
            DetectorId::L1 => &sites::LLO_4K,
            DetectorId::V1 => &sites::VIRGO,
            DetectorId::G1 => &sites::GEO_600,
            DetectorId::T1 => &sites::TAMA_300,
            DetectorId::K1 => &sites::KAGRA,
        }
    }
}

impl Display for DetectorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

impl FromStr for DetectorId {
    type Err = Cows3Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DetectorId::ALL
            .into_iter()
            .find(|id| id.prefix() == s)
            .ok_or_else(|| Cows3Error::InvalidDetector(s.to_string()))
    }
}

impl TryFrom<&str> for DetectorId {
    type Error = Cows3Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Interferometer with precomputed Earth-fixed geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detector {
    pub id: DetectorId,
    pub site: &'static SiteGeometry,
    /// Vertex location, Earth-fixed, meters.
    location: Vector3<Meter>,
    /// Unit vector along the x arm, Earth-fixed.
    x_arm: Vector3<f64>,
    /// Unit vector along the y arm, Earth-fixed.
    y_arm: Vector3<f64>,
    /// Response tensor `(u⊗u − v⊗v) / 2`, Earth-fixed.
    response: Matrix3<f64>,
}

impl Detector {
    /// Build the detector registered under `id`.
    pub fn new(id: DetectorId) -> Self {
        let site = id.site();
        let (lat, lon) = (site.vertex_latitude, site.vertex_longitude);

        let (rho_cos_phi, rho_sin_phi) = lat_alt_to_parallax(lat, site.vertex_elevation);
        let location = Vector3::new(
            EARTH_MAJOR_AXIS * rho_cos_phi * lon.cos(),
            EARTH_MAJOR_AXIS * rho_cos_phi * lon.sin(),
            EARTH_MAJOR_AXIS * rho_sin_phi,
        );

        let x_arm = arm_direction(lat, lon, site.x_arm_azimuth, site.x_arm_altitude);
        let y_arm = arm_direction(lat, lon, site.y_arm_azimuth, site.y_arm_altitude);
        let response = 0.5 * (x_arm * x_arm.transpose() - y_arm * y_arm.transpose());

        Detector {
            id,
            site,
            location,
            x_arm,
            y_arm,
            response,
        }
    }

    /// Two-character prefix, e.g. `"H1"`.
    pub fn prefix(&self) -> &'static str {
        self.id.prefix()
    }

    pub fn name(&self) -> &'static str {
        self.site.name
    }

    pub fn vertex_longitude(&self) -> Radian {
        self.site.vertex_longitude
    }

    pub fn location(&self) -> &Vector3<Meter> {
        &self.location
    }

    pub fn x_arm(&self) -> &Vector3<f64> {
        &self.x_arm
    }

    pub fn y_arm(&self) -> &Vector3<f64> {
        &self.y_arm
    }

    pub fn response(&self) -> &Matrix3<f64> {
        &self.response
    }
}

impl FromStr for Detector {
    type Err = Cows3Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Detector::new(s.parse()?))
    }
}

/// Ordered network of detectors.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiDetector {
    detectors: SmallVec<[Detector; 4]>,
}

impl MultiDetector {
    /// Parse a list of detector codes, failing on the first unknown or repeated one.
    pub fn parse<S: AsRef<str>>(names: &[S]) -> Result<Self, Cows3Error> {
        let ids = names
            .iter()
            .map(|name| name.as_ref().parse::<DetectorId>())
            .collect::<Result<Vec<_>, _>>()?;
        MultiDetector::from_ids(&ids)
    }

    pub fn from_ids(ids: &[DetectorId]) -> Result<Self, Cows3Error> {
        let mut detectors: SmallVec<[Detector; 4]> = SmallVec::with_capacity(ids.len());
        for &id in ids {
            if detectors.iter().any(|det| det.id == id) {
                return Err(Cows3Error::DuplicateDetector(id.to_string()));
            }
            detectors.push(Detector::new(id));
        }
        Ok(MultiDetector { detectors })
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Detector> {
        self.detectors.iter()
    }

    pub fn ids(&self) -> Vec<DetectorId> {
        self.detectors.iter().map(|det| det.id).collect()
    }
}

impl std::ops::Index<usize> for MultiDetector {
    type Output = Detector;

    fn index(&self, index: usize) -> &Self::Output {
        &self.detectors[index]
    }
}

/// Unit vector of an arm in the Earth-fixed frame.
///
/// Arguments
/// ---------
/// * `lat`, `lon`: geodetic latitude and longitude of the vertex, radians.
/// * `azimuth`: clockwise from local North, radians.
/// * `altitude`: above the local horizontal, radians.
pub fn arm_direction(lat: Radian, lon: Radian, azimuth: Radian, altitude: Radian) -> Vector3<f64> {
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();
    let (sin_alt, cos_alt) = altitude.sin_cos();
    let (sin_az, cos_az) = azimuth.sin_cos();

    let u_north = cos_alt * cos_az;
    let u_east = cos_alt * sin_az;
    // component along the outward projection of the local vertical on the equatorial plane
    let u_rho = -sin_lat * u_north + cos_lat * sin_alt;

    Vector3::new(
        cos_lon * u_rho - sin_lon * u_east,
        sin_lon * u_rho + cos_lon * u_east,
        cos_lat * u_north + sin_lat * sin_alt,
    )
}

/// Convert geodetic latitude and height into normalized parallax coordinates.
///
/// The values are dimensionless, in units of the Earth's equatorial radius
/// (`EARTH_MAJOR_AXIS`), and account for the Earth's oblateness:
///
/// ```text
/// u = atan( (sin φ * (b/a)) / cos φ )
/// ρ_sinφ = (b/a) * sin u + (h/a) * sin φ
/// ρ_cosφ = cos u + (h/a) * cos φ
/// ```
///
/// Arguments
/// ---------
/// * `lat` - Geodetic latitude in **radians**.
/// * `height` - Height above the reference ellipsoid in **meters**.
///
/// Returns
/// -------
/// * `(rho_cos_phi, rho_sin_phi)`.
pub fn lat_alt_to_parallax(lat: Radian, height: Meter) -> (f64, f64) {
    let axis_ratio = EARTH_MINOR_AXIS / EARTH_MAJOR_AXIS;

    // parametric latitude
    let u = (lat.sin() * axis_ratio).atan2(lat.cos());

    let rho_sin_phi = axis_ratio * u.sin() + (height / EARTH_MAJOR_AXIS) * lat.sin();
    let rho_cos_phi = u.cos() + (height / EARTH_MAJOR_AXIS) * lat.cos();

    (rho_cos_phi, rho_sin_phi)
}
