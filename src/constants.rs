//! # Constants and type definitions for cows3
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! aliases** used throughout the crate: detector geometry, Earth rotation, time scales and the
//! light-travel-time units in which detector states are expressed.
//!
//! ## Units
//!
//! Detector positions are stored in **light-seconds** and velocities in units of the **speed of
//! light**, which is the convention of the LAL ephemeris tables read by
//! [`crate::ephemeris`]. Site geometry is described in SI metres and converted with [`C_SI`].

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00 TT)
pub const T2000: f64 = 51544.5;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// Speed of light in vacuum, m/s (exact)
pub const C_SI: f64 = 299_792_458.0;

/// WGS84 Earth equatorial radius in meters
pub const EARTH_MAJOR_AXIS: f64 = 6_378_137.0;

/// WGS84 Earth polar radius in meters
pub const EARTH_MINOR_AXIS: f64 = 6_356_752.314;

/// Ratio of the mean solar day to the sidereal day
pub const SIDEREAL_RATIO: f64 = 1.00273790934;

/// Earth rotation rate around the celestial pole, rad/s
pub const EARTH_ROTATION_RATE: f64 = DPI * SIDEREAL_RATIO / SECONDS_PER_DAY;

/// Nanoseconds per second
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in radians
pub type Radian = f64;
/// Angle in arcseconds
pub type ArcSec = f64;
/// Distance in meters
pub type Meter = f64;
/// Duration in seconds
pub type Second = f64;
/// Floating-point GPS time, seconds since 1980-01-06 00:00:00 UTC
pub type GpsSeconds = f64;
/// Modified Julian Date (days)
pub type MJD = f64;
