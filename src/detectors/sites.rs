//! Geometry of the known ground-based interferometers.
//!
//! Values are the frame-format site descriptions distributed with LAL: vertex geodetic
//! coordinates on the WGS84 ellipsoid, and for each arm its altitude above the local
//! horizontal and its azimuth measured **clockwise from local North**.
use serde::Serialize;

use crate::constants::{Meter, Radian};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SiteGeometry {
    pub name: &'static str,
    pub vertex_latitude: Radian,
    pub vertex_longitude: Radian,
    pub vertex_elevation: Meter,
    pub x_arm_altitude: Radian,
    pub x_arm_azimuth: Radian,
    pub y_arm_altitude: Radian,
    pub y_arm_azimuth: Radian,
    pub x_arm_midpoint: Meter,
    pub y_arm_midpoint: Meter,
}

pub const LHO_4K: SiteGeometry = SiteGeometry {
    name: "LHO_4k",
    vertex_latitude: 0.81079526383,
    vertex_longitude: -2.08405676917,
    vertex_elevation: 142.554,
    x_arm_altitude: -6.195e-4,
    x_arm_azimuth: 5.65487724844,
    y_arm_altitude: 1.25e-5,
    y_arm_azimuth: 4.08408092164,
    x_arm_midpoint: 1997.54,
    y_arm_midpoint: 1997.52,
};

pub const LHO_2K: SiteGeometry = SiteGeometry {
    name: "LHO_2k",
    x_arm_midpoint: 1004.50,
    y_arm_midpoint: 1004.50,
    ..LHO_4K
};

pub const LLO_4K: SiteGeometry = SiteGeometry {
    name: "LLO_4k",
    vertex_latitude: 0.53342313506,
    vertex_longitude: -1.58430937078,
    vertex_elevation: -6.574,
    x_arm_altitude: -3.121e-4,
    x_arm_azimuth: 4.40317772346,
    y_arm_altitude: -6.107e-4,
    y_arm_azimuth: 2.83238139666,
    x_arm_midpoint: 1997.57,
    y_arm_midpoint: 1997.57,
};

pub const VIRGO: SiteGeometry = SiteGeometry {
    name: "VIRGO",
    vertex_latitude: 0.76151183984,
    vertex_longitude: 0.18333805213,
    vertex_elevation: 51.884,
    x_arm_altitude: 0.0,
    x_arm_azimuth: 0.33916285222,
    y_arm_altitude: 0.0,
    y_arm_azimuth: 5.05155183261,
    x_arm_midpoint: 1500.0,
    y_arm_midpoint: 1500.0,
};

pub const GEO_600: SiteGeometry = SiteGeometry {
    name: "GEO_600",
    vertex_latitude: 0.91184982752,
    vertex_longitude: 0.17116780435,
    vertex_elevation: 114.425,
    x_arm_altitude: 0.0,
    x_arm_azimuth: 1.19360100484,
    y_arm_altitude: 0.0,
    y_arm_azimuth: 5.83039279401,
    x_arm_midpoint: 300.0,
    y_arm_midpoint: 300.0,
};

pub const TAMA_300: SiteGeometry = SiteGeometry {
    name: "TAMA_300",
    vertex_latitude: 0.62267336022,
    vertex_longitude: 2.43536359469,
    vertex_elevation: 90.0,
    x_arm_altitude: 0.0,
    x_arm_azimuth: 4.71238898038,
    y_arm_altitude: 0.0,
    y_arm_azimuth: 3.14159265359,
    x_arm_midpoint: 150.0,
    y_arm_midpoint: 150.0,
};

pub const KAGRA: SiteGeometry = SiteGeometry {
    name: "KAGRA",
    vertex_latitude: 0.6355068497,
    vertex_longitude: 2.396441015,
    vertex_elevation: 414.181,
    x_arm_altitude: 0.0031414,
    x_arm_azimuth: 1.054113,
    y_arm_altitude: -0.0036270,
    y_arm_azimuth: -0.5166798,
    x_arm_midpoint: 1513.2535,
    y_arm_midpoint: 1511.611,
};
