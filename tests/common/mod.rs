#![allow(dead_code)]

use std::fmt::Write;

use camino::{Utf8Path, Utf8PathBuf};
use cows3::cows3::Cows3;
use tempfile::TempDir;

pub const TEST_GPS: f64 = 1238166018.0;

const SECONDS_PER_DAY: f64 = 86400.0;
const AU_LIGHT_SECONDS: f64 = 499.00478;
const OBLIQUITY: f64 = 0.40909280422;

/// Records `(gps, pos, vel, acc)` of an Earth on a circular ecliptic orbit.
pub fn circular_earth_records(start: f64, dt: f64, n_entries: usize) -> Vec<[f64; 10]> {
    let rate = std::f64::consts::TAU / (365.25636 * SECONDS_PER_DAY);
    let (sin_eps, cos_eps) = OBLIQUITY.sin_cos();

    (0..n_entries)
        .map(|i| {
            let gps = start + dt * i as f64;
            let (s, c) = (rate * (gps - TEST_GPS)).sin_cos();
            let pos = [c, cos_eps * s, sin_eps * s].map(|x| AU_LIGHT_SECONDS * x);
            let vel = [-s, cos_eps * c, sin_eps * c].map(|x| AU_LIGHT_SECONDS * rate * x);
            let acc = pos.map(|x| -rate * rate * x);
            [
                gps, pos[0], pos[1], pos[2], vel[0], vel[1], vel[2], acc[0], acc[1], acc[2],
            ]
        })
        .collect()
}

/// Render records in the LAL ephemeris text format.
pub fn format_lal_table(gps_year: f64, dt: f64, records: &[[f64; 10]]) -> String {
    let mut out = String::from("% synthetic ephemeris\n# gpsYr dt nEntries\n");
    writeln!(out, "{gps_year} {dt} {}", records.len()).unwrap();
    for record in records {
        let line = record.iter().map(|x| format!("{x:e}")).collect::<Vec<_>>();
        writeln!(out, "{}", line.join(" ")).unwrap();
    }
    out
}

/// Write a synthetic Earth/Sun table pair covering a month around [`TEST_GPS`] into `dir`.
pub fn write_synthetic_tables(dir: &Utf8Path, earth_name: &str, sun_name: &str) -> (Utf8PathBuf, Utf8PathBuf) {
    let dt = 14400.0;
    let earth_records = circular_earth_records(TEST_GPS - 10.0 * SECONDS_PER_DAY, dt, 240);
    let sun_records = earth_records
        .iter()
        .map(|record| {
            let mut sun = [0.0; 10];
            sun[0] = record[0];
            sun
        })
        .collect::<Vec<_>>();

    let earth = dir.join(earth_name);
    let sun = dir.join(sun_name);
    std::fs::write(&earth, format_lal_table(2019.0, dt, &earth_records)).unwrap();
    std::fs::write(&sun, format_lal_table(2019.0, dt, &sun_records)).unwrap();
    (earth, sun)
}

/// A context reading the synthetic tables through a `files:` descriptor.
///
/// The returned directory must outlive the first ephemeris access.
pub fn synthetic_cows3() -> (TempDir, Cows3) {
    let dir = tempfile::tempdir().unwrap();
    let dir_path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    let (earth, sun) = write_synthetic_tables(&dir_path, "earth.dat", "sun.dat");

    let cows3 = Cows3::new(&format!("files:{earth},{sun}")).unwrap();
    (dir, cows3)
}
