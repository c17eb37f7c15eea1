//! Reader for LAL-format ephemeris tables.
//!
//! The files (`earth00-40-DE405.dat`, `sun00-40-DE405.dat`, ...) are plain text:
//!
//! ```text
//! # comment lines start with '#' or '%'
//! gpsYr  dt  nEntries
//! gps  x  y  z  vx  vy  vz  ax  ay  az      <- nEntries records
//! ```
//!
//! Positions are in light-seconds, velocities in units of c and accelerations in 1/s, in
//! equatorial J2000 coordinates centered on the solar-system barycenter. Records may be
//! spread over several lines; only the count of numbers matters.
use camino::Utf8Path;
use itertools::Itertools;
use nalgebra::Vector3;
use nom::{
    character::complete::multispace0, multi::count, number::complete::double,
    sequence::preceded, IResult, Parser,
};
use tracing::debug;

use crate::cows3_errors::Cows3Error;

use super::{EphemerisTable, PosVelAcc};

/// Number of values in one ephemeris record.
const RECORD_LEN: usize = 10;

fn number(input: &str) -> IResult<&str, f64> {
    preceded(multispace0, double).parse(input)
}

/// Parse the `gpsYr dt nEntries` header line.
fn parse_header(input: &str) -> IResult<&str, (f64, f64, f64)> {
    (number, number, number).parse(input)
}

fn parse_record(input: &str) -> IResult<&str, PosVelAcc> {
    let (rest, values) = count(number, RECORD_LEN).parse(input)?;
    Ok((
        rest,
        PosVelAcc {
            gps: values[0],
            pos: Vector3::new(values[1], values[2], values[3]),
            vel: Vector3::new(values[4], values[5], values[6]),
            acc: Vector3::new(values[7], values[8], values[9]),
        },
    ))
}

/// Drop the comment lines of an ephemeris file.
fn strip_comments(contents: &str) -> String {
    contents
        .lines()
        .filter(|line| {
            let line = line.trim_start();
            !(line.starts_with('#') || line.starts_with('%'))
        })
        .join("\n")
}

/// Parse the full text of an ephemeris table.
///
/// Arguments
/// -----------------
/// * `contents`: text of the file.
///
/// Return
/// ----------
/// * The parsed [`EphemerisTable`], or [`Cows3Error::EphemerisParsing`] if the header is
///   malformed, the record count does not match the header, or trailing garbage remains.
///   Uniform spacing is checked by [`EphemerisTable::new`].
pub fn parse_ephemeris_table(contents: &str) -> Result<EphemerisTable, Cows3Error> {
    let cleaned = strip_comments(contents);

    let (rest, (gps_year, dt, n_entries)) = parse_header(&cleaned)
        .map_err(|e| Cows3Error::EphemerisParsing(format!("invalid header: {e}")))?;

    if n_entries < 1.0 || n_entries.fract() != 0.0 {
        return Err(Cows3Error::EphemerisParsing(format!(
            "invalid number of entries in header: {n_entries}"
        )));
    }
    let n_entries = n_entries as usize;

    let (rest, entries) = count(parse_record, n_entries)
        .parse(rest)
        .map_err(|e| {
            Cows3Error::EphemerisParsing(format!(
                "expected {n_entries} records of {RECORD_LEN} values: {e}"
            ))
        })?;

    if !rest.trim().is_empty() {
        return Err(Cows3Error::EphemerisParsing(format!(
            "unexpected content after {n_entries} records"
        )));
    }

    EphemerisTable::new(gps_year, dt, entries)
}

/// Read and parse an ephemeris table from disk.
pub fn read_ephemeris_file(path: &Utf8Path) -> Result<EphemerisTable, Cows3Error> {
    if !path.exists() {
        return Err(Cows3Error::EphemerisFileNotFound(path.to_string()));
    }
    let contents = std::fs::read_to_string(path)?;
    let table = parse_ephemeris_table(&contents)?;
    debug!(
        path = %path,
        entries = table.len(),
        dt = table.dt(),
        "ephemeris table loaded"
    );
    Ok(table)
}

#[cfg(test)]
mod ephemeris_reader_test {
    use super::*;

    const SMALL_TABLE: &str = "\
# test table
% second comment style
2000 3600.0 3
0.0 1.0 2.0 3.0 0.1 0.2 0.3 0.01 0.02 0.03
3600.0 1.5 2.5 3.5
  0.1 0.2 0.3 0.01 0.02 0.03
7200.0 2.0 3.0 4.0 0.1 0.2 0.3 0.01 0.02 -3.0e-2
";

    #[test]
    fn test_parse_small_table() {
        let table = parse_ephemeris_table(SMALL_TABLE).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.dt(), 3600.0);
        assert_eq!(table.gps_year(), 2000.0);
        assert_eq!(table.first_gps(), 0.0);
        assert_eq!(table.last_gps(), 7200.0);
        assert_eq!(table.entries()[1].pos, Vector3::new(1.5, 2.5, 3.5));
        assert_eq!(table.entries()[2].acc.z, -0.03);
    }

    #[test]
    fn test_parse_bad_header() {
        let err = parse_ephemeris_table("2000 abc 3\n").unwrap_err();
        assert!(matches!(err, Cows3Error::EphemerisParsing(_)));

        let err = parse_ephemeris_table("2000 3600.0 2.5\n").unwrap_err();
        assert!(matches!(err, Cows3Error::EphemerisParsing(_)));
    }

    #[test]
    fn test_parse_missing_records() {
        let truncated = "2000 3600.0 2\n0.0 1.0 2.0 3.0 0.1 0.2 0.3 0.01 0.02 0.03\n";
        let err = parse_ephemeris_table(truncated).unwrap_err();
        assert!(matches!(err, Cows3Error::EphemerisParsing(_)));
    }

    #[test]
    fn test_parse_trailing_garbage() {
        let text = format!("{SMALL_TABLE}1.0 2.0\n");
        let err = parse_ephemeris_table(&text).unwrap_err();
        assert!(matches!(err, Cows3Error::EphemerisParsing(_)));
    }

    #[test]
    fn test_parse_non_uniform_spacing() {
        let text = "\
2000 3600.0 2
0.0 1.0 2.0 3.0 0.1 0.2 0.3 0.01 0.02 0.03
3000.0 1.0 2.0 3.0 0.1 0.2 0.3 0.01 0.02 0.03
";
        let err = parse_ephemeris_table(text).unwrap_err();
        assert!(matches!(err, Cows3Error::EphemerisParsing(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = read_ephemeris_file(Utf8Path::new("/nonexistent/earth.dat")).unwrap_err();
        assert_eq!(
            err,
            Cows3Error::EphemerisFileNotFound("/nonexistent/earth.dat".into())
        );
    }
}
