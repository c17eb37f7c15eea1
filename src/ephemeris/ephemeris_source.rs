//! Location of the Earth/Sun ephemeris tables.
//!
//! An [`EphemerisSource`] is parsed from a short descriptor string:
//!
//! * `"DE405"` (or any [`EphemerisVersion`]) → the LAL table pair
//!   `earth00-40-DE405.dat` / `sun00-40-DE405.dat`, searched in order in
//!   1. `$COWS3_EPHEMERIS_DIR`,
//!   2. every entry of `$LAL_DATA_PATH` (colon separated),
//!   3. the user cache directory, `<cache>/cows3_cache/ephemeris`.
//! * `"files:<earth path>,<sun path>"` → explicit files.
//!
//! LAL distributes the tables gzip-compressed; they must be decompressed before use.
use std::{fmt::Display, str::FromStr};

use camino::{Utf8Path, Utf8PathBuf};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cows3_errors::Cows3Error;

/// Environment variable pointing to a directory holding the ephemeris tables.
pub const EPHEMERIS_DIR_ENV: &str = "COWS3_EPHEMERIS_DIR";

/// LAL data search path.
pub const LAL_DATA_PATH_ENV: &str = "LAL_DATA_PATH";

/// JPL development ephemerides shipped as LAL tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EphemerisVersion {
    DE200,
    DE405,
    DE414,
    DE421,
    DE430,
}

impl EphemerisVersion {
    fn label(&self) -> &'static str {
        match self {
            EphemerisVersion::DE200 => "DE200",
            EphemerisVersion::DE405 => "DE405",
            EphemerisVersion::DE414 => "DE414",
            EphemerisVersion::DE421 => "DE421",
            EphemerisVersion::DE430 => "DE430",
        }
    }

    /// File name of the Earth table, e.g. `earth00-40-DE405.dat`.
    pub fn earth_file_name(&self) -> String {
        format!("earth00-40-{}.dat", self.label())
    }

    /// File name of the Sun table, e.g. `sun00-40-DE405.dat`.
    pub fn sun_file_name(&self) -> String {
        format!("sun00-40-{}.dat", self.label())
    }
}

impl Display for EphemerisVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for EphemerisVersion {
    type Err = Cows3Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DE200" => Ok(EphemerisVersion::DE200),
            "DE405" => Ok(EphemerisVersion::DE405),
            "DE414" => Ok(EphemerisVersion::DE414),
            "DE421" => Ok(EphemerisVersion::DE421),
            "DE430" => Ok(EphemerisVersion::DE430),
            _ => Err(Cows3Error::InvalidEphemerisSource(format!(
                "unknown ephemeris version: {s}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EphemerisSource {
    Named(EphemerisVersion),
    Files { earth: Utf8PathBuf, sun: Utf8PathBuf },
}

impl Default for EphemerisSource {
    fn default() -> Self {
        EphemerisSource::Named(EphemerisVersion::DE405)
    }
}

impl TryFrom<&str> for EphemerisSource {
    type Error = Cows3Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if let Some(files) = value.strip_prefix("files:") {
            let Some((earth, sun)) = files.split_once(',') else {
                return Err(Cows3Error::InvalidEphemerisSource(format!(
                    "expected files:<earth>,<sun>, got {value}"
                )));
            };
            let (earth, sun) = (earth.trim(), sun.trim());
            if earth.is_empty() || sun.is_empty() {
                return Err(Cows3Error::InvalidEphemerisSource(format!(
                    "empty path in {value}"
                )));
            }
            return Ok(EphemerisSource::Files {
                earth: earth.into(),
                sun: sun.into(),
            });
        }

        Ok(EphemerisSource::Named(value.parse()?))
    }
}

impl EphemerisSource {
    /// Resolve the source to the Earth and Sun file paths.
    ///
    /// Return
    /// ----------
    /// * The two paths, or [`Cows3Error::EphemerisFileNotFound`] when an explicit file does
    ///   not exist or a named table pair is found in none of the search directories.
    pub fn resolve(&self) -> Result<(Utf8PathBuf, Utf8PathBuf), Cows3Error> {
        match self {
            EphemerisSource::Files { earth, sun } => {
                for path in [earth, sun] {
                    if !path.exists() {
                        return Err(Cows3Error::EphemerisFileNotFound(path.to_string()));
                    }
                }
                Ok((earth.clone(), sun.clone()))
            }
            EphemerisSource::Named(version) => {
                let dirs = search_directories();
                find_table_pair(*version, &dirs).ok_or_else(|| {
                    Cows3Error::EphemerisFileNotFound(format!(
                        "{} / {} in [{}]",
                        version.earth_file_name(),
                        version.sun_file_name(),
                        dirs.iter().map(|d| d.as_str()).collect::<Vec<_>>().join(", ")
                    ))
                })
            }
        }
    }
}

/// Directories searched for named ephemeris tables, in priority order.
pub fn search_directories() -> Vec<Utf8PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(dir) = std::env::var(EPHEMERIS_DIR_ENV) {
        dirs.push(Utf8PathBuf::from(dir));
    }

    if let Ok(path) = std::env::var(LAL_DATA_PATH_ENV) {
        dirs.extend(
            path.split(':')
                .filter(|entry| !entry.is_empty())
                .map(Utf8PathBuf::from),
        );
    }

    if let Some(base_dirs) = BaseDirs::new() {
        if let Some(cache) = Utf8Path::from_path(base_dirs.cache_dir()) {
            dirs.push(cache.join("cows3_cache").join("ephemeris"));
        }
    }

    dirs
}

/// First directory of `dirs` containing both tables of `version`.
pub fn find_table_pair(
    version: EphemerisVersion,
    dirs: &[Utf8PathBuf],
) -> Option<(Utf8PathBuf, Utf8PathBuf)> {
    dirs.iter().find_map(|dir| {
        let earth = dir.join(version.earth_file_name());
        let sun = dir.join(version.sun_file_name());
        debug!(dir = %dir, "looking for ephemeris tables");
        (earth.exists() && sun.exists()).then_some((earth, sun))
    })
}
