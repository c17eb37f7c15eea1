use thiserror::Error;

#[derive(Error, Debug)]
pub enum Cows3Error {
    #[error("Invalid detector code: {0}")]
    InvalidDetector(String),

    #[error("Detector {0} appears more than once in the timestamp set")]
    DuplicateDetector(String),

    #[error("Timestamp set contains no detector")]
    EmptyTimestamps,

    #[error("Detector {0} has no timestamp")]
    EmptyDetectorTimestamps(String),

    #[error("Non-finite timestamp for detector {detector} at index {index}")]
    NonFiniteTimestamp { detector: String, index: usize },

    #[error("{detectors} detectors for {timestamps} timestamp vectors")]
    DetectorCountMismatch { detectors: usize, timestamps: usize },

    #[error("Invalid coverage duration (Tsft): {0}, must be finite and strictly positive")]
    InvalidTsft(f64),

    #[error("Invalid time offset: {0}, must be finite")]
    InvalidTimeOffset(f64),

    #[error("Need either `noise_weights` or `assume_sqrt_sx` to account for background noise, but not both")]
    NoiseSpecification,

    #[error("Need either (h0, cosi) or (a_plus, a_cross), but not both")]
    AmplitudeSpecification,

    #[error("Noise weights shape mismatch: {0}")]
    NoiseWeightsShape(String),

    #[error("Invalid noise floor: {0}")]
    InvalidNoiseFloor(f64),

    #[error("Detector state collection is empty")]
    EmptyDetectorStates,

    #[error("Invalid ephemeris source: {0}")]
    InvalidEphemerisSource(String),

    #[error("Ephemeris file not found: {0}")]
    EphemerisFileNotFound(String),

    #[error("Error while parsing the ephemeris file: {0}")]
    EphemerisParsing(String),

    #[error("GPS time {gps} outside of the {body} ephemeris range [{start}, {end}]")]
    EphemerisOutOfRange {
        body: &'static str,
        gps: f64,
        start: f64,
        end: f64,
    },

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),
}

impl PartialEq for Cows3Error {
    fn eq(&self, other: &Self) -> bool {
        use Cows3Error::*;
        match (self, other) {
            (InvalidDetector(a), InvalidDetector(b)) => a == b,
            (DuplicateDetector(a), DuplicateDetector(b)) => a == b,
            (EmptyDetectorTimestamps(a), EmptyDetectorTimestamps(b)) => a == b,
            (
                NonFiniteTimestamp {
                    detector: d1,
                    index: i1,
                },
                NonFiniteTimestamp {
                    detector: d2,
                    index: i2,
                },
            ) => d1 == d2 && i1 == i2,
            (
                DetectorCountMismatch {
                    detectors: d1,
                    timestamps: t1,
                },
                DetectorCountMismatch {
                    detectors: d2,
                    timestamps: t2,
                },
            ) => d1 == d2 && t1 == t2,
            (InvalidTsft(a), InvalidTsft(b)) => a.to_bits() == b.to_bits(),
            (InvalidTimeOffset(a), InvalidTimeOffset(b)) => a.to_bits() == b.to_bits(),
            (NoiseWeightsShape(a), NoiseWeightsShape(b)) => a == b,
            (InvalidNoiseFloor(a), InvalidNoiseFloor(b)) => a.to_bits() == b.to_bits(),
            (InvalidEphemerisSource(a), InvalidEphemerisSource(b)) => a == b,
            (EphemerisFileNotFound(a), EphemerisFileNotFound(b)) => a == b,
            (EphemerisParsing(a), EphemerisParsing(b)) => a == b,
            (
                EphemerisOutOfRange {
                    body: b1, gps: g1, ..
                },
                EphemerisOutOfRange {
                    body: b2, gps: g2, ..
                },
            ) => b1 == b2 && g1.to_bits() == g2.to_bits(),

            // io errors are not comparable: same variant is enough
            (IoError(_), IoError(_)) => true,

            (EmptyTimestamps, EmptyTimestamps) => true,
            (NoiseSpecification, NoiseSpecification) => true,
            (AmplitudeSpecification, AmplitudeSpecification) => true,
            (EmptyDetectorStates, EmptyDetectorStates) => true,

            _ => false,
        }
    }
}
