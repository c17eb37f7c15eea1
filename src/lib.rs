pub mod antenna_pattern;
pub mod constants;
pub mod cows3;
pub mod cows3_errors;
pub mod detector_states;
pub mod detectors;
pub mod earth_orientation;
pub mod ephemeris;
pub mod noise_weights;
pub mod snr;
pub mod time;
