mod fuzz;
mod scenarios;

use log::LevelFilter;
use std::sync::Once;

use crate::prelude::{Config, FixedSky, Vector3};

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::builder()
            .is_test(true)
            .filter_level(LevelFilter::Debug)
            .init();
    });
}

/// Receiver ground truth shared by all scenarios (m)
pub const REFERENCE_RX_M: (f64, f64, f64) = (1000.0, 1000.0, 1000.0);

/// Range from receiver to every [FixedSky] satellite (m)
pub const REFERENCE_RANGE_M: f64 = 20200.0;

/// Four satellites: zenith, then three on the horizon (az/el in degrees)
pub const ZENITH_AND_HORIZON: [(f64, f64); 4] = [(0.0, 90.0), (0.0, 0.0), (90.0, 0.0), (180.0, 0.0)];

/// Eight satellites spread over azimuth and elevation (az/el in degrees)
pub const SPREAD_SKY: [(f64, f64); 8] = [
    (0.0, 85.0),
    (10.0, 15.0),
    (60.0, 40.0),
    (120.0, 20.0),
    (170.0, 55.0),
    (220.0, 10.0),
    (275.0, 35.0),
    (320.0, 60.0),
];

pub fn reference_rx() -> Vector3<f64> {
    Vector3::new(REFERENCE_RX_M.0, REFERENCE_RX_M.1, REFERENCE_RX_M.2)
}

pub fn fixed_sky(angles: &[(f64, f64)]) -> FixedSky {
    FixedSky::from_look_angles(angles, REFERENCE_RANGE_M)
}

/// Noise and outlier free [Config], for exact scenarios.
pub fn ideal_config(satellite_count: usize) -> Config {
    Config::default()
        .with_satellite_count(satellite_count)
        .with_outlier_probability(0.0)
        .with_noise_amplitude(0.0)
        .with_true_position(reference_rx())
}
