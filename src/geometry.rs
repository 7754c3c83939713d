//! Satellites geometry, as seen from the receiver.
//!
//! The core is agnostic to where the geometry comes from: any type
//! implementing [GeometryProvider] may feed a [Round]. Two providers ship
//! with the library: the closed-form [RandomSky] generator and the
//! deterministic [FixedSky].
//!
//! Look angles follow a local cartesian model: azimuth is counted from the
//! X axis towards the Y axis, elevation from the XY plane towards Z.
use log::trace;
use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        EARTH_FLATTENING_WGS84, EARTH_SEMI_MAJOR_AXIS_WGS84, NOMINAL_SV_RANGE_M,
        SV_RANGE_SPREAD_M,
    },
    prelude::{Error, Vector3},
};

/// Position and look angles of one satellite in sight.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SatelliteGeometry {
    /// Identifier, unique within a [Round]
    pub id: u32,
    /// Position, in the receiver frame (m)
    pub position_m: Vector3<f64>,
    /// Azimuth angle from RX position
    pub azimuth_deg: f64,
    /// Elevation angle from RX position
    pub elevation_deg: f64,
}

impl SatelliteGeometry {
    /// Builds [SatelliteGeometry] from look angles and range to the receiver.
    pub fn from_look_angles(
        id: u32,
        rx_position_m: &Vector3<f64>,
        azimuth_deg: f64,
        elevation_deg: f64,
        range_m: f64,
    ) -> Self {
        let (az, el) = (azimuth_deg.to_radians(), elevation_deg.to_radians());
        let los = Vector3::new(az.cos() * el.cos(), az.sin() * el.cos(), el.sin());
        Self {
            id,
            azimuth_deg,
            elevation_deg,
            position_m: rx_position_m + los * range_m,
        }
    }

    /// Geometric range from given position (m)
    pub fn range_m(&self, position_m: &Vector3<f64>) -> f64 {
        (self.position_m - position_m).norm()
    }

    /// True when this satellite is not below the horizon
    pub fn in_sight(&self) -> bool {
        self.elevation_deg >= 0.0
    }
}

/// Anything that may supply the satellites in sight of a receiver.
/// Upstream acquisition (orbital elements retrieval, propagation..)
/// must be completed by the time [GeometryProvider::satellites] returns.
pub trait GeometryProvider {
    /// Returns up to `count` [SatelliteGeometry]s, as seen from `rx_position_m`.
    fn satellites(
        &mut self,
        rx_position_m: &Vector3<f64>,
        count: usize,
    ) -> Result<Vec<SatelliteGeometry>, Error>;
}

/// Computes (azimuth, elevation) in degrees of `sv_position_m` as seen
/// from `rx_position_m`. Returns None when both positions coincide.
pub fn look_angles(
    rx_position_m: &Vector3<f64>,
    sv_position_m: &Vector3<f64>,
) -> Option<(f64, f64)> {
    let los = sv_position_m - rx_position_m;
    let range = los.norm();
    if range == 0.0 || !range.is_finite() {
        return None;
    }
    let azimuth = los[1].atan2(los[0]).to_degrees().rem_euclid(360.0);
    let elevation = (los[2] / range).clamp(-1.0, 1.0).asin().to_degrees();
    Some((azimuth, elevation))
}

/// Converts geodetic coordinates (ddeg, ddeg, m above the WGS84 ellipsoid)
/// to ECEF coordinates (m).
pub fn ecef_from_geodetic(lat_ddeg: f64, long_ddeg: f64, alt_m: f64) -> Vector3<f64> {
    let (lat, long) = (lat_ddeg.to_radians(), long_ddeg.to_radians());
    let e2 = EARTH_FLATTENING_WGS84 * (2.0 - EARTH_FLATTENING_WGS84);
    let n = EARTH_SEMI_MAJOR_AXIS_WGS84 / (1.0 - e2 * lat.sin().powi(2)).sqrt();
    Vector3::new(
        (n + alt_m) * lat.cos() * long.cos(),
        (n + alt_m) * lat.cos() * long.sin(),
        (n * (1.0 - e2) + alt_m) * lat.sin(),
    )
}

/// Closed-form sky generator: satellites are randomly spread over the
/// upper hemisphere, at roughly constant range from the receiver.
#[derive(Debug, Clone)]
pub struct RandomSky<R: Rng> {
    rng: R,
    /// Nominal range to the receiver (m)
    pub nominal_range_m: f64,
    /// Total range spread around the nominal value (m)
    pub range_spread_m: f64,
}

impl<R: Rng> RandomSky<R> {
    /// Builds a new [RandomSky] from given random source.
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            nominal_range_m: NOMINAL_SV_RANGE_M,
            range_spread_m: SV_RANGE_SPREAD_M,
        }
    }

    /// Copies and returns [RandomSky] with updated range model (m)
    pub fn with_range(mut self, nominal_m: f64, spread_m: f64) -> Self {
        self.nominal_range_m = nominal_m;
        self.range_spread_m = spread_m;
        self
    }
}

impl<R: Rng> GeometryProvider for RandomSky<R> {
    fn satellites(
        &mut self,
        rx_position_m: &Vector3<f64>,
        count: usize,
    ) -> Result<Vec<SatelliteGeometry>, Error> {
        if !(self.nominal_range_m.is_finite() && self.nominal_range_m > 0.0) {
            return Err(Error::Geometry("invalid nominal range".to_string()));
        }
        if !(self.range_spread_m.is_finite() && self.range_spread_m >= 0.0) {
            return Err(Error::Geometry("invalid range spread".to_string()));
        }

        let satellites = (0..count)
            .map(|i| {
                let azimuth = self.rng.random_range(0.0..360.0);
                let elevation = self.rng.random_range(0.0..90.0);
                let jitter = self.rng.random::<f64>() - 0.5;
                let range = self.nominal_range_m + jitter * self.range_spread_m;

                trace!(
                    "sv={} azimuth={:.3} elevation={:.3} range={:.3}",
                    i,
                    azimuth,
                    elevation,
                    range
                );

                SatelliteGeometry::from_look_angles(
                    i as u32,
                    rx_position_m,
                    azimuth,
                    elevation,
                    range,
                )
            })
            .collect();

        Ok(satellites)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Placement {
    /// (azimuth, elevation) in degrees, placed at constant range
    LookAngles { angles: Vec<(f64, f64)>, range_m: f64 },
    /// Absolute positions (m)
    Positions(Vec<Vector3<f64>>),
}

/// Deterministic provider, always returning the same satellites.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedSky {
    placement: Placement,
}

impl FixedSky {
    /// Builds [FixedSky] from (azimuth, elevation) pairs in degrees,
    /// each satellite being placed at `range_m` from the receiver.
    pub fn from_look_angles(angles: &[(f64, f64)], range_m: f64) -> Self {
        Self {
            placement: Placement::LookAngles {
                angles: angles.to_vec(),
                range_m,
            },
        }
    }

    /// Builds [FixedSky] from absolute satellite positions (m).
    /// Look angles are resolved from the receiver position.
    pub fn from_positions(positions_m: &[Vector3<f64>]) -> Self {
        Self {
            placement: Placement::Positions(positions_m.to_vec()),
        }
    }

    /// Number of satellites in this [FixedSky]
    pub fn len(&self) -> usize {
        match &self.placement {
            Placement::LookAngles { angles, .. } => angles.len(),
            Placement::Positions(positions) => positions.len(),
        }
    }

    /// True if this [FixedSky] has no satellites
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl GeometryProvider for FixedSky {
    fn satellites(
        &mut self,
        rx_position_m: &Vector3<f64>,
        count: usize,
    ) -> Result<Vec<SatelliteGeometry>, Error> {
        match &self.placement {
            Placement::LookAngles { angles, range_m } => {
                if !(range_m.is_finite() && *range_m > 0.0) {
                    return Err(Error::Geometry("invalid satellite range".to_string()));
                }
                Ok(angles
                    .iter()
                    .take(count)
                    .enumerate()
                    .map(|(i, (azimuth, elevation))| {
                        SatelliteGeometry::from_look_angles(
                            i as u32,
                            rx_position_m,
                            *azimuth,
                            *elevation,
                            *range_m,
                        )
                    })
                    .collect())
            },
            Placement::Positions(positions) => positions
                .iter()
                .take(count)
                .enumerate()
                .map(|(i, position_m)| {
                    let (azimuth_deg, elevation_deg) = look_angles(rx_position_m, position_m)
                        .ok_or_else(|| {
                            Error::Geometry(format!("satellite #{} located at receiver", i))
                        })?;
                    Ok(SatelliteGeometry {
                        id: i as u32,
                        position_m: *position_m,
                        azimuth_deg,
                        elevation_deg,
                    })
                })
                .collect(),
        }
    }
}
