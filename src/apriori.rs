use crate::{
    constants::DEFAULT_APRIORI_POSITION_M, geometry::ecef_from_geodetic, prelude::Vector3,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [Apriori] knowledge the solver iterates from.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Apriori {
    /// Initial position guess (m)
    pub position_m: Vector3<f64>,
    /// Initial clock bias guess (m).
    /// Only used when the clock bias is part of the estimated state.
    pub clock_bias_m: f64,
}

impl Default for Apriori {
    fn default() -> Self {
        let (x, y, z) = DEFAULT_APRIORI_POSITION_M;
        Self::from_ecef_m(Vector3::new(x, y, z))
    }
}

impl Apriori {
    /// Builds [Apriori] from ECEF position (m), with null clock bias.
    pub fn from_ecef_m(position_m: Vector3<f64>) -> Self {
        Self {
            position_m,
            clock_bias_m: 0.0,
        }
    }

    /// Builds [Apriori] from geodetic coordinates:
    /// latitude (ddeg), longitude (ddeg) and altitude above the WGS84 ellipsoid (m).
    pub fn from_geodetic(lat_ddeg: f64, long_ddeg: f64, alt_m: f64) -> Self {
        Self::from_ecef_m(ecef_from_geodetic(lat_ddeg, long_ddeg, alt_m))
    }

    /// Copies and returns [Apriori] with updated clock bias guess (m)
    pub fn with_clock_bias(&self, clock_bias_m: f64) -> Self {
        let mut s = *self;
        s.clock_bias_m = clock_bias_m;
        s
    }
}

#[cfg(test)]
mod test {
    use super::Apriori;
    use crate::prelude::Vector3;

    #[test]
    fn default_apriori() {
        let apriori = Apriori::default();
        assert_eq!(apriori.position_m, Vector3::new(900.0, 900.0, 900.0));
        assert_eq!(apriori.clock_bias_m, 0.0);
        assert_eq!(apriori.with_clock_bias(5.0).clock_bias_m, 5.0);
    }

    #[test]
    fn geodetic_apriori() {
        let apriori = Apriori::from_geodetic(0.0, 0.0, 0.0);
        assert!((apriori.position_m[0] - 6378137.0).abs() < 1.0E-6);
        assert!(apriori.position_m[1].abs() < 1.0E-6);
        assert!(apriori.position_m[2].abs() < 1.0E-6);
    }
}
