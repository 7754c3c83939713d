/// WGS84 Earth Frame Ellipsoid semi-major axis (meters)
pub const EARTH_SEMI_MAJOR_AXIS_WGS84: f64 = 6378137.0_f64;

/// WGS84 Earth Frame Ellipsoid flattening
pub const EARTH_FLATTENING_WGS84: f64 = 1.0 / 298.257223563;

/// Nominal range to satellites of the closed-form sky generator (meters)
pub const NOMINAL_SV_RANGE_M: f64 = 20200.0;

/// Total spread of the closed-form sky generator around [NOMINAL_SV_RANGE_M]
pub const SV_RANGE_SPREAD_M: f64 = 1000.0;

/// Default receiver position used by rounds (meters)
pub const DEFAULT_RX_POSITION_M: (f64, f64, f64) = (1000.0, 1000.0, 1000.0);

/// Default solver initial guess (meters)
pub const DEFAULT_APRIORI_POSITION_M: (f64, f64, f64) = (900.0, 900.0, 900.0);
