//! Spherical Mercator projection in degree units.
//!
//! X is the longitude unchanged. Y is the Mercator northing expressed in
//! degrees, so both axes span `[-180, 180]` and the projection is conformal
//! with a square world.

use super::PointD;

pub const MIN_X: f64 = -180.0;
pub const MAX_X: f64 = 180.0;
pub const MIN_Y: f64 = -180.0;
pub const MAX_Y: f64 = 180.0;

/// Latitude at which the Mercator northing reaches `MAX_Y`.
pub const MAX_LAT: f64 = 85.051_128_779_806_59;
pub const MIN_LAT: f64 = -MAX_LAT;

#[inline]
pub fn lon_to_x(lon: f64) -> f64 {
    lon.clamp(MIN_X, MAX_X)
}

#[inline]
pub fn x_to_lon(x: f64) -> f64 {
    x.clamp(MIN_X, MAX_X)
}

/// Project a latitude (clamped to the Mercator range) onto the Y axis.
#[inline]
pub fn lat_to_y(lat: f64) -> f64 {
    let lat = lat.clamp(MIN_LAT, MAX_LAT);
    let y = lat.to_radians().tan().asinh().to_degrees();
    y.clamp(MIN_Y, MAX_Y)
}

#[inline]
pub fn y_to_lat(y: f64) -> f64 {
    y.clamp(MIN_Y, MAX_Y).to_radians().sinh().atan().to_degrees()
}

/// Project a geographic position.
#[inline]
pub fn from_lat_lon(lat: f64, lon: f64) -> PointD {
    PointD::new(lon_to_x(lon), lat_to_y(lat))
}

/// Inverse of [`from_lat_lon`], returning `(lat, lon)`.
#[inline]
pub fn to_lat_lon(p: PointD) -> (f64, f64) {
    (y_to_lat(p.y), x_to_lon(p.x))
}
