//! # Spherical geometry primitives
//!
//! Unit-vector conversion and great-circle angular distance on the unit sphere,
//! used by the refinement of collocations and by the brute-force baseline.
//!
//! ## Conventions
//!
//! - A (longitude λ, latitude φ) pair maps to `(cosλ·cosφ, sinλ·cosφ, sinφ)`.
//! - Scan grids are flattened in **row-major (scan-major)** order: element
//!   `k = iscan · nfootprints + ifootprint`.
//! - Angular distances are `arccos(p·q)` with the dot product clamped to `[-1, 1]`.
//!   Dot products within a few ulps of ±1 are snapped to ±1, so that identical points
//!   (including the same point written as λ = +180° and λ = −180°) are exactly `0` apart.
//!   This is below the resolution of `arccos` near 1 (≈ 1.5e-8 rad) anyway.
//!
//! ## See also
//! ------------
//! * [`crate::collocation::Collocation::refine`] – nearest-footprint search using [`nearest`].
//! * [`crate::brute_force::brute_force`] – spatial tolerance test using [`radius_of_earth`].

use itertools::Itertools;
use nalgebra::{DMatrix, Vector3};

use crate::constants::{
    Degree, Kilometer, Meter, Radian, EARTH_EQUATORIAL_RADIUS, EARTH_POLAR_RADIUS,
};

/// Dot products this close to ±1 are treated as exactly ±1.
const DOT_SNAP: f64 = 8.0 * f64::EPSILON;

/// Unit vector of a (longitude, latitude) pair given in radians.
#[inline]
pub fn unit_vector_rad(longitude: Radian, latitude: Radian) -> Vector3<f64> {
    let (sin_lon, cos_lon) = longitude.sin_cos();
    let (sin_lat, cos_lat) = latitude.sin_cos();
    Vector3::new(cos_lon * cos_lat, sin_lon * cos_lat, sin_lat)
}

/// Unit vector of a (longitude, latitude) pair given in degrees.
#[inline]
pub fn unit_vector(longitude: Degree, latitude: Degree) -> Vector3<f64> {
    unit_vector_rad(longitude.to_radians(), latitude.to_radians())
}

/// Unit vectors of a 2-D grid of (longitude, latitude) in radians.
///
/// Arguments
/// -----------------
/// * `longitudes`: `nscans × nfootprints` longitudes in radians.
/// * `latitudes`: `nscans × nfootprints` latitudes in radians, same shape.
///
/// Return
/// ----------
/// * The flattened unit vectors in row-major (scan-major) order.
///
/// Panics
/// ----------
/// * If the two matrices do not share the same shape; callers
///   ([`ScanMetadata`](crate::nadir::scan_metadata::ScanMetadata)) validate shapes at construction.
pub fn unit_vectors(
    longitudes: &DMatrix<Radian>,
    latitudes: &DMatrix<Radian>,
) -> Vec<Vector3<f64>> {
    assert_eq!(longitudes.shape(), latitudes.shape());
    let (nrows, ncols) = longitudes.shape();

    (0..nrows)
        .flat_map(|i| (0..ncols).map(move |j| (i, j)))
        .map(|(i, j)| unit_vector_rad(longitudes[(i, j)], latitudes[(i, j)]))
        .collect()
}

/// Great-circle angular separation between two unit vectors, in radians.
#[inline]
pub fn angular_distance(p: &Vector3<f64>, q: &Vector3<f64>) -> Radian {
    let dot = p.dot(q).clamp(-1.0, 1.0);
    let dot = if dot >= 1.0 - DOT_SNAP {
        1.0
    } else if dot <= -1.0 + DOT_SNAP {
        -1.0
    } else {
        dot
    };
    dot.acos()
}

/// Angular separations between one reference unit vector and every vector of a grid.
pub fn angular_distances(p: &Vector3<f64>, grid: &[Vector3<f64>]) -> Vec<Radian> {
    grid.iter().map(|q| angular_distance(p, q)).collect()
}

/// Position and value of the smallest angular distance from `p` over `grid`.
///
/// Ties are broken by the **first occurrence** in the slice order,
/// i.e. row-major (scan-major) order for grids built with [`unit_vectors`].
/// Footprints with a non-finite distance (masked geolocations) are never selected.
///
/// Return
/// ----------
/// * `Some((flat_index, distance))`, or `None` if the grid has no finite footprint.
pub fn nearest(p: &Vector3<f64>, grid: &[Vector3<f64>]) -> Option<(usize, Radian)> {
    let distances = angular_distances(p, grid);
    distances
        .iter()
        .map(|d| if d.is_finite() { *d } else { f64::INFINITY })
        .position_min_by(|a, b| a.total_cmp(b))
        .map(|k| (k, distances[k]))
        .filter(|(_, d)| d.is_finite())
}

/// Latitude-dependent radius of the Earth (WGS84 ellipsoid).
///
/// Arguments
/// -----------------
/// * `lat_geodetic`: geodetic latitude in radians.
///
/// Return
/// ----------
/// * The geocentric radius in kilometers at that latitude.
pub fn radius_of_earth(lat_geodetic: Radian) -> Kilometer {
    let a = EARTH_EQUATORIAL_RADIUS;
    let b = EARTH_POLAR_RADIUS;
    let (s, c) = lat_geodetic.sin_cos();

    (((a * a * c).powi(2) + (b * b * s).powi(2)) / ((a * c).powi(2) + (b * s).powi(2))).sqrt()
}

/// Great-circle distance in meters between two (longitude, latitude) points in degrees,
/// using the Earth radius at their mean latitude.
pub fn great_circle_distance(lon1: Degree, lat1: Degree, lon2: Degree, lat2: Degree) -> Meter {
    let angle = angular_distance(&unit_vector(lon1, lat1), &unit_vector(lon2, lat2));
    let r_e = radius_of_earth(0.5 * (lat1 + lat2).to_radians());
    angle * r_e * 1.0e3
}
