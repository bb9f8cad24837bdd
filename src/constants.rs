//! # Constants and type definitions for rocolloc
//!
//! This module centralizes the **geophysical constants**, **refinement defaults**, and **unit
//! aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - WGS84 Earth radii used by the latitude-dependent radius of curvature
//! - Fill value written in place of masked profile samples
//! - Default refinement window (in multiples of the inter-scan period)
//! - Unit aliases shared by the geometry and collocation modules

// -------------------------------------------------------------------------------------------------
// Geophysical constants
// -------------------------------------------------------------------------------------------------

/// Earth equatorial radius in kilometers (WGS84)
pub const EARTH_EQUATORIAL_RADIUS: f64 = 6_378.137;

/// Earth polar radius in kilometers (WGS84)
pub const EARTH_POLAR_RADIUS: f64 = 6_356.752_314_2;

// -------------------------------------------------------------------------------------------------
// Product conventions
// -------------------------------------------------------------------------------------------------

/// Value substituted for masked (missing or non-finite) samples in output profiles
pub const FILL_VALUE: f64 = -1.0e20;

/// `file_type` attribute of a collocation archive
pub const ARCHIVE_FILE_TYPE: &str = "gnssro-nadirsounder-collocations";

// -------------------------------------------------------------------------------------------------
// Refinement defaults
// -------------------------------------------------------------------------------------------------

/// Half-width of the geolocation window requested by refinement, in inter-scan periods
pub const DEFAULT_WINDOW_SCANS: f64 = 4.0;

/// Number of times refinement may double its window when the minimum sits on a window edge
pub const DEFAULT_MAX_WIDENINGS: u32 = 3;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Distance in meters
pub type Meter = f64;
/// Occultation identifier as issued by the RO database
pub type OccId = String;
