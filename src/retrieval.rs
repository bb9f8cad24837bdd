//! # RO retrieval records
//!
//! Typed contents of the two RO retrieval products consumed by data assembly, and the reader
//! contract that extracts them from downloaded files.
//!
//! Products
//! -----------------
//! * [`Level2aRetrieval`] – `refractivityRetrieval`: bending angle vs. impact parameter,
//!   refractivity/geopotential vs. altitude, tangent-point track, local radius of curvature.
//! * [`Level2bRetrieval`] – `atmosphericRetrieval`: pressure, temperature, water-vapor
//!   pressure and geopotential vs. altitude.
//!
//! Masked samples are expected as `NaN`; they become fill values when the record is appended
//! to a [`Profile`].

use camino::Utf8Path;

use crate::collocation_errors::CollocationError;
use crate::profile::Profile;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Level2aRetrieval {
    /// Impact parameter of ray, meters
    pub impact_parameter: Vec<f64>,
    /// Bending angle, radians, indexed by impact parameter
    pub bending_angle: Vec<f64>,
    /// Local radius of curvature of the Earth, meters
    pub radius_of_curvature: f64,
    /// Altitude above mean sea-level geoid, meters
    pub altitude: Vec<f64>,
    /// Refractivity, N-units, indexed by altitude
    pub refractivity: Vec<f64>,
    /// Tangent point longitude, degrees east, indexed by altitude
    pub longitude: Vec<f64>,
    /// Tangent point latitude, degrees north, indexed by altitude
    pub latitude: Vec<f64>,
    /// Ray direction at the tangent point, degrees east of north, indexed by altitude
    pub orientation: Vec<f64>,
    /// Geopotential energy per unit mass, J/kg, indexed by altitude
    pub geopotential: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Level2bRetrieval {
    /// Altitude above mean sea-level geoid, meters
    pub altitude: Vec<f64>,
    /// Pressure, Pa
    pub pressure: Vec<f64>,
    /// Temperature, K
    pub temperature: Vec<f64>,
    /// Water vapor partial pressure, Pa
    pub water_vapor_pressure: Vec<f64>,
    /// Geopotential energy per unit mass, J/kg
    pub geopotential: Vec<f64>,
}

/// Reader of downloaded RO retrieval files.
pub trait RetrievalReader: Send + Sync {
    fn read_level2a(&self, path: &Utf8Path) -> Result<Level2aRetrieval, CollocationError>;
    fn read_level2b(&self, path: &Utf8Path) -> Result<Level2bRetrieval, CollocationError>;
}

fn check_len(
    product: &str,
    name: &str,
    values: &[f64],
    expected: usize,
) -> Result<(), CollocationError> {
    if values.len() != expected {
        return Err(CollocationError::InvalidArgument(format!(
            "{product} {name} has {} samples, expected {expected}",
            values.len()
        )));
    }
    Ok(())
}

impl Level2aRetrieval {
    /// Check that every variable matches the length of its indexing dimension.
    pub fn validate(&self) -> Result<(), CollocationError> {
        let nimpact = self.impact_parameter.len();
        check_len("level2a", "bendingAngle", &self.bending_angle, nimpact)?;

        let nalt = self.altitude.len();
        check_len("level2a", "refractivity", &self.refractivity, nalt)?;
        check_len("level2a", "longitude", &self.longitude, nalt)?;
        check_len("level2a", "latitude", &self.latitude, nalt)?;
        check_len("level2a", "orientation", &self.orientation, nalt)?;
        check_len("level2a", "geopotential", &self.geopotential, nalt)
    }

    /// Append the level 2a variables to an occultation profile.
    pub fn append_to(&self, profile: &mut Profile) {
        profile.push_array(
            "level2a_impactParameter",
            "impactParameter",
            &self.impact_parameter,
            "meters",
            "Impact parameter of ray",
        );
        profile.push_array(
            "level2a_bendingAngle",
            "impactParameter",
            &self.bending_angle,
            "radians",
            "Bending angle, ionosphere calibrated, unoptimized",
        );
        profile.push_array(
            "level2a_longitude",
            "l2a_altitude",
            &self.longitude,
            "degrees east",
            "Longitude of the occultation tangent point referring to level 2a refractivity retrieval",
        );
        profile.push_array(
            "level2a_latitude",
            "l2a_altitude",
            &self.latitude,
            "degrees north",
            "Latitude of the occultation tangent point referring to level 2a refractivity retrieval",
        );
        profile.push_array(
            "level2a_orientation",
            "l2a_altitude",
            &self.orientation,
            "degrees",
            "The direction of the occultation ray, transmitter to receiver, at the occultation \
             tangent point, measured eastward from north, referring to level 2a refractivity retrieval",
        );
        profile.push_scalar(
            "level2a_radiusOfCurvature",
            self.radius_of_curvature,
            "meters",
            "Local radius of curvature of the Earth",
        );
        profile.push_array(
            "level2a_altitude",
            "l2a_altitude",
            &self.altitude,
            "meters",
            "Altitude above mean sea-level geoid referring to level 2a refractivity retrieval",
        );
        profile.push_array(
            "level2a_refractivity",
            "l2a_altitude",
            &self.refractivity,
            "N-units",
            "Level 2a refractivity retrieval",
        );
        profile.push_array(
            "level2a_geopotential",
            "l2a_altitude",
            &self.geopotential,
            "J/kg",
            "Geopotential energy per unit mass referring to level 2a refractivity retrieval",
        );
    }
}

impl Level2bRetrieval {
    pub fn validate(&self) -> Result<(), CollocationError> {
        let nalt = self.altitude.len();
        check_len("level2b", "pressure", &self.pressure, nalt)?;
        check_len("level2b", "temperature", &self.temperature, nalt)?;
        check_len(
            "level2b",
            "waterVaporPressure",
            &self.water_vapor_pressure,
            nalt,
        )?;
        check_len("level2b", "geopotential", &self.geopotential, nalt)
    }

    /// Append the level 2b variables to an occultation profile.
    pub fn append_to(&self, profile: &mut Profile) {
        profile.push_array(
            "level2b_altitude",
            "l2b_altitude",
            &self.altitude,
            "meters",
            "Altitude above mean sea-level geoid referring to level 2b 1DVAR retrieval",
        );
        profile.push_array(
            "level2b_pressure",
            "l2b_altitude",
            &self.pressure,
            "Pa",
            "Atmospheric pressure, referring to level 2b retrieval",
        );
        profile.push_array(
            "level2b_temperature",
            "l2b_altitude",
            &self.temperature,
            "K",
            "Atmospheric temperature, referring to level 2b retrieval",
        );
        profile.push_array(
            "level2b_waterVaporPressure",
            "l2b_altitude",
            &self.water_vapor_pressure,
            "Pa",
            "Atmospheric water vapor partial pressure, referring to level 2b retrieval",
        );
        profile.push_array(
            "level2b_geopotential",
            "l2b_altitude",
            &self.geopotential,
            "J/kg",
            "Geopotential energy per unit mass, referring to level 2b retrieval",
        );
    }
}
