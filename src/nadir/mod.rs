//! # Nadir-scanning satellite instruments
//!
//! Contract between the collocation core and the providers of nadir-scanner geolocation and
//! sounding data (ATMS, AMSU-A, AIRS readers, ...). The core never reads instrument files
//! itself: it asks an implementation of [`NadirSatelliteInstrument`] for a
//! [`ScanMetadata`](crate::nadir::scan_metadata::ScanMetadata) block over a time window, then
//! for the sounding record of one footprint.
//!
//! Modules
//! -----------------
//! * [`scan_metadata`] – the geolocation block returned by
//!   [`NadirSatelliteInstrument::get_geolocations`].
//!
//! Scan geometry
//! -----------------
//! [`ScanGeometry`] groups the nominal cross-track scan parameters of an instrument. The
//! inter-scan period drives the width of the window requested during refinement
//! (see [`RefineParams`](crate::collocation::RefineParams)).
//!
//! | Instrument | time between scans | footprints | spacing  |
//! |------------|--------------------|------------|----------|
//! | AIRS       | 8/3 s              | 90         | 1.10°    |
//! | AMSU-A     | 8 s                | 30         | 3.33°    |
//! | ATMS       | 8/3 s              | 96         | 1.11°    |

pub mod scan_metadata;

use std::fmt::Debug;

use camino::Utf8Path;
use hifitime::{Duration, Epoch};

use crate::collocation_errors::CollocationError;
use crate::constants::{Degree, Radian};
use crate::nadir::scan_metadata::ScanMetadata;
use crate::profile::Profile;

/// Nominal cross-track scan parameters of a nadir-scanning instrument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanGeometry {
    /// Time taken to complete one cross-track scan
    pub time_between_scans: Duration,
    /// Number of footprints in each cross-track scan
    pub scan_points_per_line: usize,
    /// Angle between footprints, radians
    pub scan_angle_spacing: Radian,
    /// Maximum scan angle, radians
    pub max_scan_angle: Radian,
}

impl ScanGeometry {
    /// Build the scan geometry of an instrument with evenly spaced footprints
    /// symmetric about nadir.
    ///
    /// Arguments
    /// -----------------
    /// * `time_between_scans`: duration of a cross-track scan, strictly positive.
    /// * `scan_points_per_line`: footprints per scan, at least 1.
    /// * `scan_angle_spacing`: angle between footprints in **degrees**, strictly positive.
    ///
    /// Return
    /// ----------
    /// * The geometry, with `max_scan_angle = spacing · (points − 1) / 2`.
    pub fn new(
        time_between_scans: Duration,
        scan_points_per_line: usize,
        scan_angle_spacing: Degree,
    ) -> Result<Self, CollocationError> {
        if time_between_scans <= Duration::ZERO {
            return Err(CollocationError::InvalidArgument(
                "time_between_scans must be strictly positive".into(),
            ));
        }
        if scan_points_per_line == 0 {
            return Err(CollocationError::InvalidArgument(
                "scan_points_per_line must be at least 1".into(),
            ));
        }
        if !(scan_angle_spacing.is_finite() && scan_angle_spacing > 0.0) {
            return Err(CollocationError::InvalidArgument(
                "scan_angle_spacing must be a strictly positive real number".into(),
            ));
        }

        let spacing = scan_angle_spacing.to_radians();
        Ok(ScanGeometry {
            time_between_scans,
            scan_points_per_line,
            scan_angle_spacing: spacing,
            max_scan_angle: spacing * (scan_points_per_line - 1) as f64 * 0.5,
        })
    }
}

/// Geolocation and time attached to a sounding request, echoed into the sounder profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundingContext {
    pub longitude: Degree,
    pub latitude: Degree,
    pub time: Epoch,
}

/// A nadir-scanning instrument carried by a satellite.
///
/// Implementations are shared between collocations (`Arc<dyn NadirSatelliteInstrument>`) and
/// may be used from several worker threads at once.
pub trait NadirSatelliteInstrument: Debug + Send + Sync {
    /// Host satellite name, e.g. `"NOAA-20"`.
    fn satellite_name(&self) -> &str;

    /// Instrument name, e.g. `"ATMS"`.
    fn instrument_name(&self) -> &str;

    fn scan_geometry(&self) -> &ScanGeometry;

    /// Nominal time between consecutive scans.
    fn time_between_scans(&self) -> Duration {
        self.scan_geometry().time_between_scans
    }

    /// Geolocations of the soundings whose scans fall within `[start, end]`.
    ///
    /// Errors
    /// ----------
    /// * [`CollocationError::DataUnavailable`] when no scanner data exists for the window.
    fn get_geolocations(&self, start: Epoch, end: Epoch) -> Result<ScanMetadata, CollocationError>;

    /// Sounding data of footprint `footprint_index` of scan `scan_index` in `file`.
    ///
    /// `context` carries the collocated geolocation and time, to be recorded in the profile.
    fn get_data(
        &self,
        file: &Utf8Path,
        scan_index: usize,
        footprint_index: usize,
        context: &SoundingContext,
    ) -> Result<Profile, CollocationError>;
}
