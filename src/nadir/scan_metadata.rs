//! # Scan metadata
//!
//! Geolocations of a time-windowed block of nadir-scanner footprints, plus the pointers needed
//! to retrieve the sounding data of any footprint.
//!
//! Layout
//! -----------------
//! * `longitudes`, `latitudes`: `nscans × nfootprints` matrices in **radians**.
//! * `mid_times`: one UTC epoch per scan (middle of the scan), non-decreasing.
//! * `files`: data files backing the block; `file_indices[iscan]` points into `files`.
//! * `scan_indices[iscan]`: scan index of `iscan` *within* its data file.
//!
//! A [`ScanMetadata`] is immutable once built; collocations share it through an `Arc`.

use std::ops::Range;

use camino::{Utf8Path, Utf8PathBuf};
use hifitime::{Duration, Epoch};
use nalgebra::{DMatrix, Vector3};

use crate::collocation_errors::CollocationError;
use crate::constants::{Degree, Radian};
use crate::nadir::{NadirSatelliteInstrument, SoundingContext};
use crate::profile::Profile;
use crate::spherical::unit_vectors;

#[derive(Debug, Clone, PartialEq)]
pub struct ScanMetadata {
    longitudes: DMatrix<Radian>,
    latitudes: DMatrix<Radian>,
    mid_times: Vec<Epoch>,
    files: Vec<Utf8PathBuf>,
    file_indices: Vec<usize>,
    scan_indices: Vec<usize>,
}

impl ScanMetadata {
    /// Build a validated block of scan metadata.
    ///
    /// Arguments
    /// -----------------
    /// * `longitudes`, `latitudes`: footprint geolocations in radians, `nscans × nfootprints`.
    /// * `mid_times`: per-scan mid-times, length `nscans`, non-decreasing.
    /// * `files`: data files backing the block.
    /// * `file_indices`: per-scan index into `files`, length `nscans`.
    /// * `scan_indices`: per-scan index within its file, length `nscans`.
    ///
    /// Errors
    /// ----------
    /// * [`CollocationError::DataUnavailable`] if the grid has no scan or no footprint.
    /// * [`CollocationError::InvalidArgument`] on mismatched shapes or lengths, a file index
    ///   out of range, or decreasing mid-times.
    pub fn new(
        longitudes: DMatrix<Radian>,
        latitudes: DMatrix<Radian>,
        mid_times: Vec<Epoch>,
        files: Vec<Utf8PathBuf>,
        file_indices: Vec<usize>,
        scan_indices: Vec<usize>,
    ) -> Result<Self, CollocationError> {
        let (nscans, nfootprints) = longitudes.shape();

        if nscans == 0 || nfootprints == 0 {
            return Err(CollocationError::DataUnavailable(
                "no nadir-scanner soundings in geolocation block".into(),
            ));
        }
        if latitudes.shape() != longitudes.shape() {
            return Err(CollocationError::InvalidArgument(format!(
                "latitudes shape {:?} differs from longitudes shape {:?}",
                latitudes.shape(),
                longitudes.shape()
            )));
        }
        for (name, len) in [
            ("mid_times", mid_times.len()),
            ("file_indices", file_indices.len()),
            ("scan_indices", scan_indices.len()),
        ] {
            if len != nscans {
                return Err(CollocationError::InvalidArgument(format!(
                    "{name} has length {len}, expected nscans = {nscans}"
                )));
            }
        }
        if let Some(bad) = file_indices.iter().find(|&&i| i >= files.len()) {
            return Err(CollocationError::InvalidArgument(format!(
                "file index {bad} out of range for {} files",
                files.len()
            )));
        }
        if mid_times.windows(2).any(|w| w[1] < w[0]) {
            return Err(CollocationError::InvalidArgument(
                "scan mid-times must be non-decreasing".into(),
            ));
        }

        Ok(ScanMetadata {
            longitudes,
            latitudes,
            mid_times,
            files,
            file_indices,
            scan_indices,
        })
    }

    /// Block backed by a single data file whose scans map one-to-one onto the grid rows.
    pub fn single_file(
        longitudes: DMatrix<Radian>,
        latitudes: DMatrix<Radian>,
        mid_times: Vec<Epoch>,
        file: Utf8PathBuf,
    ) -> Result<Self, CollocationError> {
        let nscans = longitudes.nrows();
        Self::new(
            longitudes,
            latitudes,
            mid_times,
            vec![file],
            vec![0; nscans],
            (0..nscans).collect(),
        )
    }

    pub fn nscans(&self) -> usize {
        self.longitudes.nrows()
    }

    pub fn nfootprints(&self) -> usize {
        self.longitudes.ncols()
    }

    pub fn contains(&self, iscan: usize, ifootprint: usize) -> bool {
        iscan < self.nscans() && ifootprint < self.nfootprints()
    }

    pub fn longitudes(&self) -> &DMatrix<Radian> {
        &self.longitudes
    }

    pub fn latitudes(&self) -> &DMatrix<Radian> {
        &self.latitudes
    }

    pub fn mid_times(&self) -> &[Epoch] {
        &self.mid_times
    }

    /// Footprint longitude in radians. Panics when out of the grid.
    pub fn longitude(&self, iscan: usize, ifootprint: usize) -> Radian {
        self.longitudes[(iscan, ifootprint)]
    }

    /// Footprint latitude in radians. Panics when out of the grid.
    pub fn latitude(&self, iscan: usize, ifootprint: usize) -> Radian {
        self.latitudes[(iscan, ifootprint)]
    }

    /// Footprint (longitude, latitude) in degrees. Panics when out of the grid.
    pub fn location_deg(&self, iscan: usize, ifootprint: usize) -> (Degree, Degree) {
        (
            self.longitude(iscan, ifootprint).to_degrees(),
            self.latitude(iscan, ifootprint).to_degrees(),
        )
    }

    /// Mid-time of a scan. Panics when out of the grid.
    pub fn mid_time(&self, iscan: usize) -> Epoch {
        self.mid_times[iscan]
    }

    pub fn file_for_scan(&self, iscan: usize) -> &Utf8Path {
        &self.files[self.file_indices[iscan]]
    }

    pub fn scan_index(&self, iscan: usize) -> usize {
        self.scan_indices[iscan]
    }

    /// Unit vectors of every footprint, row-major (scan-major).
    pub fn unit_vectors(&self) -> Vec<Vector3<f64>> {
        unit_vectors(&self.longitudes, &self.latitudes)
    }

    /// Scans whose mid-time lies within `[time - tolerance, time + tolerance]`.
    pub fn scans_within(&self, time: Epoch, tolerance: Duration) -> Range<usize> {
        let start = self.mid_times.partition_point(|t| *t < time - tolerance);
        let end = self.mid_times.partition_point(|t| *t <= time + tolerance);
        start..end.max(start)
    }

    /// Retrieve the sounding data of footprint `(iscan, ifootprint)` through `instrument`.
    ///
    /// The footprint is resolved to its data file and in-file scan index before calling
    /// [`NadirSatelliteInstrument::get_data`].
    ///
    /// Errors
    /// ----------
    /// * [`CollocationError::InvalidArgument`] when the indices fall outside the grid.
    /// * Any error raised by the instrument.
    pub fn sounding(
        &self,
        instrument: &dyn NadirSatelliteInstrument,
        iscan: usize,
        ifootprint: usize,
        context: &SoundingContext,
    ) -> Result<Profile, CollocationError> {
        if !self.contains(iscan, ifootprint) {
            return Err(CollocationError::InvalidArgument(format!(
                "footprint ({iscan}, {ifootprint}) outside {}x{} scan grid",
                self.nscans(),
                self.nfootprints()
            )));
        }

        instrument.get_data(
            self.file_for_scan(iscan),
            self.scan_index(iscan),
            ifootprint,
            context,
        )
    }
}
