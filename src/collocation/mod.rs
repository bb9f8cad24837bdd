//! # Collocation candidates
//!
//! A [`Collocation`] claims that one radio-occultation sounding and one nadir-scanner footprint
//! coincide in space and time. It is built in one of two patterns:
//!
//! 1. **Approximate**, from a fast matching pass (e.g. the rotation algorithm): approximate
//!    time and scan angle are known, the footprint indices are not.
//!    [`Collocation::refine`] then locates the exact nearest footprint.
//! 2. **Fully specified**, from a ground-truth pass such as
//!    [`brute_force`](crate::brute_force::brute_force): scan metadata and indices are given.
//!
//! Lifecycle
//! -----------------
//! ```text
//! builder().build()  ──►  refine()  ──►  get_data()  ──►  archive
//!   (validated)          (iscan, ifootprint,   (profiles cached
//!                         lon/lat of cell)      in `data`, time = scan mid-time)
//! ```
//!
//! A collocation is exclusively owned by the task processing it; refinement and data assembly
//! take `&mut self` and are never interleaved on one candidate.
//!
//! Modules
//! -----------------
//! * [`refine`] – nearest-footprint search and [`RefineParams`].
//! * `assemble` – retrieval of RO and sounder profiles ([`Collocation::get_data`]).
//!
//! See also
//! ------------
//! * [`CollocationList`](crate::collocation_list::CollocationList) – set algebra over candidates.
//! * [`ScanMetadata`] – the grid the indices point into.

mod assemble;
pub mod refine;

pub use refine::{RefineParams, RefineParamsBuilder};

use std::fmt;
use std::sync::Arc;

use hifitime::Epoch;
use serde::Serialize;

use crate::collocation_errors::CollocationError;
use crate::constants::Degree;
use crate::nadir::scan_metadata::ScanMetadata;
use crate::nadir::NadirSatelliteInstrument;
use crate::occultation::{OccList, Occultation};
use crate::profile::Profile;

/// Occultation and sounder profiles of one collocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollocationData {
    pub occid: String,
    pub occultation: Profile,
    pub sounder: Profile,
}

/// Position of a collocation in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollocationStatus {
    /// Footprint indices unknown
    Approximate,
    /// Footprint indices known, data not assembled
    Refined,
    /// Profiles retrieved and cached
    Assembled,
}

impl fmt::Display for CollocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CollocationStatus::Approximate => "approximate",
            CollocationStatus::Refined => "refined",
            CollocationStatus::Assembled => "assembled",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub struct Collocation {
    occultation: OccList,
    nadir_satellite: Arc<dyn NadirSatelliteInstrument>,
    longitude: Option<Degree>,
    latitude: Option<Degree>,
    time: Option<Epoch>,
    scan_metadata: Option<Arc<ScanMetadata>>,
    scan_angle: Option<Degree>,
    iscan: Option<usize>,
    ifootprint: Option<usize>,
    data: Option<CollocationData>,
}

impl Collocation {
    /// Start building a collocation between a size-1 [`OccList`] and an instrument.
    pub fn builder(
        occultation: OccList,
        nadir_satellite: Arc<dyn NadirSatelliteInstrument>,
    ) -> CollocationBuilder {
        CollocationBuilder {
            occultation,
            nadir_satellite,
            longitude: None,
            latitude: None,
            time: None,
            scan_metadata: None,
            scan_angle: None,
            iscan: None,
            ifootprint: None,
        }
    }

    /// The occultation slice (always of size 1).
    pub fn occultation(&self) -> &OccList {
        &self.occultation
    }

    /// The occultation record itself.
    pub fn occultation_record(&self) -> &Occultation {
        // size 1 is enforced by the builder
        &self.occultation.as_slice()[0]
    }

    pub fn occid(&self) -> &str {
        &self.occultation_record().occid
    }

    pub fn nadir_satellite(&self) -> &Arc<dyn NadirSatelliteInstrument> {
        &self.nadir_satellite
    }

    /// Longitude of the collocated nadir-scanner sounding, degrees east.
    pub fn longitude(&self) -> Option<Degree> {
        self.longitude
    }

    /// Latitude of the collocated nadir-scanner sounding, degrees north.
    pub fn latitude(&self) -> Option<Degree> {
        self.latitude
    }

    /// Time of the collocated nadir-scanner sounding; approximate until data is assembled.
    pub fn time(&self) -> Option<Epoch> {
        self.time
    }

    pub fn scan_metadata(&self) -> Option<&Arc<ScanMetadata>> {
        self.scan_metadata.as_ref()
    }

    pub fn scan_angle(&self) -> Option<Degree> {
        self.scan_angle
    }

    pub fn iscan(&self) -> Option<usize> {
        self.iscan
    }

    pub fn ifootprint(&self) -> Option<usize> {
        self.ifootprint
    }

    pub fn data(&self) -> Option<&CollocationData> {
        self.data.as_ref()
    }

    pub fn status(&self) -> CollocationStatus {
        match (&self.data, self.iscan, self.ifootprint) {
            (Some(_), _, _) => CollocationStatus::Assembled,
            (None, Some(_), Some(_)) => CollocationStatus::Refined,
            _ => CollocationStatus::Approximate,
        }
    }

    /// Output group name, `{occid}+{satellite}-{instrument}`.
    pub fn name(&self) -> String {
        format!(
            "{}+{}-{}",
            self.occid(),
            self.nadir_satellite.satellite_name(),
            self.nadir_satellite.instrument_name()
        )
    }
}

/// Validating builder for [`Collocation`].
///
/// All fields but the occultation and the instrument are optional. Indices are taken as
/// signed integers so that negative values surface as errors instead of wrapping.
#[derive(Debug, Clone)]
pub struct CollocationBuilder {
    occultation: OccList,
    nadir_satellite: Arc<dyn NadirSatelliteInstrument>,
    longitude: Option<Degree>,
    latitude: Option<Degree>,
    time: Option<Epoch>,
    scan_metadata: Option<Arc<ScanMetadata>>,
    scan_angle: Option<Degree>,
    iscan: Option<i64>,
    ifootprint: Option<i64>,
}

impl CollocationBuilder {
    pub fn longitude(mut self, v: Degree) -> Self {
        self.longitude = Some(v);
        self
    }
    pub fn latitude(mut self, v: Degree) -> Self {
        self.latitude = Some(v);
        self
    }
    pub fn time(mut self, v: Epoch) -> Self {
        self.time = Some(v);
        self
    }
    pub fn scan_metadata(mut self, v: Arc<ScanMetadata>) -> Self {
        self.scan_metadata = Some(v);
        self
    }
    pub fn scan_angle(mut self, v: Degree) -> Self {
        self.scan_angle = Some(v);
        self
    }
    pub fn iscan(mut self, v: i64) -> Self {
        self.iscan = Some(v);
        self
    }
    pub fn ifootprint(mut self, v: i64) -> Self {
        self.ifootprint = Some(v);
        self
    }

    fn real(name: &str, v: Option<f64>) -> Result<(), CollocationError> {
        match v {
            Some(x) if !x.is_finite() => Err(CollocationError::InvalidArgument(format!(
                "{name} must be a real number, got {x}"
            ))),
            _ => Ok(()),
        }
    }

    fn index(
        name: &str,
        v: Option<i64>,
        bound: Option<usize>,
    ) -> Result<Option<usize>, CollocationError> {
        let Some(i) = v else {
            return Ok(None);
        };
        if i < 0 {
            return Err(CollocationError::InvalidArgument(format!(
                "{name} must be greater than or equal to 0"
            )));
        }
        let i = i as usize;
        if let Some(n) = bound {
            if i >= n {
                return Err(CollocationError::InvalidArgument(format!(
                    "{name} must be less than {n}"
                )));
            }
        }
        Ok(Some(i))
    }

    /// Validate the inputs and produce the [`Collocation`].
    ///
    /// Validation rules
    /// -----------------
    /// * the occultation slice has exactly one element, with a finite reference geolocation;
    /// * the instrument has non-empty satellite and instrument names;
    /// * `longitude`, `latitude`, `scan_angle` are finite when present, `|latitude| ≤ 90`;
    /// * `iscan`, `ifootprint` are non-negative when present and, with `scan_metadata`,
    ///   inside the grid.
    ///
    /// Errors
    /// ----------
    /// * [`CollocationError::InvalidArgument`] when any rule fails.
    pub fn build(self) -> Result<Collocation, CollocationError> {
        if self.occultation.len() != 1 {
            return Err(CollocationError::InvalidArgument(format!(
                "occultation argument must be an OccList of size 1, got {}",
                self.occultation.len()
            )));
        }
        if let Some(occ) = self.occultation.first() {
            if !(occ.longitude.is_finite() && occ.latitude.is_finite()) {
                return Err(CollocationError::InvalidArgument(format!(
                    "occultation {} has no valid geolocation",
                    occ.occid
                )));
            }
        }
        if self.nadir_satellite.satellite_name().is_empty()
            || self.nadir_satellite.instrument_name().is_empty()
        {
            return Err(CollocationError::InvalidArgument(
                "nadir satellite instrument must have a satellite and an instrument name".into(),
            ));
        }

        Self::real("longitude", self.longitude)?;
        Self::real("latitude", self.latitude)?;
        Self::real("scan_angle", self.scan_angle)?;
        if let Some(lat) = self.latitude {
            if lat.abs() > 90.0 {
                return Err(CollocationError::InvalidArgument(format!(
                    "latitude must lie within [-90, 90], got {lat}"
                )));
            }
        }

        let bounds = self
            .scan_metadata
            .as_ref()
            .map(|m| (m.nscans(), m.nfootprints()));
        let iscan = Self::index("iscan", self.iscan, bounds.map(|b| b.0))?;
        let ifootprint = Self::index("ifootprint", self.ifootprint, bounds.map(|b| b.1))?;

        Ok(Collocation {
            occultation: self.occultation,
            nadir_satellite: self.nadir_satellite,
            longitude: self.longitude,
            latitude: self.latitude,
            time: self.time,
            scan_metadata: self.scan_metadata,
            scan_angle: self.scan_angle,
            iscan,
            ifootprint,
            data: None,
        })
    }
}
