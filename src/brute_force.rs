//! # Brute-force collocation
//!
//! Exhaustive search for collocations between a list of occultations and one nadir-scanning
//! instrument. It is slow but exact within its tolerances, and serves as the ground truth
//! against which the rotation algorithm is scored (see
//! [`collocation_confusion`](crate::collocation_list::collocation_confusion)).
//!
//! Algorithm
//! -----------------
//! 1. Fetch one geolocation block spanning `[min(t_occ) − Δt_tol, max(t_occ) + Δt_tol]`.
//! 2. For each occultation, restrict the block to the scans whose mid-time lies within
//!    `Δt_tol` of the occultation time.
//! 3. Take the nearest footprint of those scans (ties to the first in scan-major order).
//!    Footprints without a finite geolocation are skipped, as is an occultation with none.
//! 4. Accept it when its great-circle distance to the occultation, with the Earth radius at
//!    their mean latitude, is at most the spatial tolerance.
//!
//! Accepted collocations are fully specified: shared scan metadata, indices, scan angle,
//! footprint geolocation and scan mid-time.
//!
//! ### Progress UI (feature: `progress`)
//! With the `progress` feature, the per-occultation loop renders an `indicatif` progress bar.

use std::sync::Arc;

use hifitime::{Duration, Epoch};
use log::{debug, info};

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};

use crate::collocation::Collocation;
use crate::collocation_errors::CollocationError;
use crate::collocation_list::CollocationList;
use crate::constants::{Degree, Meter};
use crate::nadir::NadirSatelliteInstrument;
use crate::occultation::OccList;
use crate::spherical::{great_circle_distance, nearest, unit_vector};

/// Tolerances of [`brute_force`].
#[derive(Debug, Clone, PartialEq)]
pub struct BruteForceParams {
    /// Maximum time separation between occultation and scan mid-time
    pub time_tolerance: Duration,
    /// Maximum great-circle distance, meters
    pub spatial_tolerance: Meter,
}

impl Default for BruteForceParams {
    fn default() -> Self {
        BruteForceParams {
            time_tolerance: Duration::from_seconds(600.0),
            spatial_tolerance: 150.0e3,
        }
    }
}

impl BruteForceParams {
    pub fn builder() -> BruteForceParamsBuilder {
        BruteForceParamsBuilder::default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct BruteForceParamsBuilder {
    params: BruteForceParams,
}

impl BruteForceParamsBuilder {
    pub fn time_tolerance(mut self, v: Duration) -> Self {
        self.params.time_tolerance = v;
        self
    }

    /// Spatial tolerance in meters.
    pub fn spatial_tolerance(mut self, v: Meter) -> Self {
        self.params.spatial_tolerance = v;
        self
    }

    pub fn build(self) -> Result<BruteForceParams, CollocationError> {
        if self.params.time_tolerance <= Duration::ZERO {
            return Err(CollocationError::InvalidArgument(format!(
                "time_tolerance must be strictly positive, got {}",
                self.params.time_tolerance
            )));
        }
        let d = self.params.spatial_tolerance;
        if !(d.is_finite() && d > 0.0) {
            return Err(CollocationError::InvalidArgument(format!(
                "spatial_tolerance must be strictly positive, got {d}"
            )));
        }
        Ok(self.params)
    }
}

/// Scan angle of footprint `ifootprint`, degrees, for footprints evenly spaced about nadir.
fn footprint_scan_angle(instrument: &dyn NadirSatelliteInstrument, ifootprint: usize) -> Degree {
    let geometry = instrument.scan_geometry();
    (ifootprint as f64 * geometry.scan_angle_spacing - geometry.max_scan_angle).to_degrees()
}

fn time_span(times: &[Epoch]) -> Option<(Epoch, Epoch)> {
    let first = *times.first()?;
    Some(times.iter().fold((first, first), |(lo, hi), &t| {
        (if t < lo { t } else { lo }, if t > hi { t } else { hi })
    }))
}

/// Find every collocation between `occultations` and `instrument` within tolerance.
///
/// Arguments
/// -----------------
/// * `instrument`: the nadir-scanning instrument, shared with the returned collocations.
/// * `occultations`: occultations to match.
/// * `params`: time and spatial tolerances.
///
/// Return
/// ----------
/// * One fully specified collocation per matched occultation, in the order of `occultations`.
///
/// Errors
/// ----------
/// * [`CollocationError::InvalidArgument`] if `occultations` is empty or holds a malformed
///   datetime.
/// * [`CollocationError::DataUnavailable`] if the instrument has no data for the span.
pub fn brute_force(
    instrument: Arc<dyn NadirSatelliteInstrument>,
    occultations: &OccList,
    params: &BruteForceParams,
) -> Result<CollocationList, CollocationError> {
    let times = occultations.times()?;
    let (first, last) = time_span(&times).ok_or_else(|| {
        CollocationError::InvalidArgument("brute force requires at least one occultation".into())
    })?;

    let meta = Arc::new(instrument.get_geolocations(
        first - params.time_tolerance,
        last + params.time_tolerance,
    )?);
    let nfootprints = meta.nfootprints();
    let grid = meta.unit_vectors();

    info!(
        "brute force: {} occultations against {} {}x{} {} footprints",
        occultations.len(),
        instrument.satellite_name(),
        meta.nscans(),
        nfootprints,
        instrument.instrument_name()
    );

    #[cfg(feature = "progress")]
    let pb = {
        let pb = ProgressBar::new(occultations.len() as u64);
        if let Ok(style) = ProgressStyle::with_template(
            "{bar:40.cyan/blue} {pos}/{len} ({percent:>3}%) | {per_sec} | ETA {eta_precise}",
        ) {
            pb.set_style(style);
        }
        pb
    };

    let mut collocations = CollocationList::default();

    for (i, (occ, &time)) in occultations.iter().zip(&times).enumerate() {
        #[cfg(feature = "progress")]
        pb.inc(1);

        let scans = meta.scans_within(time, params.time_tolerance);
        if scans.is_empty() {
            continue;
        }
        let candidates = &grid[scans.start * nfootprints..scans.end * nfootprints];
        let Some((k, _)) = nearest(&unit_vector(occ.longitude, occ.latitude), candidates) else {
            debug!("{}: no geolocated footprint within the time window", occ.occid);
            continue;
        };
        let iscan = scans.start + k / nfootprints;
        let ifootprint = k % nfootprints;

        let (longitude, latitude) = meta.location_deg(iscan, ifootprint);
        let distance = great_circle_distance(occ.longitude, occ.latitude, longitude, latitude);
        if distance > params.spatial_tolerance {
            continue;
        }
        debug!(
            "{}: footprint ({iscan}, {ifootprint}) at {:.1} km",
            occ.occid,
            distance * 1.0e-3
        );

        let Some(slice) = occultations.get(i) else {
            continue;
        };
        let collocation = Collocation::builder(slice, instrument.clone())
            .longitude(longitude)
            .latitude(latitude)
            .time(meta.mid_time(iscan))
            .scan_metadata(meta.clone())
            .scan_angle(footprint_scan_angle(instrument.as_ref(), ifootprint))
            .iscan(iscan as i64)
            .ifootprint(ifootprint as i64)
            .build()?;
        collocations.push(collocation);
    }

    #[cfg(feature = "progress")]
    pb.finish_and_clear();

    info!(
        "brute force: {} collocations with {} {}",
        collocations.len(),
        instrument.satellite_name(),
        instrument.instrument_name()
    );

    Ok(collocations)
}
