//! # Nearest-footprint refinement
//!
//! Given a collocation with an approximate sounder time, find the nadir-scanner footprint that
//! is closest on the sphere to the occultation's reference geolocation.
//!
//! Algorithm
//! -----------------
//! 1. If the collocation has no [`ScanMetadata`], request one from the instrument over
//!    `[time − k·Δt, time + k·Δt]`, with `Δt` the inter-scan period and `k =
//!    `[`RefineParams::window_scans`] (4 by default).
//! 2. Convert the occultation and every footprint to unit vectors.
//! 3. Take the flat argmin of the angular distances and split it into
//!    `(iscan, ifootprint) = (k / nfootprints, k % nfootprints)`. Ties go to the first
//!    footprint in row-major (scan-major) order.
//! 4. Overwrite the collocation longitude/latitude with the matched footprint (degrees).
//!
//! Window edges
//! -----------------
//! A minimum on the first or last scan of a self-requested window may lie outside it. The
//! window half-width is then doubled, up to [`RefineParams::max_widenings`] times. An edge
//! scan with at least one inter-scan period of window left beyond it is the end of the
//! instrument data, and the result is accepted. Otherwise, once widenings are exhausted,
//! refinement fails with [`CollocationError::UnbracketedMinimum`].
//!
//! Scan metadata given at construction is used as-is.

use std::sync::Arc;

use hifitime::{Duration, Epoch};
use log::{debug, warn};
use nalgebra::Vector3;

use crate::collocation::Collocation;
use crate::collocation_errors::CollocationError;
use crate::constants::{Radian, DEFAULT_MAX_WIDENINGS, DEFAULT_WINDOW_SCANS};
use crate::nadir::scan_metadata::ScanMetadata;
use crate::spherical::{nearest, unit_vector};

/// Parameters of [`Collocation::refine_with`].
#[derive(Debug, Clone, PartialEq)]
pub struct RefineParams {
    /// Half-width of the requested window, in inter-scan periods
    pub window_scans: f64,
    /// Maximum number of window doublings when the minimum sits on a window edge
    pub max_widenings: u32,
}

impl Default for RefineParams {
    fn default() -> Self {
        RefineParams {
            window_scans: DEFAULT_WINDOW_SCANS,
            max_widenings: DEFAULT_MAX_WIDENINGS,
        }
    }
}

impl RefineParams {
    pub fn builder() -> RefineParamsBuilder {
        RefineParamsBuilder::new()
    }
}

/// Builder for [`RefineParams`], with validation.
#[derive(Debug, Clone)]
pub struct RefineParamsBuilder {
    params: RefineParams,
}

impl Default for RefineParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RefineParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: RefineParams::default(),
        }
    }

    pub fn window_scans(mut self, v: f64) -> Self {
        self.params.window_scans = v;
        self
    }

    pub fn max_widenings(mut self, v: u32) -> Self {
        self.params.max_widenings = v;
        self
    }

    /// Finalize the builder.
    ///
    /// Errors
    /// ----------
    /// * [`CollocationError::InvalidArgument`] if `window_scans` is not a strictly positive
    ///   real number.
    pub fn build(self) -> Result<RefineParams, CollocationError> {
        let k = self.params.window_scans;
        if !(k.is_finite() && k > 0.0) {
            return Err(CollocationError::InvalidArgument(format!(
                "window_scans must be strictly positive, got {k}"
            )));
        }
        Ok(self.params)
    }
}

/// Nearest footprint of a grid to `p`: `(iscan, ifootprint, angular distance)`.
pub(crate) fn nearest_footprint(
    meta: &ScanMetadata,
    p: &Vector3<f64>,
) -> Result<(usize, usize, Radian), CollocationError> {
    let nfootprints = meta.nfootprints();
    let (k, distance) = nearest(p, &meta.unit_vectors()).ok_or_else(|| {
        CollocationError::DataUnavailable(format!(
            "no finite footprint geolocation in {}x{} nadir-scanner block",
            meta.nscans(),
            nfootprints
        ))
    })?;
    Ok((k / nfootprints, k % nfootprints, distance))
}

fn on_window_edge(iscan: usize, nscans: usize) -> bool {
    iscan == 0 || iscan + 1 == nscans
}

/// Whether the minimum on scan `iscan` of a window requested over `[start, end]` is a true
/// minimum. An edge scan brackets the minimum only when it is the end of the instrument data,
/// that is when the window leaves room for one more scan beyond it.
fn bracketed(meta: &ScanMetadata, iscan: usize, start: Epoch, end: Epoch, dt: Duration) -> bool {
    let last = meta.nscans() - 1;
    let first_ok = iscan != 0 || meta.mid_time(0) - dt >= start;
    let last_ok = iscan != last || meta.mid_time(last) + dt <= end;
    first_ok && last_ok
}

impl Collocation {
    /// Refine with the default [`RefineParams`].
    pub fn refine(&mut self) -> Result<&mut Self, CollocationError> {
        self.refine_with(&RefineParams::default())
    }

    /// Find and fix the nadir-scanner footprint nearest to the occultation.
    ///
    /// Preconditions: `scan_angle` and `time` must be set.
    ///
    /// Return
    /// ----------
    /// * `self`, with `iscan`, `ifootprint`, `longitude`, `latitude` and `scan_metadata` set.
    ///
    /// Errors
    /// ----------
    /// * [`CollocationError::MissingData`] if `scan_angle` or `time` is absent.
    /// * [`CollocationError::DataUnavailable`] if the instrument has no data for the window,
    ///   or no footprint of the block has a finite geolocation.
    /// * [`CollocationError::UnbracketedMinimum`] if the nearest footprint cannot be
    ///   bracketed by a self-requested window.
    pub fn refine_with(&mut self, params: &RefineParams) -> Result<&mut Self, CollocationError> {
        if self.scan_angle.is_none() {
            return Err(CollocationError::MissingData(
                "scan_angle must be provided in order to infer iscan, ifootprint".into(),
            ));
        }
        let Some(time) = self.time else {
            return Err(CollocationError::MissingData(
                "time of collocated nadir-scanner sounding must be provided in order to infer \
                 iscan, ifootprint"
                    .into(),
            ));
        };

        let occ = self.occultation_record();
        let p_occ = unit_vector(occ.longitude, occ.latitude);

        let (meta, iscan, ifootprint, distance) = match &self.scan_metadata {
            Some(meta) => {
                let (iscan, ifootprint, distance) = nearest_footprint(meta, &p_occ)?;
                (meta.clone(), iscan, ifootprint, distance)
            }
            None => self.search_window(time, &p_occ, params)?,
        };

        debug!(
            "{}: nearest footprint ({iscan}, {ifootprint}) of {}x{} grid at {:.4e} rad",
            self.name(),
            meta.nscans(),
            meta.nfootprints(),
            distance
        );

        let (longitude, latitude) = meta.location_deg(iscan, ifootprint);
        self.iscan = Some(iscan);
        self.ifootprint = Some(ifootprint);
        self.longitude = Some(longitude);
        self.latitude = Some(latitude);
        self.scan_metadata = Some(meta);

        Ok(self)
    }

    fn search_window(
        &self,
        time: Epoch,
        p_occ: &Vector3<f64>,
        params: &RefineParams,
    ) -> Result<(Arc<ScanMetadata>, usize, usize, Radian), CollocationError> {
        let dt = self.nadir_satellite.time_between_scans();
        let mut half_width = params.window_scans;
        let mut widenings = 0;

        loop {
            let half = dt * half_width;
            let (start, end) = (time - half, time + half);
            debug!("{}: requesting geolocations over [{start}, {end}]", self.name());

            let meta = self.nadir_satellite.get_geolocations(start, end)?;
            let (iscan, ifootprint, distance) = nearest_footprint(&meta, p_occ)?;
            let nscans = meta.nscans();

            if !bracketed(&meta, iscan, start, end, dt) {
                if widenings == params.max_widenings {
                    return Err(CollocationError::UnbracketedMinimum { iscan, nscans });
                }
                widenings += 1;
                half_width *= 2.0;
                continue;
            }
            if on_window_edge(iscan, nscans) {
                warn!(
                    "{}: nearest footprint on scan {iscan} of {nscans}, at the end of \
                     available scanner data",
                    self.name()
                );
            }

            return Ok((Arc::new(meta), iscan, ifootprint, distance));
        }
    }
}
