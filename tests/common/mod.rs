#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use hifitime::{Duration, Epoch};
use nalgebra::DMatrix;

use rocolloc::constants::Degree;
use rocolloc::time::iso_utc_seconds_z;
use rocolloc::{
    CollocationError, Level2aRetrieval, Level2bRetrieval, NadirSatelliteInstrument, OccList,
    Occultation, ProcessingCenter, Profile, RetrievalProduct, RetrievalReader, RoDataArchive,
    ScanGeometry, ScanMetadata, SoundingContext,
};

/// First scan mid-time of every synthetic instrument.
pub fn t0() -> Epoch {
    Epoch::from_gregorian_utc_hms(2023, 1, 1, 0, 0, 0)
}

pub fn occultation(
    occid: &str,
    longitude: Degree,
    latitude: Degree,
    datetime: &str,
) -> Occultation {
    Occultation {
        occid: occid.into(),
        mission: "cosmic2".into(),
        transmitter: "G07".into(),
        receiver: "cosmic2e3".into(),
        longitude,
        latitude,
        datetime: datetime.into(),
    }
}

/// Size-1 occultation slice.
pub fn single(occid: &str, longitude: Degree, latitude: Degree) -> OccList {
    OccList::new(vec![occultation(
        occid,
        longitude,
        latitude,
        "2023-01-01-00-00",
    )])
}

/// Nadir scanner over a fixed, time-continuous footprint grid.
///
/// Scan `i` has mid-time `t0 + i·Δt`. Scans are split into granule files of
/// `granule_scans` scans each. Geolocation requests are counted.
#[derive(Debug)]
pub struct GridInstrument {
    pub satellite: String,
    pub instrument: String,
    pub geometry: ScanGeometry,
    /// Footprint longitudes, degrees
    pub longitudes: DMatrix<f64>,
    /// Footprint latitudes, degrees
    pub latitudes: DMatrix<f64>,
    pub granule_scans: usize,
    pub requests: AtomicUsize,
}

impl GridInstrument {
    pub fn from_cells(longitudes: DMatrix<f64>, latitudes: DMatrix<f64>, dt: Duration) -> Self {
        let nfootprints = longitudes.ncols();
        GridInstrument {
            satellite: "NOAA-20".into(),
            instrument: "ATMS".into(),
            geometry: ScanGeometry::new(dt, nfootprints, 1.11).unwrap(),
            longitudes,
            latitudes,
            granule_scans: 10,
            requests: AtomicUsize::new(0),
        }
    }

    /// Ground track heading north: footprint `(i, j)` at
    /// `(lon, lat) = (−10 + j, −10 + 0.5·i)` degrees, scans every 8 s.
    pub fn track(nscans: usize, nfootprints: usize) -> Self {
        Self::from_cells(
            DMatrix::from_fn(nscans, nfootprints, |_, j| -10.0 + j as f64),
            DMatrix::from_fn(nscans, nfootprints, |i, _| -10.0 + 0.5 * i as f64),
            Duration::from_seconds(8.0),
        )
    }

    pub fn nscans(&self) -> usize {
        self.longitudes.nrows()
    }

    pub fn mid_time(&self, iscan: usize) -> Epoch {
        t0() + self.geometry.time_between_scans * iscan as f64
    }

    pub fn location(&self, iscan: usize, ifootprint: usize) -> (Degree, Degree) {
        (
            self.longitudes[(iscan, ifootprint)],
            self.latitudes[(iscan, ifootprint)],
        )
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Scan metadata of scans `first..last` (exclusive).
    pub fn block(&self, first: usize, last: usize) -> Result<ScanMetadata, CollocationError> {
        let rows: Vec<usize> = (first..last).collect();
        let nfootprints = self.longitudes.ncols();
        let g_first = first / self.granule_scans;
        let g_last = last.saturating_sub(1) / self.granule_scans;

        ScanMetadata::new(
            DMatrix::from_fn(rows.len(), nfootprints, |r, j| {
                self.longitudes[(rows[r], j)].to_radians()
            }),
            DMatrix::from_fn(rows.len(), nfootprints, |r, j| {
                self.latitudes[(rows[r], j)].to_radians()
            }),
            rows.iter().map(|&i| self.mid_time(i)).collect(),
            (g_first..=g_last)
                .map(|g| Utf8PathBuf::from(format!("granule{g:03}.nc")))
                .collect(),
            rows.iter().map(|&i| i / self.granule_scans - g_first).collect(),
            rows.iter().map(|&i| i % self.granule_scans).collect(),
        )
    }
}

impl NadirSatelliteInstrument for GridInstrument {
    fn satellite_name(&self) -> &str {
        &self.satellite
    }

    fn instrument_name(&self) -> &str {
        &self.instrument
    }

    fn scan_geometry(&self) -> &ScanGeometry {
        &self.geometry
    }

    fn get_geolocations(&self, start: Epoch, end: Epoch) -> Result<ScanMetadata, CollocationError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let inside: Vec<usize> = (0..self.nscans())
            .filter(|&i| {
                let t = self.mid_time(i);
                t >= start && t <= end
            })
            .collect();
        match (inside.first(), inside.last()) {
            (Some(&first), Some(&last)) => self.block(first, last + 1),
            _ => Err(CollocationError::DataUnavailable(format!(
                "no {} data in [{start}, {end}]",
                self.instrument
            ))),
        }
    }

    fn get_data(
        &self,
        file: &Utf8Path,
        scan_index: usize,
        footprint_index: usize,
        context: &SoundingContext,
    ) -> Result<Profile, CollocationError> {
        let mut profile = Profile::new();
        profile.push_scalar("longitude", context.longitude, "degrees east", "Footprint longitude");
        profile.push_scalar("latitude", context.latitude, "degrees north", "Footprint latitude");
        profile.push_scalar("scan_index", scan_index as f64, "", "Scan index in file");
        profile.push_scalar("footprint_index", footprint_index as f64, "", "Footprint index");
        profile.push_array(
            "brightness_temperature",
            "channel",
            &[250.1, 248.7, f64::NAN],
            "K",
            "Antenna brightness temperature",
        );
        profile.set_attribute("file", file.as_str());
        profile.set_attribute("time", iso_utc_seconds_z(&context.time));
        Ok(profile)
    }
}

pub fn shared(
    instrument: GridInstrument,
) -> (Arc<GridInstrument>, Arc<dyn NadirSatelliteInstrument>) {
    let concrete = Arc::new(instrument);
    let dynamic: Arc<dyn NadirSatelliteInstrument> = concrete.clone();
    (concrete, dynamic)
}

/// In-memory RO data archive: files per (center, product, occid).
#[derive(Debug, Default)]
pub struct MemoryArchive {
    files: HashMap<(ProcessingCenter, RetrievalProduct, String), Vec<Option<Utf8PathBuf>>>,
}

impl MemoryArchive {
    pub fn with(
        mut self,
        center: ProcessingCenter,
        product: RetrievalProduct,
        occid: &str,
        files: &[&str],
    ) -> Self {
        self.files.insert(
            (center, product, occid.to_string()),
            files.iter().map(|f| Some(Utf8PathBuf::from(*f))).collect(),
        );
        self
    }

    /// Archive serving level 2a and level 2b for every listed occultation.
    pub fn complete(center: ProcessingCenter, occids: &[&str]) -> Self {
        occids.iter().fold(MemoryArchive::default(), |archive, occid| {
            archive
                .with(
                    center,
                    RetrievalProduct::RefractivityRetrieval,
                    occid,
                    &[format!("{center}/level2a/{occid}.nc").as_str()],
                )
                .with(
                    center,
                    RetrievalProduct::AtmosphericRetrieval,
                    occid,
                    &[format!("{center}/level2b/{occid}.nc").as_str()],
                )
        })
    }
}

impl RoDataArchive for MemoryArchive {
    fn download(
        &self,
        occs: &OccList,
        center: ProcessingCenter,
        product: RetrievalProduct,
    ) -> Result<Vec<Option<Utf8PathBuf>>, CollocationError> {
        Ok(occs
            .iter()
            .flat_map(|occ| {
                self.files
                    .get(&(center, product, occ.occid.clone()))
                    .cloned()
                    .unwrap_or_else(|| vec![None])
            })
            .collect())
    }
}

/// Reader producing synthetic retrievals; paths containing `"corrupt"` yield a truncated
/// bending-angle array.
#[derive(Debug, Default)]
pub struct SyntheticReader;

impl RetrievalReader for SyntheticReader {
    fn read_level2a(&self, path: &Utf8Path) -> Result<Level2aRetrieval, CollocationError> {
        let impact_parameter = vec![6.38e6, 6.39e6, 6.40e6, 6.41e6];
        let nbend = if path.as_str().contains("corrupt") { 3 } else { 4 };
        Ok(Level2aRetrieval {
            impact_parameter,
            bending_angle: vec![0.021, 0.012, f64::NAN, 0.004][..nbend].to_vec(),
            radius_of_curvature: 6.371e6,
            altitude: vec![0.0, 5.0e3, 10.0e3],
            refractivity: vec![310.0, 180.0, 95.0],
            longitude: vec![-7.0, -7.1, -7.2],
            latitude: vec![-1.0, -1.0, -1.1],
            orientation: vec![30.0, 30.5, 31.0],
            geopotential: vec![0.0, 4.9e4, 9.8e4],
        })
    }

    fn read_level2b(&self, _path: &Utf8Path) -> Result<Level2bRetrieval, CollocationError> {
        Ok(Level2bRetrieval {
            altitude: vec![0.0, 5.0e3],
            pressure: vec![1.0e5, 5.4e4],
            temperature: vec![288.0, 255.0],
            water_vapor_pressure: vec![1.2e3, 2.0e2],
            geopotential: vec![0.0, 4.9e4],
        })
    }
}
