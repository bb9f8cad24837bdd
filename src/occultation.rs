//! # Radio-occultation references
//!
//! Read-only view of RO soundings as delivered by the RO database, plus the
//! contract of the archive that serves their retrieval files.
//!
//! Components
//! -----------------
//! * [`Occultation`] – metadata of one sounding (identifier, mission, GNSS transmitter,
//!   receiver, reference geolocation, `YYYY-MM-DD-HH-MM` datetime).
//! * [`OccList`] – ordered collection of soundings. Collocations require size-1 slices
//!   obtained with [`OccList::get`].
//! * [`ProcessingCenter`], [`RetrievalProduct`] – closed sets of RO processing centers and
//!   retrieval file types, rendered as `"{center}_{product}"` file-type names.
//! * [`RoDataArchive`] – external collaborator that downloads retrieval files.

use std::fmt;
use std::str::FromStr;

use camino::Utf8PathBuf;
use hifitime::Epoch;

use crate::collocation_errors::CollocationError;
use crate::constants::{Degree, OccId};
use crate::time::parse_occultation_datetime;

/// Metadata of one radio-occultation sounding.
#[derive(Debug, Clone, PartialEq)]
pub struct Occultation {
    pub occid: OccId,
    pub mission: String,
    pub transmitter: String,
    pub receiver: String,
    /// Reference longitude, degrees east
    pub longitude: Degree,
    /// Reference latitude, degrees north
    pub latitude: Degree,
    /// Reference time (UTC), `YYYY-MM-DD-HH-MM`
    pub datetime: String,
}

impl Occultation {
    /// Reference time of the sounding as an UTC epoch.
    pub fn time(&self) -> Result<Epoch, CollocationError> {
        parse_occultation_datetime(&self.datetime)
    }
}

/// Ordered collection of occultations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OccList {
    items: Vec<Occultation>,
}

impl OccList {
    pub fn new(items: Vec<Occultation>) -> Self {
        OccList { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Size-1 slice holding the `i`-th occultation, or `None` when out of range.
    pub fn get(&self, i: usize) -> Option<OccList> {
        self.items.get(i).map(|occ| OccList::new(vec![occ.clone()]))
    }

    /// First occultation of the list; for size-1 slices, *the* occultation.
    pub fn first(&self) -> Option<&Occultation> {
        self.items.first()
    }

    pub fn as_slice(&self) -> &[Occultation] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Occultation> {
        self.items.iter()
    }

    pub fn occids(&self) -> Vec<&str> {
        self.items.iter().map(|o| o.occid.as_str()).collect()
    }

    pub fn longitudes(&self) -> Vec<Degree> {
        self.items.iter().map(|o| o.longitude).collect()
    }

    pub fn latitudes(&self) -> Vec<Degree> {
        self.items.iter().map(|o| o.latitude).collect()
    }

    pub fn datetimes(&self) -> Vec<&str> {
        self.items.iter().map(|o| o.datetime.as_str()).collect()
    }

    /// Reference times of all occultations; fails on the first malformed datetime.
    pub fn times(&self) -> Result<Vec<Epoch>, CollocationError> {
        self.items.iter().map(Occultation::time).collect()
    }
}

impl From<Vec<Occultation>> for OccList {
    fn from(items: Vec<Occultation>) -> Self {
        OccList::new(items)
    }
}

impl<'a> IntoIterator for &'a OccList {
    type Item = &'a Occultation;
    type IntoIter = std::slice::Iter<'a, Occultation>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// RO processing centers contributing retrievals to the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessingCenter {
    Ucar,
    Romsaf,
    Jpl,
}

impl fmt::Display for ProcessingCenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProcessingCenter::Ucar => "ucar",
            ProcessingCenter::Romsaf => "romsaf",
            ProcessingCenter::Jpl => "jpl",
        };
        f.write_str(name)
    }
}

impl FromStr for ProcessingCenter {
    type Err = CollocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ucar" => Ok(ProcessingCenter::Ucar),
            "romsaf" => Ok(ProcessingCenter::Romsaf),
            "jpl" => Ok(ProcessingCenter::Jpl),
            other => Err(CollocationError::InvalidArgument(format!(
                "invalid RO processing center \"{other}\"; must be one of ucar, romsaf, jpl"
            ))),
        }
    }
}

/// RO retrieval file types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RetrievalProduct {
    CalibratedPhase,
    /// Level 2a: bending angle, refractivity, geopotential
    RefractivityRetrieval,
    /// Level 2b: pressure, temperature, water vapor
    AtmosphericRetrieval,
}

impl fmt::Display for RetrievalProduct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RetrievalProduct::CalibratedPhase => "calibratedPhase",
            RetrievalProduct::RefractivityRetrieval => "refractivityRetrieval",
            RetrievalProduct::AtmosphericRetrieval => "atmosphericRetrieval",
        };
        f.write_str(name)
    }
}

/// Database file-type name, e.g. `ucar_refractivityRetrieval`.
pub fn file_type(center: ProcessingCenter, product: RetrievalProduct) -> String {
    format!("{center}_{product}")
}

/// Archive of RO data files.
///
/// Implementations download the requested product for every occultation of `occs` and return
/// one slot per item, `None` when the item has no such file.
pub trait RoDataArchive: Send + Sync {
    fn download(
        &self,
        occs: &OccList,
        center: ProcessingCenter,
        product: RetrievalProduct,
    ) -> Result<Vec<Option<Utf8PathBuf>>, CollocationError>;
}
