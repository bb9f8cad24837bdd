//! # rocolloc
//!
//! Collocation of GNSS radio-occultation soundings with nadir-scanning satellite instruments.
//!
//! A [`Collocation`] pairs one occultation with one footprint of a nadir scanner.
//! [`Collocation::refine`] finds the footprint nearest on the sphere, and
//! [`Collocation::get_data`] joins the RO retrieval and the sounder record.
//! [`CollocationList`] provides the set algebra used to score a rotation run against
//! [`brute_force`](brute_force::brute_force) ground truth.

pub mod archive;
pub mod brute_force;
pub mod collocation;
pub mod collocation_errors;
pub mod collocation_list;
pub mod constants;
pub mod nadir;
pub mod occultation;
pub mod profile;
pub mod retrieval;
pub mod spherical;
pub mod time;

pub use archive::{ArchiveOptions, CollocationArchive, CollocationGroup};
pub use brute_force::{brute_force, BruteForceParams};
pub use collocation::{Collocation, CollocationData, CollocationStatus, RefineParams};
pub use collocation_errors::CollocationError;
pub use collocation_list::{collocation_confusion, CollocationList, ConfusionMatrix, SortMethod};
pub use nadir::scan_metadata::ScanMetadata;
pub use nadir::{NadirSatelliteInstrument, ScanGeometry, SoundingContext};
pub use occultation::{OccList, Occultation, ProcessingCenter, RetrievalProduct, RoDataArchive};
pub use profile::Profile;
pub use retrieval::{Level2aRetrieval, Level2bRetrieval, RetrievalReader};
