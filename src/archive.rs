//! # Collocation output archive
//!
//! One archive per run. Each collocation becomes a group named
//! `{occid}+{satellite}-{instrument}` that holds two self-describing profiles,
//! `occultation` and `sounder`. Every variable carries its units and a description. The
//! archive records its creation time and, optionally, an author and the time tolerance of the
//! matching run.
//!
//! The archive is serialized to JSON with `serde_json`.
//!
//! See also
//! ------------
//! * [`Collocation::get_data`](crate::collocation::Collocation::get_data) – assembly of the
//!   profiles of one group.

use std::fs::File;
use std::io::{BufWriter, Write};

use camino::Utf8Path;
use hifitime::{Duration, Epoch};
use log::info;
use serde::Serialize;

use crate::collocation::Collocation;
use crate::collocation_errors::CollocationError;
use crate::collocation_list::CollocationList;
use crate::constants::{Degree, ARCHIVE_FILE_TYPE};
use crate::occultation::{ProcessingCenter, RoDataArchive};
use crate::profile::Profile;
use crate::retrieval::RetrievalReader;
use crate::time::{iso_utc_seconds, iso_utc_seconds_z};

/// Global metadata of an archive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArchiveOptions {
    pub author: Option<String>,
    /// Time tolerance used to find the collocations
    pub time_tolerance: Option<Duration>,
}

/// One collocation of the archive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollocationGroup {
    pub name: String,
    pub status: String,
    pub longitude: Degree,
    pub latitude: Degree,
    /// Nadir-scanner sounding time, `YYYY-MM-DDTHH:MM:SS` UTC
    pub time: String,
    pub occultation: Profile,
    pub sounder: Profile,
}

impl CollocationGroup {
    fn from_collocation(collocation: &Collocation) -> Result<Self, CollocationError> {
        let missing = |what: &str| {
            CollocationError::MissingData(format!(
                "collocation {} has no {what}; assemble its data first",
                collocation.name()
            ))
        };
        let data = collocation.data().ok_or_else(|| missing("data"))?;
        let longitude = collocation.longitude().ok_or_else(|| missing("longitude"))?;
        let latitude = collocation.latitude().ok_or_else(|| missing("latitude"))?;
        let time = collocation.time().ok_or_else(|| missing("time"))?;

        Ok(CollocationGroup {
            name: collocation.name(),
            status: collocation.status().to_string(),
            longitude,
            latitude,
            time: iso_utc_seconds(&time),
            occultation: data.occultation.clone(),
            sounder: data.sounder.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollocationArchive {
    /// Creation time, ISO UTC
    pub creation_time: String,
    pub file_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_tolerance_seconds: Option<f64>,
    pub groups: Vec<CollocationGroup>,
}

impl CollocationArchive {
    /// Build the archive of a list of collocations.
    ///
    /// Data is assembled with [`Collocation::get_data`] for the candidates that do not carry it
    /// yet; failures abort the whole archive.
    ///
    /// Arguments
    /// -----------------
    /// * `collocations`: collocations to archive, in output order.
    /// * `archive`, `reader`, `center`: forwarded to [`Collocation::get_data`].
    /// * `options`: global metadata.
    ///
    /// Errors
    /// ----------
    /// * [`CollocationError::InvalidArgument`] if `collocations` is empty.
    /// * Any error of data assembly.
    pub fn assemble(
        collocations: &mut CollocationList,
        archive: &dyn RoDataArchive,
        reader: &dyn RetrievalReader,
        center: ProcessingCenter,
        options: &ArchiveOptions,
    ) -> Result<Self, CollocationError> {
        if collocations.is_empty() {
            return Err(CollocationError::InvalidArgument(
                "cannot build an archive from an empty collocation list".into(),
            ));
        }

        let mut groups = Vec::with_capacity(collocations.len());
        for collocation in collocations.iter_mut() {
            if collocation.data().is_none() {
                collocation.get_data(archive, reader, center)?;
            }
            groups.push(CollocationGroup::from_collocation(collocation)?);
        }

        Ok(CollocationArchive {
            creation_time: iso_utc_seconds_z(&Epoch::now()?),
            file_type: ARCHIVE_FILE_TYPE.to_string(),
            author: options.author.clone(),
            time_tolerance_seconds: options.time_tolerance.map(|d| d.to_seconds()),
            groups,
        })
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group(&self, name: &str) -> Option<&CollocationGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Serialize the archive as pretty-printed JSON.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), CollocationError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Write the archive to `path`, replacing any existing file.
    pub fn write_file(&self, path: &Utf8Path) -> Result<(), CollocationError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        info!("wrote {} collocations to {path}", self.len());
        Ok(())
    }
}
