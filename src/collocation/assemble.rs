//! Retrieval of the occultation and sounder profiles of a collocation.

use camino::Utf8PathBuf;
use log::debug;

use crate::collocation::{Collocation, CollocationData};
use crate::collocation_errors::CollocationError;
use crate::nadir::SoundingContext;
use crate::occultation::{file_type, ProcessingCenter, RetrievalProduct, RoDataArchive};
use crate::profile::Profile;
use crate::retrieval::RetrievalReader;
use crate::time::iso_utc_seconds_z;

/// The single file of a download, or `None` when the archive returned zero or several slots.
fn single_file(files: Vec<Option<Utf8PathBuf>>) -> Option<Utf8PathBuf> {
    match <[Option<Utf8PathBuf>; 1]>::try_from(files) {
        Ok([file]) => file,
        Err(_) => None,
    }
}

impl Collocation {
    /// Retrieve the RO retrieval and nadir-scanner sounding of this collocation.
    ///
    /// The level 2a refractivity retrieval of `center` is mandatory; its level 2b atmospheric
    /// retrieval is appended when available. The collocation is refined first when its
    /// footprint indices are unknown. On success `time` becomes the mid-time of the matched
    /// scan and the merged record is cached in `data`.
    ///
    /// Arguments
    /// -----------------
    /// * `archive`: RO data archive serving the retrieval files.
    /// * `reader`: decoder of the files returned by `archive`.
    /// * `center`: RO processing center whose retrievals are used.
    ///
    /// Return
    /// ----------
    /// * The cached [`CollocationData`].
    ///
    /// Errors
    /// ----------
    /// * [`CollocationError::InvalidOccultation`] if `center` does not provide exactly one level
    ///   2a file for this occultation.
    /// * Errors from refinement, the reader or the instrument.
    pub fn get_data(
        &mut self,
        archive: &dyn RoDataArchive,
        reader: &dyn RetrievalReader,
        center: ProcessingCenter,
    ) -> Result<&CollocationData, CollocationError> {
        let occid = self.occid().to_string();

        let level2a_type = file_type(center, RetrievalProduct::RefractivityRetrieval);
        let level2a_file = single_file(archive.download(
            &self.occultation,
            center,
            RetrievalProduct::RefractivityRetrieval,
        )?)
        .ok_or_else(|| {
            CollocationError::InvalidOccultation(format!(
                "Unable to obtain {level2a_type} for collocated occultation {occid}"
            ))
        })?;
        let level2b_file = single_file(archive.download(
            &self.occultation,
            center,
            RetrievalProduct::AtmosphericRetrieval,
        )?);

        let level2a = reader.read_level2a(&level2a_file)?;
        level2a.validate()?;
        let level2b = match &level2b_file {
            Some(path) => {
                let level2b = reader.read_level2b(path)?;
                level2b.validate()?;
                Some(level2b)
            }
            None => {
                debug!("{occid}: no {center} level 2b retrieval");
                None
            }
        };

        let occ = self.occultation_record().clone();
        let mut occultation = Profile::new();
        occultation.push_scalar(
            "reference_longitude",
            occ.longitude,
            "degrees east",
            "Reference longitude of the occultation",
        );
        occultation.push_scalar(
            "reference_latitude",
            occ.latitude,
            "degrees north",
            "Reference latitude of the occultation",
        );
        level2a.append_to(&mut occultation);
        if let Some(level2b) = &level2b {
            level2b.append_to(&mut occultation);
        }
        occultation.set_attribute("level2a_file", level2a_file.as_str());
        if let Some(path) = &level2b_file {
            occultation.set_attribute("level2b_file", path.as_str());
        }
        occultation.set_attribute("mission", occ.mission.as_str());
        occultation.set_attribute("transmitter", occ.transmitter.as_str());
        occultation.set_attribute("receiver", occ.receiver.as_str());
        occultation.set_attribute("time", iso_utc_seconds_z(&occ.time()?));

        if self.scan_metadata.is_none() || self.iscan.is_none() || self.ifootprint.is_none() {
            self.refine()?;
        }
        let (Some(meta), Some(iscan), Some(ifootprint)) =
            (self.scan_metadata.clone(), self.iscan, self.ifootprint)
        else {
            return Err(CollocationError::MissingData(format!(
                "{occid}: collocated footprint unknown after refinement"
            )));
        };

        let time = meta.mid_time(iscan);
        let (grid_longitude, grid_latitude) = meta.location_deg(iscan, ifootprint);
        self.time = Some(time);
        let longitude = *self.longitude.get_or_insert(grid_longitude);
        let latitude = *self.latitude.get_or_insert(grid_latitude);

        let context = SoundingContext {
            longitude,
            latitude,
            time,
        };
        let sounder = meta.sounding(self.nadir_satellite.as_ref(), iscan, ifootprint, &context)?;

        debug!(
            "{}: assembled {} occultation and {} sounder variables",
            self.name(),
            occultation.len(),
            sounder.len()
        );

        Ok(&*self.data.insert(CollocationData {
            occid,
            occultation,
            sounder,
        }))
    }
}
