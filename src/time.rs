use hifitime::Epoch;

use crate::collocation_errors::CollocationError;

/// Parse an RO database datetime string of the form `YYYY-MM-DD-HH-MM` (UTC).
///
/// Argument
/// --------
/// * `datetime`: the datetime field of an occultation record, e.g. `"2023-01-15-12-30"`
///
/// Return
/// ------
/// * the corresponding UTC [`Epoch`], or [`CollocationError::InvalidArgument`] when the string
///   does not have five dash-separated numeric fields forming a valid Gregorian date.
pub fn parse_occultation_datetime(datetime: &str) -> Result<Epoch, CollocationError> {
    let invalid = || {
        CollocationError::InvalidArgument(format!(
            "datetime \"{datetime}\" is not of the form YYYY-MM-DD-HH-MM"
        ))
    };

    let parts: Vec<&str> = datetime.trim().split('-').collect();
    if parts.len() != 5 {
        return Err(invalid());
    }

    let year: i32 = parts[0].parse().map_err(|_| invalid())?;
    let fields = parts[1..]
        .iter()
        .map(|p| p.parse::<u8>())
        .collect::<Result<Vec<u8>, _>>()
        .map_err(|_| invalid())?;

    Epoch::maybe_from_gregorian_utc(year, fields[0], fields[1], fields[2], fields[3], 0, 0)
        .map_err(|_| invalid())
}

/// Format an epoch as a UTC ISO-8601 string truncated to seconds, without suffix.
///
/// e.g. `2023-01-15T12:30:05`
pub fn iso_utc_seconds(epoch: &Epoch) -> String {
    let (y, m, d, hh, mm, ss, _) = epoch.to_gregorian_utc();
    format!("{y:04}-{m:02}-{d:02}T{hh:02}:{mm:02}:{ss:02}")
}

/// Same as [`iso_utc_seconds`] with the `Z` designator appended.
pub fn iso_utc_seconds_z(epoch: &Epoch) -> String {
    format!("{}Z", iso_utc_seconds(epoch))
}
