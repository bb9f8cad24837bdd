use thiserror::Error;

/// Errors raised by the collocation core.
///
/// Every variant is raised at the point of detection and never retried internally;
/// orchestration code is expected to branch on [`CollocationError::kind`].
#[derive(Error, Debug)]
pub enum CollocationError {
    /// Malformed, missing or out-of-range input at a public boundary.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An operation was attempted without its documented preconditions.
    #[error("Missing data: {0}")]
    MissingData(String),

    /// The RO data archive could not supply exactly one retrieval file.
    #[error("Invalid occultation: {0}")]
    InvalidOccultation(String),

    /// The nadir instrument has no geolocation data for the requested window.
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error(
        "Nearest footprint still on a window edge (scan {iscan} of {nscans}) after widening the window"
    )]
    UnbracketedMinimum { iscan: usize, nscans: usize },

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Time error: {0}")]
    HifitimeError(#[from] hifitime::HifitimeError),
}

impl CollocationError {
    /// Mnemonic of the error kind, e.g. `"InvalidArgument"`.
    pub fn kind(&self) -> &'static str {
        use CollocationError::*;
        match self {
            InvalidArgument(_) => "InvalidArgument",
            MissingData(_) => "MissingData",
            InvalidOccultation(_) => "InvalidOccultation",
            DataUnavailable(_) => "DataUnavailable",
            UnbracketedMinimum { .. } => "UnbracketedMinimum",
            IoError(_) => "IoError",
            JsonError(_) => "JsonError",
            HifitimeError(_) => "HifitimeError",
        }
    }
}

impl PartialEq for CollocationError {
    fn eq(&self, other: &Self) -> bool {
        use CollocationError::*;
        match (self, other) {
            (InvalidArgument(a), InvalidArgument(b)) => a == b,
            (MissingData(a), MissingData(b)) => a == b,
            (InvalidOccultation(a), InvalidOccultation(b)) => a == b,
            (DataUnavailable(a), DataUnavailable(b)) => a == b,
            (
                UnbracketedMinimum {
                    iscan: a,
                    nscans: n,
                },
                UnbracketedMinimum {
                    iscan: b,
                    nscans: m,
                },
            ) => a == b && n == m,

            // Foreign errors are not comparable: equal if same variant
            (IoError(_), IoError(_)) => true,
            (JsonError(_), JsonError(_)) => true,
            (HifitimeError(_), HifitimeError(_)) => true,

            _ => false,
        }
    }
}
