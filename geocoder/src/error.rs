use thiserror::Error;

/// Lookup failures. "Found nothing" is not among them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeocodeError {
    #[error("Query must be at least 3 characters long (got {len})")]
    InvalidQuery { len: usize },

    #[error("Geocoding service unavailable: {0}")]
    UpstreamUnavailable(String),
}
