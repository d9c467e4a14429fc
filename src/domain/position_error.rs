use thiserror::Error;

/// Failure reported by a position provider, following the codes a browser geolocation API uses.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PositionError {
    #[error("permission to read the position was denied")]
    PermissionDenied,
    #[error("position unavailable: {0}")]
    PositionUnavailable(String),
    #[error("timed out while acquiring a position")]
    Timeout,
}

impl PositionError {
    pub fn code(&self) -> u16 {
        match self {
            PositionError::PermissionDenied => 1,
            PositionError::PositionUnavailable(_) => 2,
            PositionError::Timeout => 3,
        }
    }
}
