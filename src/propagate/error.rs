use thiserror::Error;

#[derive(Debug, Error)]
pub enum PropagateError {
    #[error("invalid element set: {0}")]
    InvalidElements(String),
    #[error("propagation error: {0}")]
    Propagation(String),
    #[error("decayed: altitude {0:.1} km")]
    Decayed(f64),
}

impl From<sgp4::TleError> for PropagateError {
    fn from(err: sgp4::TleError) -> Self {
        PropagateError::InvalidElements(err.to_string())
    }
}

impl From<sgp4::ElementsError> for PropagateError {
    fn from(err: sgp4::ElementsError) -> Self {
        PropagateError::InvalidElements(err.to_string())
    }
}

impl From<sgp4::Error> for PropagateError {
    fn from(err: sgp4::Error) -> Self {
        PropagateError::Propagation(err.to_string())
    }
}
