mod cache;
mod error;
mod service;
mod session;
mod source;
mod space_track;
#[cfg(test)]
pub mod testing;
mod types;

pub use cache::DEFAULT_FRESHNESS;
pub use error::UpstreamError;
pub use service::{
    AcquisitionService, AcquisitionSettings, DEFAULT_BATCH_DELAY, DEFAULT_BATCH_SIZE,
    DEFAULT_REQUEST_TIMEOUT,
};
pub use session::SessionPhase;
pub use source::ElementSetSource;
pub use space_track::{SpaceTrackClient, DEFAULT_BASE_URL};
pub use types::{BatchReport, Credentials};
