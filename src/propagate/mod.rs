mod adapter;
mod error;
mod geodesy;
mod types;

pub use adapter::{
    propagate, propagate_catalog, sample_trajectory, DEFAULT_DURATION_MINUTES, DEFAULT_STEPS,
};
pub use types::{OrbitalState, TrajectoryPoint, TrajectorySample};
