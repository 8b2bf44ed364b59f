pub mod conjunctions;
pub mod error;
pub mod satellites;
pub mod status;
