//! Application services layer.

pub mod drafts;
pub mod error;
pub mod jobs;
pub mod repos;
pub mod tips;
