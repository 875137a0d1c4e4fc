// src/types/mod.rs
pub mod models;
pub mod profile;

pub use models::*;
pub use profile::{CandidateProfile, ExperienceRecord, JobPosting};
