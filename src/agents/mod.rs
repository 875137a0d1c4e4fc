// src/agents/mod.rs
//! One agent per pipeline stage. Each agent builds a prompt, issues a single
//! completion call through the shared backend, and parses the response into
//! its typed artifact. Agents never call each other; the workflow manager
//! passes artifacts explicitly.

pub mod ats_analyzer;
pub mod cover_letter;
pub mod job_analyzer;
pub mod profile_matcher;
pub mod resume_generator;
pub mod validation;

pub use ats_analyzer::AtsAnalyzer;
pub use cover_letter::CoverLetterGenerator;
pub use job_analyzer::JobAnalyzer;
pub use profile_matcher::ProfileMatcher;
pub use resume_generator::ResumeGenerator;
pub use validation::ValidationAgent;
