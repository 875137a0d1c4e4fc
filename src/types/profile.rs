// src/types/profile.rs
//! Input documents: the candidate profile and the job posting. Both are
//! plain YAML supplied by the user; missing optional fields default to empty
//! collections rather than load errors.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateProfile {
    #[serde(default)]
    pub personal_information: PersonalInfoRecord,
    #[serde(default)]
    pub professional_experience: Vec<ExperienceRecord>,
    #[serde(default)]
    pub skills: ProfileSkills,
    #[serde(default)]
    pub certifications: Vec<CertificationRecord>,
    #[serde(default)]
    pub education: Vec<serde_json::Value>,
    #[serde(default)]
    pub languages: Vec<serde_json::Value>,
    #[serde(default)]
    pub work_preferences: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonalInfoRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub contact: BTreeMap<String, String>,
    #[serde(default)]
    pub online_presence: BTreeMap<String, String>,
}

/// One raw professional-experience record. `employment_period` is free text,
/// two dash-separated segments, and the least controlled field in the whole
/// input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperienceRecord {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub employment_period: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub skills_acquired: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileSkills {
    #[serde(default)]
    pub technical: Vec<String>,
    #[serde(default)]
    pub management: Vec<String>,
    #[serde(default)]
    pub soft: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CertificationRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub issuer: String,
    #[serde(default)]
    pub date_obtained: String,
}

impl CandidateProfile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read profile file: {}", path.display()))?;
        let profile: CandidateProfile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse profile YAML: {}", path.display()))?;
        debug!(
            "Loaded profile with {} experience records",
            profile.professional_experience.len()
        );
        Ok(profile)
    }
}

/// The job-posting document: `job_listing` → company + details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    pub job_listing: JobListing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobListing {
    #[serde(default)]
    pub company: String,
    pub details: JobDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDetails {
    pub title: String,
    pub description: String,
}

impl JobPosting {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read job file: {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse job YAML: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_missing_sections_default_empty() {
        let yaml = r#"
personal_information:
  name: Jane
  surname: Doe
professional_experience:
  - company: Acme
    position: Analyst
    employment_period: "2020 - Present"
"#;
        let profile: CandidateProfile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(profile.personal_information.name, "Jane");
        assert_eq!(profile.professional_experience.len(), 1);
        assert!(profile.professional_experience[0].responsibilities.is_empty());
        assert!(profile.skills.technical.is_empty());
        assert!(profile.certifications.is_empty());
        assert!(profile.work_preferences.is_empty());
    }

    #[test]
    fn test_job_posting_nested_structure() {
        let yaml = r#"
job_listing:
  company: Initech
  details:
    title: Senior Data Analyst
    description: Requires 4 years experience, SQL, Python.
"#;
        let posting: JobPosting = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(posting.job_listing.company, "Initech");
        assert_eq!(posting.job_listing.details.title, "Senior Data Analyst");
    }
}
