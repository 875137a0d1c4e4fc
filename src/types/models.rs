// src/types/models.rs
//! Typed pipeline artifacts. Each one is produced once by its owning agent
//! and passed by value to the next stage; the only post-construction fills
//! are `KeywordMatch.ats_score` and `ValidatedResume.summary`.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

static EMPTY: Vec<String> = Vec::new();

/// Structured requirements extracted from a job posting.
///
/// Category names are free-form strings chosen by the extraction step, not a
/// closed enum. The conventional sub-keys ("technical", "management",
/// "tools", "interpersonal", "organizational", "leadership") are exposed
/// through default-empty accessors so consumers never assume they exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequirement {
    pub required_qualifications: BTreeMap<String, Vec<String>>,
    pub key_responsibilities: BTreeMap<String, Vec<String>>,
    pub technical_requirements: BTreeMap<String, Vec<String>>,
    pub soft_skills: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub preferences: Option<BTreeMap<String, Vec<String>>>,
}

impl JobRequirement {
    pub fn technical(&self) -> &[String] {
        self.technical_requirements.get("technical").unwrap_or(&EMPTY)
    }

    pub fn management(&self) -> &[String] {
        self.technical_requirements.get("management").unwrap_or(&EMPTY)
    }

    pub fn tools(&self) -> &[String] {
        self.technical_requirements.get("tools").unwrap_or(&EMPTY)
    }

    pub fn interpersonal(&self) -> &[String] {
        self.soft_skills.get("interpersonal").unwrap_or(&EMPTY)
    }

    pub fn organizational(&self) -> &[String] {
        self.soft_skills.get("organizational").unwrap_or(&EMPTY)
    }

    pub fn leadership(&self) -> &[String] {
        self.soft_skills.get("leadership").unwrap_or(&EMPTY)
    }

    /// All technical-requirement entries across categories, lowercased.
    pub fn required_skill_set(&self) -> BTreeSet<String> {
        self.technical_requirements
            .values()
            .flatten()
            .map(|s| s.to_lowercase())
            .collect()
    }

    /// First required-qualification line mentioning years of experience.
    pub fn experience_qualification(&self) -> Option<&str> {
        self.required_qualifications
            .values()
            .flatten()
            .find(|line| line.to_lowercase().contains("year"))
            .map(String::as_str)
    }

    /// All responsibility lines across categories, in category order.
    pub fn all_responsibilities(&self) -> Vec<&str> {
        self.key_responsibilities
            .values()
            .flatten()
            .map(String::as_str)
            .collect()
    }
}

/// Model-judged match of a candidate profile against a job.
///
/// `overall_match_score` is a holistic judgment, not an aggregate of the
/// category scores. All scores are clamped to [0, 1] after receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileMatch {
    pub qualifications_match: BTreeMap<String, f64>,
    pub responsibilities_match: BTreeMap<String, f64>,
    pub technical_requirements_match: BTreeMap<String, f64>,
    pub soft_skills_match: BTreeMap<String, f64>,
    pub overall_match_score: f64,
    pub key_strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
    pub recommendations: Vec<String>,
}

impl ProfileMatch {
    /// Clamp every score to [0, 1].
    pub fn clamp_scores(&mut self) {
        for scores in [
            &mut self.qualifications_match,
            &mut self.responsibilities_match,
            &mut self.technical_requirements_match,
            &mut self.soft_skills_match,
        ] {
            for score in scores.values_mut() {
                *score = score.clamp(0.0, 1.0);
            }
        }
        self.overall_match_score = self.overall_match_score.clamp(0.0, 1.0);
    }
}

/// A single weighted ATS keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordInfo {
    pub name: String,
    pub weight: i64,
    #[serde(default)]
    pub category: Option<String>,
}

/// Categorized weighted keywords extracted from a job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsAnalysis {
    pub technical_keywords: Vec<KeywordInfo>,
    pub soft_skills: Vec<KeywordInfo>,
    pub industry_terms: Vec<KeywordInfo>,
    pub certifications: Vec<KeywordInfo>,
    pub tools_and_technologies: Vec<KeywordInfo>,
}

impl AtsAnalysis {
    /// Total keyword count across all five categories.
    pub fn total_keywords(&self) -> usize {
        self.technical_keywords.len()
            + self.soft_skills.len()
            + self.industry_terms.len()
            + self.certifications.len()
            + self.tools_and_technologies.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedKeyword {
    pub word: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub strength: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingKeyword {
    pub word: String,
    #[serde(default)]
    pub importance: f64,
}

/// Keyword-match statistics for a profile against an [`AtsAnalysis`].
///
/// `ats_score` is recomputed locally as `100 * matched / total` after the
/// completion call returns, overwriting whatever the call produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordMatch {
    pub matched_keywords: Vec<MatchedKeyword>,
    pub missing_keywords: Vec<MissingKeyword>,
    pub overall_match_score: f64,
    pub optimization_suggestions: Vec<String>,
    pub ats_score: f64,
}

/// A single work-experience entry. Order of `responsibilities` is
/// significant; `skills_acquired` order is preserved for display only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkExperience {
    pub company: String,
    pub position: String,
    pub employment_period: String,
    pub location: String,
    pub industry: String,
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub skills_acquired: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub issuer: String,
    #[serde(default)]
    pub date_obtained: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalInformation {
    pub name: String,
    pub surname: String,
    #[serde(default)]
    pub contact: BTreeMap<String, String>,
    #[serde(default)]
    pub online_presence: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeSkills {
    #[serde(default)]
    pub technical: Vec<String>,
    #[serde(default)]
    pub soft: Vec<String>,
    #[serde(default)]
    pub other: Vec<String>,
}

/// Resume content without the work-experience section. This is the shape
/// the resume validator exchanges with the completion endpoint, keeping
/// work experience out of the prompt entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeCore {
    pub name: String,
    pub summary: String,
    pub skills: ResumeSkills,
    #[serde(default)]
    pub certifications: Vec<Certification>,
    #[serde(default)]
    pub education: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub personal_information: Option<PersonalInformation>,
}

/// A complete tailored resume.
///
/// The work-experience count never shrinks across enhancement: when
/// enhancement drops entries the generator falls back to the original list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedResume {
    pub name: String,
    pub summary: String,
    pub work_experience: Vec<WorkExperience>,
    pub skills: ResumeSkills,
    #[serde(default)]
    pub certifications: Vec<Certification>,
    #[serde(default)]
    pub education: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub personal_information: Option<PersonalInformation>,
}

impl ValidatedResume {
    /// Split off the non-experience content for validation prompts.
    pub fn core(&self) -> ResumeCore {
        ResumeCore {
            name: self.name.clone(),
            summary: self.summary.clone(),
            skills: self.skills.clone(),
            certifications: self.certifications.clone(),
            education: self.education.clone(),
            personal_information: self.personal_information.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverLetter {
    pub greeting: String,
    pub opening_paragraph: String,
    pub body_paragraphs: Vec<String>,
    pub closing_paragraph: String,
    pub signature: String,
    pub keywords_used: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub summary: String,
    #[serde(default)]
    pub details: Vec<String>,
}

/// Validator response for the base (non-experience) resume content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub is_valid: bool,
    pub validation_score: f64,
    pub report: ValidationReport,
    pub validated_content: ResumeCore,
}

/// Final resume validation result with the original work experience
/// spliced back in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeValidationResult {
    pub is_valid: bool,
    pub validation_score: f64,
    pub report: ValidationReport,
    pub validated_content: ValidatedResume,
    #[serde(default)]
    pub ats_analysis: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobValidationResult {
    pub is_valid: bool,
    pub validation_score: f64,
    pub report: ValidationReport,
    pub validated_content: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileValidationResult {
    pub is_valid: bool,
    pub validation_score: f64,
    pub report: ValidationReport,
    pub validated_content: BTreeMap<String, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_job_requirement() -> JobRequirement {
        let mut required_qualifications = BTreeMap::new();
        required_qualifications.insert(
            "Education / Experience".to_string(),
            vec!["4 years of experience in data analysis".to_string()],
        );
        let mut key_responsibilities = BTreeMap::new();
        key_responsibilities.insert(
            "analysis".to_string(),
            vec!["Build dashboards".to_string(), "Report findings".to_string()],
        );
        let mut technical_requirements = BTreeMap::new();
        technical_requirements.insert(
            "technical".to_string(),
            vec!["SQL".to_string(), "Python".to_string()],
        );
        technical_requirements.insert("tools".to_string(), vec!["Tableau".to_string()]);
        let mut soft_skills = BTreeMap::new();
        soft_skills.insert("interpersonal".to_string(), vec!["Communication".to_string()]);

        JobRequirement {
            required_qualifications,
            key_responsibilities,
            technical_requirements,
            soft_skills,
            preferences: None,
        }
    }

    #[test]
    fn test_category_accessors_default_empty() {
        let job = sample_job_requirement();
        assert_eq!(job.technical(), &["SQL".to_string(), "Python".to_string()]);
        assert_eq!(job.tools(), &["Tableau".to_string()]);
        assert!(job.management().is_empty());
        assert!(job.leadership().is_empty());
    }

    #[test]
    fn test_required_skill_set_lowercases() {
        let job = sample_job_requirement();
        let skills = job.required_skill_set();
        assert!(skills.contains("sql"));
        assert!(skills.contains("python"));
        assert!(skills.contains("tableau"));
    }

    #[test]
    fn test_experience_qualification_lookup() {
        let job = sample_job_requirement();
        assert_eq!(
            job.experience_qualification(),
            Some("4 years of experience in data analysis")
        );

        let mut without = job.clone();
        without.required_qualifications.clear();
        assert_eq!(without.experience_qualification(), None);
    }

    #[test]
    fn test_profile_match_clamping() {
        let mut matches = ProfileMatch {
            qualifications_match: BTreeMap::from([("degree".to_string(), 1.4)]),
            responsibilities_match: BTreeMap::new(),
            technical_requirements_match: BTreeMap::from([("sql".to_string(), -0.2)]),
            soft_skills_match: BTreeMap::new(),
            overall_match_score: 1.7,
            key_strengths: vec![],
            areas_for_improvement: vec![],
            recommendations: vec![],
        };
        matches.clamp_scores();
        assert_eq!(matches.qualifications_match["degree"], 1.0);
        assert_eq!(matches.technical_requirements_match["sql"], 0.0);
        assert_eq!(matches.overall_match_score, 1.0);
    }

    #[test]
    fn test_artifact_yaml_round_trip() {
        let job = sample_job_requirement();
        let text = serde_yaml::to_string(&job).unwrap();
        let back: JobRequirement = serde_yaml::from_str(&text).unwrap();
        assert_eq!(job, back);

        let keyword_match = KeywordMatch {
            matched_keywords: vec![MatchedKeyword {
                word: "SQL".to_string(),
                context: "5 years of SQL".to_string(),
                strength: 5.0,
            }],
            missing_keywords: vec![MissingKeyword {
                word: "Spark".to_string(),
                importance: 3.0,
            }],
            overall_match_score: 0.7,
            optimization_suggestions: vec!["Mention Spark exposure".to_string()],
            ats_score: 50.0,
        };
        let text = serde_yaml::to_string(&keyword_match).unwrap();
        let back: KeywordMatch = serde_yaml::from_str(&text).unwrap();
        assert_eq!(keyword_match, back);

        let letter = CoverLetter {
            greeting: "Dear Hiring Manager,".to_string(),
            opening_paragraph: "I am writing to apply.".to_string(),
            body_paragraphs: vec!["Body.".to_string()],
            closing_paragraph: "Thank you.".to_string(),
            signature: "Jane Doe".to_string(),
            keywords_used: vec!["SQL".to_string()],
        };
        let text = serde_yaml::to_string(&letter).unwrap();
        let back: CoverLetter = serde_yaml::from_str(&text).unwrap();
        assert_eq!(letter, back);

        let matches = ProfileMatch {
            qualifications_match: BTreeMap::from([("degree".to_string(), 0.8)]),
            responsibilities_match: BTreeMap::new(),
            technical_requirements_match: BTreeMap::from([("sql".to_string(), 0.95)]),
            soft_skills_match: BTreeMap::new(),
            overall_match_score: 0.85,
            key_strengths: vec!["SQL".to_string()],
            areas_for_improvement: vec!["Spark".to_string()],
            recommendations: vec!["Mention dashboard work".to_string()],
        };
        let text = serde_yaml::to_string(&matches).unwrap();
        let back: ProfileMatch = serde_yaml::from_str(&text).unwrap();
        assert_eq!(matches, back);

        let analysis = AtsAnalysis {
            technical_keywords: vec![KeywordInfo {
                name: "SQL".to_string(),
                weight: 5,
                category: Some("database".to_string()),
            }],
            soft_skills: vec![],
            industry_terms: vec![KeywordInfo {
                name: "fintech".to_string(),
                weight: 2,
                category: None,
            }],
            certifications: vec![],
            tools_and_technologies: vec![],
        };
        let text = serde_yaml::to_string(&analysis).unwrap();
        let back: AtsAnalysis = serde_yaml::from_str(&text).unwrap();
        assert_eq!(analysis, back);

        let resume = ValidatedResume {
            name: "Jane Doe".to_string(),
            summary: "I analyze data.".to_string(),
            work_experience: vec![WorkExperience {
                company: "Acme".to_string(),
                position: "Analyst".to_string(),
                employment_period: "06/2019 - Present".to_string(),
                location: "Geneva".to_string(),
                industry: "Finance".to_string(),
                responsibilities: vec!["Built dashboards".to_string()],
                skills_acquired: vec!["SQL".to_string()],
            }],
            skills: ResumeSkills {
                technical: vec!["SQL".to_string()],
                soft: vec!["Communication".to_string()],
                other: vec![],
            },
            certifications: vec![Certification {
                name: "Cloud Cert".to_string(),
                description: String::new(),
                issuer: "Vendor".to_string(),
                date_obtained: "2024-04".to_string(),
            }],
            education: None,
            personal_information: Some(PersonalInformation {
                name: "Jane".to_string(),
                surname: "Doe".to_string(),
                contact: BTreeMap::from([(
                    "email".to_string(),
                    "jane@example.com".to_string(),
                )]),
                online_presence: BTreeMap::new(),
            }),
        };
        let text = serde_yaml::to_string(&resume).unwrap();
        let back: ValidatedResume = serde_yaml::from_str(&text).unwrap();
        assert_eq!(resume, back);
    }

    #[test]
    fn test_ats_analysis_total_keywords() {
        let analysis = AtsAnalysis {
            technical_keywords: vec![
                KeywordInfo { name: "SQL".to_string(), weight: 5, category: None },
                KeywordInfo { name: "Python".to_string(), weight: 5, category: None },
            ],
            soft_skills: vec![KeywordInfo {
                name: "Communication".to_string(),
                weight: 3,
                category: None,
            }],
            industry_terms: vec![],
            certifications: vec![],
            tools_and_technologies: vec![KeywordInfo {
                name: "Tableau".to_string(),
                weight: 4,
                category: None,
            }],
        };
        assert_eq!(analysis.total_keywords(), 4);
    }
}
