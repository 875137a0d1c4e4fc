// src/agents/validation.rs
//! Re-validates generated artifacts against source data. Validation never
//! blocks the pipeline: a failed or low-scoring validation is informational
//! output. The resume validator keeps work experience out of the prompt and
//! splices the original list back into the result; a separate chunked
//! validator exists for work-experience content and is independently
//! invokable.

use anyhow::Result;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::core::completion::{request, ChatMessage, Completion};
use crate::types::{
    CandidateProfile, JobPosting, JobRequirement, JobValidationResult, KeywordMatch,
    ProfileMatch, ProfileValidationResult, ResumeValidationResult, ValidatedResume,
    ValidationResponse, WorkExperience,
};

/// Validation results scoring below this are flagged invalid. Flag only:
/// the pipeline still continues.
const CONFIDENCE_THRESHOLD: f64 = 0.8;

const EXPERIENCE_CHUNK_SIZE: usize = 2;

pub struct ValidationAgent {
    backend: Arc<dyn Completion>,
    model: String,
    confidence_threshold: f64,
}

#[derive(Debug, Deserialize)]
struct ExperienceChunkResponse {
    experiences: Vec<WorkExperience>,
}

impl ValidationAgent {
    pub fn new(backend: Arc<dyn Completion>, model: String) -> Self {
        debug!(
            "Initialized ValidationAgent with confidence threshold: {}",
            CONFIDENCE_THRESHOLD
        );
        Self { backend, model, confidence_threshold: CONFIDENCE_THRESHOLD }
    }

    /// Validate everything but the work experience, then splice the original
    /// experience list back in unchanged.
    pub async fn validate_resume(
        &self,
        resume: &ValidatedResume,
        job_requirements: &JobRequirement,
        keyword_match: &KeywordMatch,
    ) -> Result<ResumeValidationResult> {
        info!("Starting comprehensive resume validation...");

        let base = self
            .validate_base_content(resume, job_requirements, keyword_match)
            .await
            .map_err(|e| {
                error!("Validation error: {}", e);
                e
            })?;

        let is_valid = self.apply_threshold(base.is_valid, base.validation_score);

        let complete_resume = ValidatedResume {
            name: base.validated_content.name,
            summary: base.validated_content.summary,
            skills: base.validated_content.skills,
            certifications: base.validated_content.certifications,
            education: base.validated_content.education,
            personal_information: base.validated_content.personal_information,
            work_experience: resume.work_experience.clone(),
        };

        Ok(ResumeValidationResult {
            is_valid,
            validation_score: base.validation_score,
            report: base.report,
            validated_content: complete_resume,
            ats_analysis: serde_json::to_value(keyword_match)?,
        })
    }

    async fn validate_base_content(
        &self,
        resume: &ValidatedResume,
        job_requirements: &JobRequirement,
        keyword_match: &KeywordMatch,
    ) -> Result<ValidationResponse> {
        let messages = [
            ChatMessage::system(
                "Validate the basic resume content (excluding work experience). \
                 Keep responses extremely concise. Return a JSON object with:\n\
                 {\n\
                   \"is_valid\": boolean,\n\
                   \"validation_score\": float,\n\
                   \"report\": {\"summary\": string, \"details\": [strings]},\n\
                   \"validated_content\": {\n\
                     \"name\": string,\n\
                     \"summary\": string,\n\
                     \"skills\": {\"technical\": [], \"soft\": [], \"other\": []},\n\
                     \"certifications\": []\n\
                   }\n\
                 }\n\
                 IMPORTANT: Do not include work_experience in the response.",
            ),
            ChatMessage::user(format!(
                "Validate this resume content:\n\
                 Name: {}\n\
                 Summary: {}\n\
                 Skills: {}\n\
                 Certifications: {}\n\
                 Requirements: {}\n\
                 ATS Analysis: {}",
                resume.name,
                resume.summary,
                serde_json::to_string(&resume.skills)?,
                serde_json::to_string(&resume.certifications)?,
                serde_json::to_string(job_requirements)?,
                serde_json::to_string(keyword_match)?,
            )),
        ];

        request(self.backend.as_ref(), &self.model, &messages).await
    }

    /// Validate work experiences in chunks; a failed chunk keeps its
    /// original entries. Not wired into `validate_resume`.
    pub async fn validate_work_experiences(
        &self,
        experiences: &[WorkExperience],
        job_requirements: &JobRequirement,
    ) -> Vec<WorkExperience> {
        let mut validated = Vec::with_capacity(experiences.len());

        for chunk in experiences.chunks(EXPERIENCE_CHUNK_SIZE) {
            match self.validate_experience_chunk(chunk, job_requirements).await {
                Ok(mut entries) => validated.append(&mut entries),
                Err(e) => {
                    warn!("Error validating experience chunk: {}", e);
                    validated.extend(chunk.iter().cloned());
                }
            }
        }

        validated
    }

    async fn validate_experience_chunk(
        &self,
        chunk: &[WorkExperience],
        job_requirements: &JobRequirement,
    ) -> Result<Vec<WorkExperience>> {
        let messages = [
            ChatMessage::system(
                "Validate these work experiences. Keep the same structure but ensure \
                 content is relevant and concise. Return a JSON object with a single \
                 field 'experiences' holding the validated array.",
            ),
            ChatMessage::user(format!(
                "Validate these experiences against requirements:\n\
                 Experiences: {}\n\
                 Requirements: {}",
                serde_json::to_string(chunk)?,
                serde_json::to_string(job_requirements)?,
            )),
        ];

        let response: ExperienceChunkResponse =
            request(self.backend.as_ref(), &self.model, &messages).await?;
        Ok(response.experiences)
    }

    pub async fn validate_job_analysis(
        &self,
        job_analysis: &JobRequirement,
        posting: &JobPosting,
    ) -> Result<JobValidationResult> {
        info!("Validating job analysis...");

        let messages = [
            ChatMessage::system(
                "You are a precise job analysis validator. Verify the extracted requirements \
                 match the original posting. \
                 Format response as JSON with: is_valid (bool), validation_score (float), \
                 report (object with summary: string, details: list[str]), and \
                 validated_content (object matching input structure with required_qualifications, \
                 key_responsibilities, technical_requirements, and soft_skills).",
            ),
            ChatMessage::user(format!(
                "Validate job analysis against original data:\nAnalysis: {}\nOriginal: {}",
                serde_json::to_string(job_analysis)?,
                serde_json::to_string(posting)?,
            )),
        ];

        let mut result: JobValidationResult =
            request(self.backend.as_ref(), &self.model, &messages)
                .await
                .map_err(|e| {
                    error!("Error during job analysis validation: {}", e);
                    e
                })?;
        result.is_valid = self.apply_threshold(result.is_valid, result.validation_score);
        Ok(result)
    }

    pub async fn validate_profile_matches(
        &self,
        matches: &ProfileMatch,
        job_analysis: &JobRequirement,
        profile: &CandidateProfile,
    ) -> Result<ProfileValidationResult> {
        info!("Validating profile matches...");

        let messages = [
            ChatMessage::system(
                "You are a precise profile match validator. Verify accuracy and completeness. \
                 Format response as JSON with: is_valid (bool), validation_score (float), \
                 report (object with summary: string, details: list[str]), and \
                 validated_content (object mapping score names to floats).",
            ),
            ChatMessage::user(format!(
                "Validate matches against requirements and profile:\n\
                 Matches: {}\nRequirements: {}\nProfile: {}",
                serde_json::to_string(matches)?,
                serde_json::to_string(job_analysis)?,
                serde_json::to_string(profile)?,
            )),
        ];

        let mut result: ProfileValidationResult =
            request(self.backend.as_ref(), &self.model, &messages)
                .await
                .map_err(|e| {
                    error!("Error during profile match validation: {}", e);
                    e
                })?;
        result.is_valid = self.apply_threshold(result.is_valid, result.validation_score);
        Ok(result)
    }

    fn apply_threshold(&self, is_valid: bool, score: f64) -> bool {
        if score < self.confidence_threshold {
            warn!(
                "Validation score {:.2} below confidence threshold {:.2}",
                score, self.confidence_threshold
            );
            return false;
        }
        is_valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::completion::script::ScriptedCompletion;
    use crate::types::ResumeSkills;
    use std::collections::BTreeMap;

    fn empty_job() -> JobRequirement {
        JobRequirement {
            required_qualifications: BTreeMap::new(),
            key_responsibilities: BTreeMap::new(),
            technical_requirements: BTreeMap::new(),
            soft_skills: BTreeMap::new(),
            preferences: None,
        }
    }

    fn empty_keyword_match() -> KeywordMatch {
        KeywordMatch {
            matched_keywords: vec![],
            missing_keywords: vec![],
            overall_match_score: 0.0,
            optimization_suggestions: vec![],
            ats_score: 0.0,
        }
    }

    fn experience(company: &str) -> WorkExperience {
        WorkExperience {
            company: company.to_string(),
            position: "Analyst".to_string(),
            employment_period: "2020 - 2022".to_string(),
            location: String::new(),
            industry: String::new(),
            responsibilities: vec!["Did work".to_string()],
            skills_acquired: vec![],
        }
    }

    fn resume_with(experiences: Vec<WorkExperience>) -> ValidatedResume {
        ValidatedResume {
            name: "Jane Doe".to_string(),
            summary: "I analyze data.".to_string(),
            work_experience: experiences,
            skills: ResumeSkills::default(),
            certifications: vec![],
            education: None,
            personal_information: None,
        }
    }

    fn base_validation_json(score: f64) -> serde_json::Value {
        serde_json::json!({
            "is_valid": true,
            "validation_score": score,
            "report": {"summary": "ok", "details": []},
            "validated_content": {
                "name": "Jane Doe",
                "summary": "Polished summary.",
                "skills": {"technical": [], "soft": [], "other": []},
                "certifications": []
            }
        })
    }

    #[tokio::test]
    async fn test_validate_resume_splices_original_experience() {
        let backend = Arc::new(ScriptedCompletion::new(vec![Ok(base_validation_json(0.9))]));
        let agent = ValidationAgent::new(backend, "test-model".to_string());
        let resume = resume_with(vec![experience("Acme"), experience("Globex")]);

        let result = agent
            .validate_resume(&resume, &empty_job(), &empty_keyword_match())
            .await
            .unwrap();

        assert!(result.is_valid);
        // Work experience is never altered by validation
        assert_eq!(result.validated_content.work_experience, resume.work_experience);
        assert_eq!(result.validated_content.summary, "Polished summary.");
    }

    #[tokio::test]
    async fn test_validation_below_threshold_flagged_invalid() {
        let backend = Arc::new(ScriptedCompletion::new(vec![Ok(base_validation_json(0.7))]));
        let agent = ValidationAgent::new(backend, "test-model".to_string());
        let resume = resume_with(vec![experience("Acme")]);

        let result = agent
            .validate_resume(&resume, &empty_job(), &empty_keyword_match())
            .await
            .unwrap();
        assert!(!result.is_valid);
        assert_eq!(result.validation_score, 0.7);
    }

    #[tokio::test]
    async fn test_chunked_validation_falls_back_per_chunk() {
        // Three entries: first chunk of two validates, second chunk fails
        let backend = Arc::new(ScriptedCompletion::new(vec![
            Ok(serde_json::json!({"experiences": [
                {
                    "company": "Acme", "position": "Analyst",
                    "employment_period": "2020 - 2022", "location": "", "industry": "",
                    "responsibilities": ["Tightened wording"], "skills_acquired": []
                },
                {
                    "company": "Globex", "position": "Analyst",
                    "employment_period": "2020 - 2022", "location": "", "industry": "",
                    "responsibilities": ["Did work"], "skills_acquired": []
                }
            ]})),
            Err("timeout".to_string()),
        ]));
        let agent = ValidationAgent::new(backend, "test-model".to_string());
        let originals = vec![experience("Acme"), experience("Globex"), experience("Initech")];

        let validated = agent.validate_work_experiences(&originals, &empty_job()).await;

        assert_eq!(validated.len(), 3);
        assert_eq!(validated[0].responsibilities, vec!["Tightened wording".to_string()]);
        assert_eq!(validated[2], originals[2]);
    }
}
