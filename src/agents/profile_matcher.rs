// src/agents/profile_matcher.rs
//! Scores a candidate profile against a [`JobRequirement`]. All scores are
//! model-judged; the only local post-processing is clamping to [0, 1].

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::core::completion::{request, ChatMessage, Completion};
use crate::types::{CandidateProfile, JobRequirement, ProfileMatch};

pub struct ProfileMatcher {
    backend: Arc<dyn Completion>,
    model: String,
}

impl ProfileMatcher {
    pub fn new(backend: Arc<dyn Completion>, model: String) -> Self {
        Self { backend, model }
    }

    pub async fn match_profile(
        &self,
        job_requirements: &JobRequirement,
        profile: &CandidateProfile,
    ) -> Result<ProfileMatch> {
        info!("Starting profile matching...");

        // All three skill categories go into the prompt even though only
        // technical and soft survive into later stages.
        let skills = serde_json::json!({
            "technical": profile.skills.technical,
            "management": profile.skills.management,
            "soft": profile.skills.soft,
        });

        let messages = [
            ChatMessage::system(
                "Match candidate profile against job requirements. Return a JSON object with:\n\
                 - qualifications_match: {requirement: score} (0.0-1.0)\n\
                 - responsibilities_match: {responsibility: score} (0.0-1.0)\n\
                 - technical_requirements_match: {requirement: score} (0.0-1.0)\n\
                 - soft_skills_match: {skill: score} (0.0-1.0)\n\
                 - overall_match_score: float (0.0-1.0)\n\
                 - key_strengths: list of strings\n\
                 - areas_for_improvement: list of strings\n\
                 - recommendations: list of strings\n\n\
                 Consider ALL skills categories (technical, management, soft) when matching.",
            ),
            ChatMessage::user(format!(
                "Match this profile against requirements:\n\
                 Requirements: {}\n\
                 Profile Experience: {}\n\
                 Profile Skills: {}\n\
                 Profile Certifications: {}",
                serde_json::to_string(job_requirements)
                    .context("Failed to serialize job requirements")?,
                serde_json::to_string(&profile.professional_experience)
                    .context("Failed to serialize experience")?,
                skills,
                serde_json::to_string(&profile.certifications)
                    .context("Failed to serialize certifications")?,
            )),
        ];

        let mut result: ProfileMatch = request(self.backend.as_ref(), &self.model, &messages)
            .await
            .map_err(|e| {
                error!("Profile matching failed: {}", e);
                e
            })?;
        result.clamp_scores();

        info!(
            "Profile matching completed with overall score: {:.0}%",
            result.overall_match_score * 100.0
        );
        debug!("Key strengths identified: {}", result.key_strengths.len());
        debug!("Areas for improvement: {}", result.areas_for_improvement.len());

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::completion::script::ScriptedCompletion;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_match_profile_clamps_scores() {
        let backend = Arc::new(ScriptedCompletion::new(vec![Ok(serde_json::json!({
            "qualifications_match": {"experience": 1.2},
            "responsibilities_match": {},
            "technical_requirements_match": {"sql": 0.9},
            "soft_skills_match": {},
            "overall_match_score": 1.5,
            "key_strengths": ["SQL depth"],
            "areas_for_improvement": [],
            "recommendations": []
        }))]));

        let matcher = ProfileMatcher::new(backend, "test-model".to_string());
        let job = JobRequirement {
            required_qualifications: BTreeMap::new(),
            key_responsibilities: BTreeMap::new(),
            technical_requirements: BTreeMap::new(),
            soft_skills: BTreeMap::new(),
            preferences: None,
        };
        let result = matcher
            .match_profile(&job, &CandidateProfile::default())
            .await
            .unwrap();

        assert_eq!(result.qualifications_match["experience"], 1.0);
        assert_eq!(result.overall_match_score, 1.0);
        assert_eq!(result.technical_requirements_match["sql"], 0.9);
    }
}
