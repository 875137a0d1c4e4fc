// src/agents/ats_analyzer.rs
//! ATS keyword extraction and keyword matching. The response shape is a
//! per-call type parameter on the completion seam, so the two operations
//! never share mutable schema state. `ats_score` is always recomputed
//! locally, overwriting whatever the completion call returned.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info};

use crate::core::completion::{request, ChatMessage, Completion};
use crate::types::{AtsAnalysis, CandidateProfile, JobPosting, KeywordMatch};

pub struct AtsAnalyzer {
    backend: Arc<dyn Completion>,
    model: String,
}

impl AtsAnalyzer {
    pub fn new(backend: Arc<dyn Completion>, model: String) -> Self {
        Self { backend, model }
    }

    /// Extract and categorize weighted keywords from a job posting.
    pub async fn extract_keywords(&self, posting: &JobPosting) -> Result<AtsAnalysis> {
        info!("Extracting ATS keywords...");

        let messages = [
            ChatMessage::system(
                "Analyze the job description and extract keywords for ATS optimization. \
                 Return a JSON object with these exact fields:\n\
                 {\n\
                   \"technical_keywords\": [{\"name\": \"string\", \"weight\": number}],\n\
                   \"soft_skills\": [{\"name\": \"string\", \"weight\": number}],\n\
                   \"industry_terms\": [{\"name\": \"string\", \"weight\": number}],\n\
                   \"certifications\": [{\"name\": \"string\", \"weight\": number}],\n\
                   \"tools_and_technologies\": [{\"name\": \"string\", \"weight\": number}]\n\
                 }",
            ),
            ChatMessage::user(format!(
                "Extract ATS keywords from this job posting:\n{}",
                serde_json::to_string(posting).context("Failed to serialize job posting")?
            )),
        ];

        request(self.backend.as_ref(), &self.model, &messages)
            .await
            .map_err(|e| {
                error!("ATS keyword extraction failed: {}", e);
                e
            })
    }

    /// Compare the profile against the extracted keyword set, then overwrite
    /// the returned `ats_score` with the locally computed value.
    pub async fn analyze_keyword_matches(
        &self,
        ats_keywords: &AtsAnalysis,
        profile: &CandidateProfile,
    ) -> Result<KeywordMatch> {
        info!("Analyzing keyword matches...");

        let messages = [
            ChatMessage::system(
                "Analyze how the candidate profile matches the ATS keywords. \
                 Calculate an ATS score based on the percentage of matched keywords. \
                 Return a JSON object with these exact fields:\n\
                 {\n\
                   \"matched_keywords\": [{\"word\": \"string\", \"context\": \"string\", \"strength\": number}],\n\
                   \"missing_keywords\": [{\"word\": \"string\", \"importance\": number}],\n\
                   \"overall_match_score\": number,\n\
                   \"optimization_suggestions\": [\"string\"],\n\
                   \"ats_score\": number\n\
                 }",
            ),
            ChatMessage::user(format!(
                "Compare profile against these ATS keywords:\n\
                 Keywords: {}\n\
                 Profile: {}",
                serde_json::to_string(ats_keywords).context("Failed to serialize keywords")?,
                serde_json::to_string(profile).context("Failed to serialize profile")?,
            )),
        ];

        let mut keyword_match: KeywordMatch =
            request(self.backend.as_ref(), &self.model, &messages)
                .await
                .map_err(|e| {
                    error!("Keyword matching failed: {}", e);
                    e
                })?;

        keyword_match.ats_score =
            compute_ats_score(keyword_match.matched_keywords.len(), ats_keywords.total_keywords());
        info!("ATS score: {:.1}%", keyword_match.ats_score);

        Ok(keyword_match)
    }
}

/// `100 * matched / total`, 0 when no keywords were extracted.
pub fn compute_ats_score(matched: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    matched as f64 / total as f64 * 100.0
}
