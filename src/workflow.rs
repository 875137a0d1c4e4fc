// src/workflow.rs
//! Fixed pipeline order with explicit data dependencies:
//! job analysis → profile matching → ATS extraction → keyword matching →
//! resume generation → cover letter → validation. Stages run strictly
//! sequentially; each stage receives its inputs and returns a new artifact.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::agents::{
    AtsAnalyzer, CoverLetterGenerator, JobAnalyzer, ProfileMatcher, ResumeGenerator,
    ValidationAgent,
};
use crate::config::ModelSettings;
use crate::core::completion::Completion;
use crate::types::{
    AtsAnalysis, CandidateProfile, CoverLetter, JobPosting, JobRequirement, KeywordMatch,
    ProfileMatch, ResumeValidationResult, ValidatedResume,
};

pub struct WorkflowManager {
    job_analyzer: JobAnalyzer,
    profile_matcher: ProfileMatcher,
    ats_analyzer: AtsAnalyzer,
    resume_generator: ResumeGenerator,
    cover_letter_generator: CoverLetterGenerator,
    validation_agent: ValidationAgent,
}

/// Every artifact produced by one pipeline run.
pub struct WorkflowOutput {
    pub job_requirements: JobRequirement,
    pub profile_match: ProfileMatch,
    pub ats_keywords: AtsAnalysis,
    pub keyword_match: KeywordMatch,
    pub resume: ValidatedResume,
    pub cover_letter: CoverLetter,
    pub validation: Option<ResumeValidationResult>,
}

#[derive(Serialize)]
struct CombinedResults<'a> {
    resume: &'a ValidatedResume,
    cover_letter: &'a CoverLetter,
    ats_analysis: &'a KeywordMatch,
}

impl WorkflowManager {
    pub fn new(backend: Arc<dyn Completion>, settings: &ModelSettings) -> Self {
        info!("Initializing workflow manager...");
        let manager = Self {
            job_analyzer: JobAnalyzer::new(backend.clone(), settings.job_analysis.clone()),
            profile_matcher: ProfileMatcher::new(backend.clone(), settings.profile_match.clone()),
            ats_analyzer: AtsAnalyzer::new(backend.clone(), settings.ats_analysis.clone()),
            resume_generator: ResumeGenerator::new(backend.clone(), settings.resume.clone()),
            cover_letter_generator: CoverLetterGenerator::new(
                backend.clone(),
                settings.cover_letter.clone(),
            ),
            validation_agent: ValidationAgent::new(backend, settings.validation.clone()),
        };
        info!("Workflow manager initialized");
        manager
    }

    pub async fn run(
        &self,
        posting: &JobPosting,
        profile: &CandidateProfile,
    ) -> Result<WorkflowOutput> {
        self.run_at(posting, profile, Local::now().date_naive()).await
    }

    /// Run the pipeline against a fixed "now" reference date.
    pub async fn run_at(
        &self,
        posting: &JobPosting,
        profile: &CandidateProfile,
        now: NaiveDate,
    ) -> Result<WorkflowOutput> {
        let job_requirements = self.job_analyzer.analyze(posting).await?;

        let profile_match = self
            .profile_matcher
            .match_profile(&job_requirements, profile)
            .await?;

        let ats_keywords = self.ats_analyzer.extract_keywords(posting).await?;
        let keyword_match = self
            .ats_analyzer
            .analyze_keyword_matches(&ats_keywords, profile)
            .await?;

        let resume = self
            .resume_generator
            .generate(profile, &profile_match, &job_requirements, &keyword_match, now)
            .await?;

        let cover_letter = self
            .cover_letter_generator
            .generate(profile, &job_requirements, &profile_match, &keyword_match, now)
            .await?;

        // Validation annotates the run but never blocks it.
        let validation = match self
            .validation_agent
            .validate_resume(&resume, &job_requirements, &keyword_match)
            .await
        {
            Ok(result) => {
                info!(
                    "Resume validation: valid={} score={:.2}",
                    result.is_valid, result.validation_score
                );
                Some(result)
            }
            Err(e) => {
                warn!("Resume validation unavailable: {}", e);
                None
            }
        };

        Ok(WorkflowOutput {
            job_requirements,
            profile_match,
            ats_keywords,
            keyword_match,
            resume,
            cover_letter,
            validation,
        })
    }
}

/// Write the combined result document (resume, cover letter, keyword match)
/// to a timestamp-suffixed YAML file.
pub fn save_results(output: &WorkflowOutput, output_dir: &Path) -> Result<PathBuf> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let output_file = output_dir.join(format!("analysis_result_{}.yaml", timestamp));

    let combined = CombinedResults {
        resume: &output.resume,
        cover_letter: &output.cover_letter,
        ats_analysis: &output.keyword_match,
    };
    let content =
        serde_yaml::to_string(&combined).context("Failed to serialize combined results")?;
    std::fs::write(&output_file, content)
        .with_context(|| format!("Failed to write results: {}", output_file.display()))?;

    info!("Results saved to: {}", output_file.display());
    Ok(output_file)
}
