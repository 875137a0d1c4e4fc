// src/agents/cover_letter.rs
//! Cover-letter synthesis. Four context blocks are derived locally from the
//! upstream artifacts and fed into a single completion call; the letter is
//! one atomic artifact, so any failure is fatal for this component.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{error, info};

use crate::core::completion::{request, ChatMessage, Completion};
use crate::dates::{self, CURRENT_WINDOW_DAYS};
use crate::types::{CandidateProfile, CoverLetter, JobRequirement, KeywordMatch, ProfileMatch};

pub struct CoverLetterGenerator {
    backend: Arc<dyn Completion>,
    model: String,
}

impl CoverLetterGenerator {
    pub fn new(backend: Arc<dyn Completion>, model: String) -> Self {
        Self { backend, model }
    }

    pub async fn generate(
        &self,
        profile: &CandidateProfile,
        job_requirements: &JobRequirement,
        profile_match: &ProfileMatch,
        keyword_match: &KeywordMatch,
        now: NaiveDate,
    ) -> Result<CoverLetter> {
        info!("Starting cover letter generation...");

        let experience_context = experience_context(profile, now);
        let skill_context = skill_matches_context(profile_match, keyword_match);
        let job_context = job_context(job_requirements);
        let experience_match = experience_match_analysis(profile, job_requirements, now);

        let messages = [
            ChatMessage::system(format!(
                "Generate a professional cover letter based on the candidate's actual experience. \
                 \nJob Context:\n{}\n\
                 \nCandidate Context:\n{}\
                 \nSkill Context:\n{}\n\
                 \nExperience Match:\n{}\n\
                 Rules:\n\
                 1. Use first-person perspective\n\
                 2. Only reference skills and experience explicitly shown in profile\n\
                 3. Be clear about experience levels (e.g., 'developing', 'experienced in')\n\
                 4. Focus on transferable skills and actual achievements\n\
                 5. Maintain honesty about capabilities and growth areas\n\
                 6. Address key job requirements directly\n\
                 7. Acknowledge any experience gaps professionally\n\
                 8. Use experience match data to frame qualifications accurately\n\
                 Return a JSON object with: greeting, opening_paragraph, body_paragraphs[], \
                 closing_paragraph, signature, keywords_used[]",
                job_context, experience_context, skill_context, experience_match,
            )),
            ChatMessage::user(format!(
                "Profile: {}\n\
                 Job Requirements: {}\n\
                 Profile Match: {}\n\
                 ATS Analysis: {}",
                serde_json::to_string(profile).context("Failed to serialize profile")?,
                serde_json::to_string(job_requirements)
                    .context("Failed to serialize job requirements")?,
                serde_json::to_string(profile_match)
                    .context("Failed to serialize profile match")?,
                serde_json::to_string(keyword_match)
                    .context("Failed to serialize keyword match")?,
            )),
        ];

        request(self.backend.as_ref(), &self.model, &messages)
            .await
            .map_err(|e| {
                error!("Cover letter generation failed: {}", e);
                e
            })
    }
}

/// Total parseable experience, current role, and recent certifications.
fn experience_context(profile: &CandidateProfile, now: NaiveDate) -> String {
    let mut context = Vec::new();
    let mut total_days: i64 = 0;
    let mut current_role: Option<(&str, &str)> = None;

    for exp in &profile.professional_experience {
        let (start, end) = dates::parse_period(&exp.employment_period, now);
        let (Some(start), Some(end)) = (start, end) else {
            continue;
        };
        if dates::is_within(end, now, CURRENT_WINDOW_DAYS) {
            current_role = Some((&exp.position, &exp.company));
        }
        total_days += dates::duration_days(start, end).max(0);
    }

    if total_days > 0 {
        context.push(format!(
            "Total professional experience: {:.1} years",
            dates::days_to_years(total_days)
        ));
    }
    if let Some((position, company)) = current_role {
        context.push(format!("Current role: {} at {}", position, company));
    }

    let recent_certs: Vec<&str> = profile
        .certifications
        .iter()
        .filter(|cert| dates::is_recent_certification(&cert.date_obtained, now))
        .map(|cert| cert.name.as_str())
        .collect();
    if !recent_certs.is_empty() {
        context.push(format!("Recent certifications: {}", recent_certs.join(", ")));
    }

    context.join("\n")
}

/// Nonzero technical match percentages, up to 3 strong ATS matches
/// (strength >= 4), and up to 2 improvement areas.
fn skill_matches_context(profile_match: &ProfileMatch, keyword_match: &KeywordMatch) -> String {
    let mut context = Vec::new();

    if !profile_match.technical_requirements_match.is_empty() {
        context.push("Technical skill matches:".to_string());
        for (category, score) in &profile_match.technical_requirements_match {
            if *score > 0.0 {
                context.push(format!("- {}: {:.0}%", category, score * 100.0));
            }
        }
    }

    let strong_matches: Vec<&str> = keyword_match
        .matched_keywords
        .iter()
        .filter(|kw| kw.strength >= 4.0)
        .take(3)
        .map(|kw| kw.word.as_str())
        .collect();
    if !strong_matches.is_empty() {
        context.push(format!("Strong skill matches: {}", strong_matches.join(", ")));
    }

    if !profile_match.areas_for_improvement.is_empty() {
        let areas: Vec<&str> = profile_match
            .areas_for_improvement
            .iter()
            .take(2)
            .map(String::as_str)
            .collect();
        context.push(format!("Growth areas: {}", areas.join(", ")));
    }

    context.join("\n")
}

/// Experience-level signal, technical requirements, tools, and the first
/// three responsibility lines across all categories.
fn job_context(job_requirements: &JobRequirement) -> String {
    let mut context = Vec::new();

    if let Some(req) = job_requirements.experience_qualification() {
        context.push(format!("Required experience: {}", req));
    }

    let tech = job_requirements.technical();
    if !tech.is_empty() {
        context.push(format!("Key technical requirements: {}", tech.join(", ")));
    }

    let tools = job_requirements.tools();
    if !tools.is_empty() {
        context.push(format!("Required tools: {}", tools.join(", ")));
    }

    let responsibilities = job_requirements.all_responsibilities();
    if !responsibilities.is_empty() {
        context.push("Key responsibilities:".to_string());
        for resp in responsibilities.iter().take(3) {
            context.push(format!("- {}", resp));
        }
    }

    context.join("\n")
}

/// Directly-relevant vs related experience against the required years.
/// An entry with at least half of the required skills counts in full;
/// any overlap at all counts at half weight. Negative durations from
/// reversed ranges are clamped to zero.
fn experience_match_analysis(
    profile: &CandidateProfile,
    job_requirements: &JobRequirement,
    now: NaiveDate,
) -> String {
    let mut context = Vec::new();

    let required_years = job_requirements
        .experience_qualification()
        .and_then(leading_number)
        .unwrap_or(0.0);

    let required_skills = job_requirements.required_skill_set();
    let mut relevant_days: f64 = 0.0;
    let mut related_days: f64 = 0.0;

    for exp in &profile.professional_experience {
        let (start, end) = dates::parse_period(&exp.employment_period, now);
        let (Some(start), Some(end)) = (start, end) else {
            continue;
        };
        let duration = dates::duration_days(start, end).max(0) as f64;

        let overlap = exp
            .skills_acquired
            .iter()
            .filter(|skill| required_skills.contains(&skill.to_lowercase()))
            .count();

        if overlap as f64 >= required_skills.len() as f64 / 2.0 {
            relevant_days += duration;
        } else if overlap > 0 {
            related_days += duration * 0.5;
        }
    }

    let total_relevant_years = (relevant_days + related_days) / 365.0;

    if required_years > 0.0 {
        context.push(format!(
            "Experience match: {:.1} years relevant experience vs {} years required",
            total_relevant_years, required_years
        ));
        if total_relevant_years >= required_years {
            context.push("Meeting experience requirement".to_string());
        } else {
            context.push(format!(
                "Growing towards experience requirement (currently at {:.0}%)",
                total_relevant_years / required_years * 100.0
            ));
        }
    }

    if relevant_days > 0.0 {
        context.push(format!(
            "Directly relevant experience: {:.1} years",
            relevant_days / 365.0
        ));
    }
    if related_days > 0.0 {
        context.push(format!("Related experience: {:.1} years", related_days / 365.0));
    }

    context.join("\n")
}

/// First contiguous run of digits/decimal point in the text, as a number.
fn leading_number(text: &str) -> Option<f64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let rest = &text[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(rest.len());
    rest[..end].trim_end_matches('.').parse().ok()
}
