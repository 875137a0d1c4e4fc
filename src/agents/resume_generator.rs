// src/agents/resume_generator.rs
//! Tailored resume synthesis: extract every experience record, enhance each
//! one with a timing- and skill-aware prompt, verify nothing was lost,
//! assemble the resume, then synthesize the summary from recency-bucketed
//! skills. Failures degrade to original data at the smallest granularity;
//! only a profile with zero experience records is fatal.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::core::completion::{request, ChatMessage, Completion};
use crate::dates::{
    self, CURRENT_WINDOW_DAYS, ESTABLISHED_WINDOW_DAYS, RECENT_WINDOW_DAYS,
};
use crate::types::{
    CandidateProfile, Certification, JobRequirement, KeywordMatch, PersonalInformation,
    ProfileMatch, ResumeSkills, ValidatedResume, WorkExperience,
};

pub struct ResumeGenerator {
    backend: Arc<dyn Completion>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct EnhancedEntry {
    #[serde(default)]
    responsibilities: Option<Vec<String>>,
    #[serde(default)]
    skills_acquired: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(default)]
    summary: String,
}

impl ResumeGenerator {
    pub fn new(backend: Arc<dyn Completion>, model: String) -> Self {
        Self { backend, model }
    }

    pub async fn generate(
        &self,
        profile: &CandidateProfile,
        profile_match: &ProfileMatch,
        job_requirements: &JobRequirement,
        keyword_match: &KeywordMatch,
        now: NaiveDate,
    ) -> Result<ValidatedResume> {
        info!(
            "Starting resume generation (profile match {:.0}%)...",
            profile_match.overall_match_score * 100.0
        );

        let all_experience = extract_work_experience(profile);
        if all_experience.is_empty() {
            anyhow::bail!("No work experience found in profile");
        }
        info!("Extracted {} work experiences", all_experience.len());

        let mut enhanced_experience = Vec::with_capacity(all_experience.len());
        for exp in &all_experience {
            let enhanced = self
                .enhance_work_experience(exp, job_requirements, keyword_match, now)
                .await;
            debug!("Enhanced experience: {} - {}", enhanced.company, enhanced.position);
            enhanced_experience.push(enhanced);
        }

        // Enhancement must never lose entries; on mismatch, drop all
        // enhancements and keep the extracted list verbatim.
        if enhanced_experience.len() != all_experience.len() {
            error!("Experience count mismatch! Using original experiences.");
            enhanced_experience = all_experience.clone();
        }

        let mut resume = ValidatedResume {
            name: format_full_name(profile),
            summary: String::new(),
            work_experience: enhanced_experience,
            skills: extract_skills(profile),
            certifications: profile
                .certifications
                .iter()
                .map(|cert| Certification {
                    name: cert.name.clone(),
                    description: cert.description.clone(),
                    issuer: cert.issuer.clone(),
                    date_obtained: cert.date_obtained.clone(),
                })
                .collect(),
            education: None,
            personal_information: extract_personal_info(profile),
        };

        match self
            .generate_summary(profile, &resume, job_requirements, now)
            .await
        {
            Ok(summary) => resume.summary = summary,
            Err(e) => warn!("Summary synthesis failed, leaving summary empty: {}", e),
        }

        info!(
            "Final resume contains {} work experiences",
            resume.work_experience.len()
        );
        Ok(resume)
    }

    /// Enhance a single entry; any failure falls back to the original entry.
    async fn enhance_work_experience(
        &self,
        experience: &WorkExperience,
        job_requirements: &JobRequirement,
        keyword_match: &KeywordMatch,
        now: NaiveDate,
    ) -> WorkExperience {
        match self
            .try_enhance(experience, job_requirements, keyword_match, now)
            .await
        {
            Ok(enhanced) => enhanced,
            Err(e) => {
                error!("Error enhancing experience {}: {}", experience.company, e);
                experience.clone()
            }
        }
    }

    async fn try_enhance(
        &self,
        experience: &WorkExperience,
        job_requirements: &JobRequirement,
        keyword_match: &KeywordMatch,
        now: NaiveDate,
    ) -> Result<WorkExperience> {
        let timing = timing_context(&experience.employment_period, now);
        let skill_context = skill_context(&experience.skills_acquired, job_requirements);

        let messages = [
            ChatMessage::system(format!(
                "Enhance this work experience entry while maintaining strict truthfulness. \
                 Context: {}\n\
                 Skills Context:\n{}\n\n\
                 Rules:\n\
                 1. Only highlight skills and achievements explicitly mentioned\n\
                 2. Do not infer or add capabilities not clearly demonstrated\n\
                 3. Use precise language that reflects actual level of involvement\n\
                 4. Focus on transferable skills without overstating their application\n\
                 5. If a skill is mentioned, preserve the original context\n\
                 6. Use timing-appropriate language:\n\
                    - Current role: Use present tense ('managing', 'developing')\n\
                    - Recent role: Emphasize relevance ('recently managed', 'developed')\n\
                    - Past role: Use past tense ('managed', 'developed')\n\
                 7. For skills mentioned in job requirements, provide specific context\n\
                 Return a JSON object with these exact fields:\n\
                 {{\n\
                   \"responsibilities\": [\"string\"],\n\
                   \"skills_acquired\": [\"string\"]\n\
                 }}\n\
                 Maintain factual accuracy while highlighting relevant experience.",
                timing.join(", "),
                skill_context,
            )),
            ChatMessage::user(format!(
                "Original experience: {}\n\
                 Target job requirements: {}\n\
                 ATS Keywords: {}\n\n\
                 Enhance this experience while maintaining strict truthfulness.",
                serde_json::to_string(experience).context("Failed to serialize experience")?,
                serde_json::to_string(job_requirements)
                    .context("Failed to serialize job requirements")?,
                serde_json::to_string(keyword_match)
                    .context("Failed to serialize keyword match")?,
            )),
        ];

        let enhanced: EnhancedEntry =
            request(self.backend.as_ref(), &self.model, &messages).await?;

        Ok(WorkExperience {
            company: experience.company.clone(),
            position: experience.position.clone(),
            employment_period: experience.employment_period.clone(),
            location: experience.location.clone(),
            industry: experience.industry.clone(),
            responsibilities: enhanced
                .responsibilities
                .unwrap_or_else(|| experience.responsibilities.clone()),
            skills_acquired: enhanced
                .skills_acquired
                .unwrap_or_else(|| experience.skills_acquired.clone()),
        })
    }

    async fn generate_summary(
        &self,
        profile: &CandidateProfile,
        resume: &ValidatedResume,
        job_requirements: &JobRequirement,
        now: NaiveDate,
    ) -> Result<String> {
        let rules = summary_rules(profile, now);
        let numbered = rules
            .iter()
            .enumerate()
            .map(|(i, rule)| format!("{}. {}", i + 1, rule))
            .collect::<Vec<_>>()
            .join("\n");

        let messages = [
            ChatMessage::system(format!(
                "Generate a concise first-person professional summary in 3-4 sentences maximum. \
                 Rules:\n{}\nReturn a JSON object with a single field 'summary'.",
                numbered
            )),
            ChatMessage::user(format!(
                "Write a concise first-person summary (3-4 sentences) that honestly represents \
                 my experience and growth areas.\n\
                 Resume: {}\n\
                 Job Requirements: {}",
                serde_json::to_string(resume).context("Failed to serialize resume")?,
                serde_json::to_string(job_requirements)
                    .context("Failed to serialize job requirements")?,
            )),
        ];

        let response: SummaryResponse =
            request(self.backend.as_ref(), &self.model, &messages).await?;
        Ok(response.summary)
    }
}

/// Convert every raw profile record into a [`WorkExperience`], preserving
/// order. The output count always equals the source count.
pub fn extract_work_experience(profile: &CandidateProfile) -> Vec<WorkExperience> {
    profile
        .professional_experience
        .iter()
        .map(|exp| WorkExperience {
            company: exp.company.clone(),
            position: exp.position.clone(),
            employment_period: exp.employment_period.clone(),
            location: exp.location.clone(),
            industry: exp.industry.clone(),
            responsibilities: exp.responsibilities.clone(),
            skills_acquired: exp.skills_acquired.clone(),
        })
        .collect()
}

/// Timing classification lines for the enhancement prompt.
fn timing_context(employment_period: &str, now: NaiveDate) -> Vec<String> {
    let (start, end) = dates::parse_period(employment_period, now);
    let mut context = Vec::new();

    if let Some(end) = end {
        if dates::is_within(end, now, CURRENT_WINDOW_DAYS) {
            context.push("This is the current role".to_string());
        }
        if dates::is_within(end, now, RECENT_WINDOW_DAYS) {
            context.push("This is a recent role".to_string());
        }
    }
    if let (Some(start), Some(end)) = (start, end) {
        let years = dates::days_to_years(dates::duration_days(start, end));
        context.push(format!("Duration: {:.1} years", years));
    }

    context
}

/// Categorize acquired skills against the job's required skill set:
/// direct case-insensitive matches, substring-related skills, and the rest.
/// Each category is capped at 3 entries for prompt brevity.
fn skill_context(skills: &[String], job_requirements: &JobRequirement) -> String {
    let required = job_requirements.required_skill_set();

    let mut matching = Vec::new();
    let mut related = Vec::new();
    let mut additional = Vec::new();

    for skill in skills {
        let lower = skill.to_lowercase();
        if required.contains(&lower) {
            matching.push(skill.as_str());
        } else if required
            .iter()
            .any(|req| req.contains(&lower) || lower.contains(req.as_str()))
        {
            related.push(skill.as_str());
        } else {
            additional.push(skill.as_str());
        }
    }

    let mut context = Vec::new();
    if !matching.is_empty() {
        context.push(format!("Directly relevant skills: {}", matching[..matching.len().min(3)].join(", ")));
    }
    if !related.is_empty() {
        context.push(format!("Related skills: {}", related[..related.len().min(3)].join(", ")));
    }
    if !additional.is_empty() {
        context.push(format!("Additional skills: {}", additional[..additional.len().min(3)].join(", ")));
    }
    context.join("\n")
}

/// Build the numbered rule list for summary synthesis from recency-bucketed
/// skills and recently obtained certifications.
fn summary_rules(profile: &CandidateProfile, now: NaiveDate) -> Vec<String> {
    let mut current_role_skills: BTreeSet<String> = BTreeSet::new();
    let mut recent_skills: BTreeSet<String> = BTreeSet::new();
    let mut established_skills: BTreeSet<String> = BTreeSet::new();
    let mut total_experience_days: i64 = 0;

    for exp in &profile.professional_experience {
        let (start, end) = dates::parse_period(&exp.employment_period, now);
        let (Some(start), Some(end)) = (start, end) else {
            continue;
        };
        total_experience_days += dates::duration_days(start, end).max(0);

        let skills: BTreeSet<String> = exp.skills_acquired.iter().cloned().collect();
        if dates::is_within(end, now, RECENT_WINDOW_DAYS) {
            recent_skills.extend(skills.iter().cloned());
            if dates::is_within(end, now, CURRENT_WINDOW_DAYS) {
                current_role_skills.extend(skills);
            }
        } else if dates::is_within(end, now, ESTABLISHED_WINDOW_DAYS) {
            established_skills.extend(skills);
        }
    }

    let recent_certs: Vec<&str> = profile
        .certifications
        .iter()
        .filter(|cert| dates::is_recent_certification(&cert.date_obtained, now))
        .map(|cert| cert.name.as_str())
        .collect();

    let mut rules = vec![
        "Use first-person perspective ('I have', 'my experience')".to_string(),
        "Keep it brief and impactful".to_string(),
        format!(
            "Total years of experience: {:.1}",
            dates::days_to_years(total_experience_days)
        ),
        "Be honest about experience levels:".to_string(),
    ];

    let top3 = |set: &BTreeSet<String>| -> Vec<String> {
        set.iter().take(3).cloned().collect()
    };

    if !current_role_skills.is_empty() {
        rules.push(format!(
            "Current role skills: {}",
            top3(&current_role_skills).join(", ")
        ));
    }
    let recent_only: BTreeSet<String> =
        recent_skills.difference(&current_role_skills).cloned().collect();
    if !recent_only.is_empty() {
        rules.push(format!("Recent experience with: {}", top3(&recent_only).join(", ")));
    }
    let established_only: BTreeSet<String> =
        established_skills.difference(&recent_skills).cloned().collect();
    if !established_only.is_empty() {
        rules.push(format!(
            "Previous experience in: {}",
            top3(&established_only).join(", ")
        ));
    }
    if !recent_certs.is_empty() {
        rules.push(format!("New certifications ({})", recent_certs.join(", ")));
    }

    rules
}

fn format_full_name(profile: &CandidateProfile) -> String {
    format!(
        "{} {}",
        profile.personal_information.name, profile.personal_information.surname
    )
    .trim()
    .to_string()
}

/// Profile skills relabeled for the resume: management lands under "other".
fn extract_skills(profile: &CandidateProfile) -> ResumeSkills {
    ResumeSkills {
        technical: profile.skills.technical.clone(),
        soft: profile.skills.soft.clone(),
        other: profile.skills.management.clone(),
    }
}

fn extract_personal_info(profile: &CandidateProfile) -> Option<PersonalInformation> {
    let info = &profile.personal_information;
    if info.name.is_empty() && info.surname.is_empty() {
        return None;
    }
    Some(PersonalInformation {
        name: info.name.clone(),
        surname: info.surname.clone(),
        contact: info.contact.clone(),
        online_presence: info.online_presence.clone(),
    })
}
