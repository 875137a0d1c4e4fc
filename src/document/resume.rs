// src/document/resume.rs
//! Renders a tailored resume as Markdown. Skills are reordered by relevance
//! to the job requirements and capped per category; responsibility bullets
//! taper off for older positions.

use anyhow::{Context, Result};
use chrono::Local;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::types::{JobRequirement, ValidatedResume};

const MAX_TECHNICAL_SKILLS: usize = 8;
const MAX_SOFT_SKILLS: usize = 5;
const MAX_OTHER_SKILLS: usize = 5;

/// Common words ignored when mining responsibility text for key terms.
const RESPONSIBILITY_STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "will", "able", "must", "can", "may", "should", "would",
    "could", "have", "has", "had", "been", "was", "were", "are", "our", "your", "their",
];

const QUALIFICATION_STOP_WORDS: &[&str] = &["the", "and", "for", "with", "years", "year", "experience"];

/// Soft skills containing one of these are treated as technical key terms.
const TECHNICAL_INDICATORS: &[&str] = &["data", "technical", "system", "analysis", "development"];

/// Write the rendered resume to a timestamp-suffixed Markdown file.
pub fn write(
    resume: &ValidatedResume,
    job_requirements: &JobRequirement,
    output_dir: &Path,
) -> Result<PathBuf> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = output_dir.join(format!("resume_{}.md", timestamp));
    std::fs::write(&path, render(resume, job_requirements))
        .with_context(|| format!("Failed to write resume: {}", path.display()))?;
    info!("Resume document generated: {}", path.display());
    Ok(path)
}

pub fn render(resume: &ValidatedResume, job_requirements: &JobRequirement) -> String {
    let mut doc = String::new();

    doc.push_str(&format!("# {}\n", resume.name));

    let contact = contact_line(resume);
    if !contact.is_empty() {
        doc.push_str(&format!("\n{}\n", contact));
    }

    if !resume.summary.is_empty() {
        doc.push_str("\n## Professional Summary\n\n");
        doc.push_str(&resume.summary);
        doc.push('\n');
    }

    if !resume.work_experience.is_empty() {
        doc.push_str("\n## Professional Experience\n");
        for (idx, exp) in resume.work_experience.iter().enumerate() {
            doc.push_str(&format!("\n**{} - {}**  \n", exp.position, exp.company));

            let mut period_loc = Vec::new();
            if !exp.employment_period.is_empty() {
                period_loc.push(exp.employment_period.as_str());
            }
            if !exp.location.is_empty() {
                period_loc.push(exp.location.as_str());
            }
            if !period_loc.is_empty() {
                doc.push_str(&format!("{}\n", period_loc.join(" | ")));
            }

            for resp in exp.responsibilities.iter().take(max_bullets(idx)) {
                doc.push_str(&format!("- {}\n", resp));
            }
        }
    }

    let skills = format_skills_section(resume, job_requirements);
    if !skills.is_empty() {
        doc.push_str("\n## Skills\n\n");
        for (category, list) in &skills {
            doc.push_str(&format!("**{}:** {}\n", category, list.join(", ")));
        }
    }

    doc
}

/// Older positions get fewer responsibility bullets.
fn max_bullets(position_index: usize) -> usize {
    match position_index {
        0 => 5,
        1 => 4,
        2 => 3,
        3 => 2,
        _ => 1,
    }
}

fn contact_line(resume: &ValidatedResume) -> String {
    let Some(info) = &resume.personal_information else {
        return String::new();
    };

    let mut parts = Vec::new();
    if let Some(email) = info.contact.get("email") {
        parts.push(email.clone());
    }
    if let Some(phone) = info.contact.get("phone") {
        match info.contact.get("phone_prefix") {
            Some(prefix) => parts.push(format!("{}{}", prefix, phone)),
            None => parts.push(phone.clone()),
        }
    }
    for url in info.online_presence.values() {
        parts.push(url.clone());
    }
    parts.join(" | ")
}

/// Reorder each skill category by job relevance and cap its length.
/// Categories are labelled for the rendered document: `other` holds
/// management skills.
fn format_skills_section(
    resume: &ValidatedResume,
    job_requirements: &JobRequirement,
) -> Vec<(&'static str, Vec<String>)> {
    let mut required_skills = BTreeSet::new();
    for skills in job_requirements.technical_requirements.values() {
        required_skills.extend(skills.iter().map(|s| s.to_lowercase()));
    }
    for skills in job_requirements.soft_skills.values() {
        required_skills.extend(skills.iter().map(|s| s.to_lowercase()));
    }

    let key_terms = extract_key_terms(job_requirements);

    let mut formatted = Vec::new();
    let technical = prioritize_skills(&resume.skills.technical, &required_skills, &key_terms);
    if !technical.is_empty() {
        formatted.push((
            "Technical",
            technical.into_iter().take(MAX_TECHNICAL_SKILLS).collect(),
        ));
    }
    let soft = prioritize_skills(&resume.skills.soft, &required_skills, &key_terms);
    if !soft.is_empty() {
        formatted.push(("Professional", soft.into_iter().take(MAX_SOFT_SKILLS).collect()));
    }
    let other = prioritize_skills(&resume.skills.other, &required_skills, &key_terms);
    if !other.is_empty() {
        formatted.push(("Management", other.into_iter().take(MAX_OTHER_SKILLS).collect()));
    }
    formatted
}

/// Sort skills by requirement relevance: exact requirement match scores 100,
/// substring overlap 50, a key-term hit 25. The sort is stable, so equally
/// scored skills keep their profile order.
fn prioritize_skills(
    skills: &[String],
    required_skills: &BTreeSet<String>,
    key_terms: &BTreeSet<String>,
) -> Vec<String> {
    let mut scored: Vec<(&String, i32)> = skills
        .iter()
        .map(|skill| {
            let lower = skill.to_lowercase();
            let score = if required_skills.contains(&lower) {
                100
            } else if required_skills
                .iter()
                .any(|req| lower.contains(req.as_str()) || req.contains(&lower))
            {
                50
            } else if key_terms.iter().any(|term| lower.contains(term.as_str())) {
                25
            } else {
                0
            };
            (skill, score)
        })
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.into_iter().map(|(s, _)| s.clone()).collect()
}

/// Mine the job requirements for lowercase terms worth matching skills
/// against: technical requirement names, filtered responsibility and
/// qualification words, and technically flavored soft skills.
fn extract_key_terms(job_requirements: &JobRequirement) -> BTreeSet<String> {
    let mut terms = BTreeSet::new();

    for skills in job_requirements.technical_requirements.values() {
        terms.extend(skills.iter().map(|s| s.to_lowercase()));
    }

    for resps in job_requirements.key_responsibilities.values() {
        for resp in resps {
            for word in resp.split_whitespace() {
                let word = word.to_lowercase();
                let word = word.trim_matches(|c| ".,()[]".contains(c));
                if word.len() > 2
                    && !RESPONSIBILITY_STOP_WORDS.contains(&word)
                    && !word.chars().all(|c| c.is_ascii_digit())
                {
                    terms.insert(word.to_string());
                }
            }
        }
    }

    for quals in job_requirements.required_qualifications.values() {
        for qual in quals {
            for word in qual.split_whitespace() {
                let word = word.to_lowercase();
                let word = word.trim_matches(|c| ".,()[]".contains(c));
                if word.len() > 2 && !QUALIFICATION_STOP_WORDS.contains(&word) {
                    terms.insert(word.to_string());
                }
            }
        }
    }

    for soft_skills in job_requirements.soft_skills.values() {
        for skill in soft_skills {
            let lower = skill.to_lowercase();
            if TECHNICAL_INDICATORS.iter().any(|ind| lower.contains(ind)) {
                terms.insert(lower);
            }
        }
    }

    terms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PersonalInformation, ResumeSkills, WorkExperience};
    use std::collections::BTreeMap;

    fn job_with_requirements() -> JobRequirement {
        let mut technical_requirements = BTreeMap::new();
        technical_requirements.insert(
            "technical".to_string(),
            vec!["Python".to_string(), "SQL".to_string()],
        );
        let mut key_responsibilities = BTreeMap::new();
        key_responsibilities.insert(
            "analysis".to_string(),
            vec!["Build dashboards with Tableau for the sales team".to_string()],
        );
        JobRequirement {
            required_qualifications: BTreeMap::new(),
            key_responsibilities,
            technical_requirements,
            soft_skills: BTreeMap::new(),
            preferences: None,
        }
    }

    fn experience(company: &str, bullets: usize) -> WorkExperience {
        WorkExperience {
            company: company.to_string(),
            position: "Analyst".to_string(),
            employment_period: "2020 - 2022".to_string(),
            location: "Geneva".to_string(),
            industry: String::new(),
            responsibilities: (0..bullets).map(|i| format!("Task {}", i)).collect(),
            skills_acquired: vec![],
        }
    }

    fn resume() -> ValidatedResume {
        ValidatedResume {
            name: "Jane Doe".to_string(),
            summary: "I analyze data.".to_string(),
            work_experience: vec![],
            skills: ResumeSkills {
                technical: vec![
                    "Excel".to_string(),
                    "Tableau".to_string(),
                    "Python".to_string(),
                ],
                soft: vec![],
                other: vec![],
            },
            certifications: vec![],
            education: None,
            personal_information: None,
        }
    }

    #[test]
    fn test_skills_reordered_by_relevance() {
        let doc = render(&resume(), &job_with_requirements());
        // Python: exact requirement. Tableau: key term from responsibilities.
        // Excel: no match, drops to last.
        assert!(doc.contains("**Technical:** Python, Tableau, Excel"));
    }

    #[test]
    fn test_technical_skills_capped_at_eight() {
        let mut r = resume();
        r.skills.technical = (0..12).map(|i| format!("Skill{}", i)).collect();
        let doc = render(&r, &job_with_requirements());
        assert!(doc.contains("Skill7"));
        assert!(!doc.contains("Skill8"));
    }

    #[test]
    fn test_bullet_counts_taper_by_position() {
        let mut r = resume();
        r.work_experience = (0..5).map(|_| experience("Acme", 6)).collect();
        let doc = render(&r, &job_with_requirements());
        let bullets = doc.matches("- Task").count();
        assert_eq!(bullets, 5 + 4 + 3 + 2 + 1);
    }

    #[test]
    fn test_contact_line_with_prefix_and_links() {
        let mut r = resume();
        let mut contact = BTreeMap::new();
        contact.insert("email".to_string(), "jane@example.com".to_string());
        contact.insert("phone".to_string(), "791234567".to_string());
        contact.insert("phone_prefix".to_string(), "+41".to_string());
        let mut online_presence = BTreeMap::new();
        online_presence.insert(
            "linkedin".to_string(),
            "https://linkedin.com/in/janedoe".to_string(),
        );
        r.personal_information = Some(PersonalInformation {
            name: "Jane".to_string(),
            surname: "Doe".to_string(),
            contact,
            online_presence,
        });
        let doc = render(&r, &job_with_requirements());
        assert!(doc.contains(
            "jane@example.com | +41791234567 | https://linkedin.com/in/janedoe"
        ));
    }

    #[test]
    fn test_key_terms_skip_stop_words_and_numbers() {
        let terms = extract_key_terms(&job_with_requirements());
        assert!(terms.contains("tableau"));
        assert!(terms.contains("dashboards"));
        assert!(!terms.contains("the"));
        assert!(!terms.contains("for"));
    }
}
