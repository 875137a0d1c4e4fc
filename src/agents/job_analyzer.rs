// src/agents/job_analyzer.rs
//! Turns a raw job posting into a structured [`JobRequirement`] with a
//! single completion call. Any call or parse failure is fatal for the run.

use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::core::completion::{request, ChatMessage, Completion};
use crate::types::{JobPosting, JobRequirement};

pub struct JobAnalyzer {
    backend: Arc<dyn Completion>,
    model: String,
}

impl JobAnalyzer {
    pub fn new(backend: Arc<dyn Completion>, model: String) -> Self {
        Self { backend, model }
    }

    pub async fn analyze(&self, posting: &JobPosting) -> Result<JobRequirement> {
        info!("Starting job analysis...");
        let details = &posting.job_listing.details;
        info!(
            "Analyzing job: {} at {}",
            details.title, posting.job_listing.company
        );

        let messages = [
            ChatMessage::system(
                "Extract ONLY explicit requirements from job postings. \
                 Format the response as a JSON object with these keys:\n\
                 - required_qualifications (dict of str to list[str])\n\
                 - key_responsibilities (dict of str to list[str])\n\
                 - technical_requirements: {\n\
                     'technical': list[str],\n\
                     'management': list[str],\n\
                     'tools': list[str]\n\
                   }\n\
                 - soft_skills: {\n\
                     'interpersonal': list[str],\n\
                     'organizational': list[str],\n\
                     'leadership': list[str]\n\
                   }\n\
                 - preferences (optional, dict of str to list[str])",
            ),
            ChatMessage::user(format!(
                "Analyze this job posting:\nTitle: {}\nDescription: {}",
                details.title, details.description
            )),
        ];

        let result: JobRequirement = request(self.backend.as_ref(), &self.model, &messages)
            .await
            .map_err(|e| {
                error!("Job analysis failed: {}", e);
                e
            })?;

        info!("Job analysis completed successfully");
        debug!(
            "Identified {} qualification categories, {} responsibility categories, {} technical categories",
            result.required_qualifications.len(),
            result.key_responsibilities.len(),
            result.technical_requirements.len()
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::completion::script::ScriptedCompletion;

    fn posting() -> JobPosting {
        serde_yaml::from_str(
            r#"
job_listing:
  company: Initech
  details:
    title: Senior Data Analyst
    description: Requires 4 years experience, SQL, Python.
"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_analyze_parses_requirements() {
        let backend = Arc::new(ScriptedCompletion::new(vec![Ok(serde_json::json!({
            "required_qualifications": {"Education / Experience": ["4 years of experience"]},
            "key_responsibilities": {"analysis": ["Build dashboards"]},
            "technical_requirements": {"technical": ["SQL", "Python"], "management": [], "tools": []},
            "soft_skills": {"interpersonal": ["Communication"], "organizational": [], "leadership": []}
        }))]));

        let analyzer = JobAnalyzer::new(backend, "test-model".to_string());
        let requirements = analyzer.analyze(&posting()).await.unwrap();
        assert_eq!(requirements.technical(), &["SQL".to_string(), "Python".to_string()]);
        assert!(requirements.preferences.is_none());
    }

    #[tokio::test]
    async fn test_analyze_propagates_call_failure() {
        let backend = Arc::new(ScriptedCompletion::new(vec![Err("endpoint down".to_string())]));
        let analyzer = JobAnalyzer::new(backend, "test-model".to_string());
        assert!(analyzer.analyze(&posting()).await.is_err());
    }
}
