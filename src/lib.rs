use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

pub mod agents;
pub mod config;
pub mod core;
pub mod dates;
pub mod document;
pub mod types;
pub mod workflow;

/// Filesystem layout for one tailoring run.
pub struct RunConfig {
    pub output_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl RunConfig {
    pub fn new() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            data_dir: PathBuf::from("data"),
        }
    }

    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = dir;
        self
    }

    pub fn with_data_dir(mut self, dir: PathBuf) -> Self {
        self.data_dir = dir;
        self
    }

    /// Job posting file path.
    pub fn job_posting_path(&self) -> PathBuf {
        self.data_dir.join("about_job.yaml")
    }

    /// Candidate profile file path.
    pub fn profile_path(&self) -> PathBuf {
        self.data_dir.join("about_me.yaml")
    }

    /// Validate that both input files exist.
    pub fn check_inputs(&self) -> Result<()> {
        let job_path = self.job_posting_path();
        if !job_path.exists() {
            anyhow::bail!(
                "Job posting not found: {}. Create it with the posting to analyze.",
                job_path.display()
            );
        }
        let profile_path = self.profile_path();
        if !profile_path.exists() {
            anyhow::bail!("Candidate profile not found: {}", profile_path.display());
        }
        Ok(())
    }

    /// Clear and recreate the output directory. Every run starts from an
    /// empty directory.
    pub fn setup_output_dir(&self) -> Result<()> {
        if self.output_dir.exists() {
            fs::remove_dir_all(&self.output_dir)
                .context("Failed to clear output directory")?;
        }
        fs::create_dir_all(&self.output_dir).context("Failed to create output directory")
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new()
    }
}
