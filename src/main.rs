use anyhow::{Context, Result};
use clap::Parser;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use cv_tailor::config::{CompletionConfig, ModelSettings};
use cv_tailor::core::CompletionClient;
use cv_tailor::document;
use cv_tailor::types::{CandidateProfile, JobPosting};
use cv_tailor::workflow::{save_results, WorkflowManager};
use cv_tailor::RunConfig;

#[derive(Parser)]
#[command(name = "cvtailor", about = "Tailor a resume and cover letter to a job posting")]
struct Args {
    /// Directory holding about_job.yaml, about_me.yaml and optional models.toml
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Directory for generated documents; cleared on every run
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,
}

fn init_logging() {
    std::fs::create_dir_all("logs").expect("Failed to create logs directory");
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true) // Clear file on startup
        .open("logs/resume_generation.log")
        .expect("Failed to open log file");

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(false)
                .with_span_list(false)
                .with_filter(
                    EnvFilter::new("info"),
                ),
        )
        .with(
            // Console stays quiet unless RUST_LOG raises it
            fmt::layer().with_writer(std::io::stderr).with_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            ),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let run = RunConfig::new()
        .with_data_dir(args.data_dir)
        .with_output_dir(args.output_dir);
    run.check_inputs()?;
    run.setup_output_dir()?;

    let posting = JobPosting::load(&run.job_posting_path())?;
    let profile = CandidateProfile::load(&run.profile_path())?;

    let settings = ModelSettings::load_or_default(&run.data_dir)?;
    let backend = CompletionClient::new(CompletionConfig::from_env()?, &settings)
        .context("Failed to initialize completion client")?;

    let manager = WorkflowManager::new(Arc::new(backend), &settings);
    let output = manager.run(&posting, &profile).await?;

    let company = &posting.job_listing.company;
    let resume_path = document::resume::write(
        &output.resume,
        &output.job_requirements,
        &run.output_dir,
    )?;
    let letter_path = document::letter::write(&output.cover_letter, company, &run.output_dir)?;
    let results_path = save_results(&output, &run.output_dir)?;

    println!(
        "✓ Tailored application for {} at {}",
        posting.job_listing.details.title, company
    );
    println!("  📄 Resume: {}", resume_path.display());
    println!("  ✉️  Cover letter: {}", letter_path.display());
    println!("  📊 Analysis: {}", results_path.display());
    println!();
    println!("ATS score: {:.1}", output.keyword_match.ats_score);
    println!(
        "Keywords: {} matched, {} missing",
        output.keyword_match.matched_keywords.len(),
        output.keyword_match.missing_keywords.len()
    );
    for suggestion in &output.keyword_match.optimization_suggestions {
        println!("  → {}", suggestion);
    }
    println!(
        "Cover letter uses {} target keywords",
        output.cover_letter.keywords_used.len()
    );
    if let Some(validation) = &output.validation {
        println!(
            "Validation: {} (score {:.2})",
            if validation.is_valid { "passed" } else { "flagged" },
            validation.validation_score
        );
    }

    Ok(())
}
