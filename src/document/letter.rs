// src/document/letter.rs
//! Renders a cover letter as Markdown: date, greeting, paragraphs, and a
//! multi-line signature block.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::types::CoverLetter;

/// Write the rendered letter to a Markdown file named after the company.
pub fn write(letter: &CoverLetter, company_name: &str, output_dir: &Path) -> Result<PathBuf> {
    let now = Local::now();
    let timestamp = now.format("%Y%m%d_%H%M%S");
    let path = output_dir.join(format!(
        "cover_letter_{}_{}.md",
        sanitize_company_name(company_name),
        timestamp
    ));
    std::fs::write(&path, render(letter, now.date_naive()))
        .with_context(|| format!("Failed to write cover letter: {}", path.display()))?;
    info!("Cover letter document generated: {}", path.display());
    Ok(path)
}

pub fn render(letter: &CoverLetter, date: NaiveDate) -> String {
    let mut doc = String::new();

    doc.push_str(&format!("{}\n", date.format("%B %d, %Y")));
    doc.push_str(&format!("\n**{}**\n", letter.greeting));
    doc.push_str(&format!("\n{}\n", letter.opening_paragraph));
    for paragraph in &letter.body_paragraphs {
        doc.push_str(&format!("\n{}\n", paragraph));
    }
    doc.push_str(&format!("\n{}\n", letter.closing_paragraph));

    doc.push('\n');
    for line in letter.signature.split('\n') {
        doc.push_str(&format!("{}  \n", line));
    }

    doc
}

/// Keep only characters safe for a filename.
fn sanitize_company_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || "_ -".contains(*c))
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter() -> CoverLetter {
        CoverLetter {
            greeting: "Dear Hiring Manager,".to_string(),
            opening_paragraph: "I am excited to apply.".to_string(),
            body_paragraphs: vec!["Paragraph one.".to_string(), "Paragraph two.".to_string()],
            closing_paragraph: "Thank you for your consideration.".to_string(),
            signature: "Sincerely,\nJane Doe".to_string(),
            keywords_used: vec![],
        }
    }

    #[test]
    fn test_render_layout() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let doc = render(&letter(), date);
        assert!(doc.starts_with("June 15, 2024\n"));
        assert!(doc.contains("**Dear Hiring Manager,**"));
        assert!(doc.contains("\nParagraph one.\n"));
        assert!(doc.contains("Sincerely,  \nJane Doe"));
    }

    #[test]
    fn test_sanitize_company_name() {
        assert_eq!(sanitize_company_name("Acme Corp."), "Acme Corp");
        assert_eq!(sanitize_company_name("A/B & C GmbH"), "AB  C GmbH");
        assert_eq!(sanitize_company_name("  Initech "), "Initech");
    }
}
