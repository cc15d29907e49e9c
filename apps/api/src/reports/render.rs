//! Report renderer: assessment → styled HTML → PDF bytes.
//!
//! HTML generation is pure and fully testable. Rasterisation sits behind the
//! `ReportRenderer` trait; the default backend prints through headless Chrome.

use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions};
use tracing::{debug, info};

use crate::assessment::schema::Assessment;
use crate::errors::AppError;

/// 20 mm expressed in inches, the unit Chrome's print API expects.
const MARGIN_INCHES: f64 = 0.787;
const A4_WIDTH_INCHES: f64 = 8.27;
const A4_HEIGHT_INCHES: f64 = 11.69;

/// Turns a finished HTML document into PDF bytes.
#[async_trait]
pub trait ReportRenderer: Send + Sync {
    async fn render_pdf(&self, html: &str) -> Result<Vec<u8>, AppError>;
}

/// Prints through a short-lived headless Chrome instance, one per report.
pub struct ChromeReportRenderer;

#[async_trait]
impl ReportRenderer for ChromeReportRenderer {
    async fn render_pdf(&self, html: &str) -> Result<Vec<u8>, AppError> {
        let html = html.to_string();
        let pdf = tokio::task::spawn_blocking(move || print_with_chrome(&html))
            .await
            .map_err(|e| AppError::Render(format!("render task aborted: {e}")))?
            .map_err(|e| AppError::Render(format!("{e:#}")))?;

        info!("Rendered report PDF ({} bytes)", pdf.len());
        Ok(pdf)
    }
}

fn print_with_chrome(html: &str) -> anyhow::Result<Vec<u8>> {
    let mut page = tempfile::Builder::new()
        .prefix("report-")
        .suffix(".html")
        .tempfile()?;
    page.write_all(html.as_bytes())?;
    page.flush()?;

    let options = LaunchOptions {
        headless: true,
        sandbox: false,
        idle_browser_timeout: Duration::from_secs(60),
        ..Default::default()
    };
    let browser = Browser::new(options)?;
    let tab = browser.new_tab()?;

    let url = format!("file://{}", page.path().display());
    debug!("Loading report HTML from {url}");
    tab.navigate_to(&url)?.wait_until_navigated()?;

    let pdf = tab.print_to_pdf(Some(PrintToPdfOptions {
        print_background: Some(true),
        paper_width: Some(A4_WIDTH_INCHES),
        paper_height: Some(A4_HEIGHT_INCHES),
        margin_top: Some(MARGIN_INCHES),
        margin_bottom: Some(MARGIN_INCHES),
        margin_left: Some(MARGIN_INCHES),
        margin_right: Some(MARGIN_INCHES),
        ..Default::default()
    }))?;

    Ok(pdf)
}

const REPORT_CSS: &str = r#"
body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; line-height: 1.6; color: #333; max-width: 800px; margin: 0 auto; padding: 20px; background: #fff; }
.header { text-align: center; border-bottom: 3px solid #2c3e50; padding-bottom: 20px; margin-bottom: 30px; }
.header h1 { color: #2c3e50; margin: 0; font-size: 28px; }
.header p { color: #7f8c8d; margin: 5px 0; }
.score-display { background: linear-gradient(135deg, #3498db, #2980b9); color: white; padding: 20px; border-radius: 10px; text-align: center; margin: 20px 0; font-size: 24px; font-weight: bold; }
.section { margin-bottom: 25px; page-break-inside: avoid; }
.section h2 { color: #34495e; border-left: 4px solid #3498db; padding-left: 15px; margin-bottom: 15px; font-size: 20px; }
.skills-grid { display: grid; grid-template-columns: 1fr 1fr 1fr; gap: 20px; margin: 20px 0; }
.skill-category { background: #f8f9fa; padding: 15px; border-radius: 8px; border-left: 4px solid #3498db; }
.skill-category h3 { margin: 0 0 10px 0; color: #2c3e50; font-size: 16px; }
.skill-list { list-style: none; padding: 0; margin: 0; }
.skill-list li { background: white; margin: 5px 0; padding: 8px 12px; border-radius: 4px; border-left: 3px solid #27ae60; }
.partial-skills li { border-left-color: #f39c12; }
.missing-skills li { border-left-color: #e74c3c; }
.recommendation { background: #e8f5e8; border: 1px solid #27ae60; padding: 15px; border-radius: 5px; margin: 15px 0; }
.strengths-weaknesses { display: grid; grid-template-columns: 1fr 1fr; gap: 20px; margin: 20px 0; }
.strengths { background: #d4edda; padding: 15px; border-radius: 8px; border-left: 4px solid #28a745; }
.weaknesses { background: #f8d7da; padding: 15px; border-radius: 8px; border-left: 4px solid #dc3545; }
.footer { margin-top: 40px; padding-top: 20px; border-top: 1px solid #bdc3c7; text-align: center; color: #7f8c8d; font-size: 12px; }
"#;

/// Builds the full HTML report. Every interpolated value is escaped.
pub fn render_report_html(
    assessment: &Assessment,
    candidate_name: &str,
    job_title: &str,
    generated_at: NaiveDateTime,
) -> String {
    let mut html = String::with_capacity(8 * 1024);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n");
    html.push_str("<title>CV Assessment Report</title>\n<style>");
    html.push_str(REPORT_CSS);
    html.push_str("</style>\n</head>\n<body>\n");

    html.push_str(&format!(
        "<div class=\"header\">\n<h1>CV Assessment Report</h1>\n\
         <p><strong>Candidate:</strong> {}</p>\n\
         <p><strong>Position:</strong> {}</p>\n\
         <p><strong>Date:</strong> {}</p>\n</div>\n",
        escape_html(candidate_name),
        escape_html(job_title),
        generated_at.format("%d.%m.%Y %H:%M"),
    ));

    html.push_str(&format!(
        "<div class=\"score-display\">Overall Fit Score: {}/100</div>\n",
        format_score(assessment.overall_score)
    ));

    html.push_str("<div class=\"section\">\n<h2>Skill Analysis</h2>\n<div class=\"skills-grid\">\n");
    for (title, class, skills) in [
        ("Matched Skills", "matched-skills", &assessment.matched_skills),
        ("Partial Skills", "partial-skills", &assessment.partial_skills),
        ("Missing Skills", "missing-skills", &assessment.missing_skills),
    ] {
        html.push_str(&format!(
            "<div class=\"skill-category\">\n<h3>{title} ({})</h3>\n<ul class=\"skill-list {class}\">{}</ul>\n</div>\n",
            skills.len(),
            list_items(skills)
        ));
    }
    html.push_str("</div>\n</div>\n");

    html.push_str(&format!(
        "<div class=\"section\">\n<h2>Overall Evaluation</h2>\n<div class=\"strengths-weaknesses\">\n\
         <div class=\"strengths\">\n<h3>Strengths</h3>\n<ul>{}</ul>\n</div>\n\
         <div class=\"weaknesses\">\n<h3>Areas for Improvement</h3>\n<ul>{}</ul>\n</div>\n\
         </div>\n</div>\n",
        list_items(&assessment.strengths),
        list_items(&assessment.weaknesses),
    ));

    html.push_str(&format!(
        "<div class=\"section\">\n<h2>Experience Level</h2>\n\
         <p><strong>Assessed Level:</strong> {}</p>\n\
         <p><strong>Education Match:</strong> {}</p>\n\
         <p><strong>Languages:</strong> {}</p>\n</div>\n",
        assessment.experience_level.as_str(),
        if assessment.education_match {
            "Suitable"
        } else {
            "Not Suitable"
        },
        escape_html(&assessment.language_skills.join(", ")),
    ));

    html.push_str(&format!(
        "<div class=\"section\">\n<h2>ATS Feedback</h2>\n<ul>{}</ul>\n</div>\n",
        list_items(&assessment.ats_feedback)
    ));

    html.push_str(&format!(
        "<div class=\"recommendation\">\n<h3>Recommendation</h3>\n<p>{}</p>\n</div>\n",
        escape_html(&assessment.recommendation)
    ));

    html.push_str(&format!(
        "<div class=\"section\">\n<h2>Summary</h2>\n<p>{}</p>\n</div>\n",
        escape_html(&assessment.summary)
    ));

    html.push_str(
        "<div class=\"footer\">\n<p>This report was generated automatically by the AI-assisted CV assessment system.</p>\n</div>\n",
    );
    html.push_str("</body>\n</html>\n");
    html
}

/// Human-readable download name: `<candidate>_<job>_assessment.pdf`, ASCII only.
pub fn download_filename(candidate_name: Option<&str>, job_title: Option<&str>) -> String {
    let candidate = candidate_name.unwrap_or("candidate");
    let job = job_title.unwrap_or("report");
    format!("{candidate}_{job}_assessment.pdf")
}

fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.0}")
    } else {
        format!("{score:.1}")
    }
}

fn list_items(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("<li>{}</li>", escape_html(item)))
        .collect()
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
