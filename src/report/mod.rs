//! Presentation of a [`RunReport`](crate::models::RunReport) as an email.

pub mod html;

use chrono::{DateTime, Utc};

use crate::models::RunReport;
use crate::services::notifier::ReportEmail;

/// Subject line, e.g. `Gatsiva Monitoring Report - Sat, 17 Oct 2026 09:30:00`
pub fn subject_line(at: DateTime<Utc>) -> String {
    format!("Gatsiva Monitoring Report - {}", at.format("%a, %d %b %Y %H:%M:%S"))
}

/// Render the report into a ready-to-send email
pub fn render_email(report: &RunReport) -> Result<ReportEmail, std::fmt::Error> {
    Ok(ReportEmail {
        subject: subject_line(report.generated_at()),
        html_body: html::render(report)?,
    })
}
