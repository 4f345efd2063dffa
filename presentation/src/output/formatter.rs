//! Output formatter trait

use review_application::ReviewReport;
use review_domain::OutputFormat;

/// Trait for formatting review reports
pub trait OutputFormatter {
    /// Verdict, agent table and every finding
    fn format(&self, report: &ReviewReport) -> String;

    /// Verdict and agent table only
    fn format_summary(&self, report: &ReviewReport) -> String;

    /// The markdown summary body as it is posted
    fn format_markdown(&self, report: &ReviewReport) -> String;

    /// Results document as JSON
    fn format_json(&self, report: &ReviewReport) -> String;

    /// Format in the requested output format
    fn render(&self, report: &ReviewReport, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => self.format(report),
            OutputFormat::Summary => self.format_summary(report),
            OutputFormat::Markdown => self.format_markdown(report),
            OutputFormat::Json => self.format_json(report),
        }
    }
}
