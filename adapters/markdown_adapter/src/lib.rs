use fdiff_core::domain::{ComparisonReport, Username};
use fdiff_core::error::Result;
use fdiff_core::ports::ReportWriter;
use fdiff_core::utils::format_timestamp_to_local;
use std::fs;

/// Profile link template used for every username in the report.
const PROFILE_URL_PREFIX: &str = "https://instagram.com/";

/// Markdown report writer adapter implementation
pub struct MarkdownReportWriter {
    output_path: String,
}

impl MarkdownReportWriter {
    pub fn new(output_path: String) -> Self {
        Self { output_path }
    }

    fn format_username_list(&self, output: &mut String, usernames: &[Username]) {
        for username in usernames {
            output.push_str(&format!(
                "- [{}]({}{})\n",
                username, PROFILE_URL_PREFIX, username
            ));
        }
        output.push('\n');
    }

    /// Formats the full comparison into one markdown document
    fn format_report(&self, report: &ComparisonReport) -> String {
        let mut output = String::new();
        output.push_str("# Follower comparison\n\n");
        output.push_str(&format!("- Followers: {}\n", report.follower_count));
        output.push_str(&format!("- Following: {}\n", report.following_count));
        output.push_str(&format!(
            "- Not following back: {}\n\n",
            report.not_following_back.len()
        ));

        output.push_str("## Not following you back\n\n");
        if report.not_following_back.is_empty() {
            output.push_str("Everyone you follow follows you back!\n\n");
        } else {
            self.format_username_list(&mut output, &report.not_following_back);
        }

        output.push_str("## Unfollowers\n\n");
        if !report.unfollowers.has_previous {
            output.push_str(
                "No saved snapshot to compare against; save one to track unfollowers.\n",
            );
        } else {
            let date = report.unfollowers.snapshot_date.as_deref().unwrap_or("");
            output.push_str(&format!(
                "Compared against the snapshot from {}.\n\n",
                format_timestamp_to_local(date)
            ));
            if report.unfollowers.unfollowers.is_empty() {
                output.push_str("Nobody has unfollowed you since then.\n");
            } else {
                self.format_username_list(&mut output, &report.unfollowers.unfollowers);
            }
        }

        output
    }
}

impl ReportWriter for MarkdownReportWriter {
    fn write(&self, report: &ComparisonReport) -> Result<()> {
        fs::write(&self.output_path, self.format_report(report))?;
        Ok(())
    }
}
