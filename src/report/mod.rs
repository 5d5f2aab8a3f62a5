//! Report output
//!
//! Writes the findings to a CSV file and prints the end-of-run summary.
//! Rows deliberately have variable column counts: a plain broken image
//! is two columns, a redirect anomaly three, and page-level entries two
//! with a bracketed detail string in the second.

use crate::state::{CrawlState, Finding};
use crate::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default report filename carrying the generation timestamp,
/// `broken_images_<YYYY-MM-DD_HHMMSS>.csv`
pub fn default_report_path() -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y-%m-%d_%H%M%S");
    PathBuf::from(format!("broken_images_{timestamp}.csv"))
}

/// Writes all findings to a CSV file at `path`
///
/// The header row is `Page URL, Broken Image URL, Details`; findings
/// follow in discovery order.
pub fn write_csv(findings: &[Finding], path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_path(path)?;
    writer.write_record(["Page URL", "Broken Image URL", "Details"])?;

    for finding in findings {
        match finding {
            Finding::BrokenImage { page, image } => {
                writer.write_record([page.as_str(), image.as_str()])?;
            }
            Finding::ImageRedirect {
                page,
                image,
                location,
            } => {
                let detail = format!("[IMAGE REDIRECT] {location}");
                writer.write_record([page.as_str(), image.as_str(), detail.as_str()])?;
            }
            Finding::PageRedirect { page, location } => {
                let detail = format!("[REDIRECT] {location}");
                writer.write_record([page.as_str(), detail.as_str()])?;
            }
            Finding::SkippedPage { page, reason } => {
                let detail = format!("[SKIPPED] {reason}");
                writer.write_record([page.as_str(), detail.as_str()])?;
            }
        }
    }

    writer.flush()?;
    Ok(())
}

/// End-of-run totals shown on the console
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub pages_visited: usize,
    pub images_checked: usize,
    pub broken_findings: usize,
    pub total_image_bytes: u64,
    pub elapsed: Duration,
}

impl CrawlSummary {
    /// Builds the summary from the final crawl state
    ///
    /// Image sizes come from the Content-Length values cached during
    /// verification; nothing is re-fetched here.
    pub fn from_state(state: &CrawlState, elapsed: Duration) -> Self {
        Self {
            pages_visited: state.pages_visited(),
            images_checked: state.images_checked(),
            broken_findings: state.report.len(),
            total_image_bytes: state.total_image_bytes(),
            elapsed,
        }
    }
}

/// Prints the summary in the console progress format
pub fn print_summary(summary: &CrawlSummary) {
    println!("\n[Done] Scan complete.");
    println!("[Pages visited] {}", summary.pages_visited);
    println!("[Images checked] {}", summary.images_checked);
    println!("[Findings] {}", summary.broken_findings);
    println!("[Total image size] {} bytes", summary.total_image_bytes);
    println!("[Time elapsed] {:.2} seconds", summary.elapsed.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ImageRecord;

    fn sample_findings() -> Vec<Finding> {
        vec![
            Finding::BrokenImage {
                page: "https://x.test/".to_string(),
                image: "https://x.test/a.png".to_string(),
            },
            Finding::ImageRedirect {
                page: "https://x.test/".to_string(),
                image: "https://x.test/b.png".to_string(),
                location: "https://cdn.x.test/b.png".to_string(),
            },
            Finding::PageRedirect {
                page: "https://x.test/old".to_string(),
                location: "https://x.test/new".to_string(),
            },
            Finding::SkippedPage {
                page: "https://x.test/file.pdf".to_string(),
                reason: "non-page extension".to_string(),
            },
        ]
    }

    #[test]
    fn test_default_report_path_shape() {
        let path = default_report_path();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("broken_images_"));
        assert!(name.ends_with(".csv"));
    }

    #[test]
    fn test_csv_rows_and_variable_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");

        write_csv(&sample_findings(), &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 5);

        assert_eq!(lines[0], "Page URL,Broken Image URL,Details");
        assert_eq!(lines[1], "https://x.test/,https://x.test/a.png");
        assert_eq!(
            lines[2],
            "https://x.test/,https://x.test/b.png,[IMAGE REDIRECT] https://cdn.x.test/b.png"
        );
        assert_eq!(lines[3], "https://x.test/old,[REDIRECT] https://x.test/new");
        assert_eq!(
            lines[4],
            "https://x.test/file.pdf,[SKIPPED] non-page extension"
        );
    }

    #[test]
    fn test_csv_with_no_findings_still_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        write_csv(&[], &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.trim(), "Page URL,Broken Image URL,Details");
    }

    #[test]
    fn test_summary_from_state() {
        let mut state = CrawlState::new();
        state.mark_visited("https://x.test/");
        state.mark_visited("https://x.test/about");

        let mut record = ImageRecord::new("https://x.test/");
        record.content_length = Some(2048);
        state.images.insert("https://x.test/a.png".to_string(), record);

        state.report.push(Finding::BrokenImage {
            page: "https://x.test/".to_string(),
            image: "https://x.test/a.png".to_string(),
        });

        let summary = CrawlSummary::from_state(&state, Duration::from_secs(3));
        assert_eq!(summary.pages_visited, 2);
        assert_eq!(summary.images_checked, 1);
        assert_eq!(summary.broken_findings, 1);
        assert_eq!(summary.total_image_bytes, 2048);
        assert_eq!(summary.elapsed, Duration::from_secs(3));
    }
}
