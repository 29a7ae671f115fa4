//! Terminal output for generation results

use std::path::Path;

use aztec::generate::{FileStatus, GeneratedFile};
use aztec::pipeline::RunReport;
use console::{style, Emoji, StyledObject};

static SUCCESS: Emoji = Emoji("✓ ", "+ ");
static FAILURE: Emoji = Emoji("✗ ", "x ");

/// `path` relative to `base` when it lies inside it
#[must_use]
pub fn relative_to(path: &Path, base: &Path) -> String {
    path.strip_prefix(base).unwrap_or(path).display().to_string()
}

fn status_label(status: FileStatus) -> StyledObject<String> {
    let label = format!("{status:>11}");
    match status {
        FileStatus::Created | FileStatus::Overwritten => style(label).green(),
        FileStatus::Updated => style(label).cyan(),
        FileStatus::Skipped => style(label).yellow(),
        FileStatus::Unchanged => style(label).dim(),
    }
}

/// One line per file
pub fn print_files<'a>(files: impl IntoIterator<Item = &'a GeneratedFile>, base: &Path) {
    for file in files {
        println!(
            "  {} {} {}",
            status_label(file.status),
            relative_to(&file.path, base),
            style(format!("({})", file.description)).dim()
        );
    }
}

/// Every layer in run order, failures included
pub fn print_report(report: &RunReport, base: &Path) {
    for outcome in report.outcomes() {
        match &outcome.result {
            Ok(files) => {
                println!("{SUCCESS}{}", style(outcome.layer).green().bold());
                print_files(files, base);
            }
            Err(err) => {
                println!(
                    "{FAILURE}{} {err}",
                    style(format!("Failed to generate {}:", outcome.layer)).red().bold()
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_relative_paths() {
        let base = PathBuf::from("/app/Modules/Blog");
        assert_eq!(
            relative_to(&base.join("app/Services/PostService.php"), &base),
            "app/Services/PostService.php"
        );
        assert_eq!(relative_to(Path::new("/elsewhere/x.php"), &base), "/elsewhere/x.php");
    }
}
