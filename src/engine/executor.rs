//! Execution helpers - confirmation prompt and summary output

use anyhow::Result;
use colored::Colorize;
use declarative::{ConfirmCallback, ExecuteSummary};

/// Confirm with the user through `dialoguer`, unless `--yes` was given
pub struct DialoguerConfirm {
    yes: bool,
}

impl DialoguerConfirm {
    pub fn new(yes: bool) -> Self {
        Self { yes }
    }
}

impl ConfirmCallback for DialoguerConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        if self.yes {
            return Ok(true);
        }

        use dialoguer::Confirm;

        println!();
        let confirmed = Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?;

        if !confirmed {
            println!();
            println!("  {} Aborted", "✗".red());
        }
        Ok(confirmed)
    }
}

/// Print final summary
pub fn print_summary(summary: &ExecuteSummary, verb: &str) {
    println!();
    if summary.is_success() {
        println!("  {} {} complete!", "✓".green().bold(), verb);
    } else {
        println!("  {} {} finished with errors", "⚠".yellow().bold(), verb);
    }

    for line in summary_lines(summary) {
        println!("    • {line}");
    }
}

fn summary_lines(summary: &ExecuteSummary) -> Vec<String> {
    let mut lines = Vec::new();
    if summary.created > 0 {
        lines.push(format!("{} webhook(s) created", summary.created));
    }
    if summary.modified > 0 {
        lines.push(format!("{} webhook(s) updated", summary.modified));
    }
    if summary.removed > 0 {
        lines.push(format!("{} webhook(s) deleted", summary.removed));
    }
    if summary.vanished > 0 {
        lines.push(format!(
            "{} webhook(s) removed outside longship",
            summary.vanished
        ));
    }
    if summary.no_change > 0 {
        lines.push(format!("{} webhook(s) unchanged", summary.no_change));
    }
    if summary.skipped > 0 {
        lines.push(format!("{} webhook(s) skipped", summary.skipped));
    }
    if summary.failed > 0 {
        lines.push(format!("{} webhook(s) {}", summary.failed, "failed".red()));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yes_skips_prompt() {
        let mut confirm = DialoguerConfirm::new(true);
        assert!(confirm.confirm("Apply changes?").unwrap());
    }

    #[test]
    fn test_summary_lines() {
        colored::control::set_override(false);
        let summary = ExecuteSummary {
            created: 1,
            vanished: 2,
            failed: 1,
            ..Default::default()
        };
        let lines = summary_lines(&summary);
        assert_eq!(
            lines,
            vec![
                "1 webhook(s) created".to_string(),
                "2 webhook(s) removed outside longship".to_string(),
                "1 webhook(s) failed".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_summary_has_no_lines() {
        assert!(summary_lines(&ExecuteSummary::default()).is_empty());
    }
}
