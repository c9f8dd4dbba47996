//! Progress indicators for the longship CLI.

use colored::Colorize;
use declarative::{ApplyResult, ProgressCallback};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a spinner with a message
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Status symbol for a finished change
pub fn result_symbol(result: &ApplyResult) -> String {
    match result {
        ApplyResult::NoChange => "○".dimmed().to_string(),
        ApplyResult::Created | ApplyResult::Modified | ApplyResult::Removed => {
            "✓".green().to_string()
        }
        ApplyResult::Vanished => "⚠".yellow().to_string(),
        ApplyResult::Failed { .. } => "✗".red().to_string(),
        ApplyResult::Skipped { .. } => "⊘".dimmed().to_string(),
    }
}

fn result_text(result: &ApplyResult) -> String {
    match result {
        ApplyResult::NoChange => "unchanged".to_string(),
        ApplyResult::Created => "created".to_string(),
        ApplyResult::Modified => "updated".to_string(),
        ApplyResult::Removed => "deleted".to_string(),
        ApplyResult::Vanished => "removed outside longship".to_string(),
        ApplyResult::Failed { error } => format!("failed: {error}"),
        ApplyResult::Skipped { reason } => format!("skipped: {reason}"),
    }
}

/// Spinner-per-change progress reporter
pub struct SpinnerProgress {
    quiet: bool,
    current: Option<ProgressBar>,
}

impl SpinnerProgress {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            current: None,
        }
    }
}

impl ProgressCallback for SpinnerProgress {
    fn on_batch_start(&mut self, count: usize) {
        if !self.quiet {
            println!();
            println!("  {} Processing {} webhook(s)...", "→".cyan(), count);
        }
    }

    fn on_resource_start(&mut self, _address: &str, description: &str) {
        if !self.quiet {
            self.current = Some(spinner(description));
        }
    }

    fn on_resource_complete(&mut self, address: &str, result: &ApplyResult) {
        if let Some(pb) = self.current.take() {
            pb.finish_and_clear();
        }
        if self.quiet && !matches!(result, ApplyResult::Failed { .. }) {
            return;
        }
        println!(
            "    {} webhook.{} {}",
            result_symbol(result),
            address,
            result_text(result).dimmed()
        );
    }

    fn on_batch_complete(&mut self) {
        if let Some(pb) = self.current.take() {
            pb.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_text() {
        assert_eq!(result_text(&ApplyResult::Created), "created");
        assert_eq!(
            result_text(&ApplyResult::Failed {
                error: "boom".to_string()
            }),
            "failed: boom"
        );
    }

    #[test]
    fn test_quiet_progress_has_no_spinner() {
        let mut progress = SpinnerProgress::new(true);
        progress.on_batch_start(1);
        progress.on_resource_start("sessions", "create webhook.sessions");
        assert!(progress.current.is_none());
        progress.on_resource_complete("sessions", &ApplyResult::NoChange);
        progress.on_batch_complete();
    }
}
