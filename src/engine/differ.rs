//! Diff display - longship-specific UI

use colored::Colorize;
use declarative::{Action, AttributeChange, DiffSummary, ResourceDiff, Value, group_by_type};

/// Display a list of diffs in a user-friendly format
pub fn display_diff(diffs: &[ResourceDiff]) {
    let changed: Vec<ResourceDiff> = diffs.iter().filter(|d| d.has_changes()).cloned().collect();
    if changed.is_empty() {
        println!();
        println!("  {} No changes needed", "✓".green());
        return;
    }

    println!();
    println!(
        "┌─ {} ─────────────────────────────────────────┐",
        "Execution Plan".bold()
    );
    println!("│");

    let by_type = group_by_type(&changed);
    let mut types: Vec<_> = by_type.keys().collect();
    types.sort();

    for resource_type in types {
        let type_name = match resource_type.as_str() {
            "webhook" => "Webhooks",
            other => other,
        };
        println!("│ {}", type_name.bold());

        for diff in &by_type[resource_type] {
            println!(
                "│   {} {}.{} {}",
                action_symbol(diff.action),
                diff.resource_type,
                diff.address,
                action_label(diff.action).dimmed()
            );
            for change in &diff.changes {
                println!("│       {}", format_change(diff.action, change));
            }
        }
        println!("│");
    }

    let summary = DiffSummary::from_diffs(&changed);
    println!("├─────────────────────────────────────────────────────┤");
    println!(
        "│ Plan: {} to create, {} to update, {} to delete",
        summary.additions.to_string().green(),
        summary.modifications.to_string().yellow(),
        summary.removals.to_string().red()
    );
    println!("└─────────────────────────────────────────────────────┘");
}

fn action_symbol(action: Action) -> String {
    match action {
        Action::Create => action.symbol().green().to_string(),
        Action::Update => action.symbol().yellow().to_string(),
        Action::Delete => action.symbol().red().to_string(),
        Action::NoOp => action.symbol().dimmed().to_string(),
    }
}

fn action_label(action: Action) -> &'static str {
    match action {
        Action::Create => "(will be created)",
        Action::Update => "(will be updated in place)",
        Action::Delete => "(will be deleted)",
        Action::NoOp => "",
    }
}

fn render(value: &Value<String>) -> String {
    value.to_string()
}

/// One attribute line, e.g. `name: "a" → "b"`
fn format_change(action: Action, change: &AttributeChange) -> String {
    match action {
        Action::Create => format!("{:<12} = {}", change.name, render(&change.after)),
        Action::Delete => format!("{:<12} = {}", change.name, render(&change.before)).dimmed().to_string(),
        _ => format!(
            "{:<12} = {} → {}",
            change.name,
            render(&change.before).dimmed(),
            render(&change.after)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(before: Value<String>, after: Value<String>) -> AttributeChange {
        AttributeChange {
            name: "name".to_string(),
            before,
            after,
        }
    }

    #[test]
    fn test_format_create_shows_unknown() {
        colored::control::set_override(false);
        let line = format_change(Action::Create, &change(Value::Null, Value::Unknown));
        assert_eq!(line, format!("{:<12} = {}", "name", declarative::UNKNOWN_DISPLAY));
    }

    #[test]
    fn test_format_update_shows_both_sides() {
        colored::control::set_override(false);
        let line = format_change(
            Action::Update,
            &change(
                Value::Known("\"a\"".to_string()),
                Value::Known("\"b\"".to_string()),
            ),
        );
        assert!(line.contains("\"a\" → \"b\""));
    }

    #[test]
    fn test_action_labels() {
        assert_eq!(action_label(Action::NoOp), "");
        assert!(action_label(Action::Delete).contains("deleted"));
    }
}
