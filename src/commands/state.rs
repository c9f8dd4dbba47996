//! `longship state` - inspect and edit the state file

use anyhow::{Result, bail};
use colored::Colorize;
use declarative::Attributes;

use crate::Context;
use crate::cli::StateCommand;
use crate::resource::webhook::{RESOURCE_TYPE, schema};
use crate::state::{LongshipState, StateFile};
use crate::ui;

pub fn run(ctx: &Context, cmd: StateCommand) -> Result<()> {
    let mut state_file = ctx.open_state()?;
    match cmd {
        StateCommand::List => {
            list(&state_file.state);
            Ok(())
        }
        StateCommand::Show { address } => show(&state_file.state, &address),
        StateCommand::Rm { address } => rm(&mut state_file, &address),
    }
}

fn list(state: &LongshipState) {
    if state.webhooks.is_empty() {
        ui::info("No webhooks in state");
        return;
    }

    let rows: Vec<Vec<String>> = state
        .webhooks
        .iter()
        .map(|(address, webhook)| {
            vec![
                format!("{RESOURCE_TYPE}.{address}"),
                webhook.id.clone(),
                ui::truncate(&webhook.name, 30),
                webhook.enabled.to_string(),
            ]
        })
        .collect();
    ui::table(&["ADDRESS", "ID", "NAME", "ENABLED"], &rows);
    println!();
    ui::dim(&format!(
        "serial {}, last updated {}",
        state.serial,
        state.last_updated.format("%Y-%m-%d %H:%M:%S UTC")
    ));
}

/// Lines of `state show`, one per attribute
fn show_lines(state: &LongshipState, address: &str) -> Result<Vec<(String, String)>> {
    let Some(webhook) = state.webhooks.get(address) else {
        bail!("{RESOURCE_TYPE}.{address} is not in state");
    };

    Ok(webhook
        .attributes()
        .into_iter()
        .map(|(name, value)| {
            let description = schema::attribute(name).map_or("", |a| a.description);
            (
                format!("{name:<12} {}", format!("# {description}").dimmed()),
                value.to_string(),
            )
        })
        .collect())
}

fn show(state: &LongshipState, address: &str) -> Result<()> {
    let lines = show_lines(state, address)?;
    ui::header(&format!("{RESOURCE_TYPE}.{address}"));
    for (key, value) in lines {
        ui::kv(&key, &value);
    }
    Ok(())
}

fn rm(state_file: &mut StateFile, address: &str) -> Result<()> {
    match state_file.forget(address)? {
        Some(webhook) => {
            ui::success(&format!(
                "Removed {RESOURCE_TYPE}.{address} from state"
            ));
            ui::dim(&format!(
                "Webhook {} still exists remotely; import it again to manage it",
                webhook.id
            ));
            Ok(())
        }
        None => bail!("{RESOURCE_TYPE}.{address} is not in state"),
    }
}
