//! `longship data` - read-only listings from the API

use anyhow::{Context as AnyhowContext, Result};
use longship_api::{Chargepoint, HttpBackend, OrganizationalUnit, Webhook, WebhookApi};
use serde::Serialize;

use crate::Context;
use crate::cli::DataCommand;
use crate::progress;
use crate::ui;

pub fn run(ctx: &Context, cmd: DataCommand) -> Result<()> {
    let config = ctx.load_config_or_default()?;
    let credentials = config
        .credentials()
        .context("Failed to resolve provider credentials")?;
    let backend = HttpBackend::new(credentials);

    match cmd {
        DataCommand::Webhooks(args) => {
            let webhooks = fetch("webhooks", || backend.list_webhooks())?;
            render(&webhooks, args.json, webhook_rows)
        }
        DataCommand::Chargepoints(args) => {
            let chargepoints = fetch("charge points", || backend.list_chargepoints())?;
            render(&chargepoints, args.json, chargepoint_rows)
        }
        DataCommand::OrganizationalUnits(args) => {
            let units = fetch("organizational units", || backend.list_organizational_units())?;
            render(&units, args.json, organizational_unit_rows)
        }
    }
}

fn fetch<T>(what: &str, f: impl FnOnce() -> longship_api::Result<Vec<T>>) -> Result<Vec<T>> {
    let pb = progress::spinner(&format!("Fetching {what}..."));
    let result = f();
    pb.finish_and_clear();
    result.with_context(|| format!("Failed to list {what}"))
}

type Table = (&'static [&'static str], Vec<Vec<String>>);

fn render<T: Serialize>(items: &[T], json: bool, rows: fn(&[T]) -> Table) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
        return Ok(());
    }
    if items.is_empty() {
        ui::info("Nothing found");
        return Ok(());
    }
    let (headers, rows) = rows(items);
    ui::table(headers, &rows);
    Ok(())
}

fn webhook_rows(webhooks: &[Webhook]) -> Table {
    let rows = webhooks
        .iter()
        .map(|w| {
            vec![
                w.id.clone(),
                ui::truncate(&w.name, 30),
                w.ou_code.clone(),
                w.enabled.to_string(),
                w.event_types.join(","),
                w.updated.clone(),
            ]
        })
        .collect();
    (&["ID", "NAME", "OU", "ENABLED", "EVENTS", "UPDATED"], rows)
}

fn chargepoint_rows(chargepoints: &[Chargepoint]) -> Table {
    let rows = chargepoints
        .iter()
        .map(|c| {
            let connectors: usize = c.evses.iter().map(|e| e.connectors.len()).sum();
            vec![
                c.chargepoint_id.clone(),
                ui::truncate(&c.display_name, 30),
                c.chargepoint_vendor.clone(),
                c.evses.len().to_string(),
                connectors.to_string(),
            ]
        })
        .collect();
    (&["CHARGEPOINT", "NAME", "VENDOR", "EVSES", "CONNECTORS"], rows)
}

fn organizational_unit_rows(units: &[OrganizationalUnit]) -> Table {
    let rows = units
        .iter()
        .map(|u| {
            vec![
                u.code.clone(),
                ui::truncate(&u.name, 30),
                u.parent_id.clone(),
                u.country.clone(),
                u.financial_details.iban.clone(),
            ]
        })
        .collect();
    (&["CODE", "NAME", "PARENT", "COUNTRY", "IBAN"], rows)
}
