//! `parley personas`

use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::output;
use crate::scenario::Scenario;

#[derive(Serialize)]
struct PersonaRow<'a> {
    name: &'a str,
    prompt: &'a str,
    style_examples: bool,
    seed_dialogs: usize,
    default: bool,
}

pub fn handle(path: &Path) -> Result<()> {
    let scenario = Scenario::load(path)?;

    if scenario.personas.is_empty() {
        output::warning("Scenario defines no personas");
        return Ok(());
    }

    let default = scenario.default_persona.as_deref();
    let rows: Vec<PersonaRow<'_>> = scenario
        .personas
        .iter()
        .map(|p| PersonaRow {
            name: &p.name,
            prompt: p.prompt.lines().next().unwrap_or(""),
            style_examples: p.style_examples().is_some(),
            seed_dialogs: p.seed_dialogs.len(),
            default: default == Some(p.name.as_str()),
        })
        .collect();

    let mut table = output::table(&["Name", "Prompt", "Style", "Seed dialogs"]);
    for row in &rows {
        let name = if row.default {
            format!("{} (default)", row.name)
        } else {
            row.name.to_string()
        };
        output::table_row(
            &mut table,
            &[
                name,
                row.prompt.to_string(),
                if row.style_examples { "yes" } else { "no" }.to_string(),
                row.seed_dialogs.to_string(),
            ],
        );
    }

    output::header(&format!("{} personas", rows.len()));
    output::table_print(&table, &rows);
    Ok(())
}
