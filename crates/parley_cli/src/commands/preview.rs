//! `parley preview`

use std::path::Path;

use anyhow::Result;
use parley_core::DialogRole;
use parley_runtime::PipelineConfig;
use tracing::debug;

use crate::output;
use crate::scenario::Scenario;

pub async fn handle(path: &Path, config_path: Option<&Path>) -> Result<()> {
    let scenario = Scenario::load(path)?;
    let config = resolve_config(&scenario, config_path)?;
    debug!(?config, "Pipeline config");

    let builder = scenario.builder()?;
    let request = builder.build(&scenario.context, &config).await?;

    if output::is_json() {
        output::data("prompt_request", &request);
        return Ok(());
    }

    output::header("System prompt");
    output::block(request.system_prompt.trim_start());
    println!();

    output::header("User prompt");
    output::block(&request.user_prompt);
    println!();

    if !request.seed_dialogs.is_empty() {
        let mut table = output::table(&["Role", "Content"]);
        for turn in &request.seed_dialogs {
            let role = match turn.role {
                DialogRole::User => "user",
                DialogRole::Assistant => "assistant",
            };
            output::table_row(&mut table, &[role.to_string(), turn.content.clone()]);
        }
        output::header("Seed dialogs");
        output::table_print(&table, &request.seed_dialogs);
        println!();
    }

    if request.image_references.is_empty() {
        output::dim("No images attached");
    } else {
        output::header("Images (newest first)");
        for image in &request.image_references {
            output::block(image);
        }
    }

    output::kv("tools", if request.use_tools { "on" } else { "off" });
    Ok(())
}

/// `--config` file, else the scenario's own settings, else defaults; env vars on top.
fn resolve_config(scenario: &Scenario, config_path: Option<&Path>) -> Result<PipelineConfig> {
    let base = match config_path {
        Some(path) => PipelineConfig::from_toml_file(path)?,
        None => scenario.config.clone().unwrap_or_default(),
    };
    Ok(base.merge_env())
}
