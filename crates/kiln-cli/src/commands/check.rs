//! Check command implementation.
//!
//! Validates configuration without emitting anything, and optionally prints
//! the derived toggles, the effective configuration or the JSON schema.

use kiln_config::{KilnConfig, Mode, validate_fs, validate_schema};
use kiln_pipeline::DevOverrides;
use serde_json::{Map, Value};

use crate::cli::{CheckArgs, CheckOutput};
use crate::commands::Context;
use crate::commands::utils::load_config;
use crate::error::Result;
use crate::ui;

/// Execute the check command.
///
/// 1. `--schema` prints the config JSON schema and stops
/// 2. Load and schema-validate the configuration
/// 3. With `--fs`, check that the root, static directory and template exist
/// 4. Compose every mode's pipeline to surface merge conflicts
pub async fn execute(ctx: &Context, args: CheckArgs) -> Result<()> {
    if args.schema {
        println!("{}", serde_json::to_string_pretty(&KilnConfig::json_schema()?)?);
        return Ok(());
    }

    ui::info("Checking configuration...");
    let config = load_config(ctx)?;

    if args.fs {
        validate_fs(&config)?;
        ui::success("Project files present");
    } else {
        validate_schema(&config)?;
    }
    ui::success("Configuration is valid!");

    for (mode, rules, plugins) in compose_all(&config)? {
        ui::success(&format!("  {mode}: {rules} rules, {plugins} plugins"));
    }

    match args.show {
        CheckOutput::Summary => {}
        CheckOutput::Toggles => println!("{}", serde_json::to_string_pretty(&toggles(&config)?)?),
        CheckOutput::Config => println!("{}", serde_json::to_string_pretty(&config.to_value()?)?),
    }

    Ok(())
}

fn compose_all(config: &KilnConfig) -> Result<Vec<(Mode, usize, usize)>> {
    Mode::ALL
        .into_iter()
        .map(|mode| {
            let pipeline = match mode {
                Mode::Development => kiln_pipeline::development(config, &DevOverrides::default())?,
                _ => kiln_pipeline::production(config, mode)?,
            };
            Ok((mode, pipeline.module.rules.len(), pipeline.plugins.len()))
        })
        .collect()
}

/// Derived toggles for every mode, keyed by mode name.
fn toggles(config: &KilnConfig) -> Result<Value> {
    let mut out = Map::new();
    for mode in Mode::ALL {
        out.insert(
            mode.as_str().to_string(),
            serde_json::to_value(config.toggles(mode)?)?,
        );
    }
    Ok(Value::Object(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_all_covers_every_mode() {
        let summary = compose_all(&KilnConfig::default()).unwrap();
        let modes: Vec<Mode> = summary.iter().map(|(mode, _, _)| *mode).collect();
        assert_eq!(modes, Mode::ALL.to_vec());
        assert!(summary.iter().all(|(_, rules, plugins)| *rules > 0 && *plugins > 0));
    }

    #[test]
    fn test_toggles_keyed_by_mode() {
        let value = toggles(&KilnConfig::default()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(
            object.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["development", "production", "testing"]
        );
        assert_eq!(object["development"]["extract"], Value::Bool(false));
    }
}
