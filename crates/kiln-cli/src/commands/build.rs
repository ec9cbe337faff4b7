//! `kiln build`: compose the optimized pipeline and emit it as JSON.

use std::time::Instant;

use kiln_config::{KilnConfig, Mode, validate_schema};
use kiln_pipeline::PipelineDescription;
use tracing::info;

use crate::cli::BuildArgs;
use crate::commands::Context;
use crate::commands::utils::{get_cwd, load_config, resolve_path, write_output};
use crate::error::Result;
use crate::ui;

/// Execute the build command.
///
/// The pipeline JSON goes to `--output` when given, stdout otherwise. Status
/// lines always go to stderr so stdout stays machine-readable.
pub async fn execute(ctx: &Context, args: BuildArgs) -> Result<()> {
    let started = Instant::now();
    let mode = Mode::from(args.mode);

    let mut config = load_config(ctx)?;
    apply_flags(&mut config, &args);
    validate_schema(&config)?;

    let pipeline = compose(&config, mode)?;
    let json = pipeline.to_json()?;

    match &args.output {
        Some(output) => {
            let path = resolve_path(output, &get_cwd(ctx)?);
            let size = write_output(&path, &json)?;
            info!(path = %path.display(), size, "pipeline written");
            ui::print_build_summary(mode, &pipeline, Some((&path, size)), started.elapsed());
            ui::success(&format!("{mode} pipeline ready"));
        }
        None => {
            println!("{json}");
            ui::print_build_summary(mode, &pipeline, None, started.elapsed());
        }
    }

    Ok(())
}

/// Command-line flags win over the file and the environment.
fn apply_flags(config: &mut KilnConfig, args: &BuildArgs) {
    if args.report {
        config.build.bundle_analyzer_report = true;
    }
    if args.no_gzip {
        config.build.production_gzip = false;
    }
    if args.no_source_map {
        config.build.production_source_map = false;
    }
}

fn compose(config: &KilnConfig, mode: Mode) -> Result<PipelineDescription> {
    let pipeline = kiln_pipeline::production(config, mode)?;
    if mode == Mode::Production && config.build.bundle_analyzer_report {
        ui::info("Bundle analyzer report enabled");
    }
    Ok(pipeline)
}
