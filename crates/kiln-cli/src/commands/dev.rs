//! Development server command implementation.
//!
//! Composes the development pipeline, bootstraps it onto a free port and
//! serves the project until Ctrl+C.

use std::sync::Arc;

use kiln_config::{KilnConfig, Mode, validate_schema};
use kiln_pipeline::paths::posix_join;
use kiln_pipeline::{DevOverrides, DevServerBootstrapper, PathResolver, TcpPortProbe};
use tokio::signal;

use crate::cli::DevArgs;
use crate::commands::Context;
use crate::commands::utils::load_config;
use crate::error::Result;
use crate::notifier::TerminalNotifier;
use crate::server::{self, ServeOptions};
use crate::ui;

/// Execute the dev command.
///
/// 1. Load configuration and apply the command-line flags
/// 2. Compose the development pipeline
/// 3. Probe for a free port starting at the configured (or `--port`) one
/// 4. Serve static files and the pipeline until Ctrl+C
pub async fn execute(ctx: &Context, args: DevArgs) -> Result<()> {
    ui::info("Starting development server...");

    let mut config = load_config(ctx)?;
    apply_flags(&mut config, &args);
    validate_schema(&config)?;

    let overrides = DevOverrides {
        host: args.host.clone(),
        port: None,
    };
    let toggles = config.toggles(Mode::Development)?;
    let pipeline = kiln_pipeline::development(&config, &overrides)?;

    let project = &config.project;
    let mut bootstrapper = DevServerBootstrapper::new(TcpPortProbe::default())
        .port_override(args.port)
        .notifications(
            project.name.clone(),
            project.resolve(&project.icon),
            Arc::new(TerminalNotifier),
        );
    let bootstrapped = bootstrapper.bootstrap(pipeline, &toggles).await?;

    let (host, port) = bootstrapped
        .pipeline
        .dev_server_address()
        .map(|(host, port)| (host.to_string(), port))
        .unwrap_or_else(|| (config.dev.host.clone(), bootstrapped.binding.bound_port));

    ui::print_dev_banner(&bootstrapped.url, &bootstrapped.binding);
    if config.dev.auto_open_browser && !ui::is_ci() {
        open_browser(&bootstrapped.url);
    }
    ui::info("Press Ctrl+C to stop");

    let app = server::router(
        bootstrapped.pipeline,
        bootstrapped.notifier,
        &serve_options(&config),
    );
    server::serve(app, &host, port, async {
        let _ = signal::ctrl_c().await;
        ui::info("Shutting down development server...");
    })
    .await
}

fn apply_flags(config: &mut KilnConfig, args: &DevArgs) {
    if args.no_notify {
        config.dev.notify_on_errors = false;
    }
    if args.open {
        config.dev.auto_open_browser = true;
    }
}

fn serve_options(config: &KilnConfig) -> ServeOptions {
    let paths = PathResolver::new(config).asset_paths(Mode::Development);
    ServeOptions {
        static_mount: posix_join(&paths.public_path, &paths.sub_directory),
        static_dir: config.project.resolve(&config.project.static_dir),
        template: config.project.resolve(&config.project.template),
    }
}

/// Open the URL in the default browser.
fn open_browser(url: &str) {
    use std::process::Command;

    let result = if cfg!(target_os = "macos") {
        Command::new("open").arg(url).spawn()
    } else if cfg!(target_os = "windows") {
        Command::new("cmd").args(["/C", "start", url]).spawn()
    } else {
        Command::new("xdg-open").arg(url).spawn()
    };

    match result {
        Ok(_) => ui::info(&format!("Opened browser at {}", url)),
        Err(e) => ui::warning(&format!("Failed to open browser: {}", e)),
    }
}
