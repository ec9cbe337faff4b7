//! kiln CLI entry point: argument parsing, logging setup and command
//! dispatch.

use clap::Parser;
use kiln_cli::{cli, commands, error, logger, ui};
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    if args.no_color {
        ui::disable_colors();
    } else {
        ui::init_colors();
    }

    let ctx = commands::Context {
        cwd: args.cwd,
        config_path: args.config,
    };

    let result = match args.command {
        cli::Command::Build(build_args) => commands::build_execute(&ctx, build_args).await,
        cli::Command::Dev(dev_args) => commands::dev_execute(&ctx, dev_args).await,
        cli::Command::Check(check_args) => commands::check_execute(&ctx, check_args).await,
    };

    result.map_err(error::cli_error_to_miette)
}
