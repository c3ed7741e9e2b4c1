use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use theme_builder::app::{self, RunOptions};
use theme_builder::cli::Args;
use theme_builder::config::Config;
use theme_builder::error::ThemeError;
use theme_builder::interrupt::Interrupt;
use theme_builder::logging;

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            let code = err
                .downcast_ref::<ThemeError>()
                .map_or(1, ThemeError::exit_code);
            ExitCode::from(code)
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let interrupt = Interrupt::install().context("failed to install interrupt handler")?;

    let config = Config::load(&args.config)?;
    args.validate()?;

    let options = RunOptions {
        image: args.image.clone(),
        alpha: args.alpha,
        preview: args.preview,
    };
    app::run(&options, &config, &interrupt)?;
    Ok(())
}
