use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use converse_cli::{set_configured_verbosity, ConverseArgs, ConverseCli, Settings, EXIT_FAILURE};
use tracing::info;
use tracing_chrome::ChromeLayerBuilder;
use tracing_log::AsTrace;
use tracing_subscriber::prelude::*;

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("ERROR: {:#}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn run() -> Result<u8> {
    let start = std::time::Instant::now();

    let args = ConverseArgs::parse();
    let settings = Settings::new()?;
    set_configured_verbosity(settings.verbosity.as_deref());

    // level comes from -v/-q, falling back to settings.verbosity
    let log_level_filter = args.verbose.log_level_filter();

    // stdout carries only the generated text
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let (chrome_layer, _guard) = if args.tracing {
        let (chrome_layer, guard) = ChromeLayerBuilder::new().build();
        (Some(chrome_layer), Some(guard))
    } else {
        (None, None)
    };
    tracing_subscriber::registry()
        .with(log_level_filter.as_trace())
        .with(fmt_layer)
        .with(chrome_layer)
        .init();

    info!("Initialized args, settings, and logging in {:?}", start.elapsed());

    let cli = ConverseCli::new(settings, args, Some(start));
    cli.exec()
}
