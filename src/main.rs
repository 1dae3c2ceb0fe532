use clap::Parser;
use console::style;
use locale_updater::cli::Cli;
use locale_updater::{LanguageTable, UpdaterError, run};
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let translator = match cli.translator() {
        Ok(translator) => translator,
        Err(err) => return fail(err.into()),
    };

    let result = run(
        &cli.options(),
        &LanguageTable::default(),
        translator.as_ref(),
        io::stdin().lock(),
        io::stdout(),
    )
    .await;

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => fail(err),
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    let filter = if verbose {
        filter.add_directive(LevelFilter::DEBUG.into())
    } else {
        filter
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn fail(err: UpdaterError) -> ExitCode {
    eprintln!("{} {}", style("error:").red().bold(), err);
    ExitCode::FAILURE
}
