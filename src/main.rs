use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use findlike::cli::Cli;
use findlike::core::filter::FilterSpec;
use findlike::core::render::write_path;
use findlike::core::walk::walk;
use findlike::fs::RealFileSystem;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::parse_find_style(std::env::args_os()) {
        Ok(cli) => cli,
        Err(err) => err.exit(),
    };
    init_tracing(cli.verbose);

    let spec = match FilterSpec::new(&cli.filter_options()) {
        Ok(spec) => spec,
        Err(err) => {
            eprintln!("findlike: {err}");
            return ExitCode::from(2);
        }
    };

    match run(&cli, &spec).await {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::from(1),
        Err(err) if is_broken_pipe(&err) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("findlike: {err:#}");
            ExitCode::from(1)
        }
    }
}

/// Walk every root, writing matches to stdout. Returns whether any
/// diagnostic was raised along the way.
async fn run(cli: &Cli, spec: &FilterSpec) -> anyhow::Result<bool> {
    let terminator = cli.terminator();
    let mut out = BufWriter::new(io::stdout().lock());
    let mut had_errors = false;

    let mut walker = walk(&RealFileSystem, cli.paths.iter().cloned(), spec);
    while let Some(item) = walker.next().await {
        match item {
            Ok(entry) => {
                write_path(&mut out, &entry.path, terminator).context("writing output")?;
            }
            Err(err) => {
                had_errors = true;
                if !cli.quiet {
                    out.flush().context("writing output")?;
                    eprintln!("findlike: {err}");
                }
            }
        }
    }

    out.flush().context("writing output")?;
    Ok(had_errors)
}

fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.downcast_ref::<io::Error>()
        .is_some_and(|e| e.kind() == io::ErrorKind::BrokenPipe)
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("findlike=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}
