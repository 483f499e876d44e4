use std::{io, process};

use clap::Parser;
use colored::Colorize;
use knucleotide::{cli::Args, run};

#[cfg(feature = "tracing")]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    #[cfg(feature = "tracing")]
    init_tracing();

    let args = Args::parse();

    let config = args.config().unwrap_or_else(|e| {
        eprintln!(
            "{}\n {}",
            "Problem parsing arguments:".blue().bold(),
            e.to_string().blue()
        );
        eprintln!(
            "{}\n {}",
            "Help menu:".blue().bold(),
            "$ knucleotide --help".bold()
        );
        process::exit(1);
    });
    let input = args.input();

    if !args.quiet {
        eprintln!("{}: {}", "data".bold(), input.to_string().underline().bold().blue());
        eprintln!(
            "{}: {}",
            "threads".bold(),
            config.get_threads().to_string().blue().bold()
        );
        eprintln!();
    }

    let result = input
        .open()
        .and_then(|reader| run::run(reader, io::stdout().lock(), &config));

    if let Err(e) = result {
        eprintln!(
            "{}\n {}",
            "Application error:".blue().bold(),
            e.to_string().blue()
        );
        process::exit(1);
    }
}
