// src/main.rs
use clap::Parser;
use pacfuncs::log::{init_logging, LogLevel};
use pacfuncs::{pac, PacConfig, PacEvaluator, PacFunctions};
use std::process::ExitCode;
use url::Url;

/// Evaluate a proxy auto-config script for a URL.
#[derive(Debug, Parser)]
#[command(name = "pacfuncs", version)]
struct Cli {
    /// PAC script location: http(s):// URL, file:// URL or path
    pac: String,

    /// URL to find a proxy for
    #[arg(default_value = "https://www.google.com")]
    url: String,

    /// Log helper decisions
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Warn
    });

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), pacfuncs::PacError> {
    let config = PacConfig::from_env();
    let target = Url::parse(&cli.url)?;
    let script = pac::load_pac(&cli.pac, config.download_timeout)?;
    let evaluator = PacEvaluator::new(script, PacFunctions::system(&config), config.cache_ttl);

    let directives = evaluator.find_proxies(&target);
    if let Some(first) = directives.first() {
        println!("Proxy for {} → {}", cli.url, first);
    }
    for (i, directive) in directives.iter().enumerate() {
        println!("  {}. {}", i + 1, directive);
    }
    Ok(())
}
