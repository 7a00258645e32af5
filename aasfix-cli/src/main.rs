use aasfix_domain::run;
use aasfix_types::Direction;
use camino::Utf8PathBuf;
use clap::Parser;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Fixes or unfixes known interoperability defects in an AASX file.
/// A file can be converted back and forth.
#[derive(Debug, Parser)]
#[command(name = "aasfix", version)]
struct Cli {
    /// Source file for reading; never modified.
    input: Utf8PathBuf,

    /// Destination file for writing; must not exist yet.
    output: Utf8PathBuf,

    /// Repair the file according to the standard. The output becomes usable
    /// with standard-conforming consumers, but may not work in unpatched
    /// legacy tools.
    #[arg(long, conflicts_with = "unfix", required_unless_present = "unfix")]
    fix: bool,

    /// Reverse the reversible repairs, i.e. break the file according to the
    /// standard so that unpatched legacy tools accept it again.
    #[arg(long)]
    unfix: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let direction = if cli.unfix {
        Direction::Unfix
    } else {
        Direction::Fix
    };

    match run(&cli.input, &cli.output, direction) {
        Ok(summary) => {
            println!(
                "{} -> {}: corrected {} node(s)",
                cli.input,
                cli.output,
                summary.total_corrected()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
