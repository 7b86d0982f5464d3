use crate::constants::{exit_codes, verbosity};
use clap::{error::ErrorKind, CommandFactory, Parser};
use log::LevelFilter;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = r#"{name} {version}
{about}

{usage-heading} {usage}

{all-args}
{after-help}
"#;

const AFTER_HELP: &str = r#"Text prompts accept these commands:
  :back     return to the previous step
  :cancel   dismiss the prompt
  :<n>      press the n-th extra button of the step"#;

/// CLI arguments for multistep.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None, after_help = AFTER_HELP)]
pub struct Args {
    /// Flow definition file, or a directory containing flow.json / flow.yaml.
    #[arg(value_name = "FLOW")]
    pub flow: PathBuf,

    /// Write the collected answers to this file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Increase logging verbosity (`-v`, `-vv`, `-vvv`).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Preset answers as JSON string or `-` to read from stdin.
    #[arg(short, long)]
    pub answers: Option<String>,

    /// Take preset or default answers instead of prompting.
    #[arg(long = "non-interactive")]
    pub non_interactive: bool,
}

/// Parses the command line. A missing `FLOW` prints the error and the full
/// help, including the text prompt commands, then exits with a failure.
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.kind() == ErrorKind::MissingRequiredArgument => {
            eprintln!("{}", e.render());
            let mut command = Args::command().help_template(HELP_TEMPLATE);
            if let Err(print_err) = command.print_help() {
                eprintln!("Failed to display help information: {print_err}");
            }
            std::process::exit(exit_codes::FAILURE);
        }
        Err(e) => e.exit(),
    }
}

/// Log level for a `-v` count. Warnings are shown even without `-v`.
pub fn get_log_level_from_verbose(verbose_count: u8) -> LevelFilter {
    match verbose_count {
        verbosity::OFF => LevelFilter::Warn,
        verbosity::INFO => LevelFilter::Info,
        verbosity::DEBUG => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
