use std::process::ExitCode;

use clap::Parser;
use log::error;

use googkit::logger;
use googkit::plugin;
use googkit::{Arguments, Dispatcher, Outcome};

#[derive(Parser, Debug)]
#[command(
    name = "googkit",
    about = "Project toolkit driven by a tree of commands",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Cli {
    /// Command words and options, e.g. `build --debug`. `--log-file <path>`
    /// may appear anywhere and copies every log record into that file.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

const LOG_FILE: &str = "--log-file";

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let args = Arguments::parse_valued(cli.args, &[LOG_FILE]);

    let log_file = args
        .value(LOG_FILE)
        .map(std::fs::File::create)
        .transpose()?;
    logger::init(args.option("--verbose"), log_file)?;

    let tree = plugin::default_tree(&[])?;
    let cwd = std::env::current_dir()?;
    let dispatcher = Dispatcher::new(tree);

    match dispatcher.dispatch(&args, &cwd) {
        Ok(Outcome::Version(text) | Outcome::Help(text)) => {
            println!("{text}");
            Ok(ExitCode::SUCCESS)
        }
        Ok(Outcome::Completed) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            error!("[Error] {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}
