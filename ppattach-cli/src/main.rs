use std::io::stdout;

use anyhow::Result;
use clap::{crate_version, value_parser, Arg, Command};
use clap_complete::{generate, Shell};

pub mod io;

pub mod progress;

pub mod stats;

mod subcommands;

pub mod traits;
use traits::PpAttachApp;

pub mod writer;

fn main() -> Result<()> {
    // Known subapplications.
    let apps = vec![
        subcommands::EvalApp::app(),
        subcommands::ExtractApp::app(),
        subcommands::WritePredictionsApp::app(),
    ];

    env_logger::init();

    let cli = Command::new("ppattach")
        .about("Prepositional phrase attachment samples from dependency treebanks")
        .version(crate_version!())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommands(apps)
        .subcommand(
            Command::new("completions")
                .about("Generate completion scripts for your shell")
                .arg_required_else_help(true)
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(value_parser!(Shell)),
                ),
        );
    let matches = cli.clone().get_matches();

    match matches.subcommand() {
        Some(("completions", matches)) => {
            let shell = *matches.get_one::<Shell>("shell").unwrap();
            write_completion_script(cli, shell);
            Ok(())
        }
        Some(("eval", matches)) => subcommands::EvalApp::parse(matches)?.run(),
        Some(("extract", matches)) => subcommands::ExtractApp::parse(matches)?.run(),
        Some(("write-predictions", matches)) => {
            subcommands::WritePredictionsApp::parse(matches)?.run()
        }
        _unknown => unreachable!(),
    }
}

fn write_completion_script(mut cli: Command, shell: Shell) {
    generate(shell, &mut cli, "ppattach", &mut stdout());
}
