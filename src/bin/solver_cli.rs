//! Command-line front end: feed a JSON request, print the JSON response.

use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use ballistic_solver::solve_request;

#[derive(Parser)]
#[command(name = "solver-cli")]
#[command(about = "External-ballistics shot solver", long_about = None)]
struct Cli {
    /// Request file; reads stdin when omitted
    request: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let input = match &cli.request {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map(|_| buffer)
        }
    };

    let input = match input {
        Ok(text) => text,
        Err(err) => {
            eprintln!("cannot read request: {}", err);
            return ExitCode::FAILURE;
        }
    };

    println!("{}", solve_request(&input));
    ExitCode::SUCCESS
}
