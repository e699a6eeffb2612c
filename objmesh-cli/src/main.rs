//! objmesh - load an OBJ file (plus its materials) and report the indexed mesh
//!
//! Usage: objmesh <file.obj> [--mtl <file.mtl>] [--flip-v]
//! Log verbosity follows RUST_LOG (default: info).

use std::env;
use std::process::ExitCode;

use env_logger::Env;
use log::error;
use objmesh_cli::{load, Args, CliError, USAGE};

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = match Args::parse(env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    match load(&args).map_err(CliError::from) {
        Ok(report) => {
            report.log_summary();
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
