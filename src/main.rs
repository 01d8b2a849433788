use std::env;
use std::io;
use std::process::ExitCode;

use clap::Parser;

use piper::docker::env::live_environment;
use piper::{exit_code_for_error, telemetry_init, ProcessExecutor, TaskDescriptor, TaskRunner};

mod cli;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    telemetry_init(cli.verbose);

    let task = match TaskDescriptor::from_path(&cli.config) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(exit_code_for_error(&e));
        }
    };

    if cli.verbose {
        eprintln!("piper: task: {}", cli.config.display());
        eprintln!("piper: image: {}", task.image);
        eprintln!("piper: runtime: {}", cli.runtime);
    }

    let cwd = env::current_dir().ok();
    let executor = ProcessExecutor::new().with_timeout(cli.timeout);
    let runner = TaskRunner::new(cli.run_options(cwd), &executor);

    let live_env = live_environment();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match runner.run(
        &task,
        cli.inputs.as_slice(),
        cli.outputs.as_slice(),
        live_env.as_slice(),
        &mut out,
    ) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(exit_code_for_error(&e))
        }
    }
}
