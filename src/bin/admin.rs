use std::io;
use std::process::ExitCode;

use phonebook::admin::{self, AdminError};
use phonebook::open_store;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = match admin::parse_args(std::env::args_os()) {
        Ok(args) => args,
        Err(AdminError::Help(text)) => {
            print!("{text}");
            return ExitCode::SUCCESS;
        }
        Err(AdminError::Usage(message)) => {
            eprintln!("{}", message.trim_end());
            eprintln!("{}", admin::USAGE);
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let store = match open_store(&args.backend) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let stdout = io::stdout();
    match admin::run(store.as_ref(), &args.command, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
