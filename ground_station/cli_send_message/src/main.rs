/*
send_message - queue a message for the Print_n_Prick to print.

Usage: send_message [message words...]
With no words the message is read from a prompt.
*/

use clap::Parser;
use cli_send_message::{session, Args};
use log::LevelFilter;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let logger = match &args.log_dir {
        Some(log_dir) => logging::init_logger(log_dir, LevelFilter::Warn),
        None => logging::init_console_logger(LevelFilter::Warn),
    };
    if let Err(e) = logger {
        eprintln!("Logging disabled: {}", e);
    }

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();

    let code = session::run(&args, &mut input, &mut output).await;
    std::process::exit(code);
}
