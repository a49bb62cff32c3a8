use clap::Parser;
use common::firebase;
use std::path::PathBuf;

/// Send a message to the Print_n_Prick. It prints alongside today's weather and the
/// sanitizer level the next time the printer checks in.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Args {
    /// Message to print. Prompted for when left out.
    #[arg(num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
    pub message: Vec<String>,

    #[arg(long, default_value = firebase::DATABASE_URL)]
    pub database_url: String,

    #[arg(long, default_value_t = firebase::REQUEST_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Also write log files here. Without it nothing is written to disk.
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}
